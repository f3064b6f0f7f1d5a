//! Integration tests for the Digital Link codec: construction paths,
//! accessors, serialization, validation, check digits and compression.

use digital_link::{
    CompressOptions, Detected, DigitalLink, KeyQualifierOrder, ParseErrorKind, RuleError,
    analyse_web_uri, compress_web_uri, decompress_web_uri, identifier_pair_index,
    is_compressed_web_uri, test_rule,
};

const DOMAIN: &str = "https://gs1.evrythng.com";
const URL: &str =
    "https://gs1.evrythng.com/01/9780345418913/10/38737643/21/58943?15=230911&thngId=U5mQKGDpnymBwQwRakyBqeYh";
const JSON: &str = "{\"domain\":\"https://gs1.evrythng.com\",\"identifier\":{\"01\":\"9780345418913\"},\"keyQualifiers\":{\"10\":\"38737643\",\"21\":\"58943\"},\"attributes\":{\"15\":\"230911\",\"thngId\":\"U5mQKGDpnymBwQwRakyBqeYh\"},\"sortKeyQualifiers\":false,\"keyQualifiersOrder\":[\"10\",\"21\"]}";

fn create_using_setters() -> DigitalLink {
    let mut dl = DigitalLink::builder()
        .domain(DOMAIN)
        .identifier("01", "9780345418913")
        .build()
        .unwrap();
    dl.set_key_qualifier("10", "38737643")
        .set_key_qualifier("21", "58943")
        .set_key_qualifiers_order(vec!["10".to_string(), "21".to_string()])
        .set_attribute("15", "230911")
        .set_attribute("thngId", "U5mQKGDpnymBwQwRakyBqeYh");
    dl
}

fn create_using_builder() -> DigitalLink {
    DigitalLink::builder()
        .domain(DOMAIN)
        .identifier("01", "9780345418913")
        .key_qualifier("10", "38737643")
        .key_qualifier("21", "58943")
        .key_qualifiers_order(vec!["10".to_string(), "21".to_string()])
        .attribute("15", "230911")
        .attribute("thngId", "U5mQKGDpnymBwQwRakyBqeYh")
        .build()
        .unwrap()
}

fn create_using_json() -> DigitalLink {
    DigitalLink::from_json_str(JSON).unwrap()
}

fn create_using_string() -> DigitalLink {
    DigitalLink::parse(URL).unwrap()
}

#[test]
fn every_construction_path_produces_the_same_uri() {
    let expected = create_using_setters().to_web_uri_string().unwrap();
    assert_eq!(expected, URL);
    assert_eq!(create_using_builder().to_web_uri_string().unwrap(), expected);
    assert_eq!(create_using_json().to_web_uri_string().unwrap(), expected);
    assert_eq!(create_using_string().to_web_uri_string().unwrap(), expected);
}

#[test]
fn every_construction_path_produces_the_same_json() {
    assert_eq!(create_using_setters().to_json_string().unwrap(), JSON);
    assert_eq!(create_using_builder().to_json_string().unwrap(), JSON);
    assert_eq!(create_using_json().to_json_string().unwrap(), JSON);
    assert_eq!(create_using_string().to_json_string().unwrap(), JSON);
}

#[test]
fn accessors_return_the_stored_fields() {
    let dl = create_using_setters();
    assert_eq!(dl.domain(), DOMAIN);
    assert_eq!(dl.identifier(), ("01", "9780345418913"));
    assert_eq!(dl.key_qualifier("10"), Some("38737643"));
    assert_eq!(dl.key_qualifier("21"), Some("58943"));
    assert_eq!(dl.key_qualifier("22"), None);
    assert_eq!(dl.attribute("15"), Some("230911"));
    assert_eq!(dl.attribute("thngId"), Some("U5mQKGDpnymBwQwRakyBqeYh"));
    assert_eq!(dl.key_qualifiers_order(), ["10", "21"]);
    assert_eq!(
        dl.ordering(),
        &KeyQualifierOrder::Explicit(vec!["10".to_string(), "21".to_string()])
    );
}

#[test]
fn decode_populates_qualifiers_in_encounter_order() {
    let dl = DigitalLink::parse("https://gs1.evrythng.com/01/9780345418913/10/38737643/21/58943")
        .unwrap();
    let qualifiers: Vec<_> = dl.key_qualifiers().collect();
    assert_eq!(qualifiers, [("10", "38737643"), ("21", "58943")]);
    assert_eq!(dl.ordering(), &KeyQualifierOrder::Insertion);
}

#[test]
fn invalid_uncompressed_input_still_decodes() {
    let dl = DigitalLink::parse("https://gs1.evrythng.com/01/123").unwrap();
    assert_eq!(dl.identifier(), ("01", "123"));
    assert!(!dl.is_valid());
}

#[test]
fn missing_protocol_is_a_decode_error() {
    assert!(matches!(
        DigitalLink::parse("badurl").map_err(|e| e.kind),
        Err(ParseErrorKind::MissingProtocol { .. })
    ));
}

#[test]
fn missing_identifier_is_a_decode_error() {
    assert!(matches!(
        DigitalLink::parse("https://example.com/custom/path/").map_err(|e| e.kind),
        Err(ParseErrorKind::NoIdentifierFound)
    ));
    assert!(matches!(
        DigitalLink::parse(DOMAIN).map_err(|e| e.kind),
        Err(ParseErrorKind::NoIdentifierFound)
    ));
}

#[test]
fn missing_identifier_in_the_parts_object_is_an_error() {
    let result = DigitalLink::from_json_str(
        "{\"domain\":\"https://gs1.evrythng.com\",\"keyQualifiers\":{\"10\":\"38737643\"}}",
    );
    assert!(result.is_err());
}

#[test]
fn qualifier_order_decides_validity() {
    let mut dl =
        DigitalLink::parse("https://example.com/01/01234567/21/12345/10/4512").unwrap();
    assert!(!dl.is_valid());
    dl.sort_key_qualifiers(true);
    assert!(dl.is_valid());
}

#[test]
fn weight_sorting_covers_all_three_gtin_qualifiers() {
    let mut dl = DigitalLink::builder()
        .domain("https://gs1.evrythng.com")
        .identifier("01", "12345678")
        .key_qualifier("10", "211")
        .key_qualifier("22", "122113")
        .key_qualifier("21", "2121")
        .build()
        .unwrap();
    assert!(!dl.is_valid());
    dl.sort_key_qualifiers(true);
    assert!(dl.is_valid());
    assert_eq!(
        dl.to_web_uri_string().unwrap(),
        "https://gs1.evrythng.com/01/12345678/22/122113/10/211/21/2121"
    );
}

#[test]
fn custom_path_is_stripped_before_validation() {
    let dl =
        DigitalLink::parse("https://example.com/some/other/path/info/01/01234567890128/21/12345")
            .unwrap();
    assert_eq!(dl.domain(), "https://example.com/some/other/path/info");
    assert!(dl.is_valid());

    let dl = DigitalLink::parse("https://example.com/my/custom/path/01/0123456789d/21/12345")
        .unwrap();
    assert!(!dl.is_valid());
}

#[test]
fn qualifier_of_the_wrong_family_is_invalid() {
    let dl = DigitalLink::parse("https://example.com/00/123456789123456789/10/4512").unwrap();
    assert!(!dl.is_valid());
}

#[test]
fn boolean_attribute_values_are_checked() {
    let dl = DigitalLink::parse("https://example.com/01/12345678/10/4512?4321=2").unwrap();
    assert!(!dl.is_valid());
    let dl = DigitalLink::parse("https://example.com/01/12345678/10/4512?4321=1").unwrap();
    assert!(dl.is_valid());
}

#[test]
fn trace_reports_rules_and_remainders() {
    let dl = DigitalLink::parse("https://gs1.evrythng.com/01/9780345418913").unwrap();
    let trace = dl.validation_trace().unwrap();
    assert!(trace.success);
    assert_eq!(trace.steps[0].rule, "scheme");
    assert_eq!(trace.steps[0].matched, "https");
    assert!(trace.steps.iter().any(|s| s.rule == "gtin-code" && s.matched == "01"));
    assert!(
        trace
            .steps
            .iter()
            .any(|s| s.rule == "gtin-value" && s.matched == "9780345418913")
    );

    let dl = DigitalLink::parse("https://gs1.evrythng.com/01/9780345418913d").unwrap();
    let trace = dl.validation_trace().unwrap();
    assert!(!trace.success);
    let last = trace.steps.last().unwrap();
    assert_eq!(last.remainder, "d");
}

#[test]
fn trace_recognizes_known_attribute_parameters() {
    let dl = DigitalLink::parse("https://gs1.evrythng.com/01/9780345418913?4324=1234567891")
        .unwrap();
    let trace = dl.validation_trace().unwrap();
    assert!(trace.steps.iter().any(|s| s.rule == "notBeforeDelDateParameter"));

    let dl = DigitalLink::parse("https://gs1.evrythng.com/01/9780345418913?4321=1").unwrap();
    let trace = dl.validation_trace().unwrap();
    assert!(trace.steps.iter().any(|s| s.rule == "dangerousGoodsParameter"));
}

#[test]
fn check_digit_verification_follows_the_identifier() {
    let dl = DigitalLink::parse("https://example.com/01/9780345418913").unwrap();
    assert!(dl.verify_check_digit());

    // Mutate the check digit
    let dl = DigitalLink::parse("https://example.com/01/9780345418914").unwrap();
    assert!(!dl.verify_check_digit());

    // GIAI carries no check digit
    let dl = DigitalLink::parse("https://example.com/8004/ABC123").unwrap();
    assert!(dl.verify_check_digit());
}

#[test]
fn identifier_location_tie_break() {
    let segments = ["some", "01", "path", "01", "12345678", "21", "4545646"];
    assert_eq!(identifier_pair_index(&segments), Some(3));
}

#[test]
fn unknown_rule_name_is_rejected() {
    assert!(matches!(
        test_rule("not-a-rule", "x"),
        Err(RuleError::Unknown { .. })
    ));
    assert!(matches!(
        test_rule("foo", "83479347"),
        Err(RuleError::Unknown { .. })
    ));
}

#[test]
fn rule_verdicts() {
    assert!(test_rule("gtin-value", "9780345418913").unwrap());
    assert!(test_rule("ser-value", "58943").unwrap());
    assert!(test_rule("cpv-value", "489327").unwrap());
    assert!(!test_rule("gtin-value", "9780345418913d").unwrap());
    assert!(!test_rule("ser-value", "{}").unwrap());
}

#[test]
fn compressed_round_trip_preserves_the_record() {
    let dl = create_using_setters();
    let compressed = dl.to_compressed_web_uri_string().unwrap();
    assert!(compressed.starts_with(DOMAIN));
    assert!(is_compressed_web_uri(&compressed));

    let back = DigitalLink::parse(&compressed).unwrap();
    assert_eq!(back.identifier(), dl.identifier());
    assert_eq!(back.key_qualifier("10"), dl.key_qualifier("10"));
    assert_eq!(back.key_qualifier("21"), dl.key_qualifier("21"));
    assert_eq!(back.attribute("15"), dl.attribute("15"));
    assert_eq!(back.attribute("thngId"), dl.attribute("thngId"));
}

#[test]
fn compressed_input_parses_transparently_and_validates() {
    let dl = DigitalLink::parse("https://dlnkd.tn.gg/01/09780345418913/10/231/21/345345")
        .unwrap();
    let compressed = dl.to_compressed_web_uri_string().unwrap();
    let parsed = DigitalLink::parse(&compressed).unwrap();
    assert!(parsed.is_valid());
    assert_eq!(
        parsed.to_web_uri_string().unwrap(),
        "https://dlnkd.tn.gg/01/09780345418913/10/231/21/345345"
    );
}

#[test]
fn custom_path_survives_compression_and_decompression() {
    let uri = "https://example.com/some/other/path/info/01/09780345418913/21/12345";
    let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
    assert!(compressed.starts_with("https://example.com/some/other/path/info/"));
    assert_eq!(decompress_web_uri(&compressed, false).unwrap(), uri);
}

#[test]
fn short_names_normalize_through_compression() {
    let uri = "https://dlnkd.tn.gg/gtin/09780345418913/lot/231/ser/345345?15=120820";
    let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
    assert_eq!(
        decompress_web_uri(&compressed, false).unwrap(),
        "https://dlnkd.tn.gg/01/09780345418913/10/231/21/345345?15=120820"
    );
    assert_eq!(decompress_web_uri(&compressed, true).unwrap(), uri);
}

#[test]
fn partial_compression_decompresses() {
    let uri = "https://example.com/01/09780345418913/21/12345";
    let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
    let token = compressed.rsplit_once('/').unwrap().1;

    let partial = format!("https://example.com/01/09780345418913/{token}");
    assert_eq!(analyse_web_uri(&partial), Detected::PartiallyCompressed);
    let expanded = decompress_web_uri(&partial, false).unwrap();
    assert!(expanded.starts_with("https://example.com/01/09780345418913/01/09780345418913"));
}

#[test]
fn detection_is_validity_gated() {
    let uri = "https://dlnkd.tn.gg/gtin/09780345418913/lot/231/ser/345345?15=120820";
    assert!(!is_compressed_web_uri(uri));
    let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
    assert!(is_compressed_web_uri(&compressed));
    // A plain path segment never looks compressed.
    assert!(!is_compressed_web_uri("https://example.com/custom/path"));
}
