//! The Digital Link record type.

use std::collections::BTreeMap;
use std::str::FromStr;

use serde::de::{MapAccess, Visitor};
use serde::ser::{SerializeMap, SerializeStruct};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use tracing::debug;

use crate::builder::{DigitalLinkBuilder, Empty};
use crate::checkdigit;
use crate::compression::{self, CompressOptions};
use crate::constants::SCHEME_PREFIXES;
use crate::error::{CompressionError, EncodeError, ParseError, ParseErrorKind, PartsError};
use crate::locate;
use crate::ordering::{self, KeyQualifierOrder};
use crate::registry;
use crate::validate::{self, StartRule, ValidationTrace};

/// A parsed or constructed GS1 Digital Link.
///
/// A record holds a domain (which may carry custom path segments), exactly
/// one identifier pair, zero or more key qualifiers, zero or more query
/// attributes, and the ordering policy used when it is serialized back to
/// URI form. Internal storage is never exposed; all access goes through the
/// methods below.
///
/// # Structure
///
/// ```text
/// scheme://host[/custom/path]/AICode/AIValue[/QualifierCode/QualifierValue]*[?code=value&...]
/// ```
///
/// # Examples
///
/// ```
/// use digital_link::DigitalLink;
///
/// let dl = DigitalLink::parse(
///     "https://example.com/01/9780345418913/21/12345?15=230911"
/// ).unwrap();
/// assert_eq!(dl.domain(), "https://example.com");
/// assert_eq!(dl.identifier(), ("01", "9780345418913"));
/// assert_eq!(dl.key_qualifier("21"), Some("12345"));
/// assert_eq!(dl.attribute("15"), Some("230911"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DigitalLink {
    domain: String,
    identifier: (String, String),
    key_qualifiers: Vec<(String, String)>,
    attributes: BTreeMap<String, String>,
    ordering: KeyQualifierOrder,
}

impl DigitalLink {
    /// Returns a builder for constructing a record field by field.
    ///
    /// # Examples
    ///
    /// ```
    /// use digital_link::DigitalLink;
    ///
    /// let dl = DigitalLink::builder()
    ///     .domain("https://example.com")
    ///     .identifier("gtin", "9780345418913")
    ///     .key_qualifier("ser", "12345")
    ///     .build()
    ///     .unwrap();
    /// assert_eq!(
    ///     dl.to_web_uri_string().unwrap(),
    ///     "https://example.com/gtin/9780345418913/ser/12345"
    /// );
    /// ```
    #[must_use]
    pub fn builder() -> DigitalLinkBuilder<Empty> {
        DigitalLinkBuilder::new()
    }

    /// Decodes a record from URI form, expanding compressed input first.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the input is empty, lacks an `http(s)://`
    /// scheme, contains no recognizable identifier pair, has a dangling
    /// qualifier code, or looks compressed but cannot be expanded.
    pub fn parse(input: &str) -> Result<Self, ParseError> {
        let result = if compression::is_compressed_web_uri(input) {
            match compression::decompress_web_uri(input, false) {
                Ok(expanded) => {
                    debug!(input, expanded = %expanded, "expanded compressed input");
                    Self::decode(&expanded)
                }
                Err(e) => Err(ParseErrorKind::from(e)),
            }
        } else {
            Self::decode(input)
        };
        result.map_err(|kind| ParseError {
            input: input.to_string(),
            kind,
        })
    }

    /// Decodes an uncompressed URI.
    pub(crate) fn decode(uri: &str) -> Result<Self, ParseErrorKind> {
        if uri.is_empty() {
            return Err(ParseErrorKind::Empty);
        }
        let Some(prefix) = SCHEME_PREFIXES.iter().find(|p| uri.starts_with(**p)) else {
            let found = uri
                .split_once("://")
                .map(|(scheme, _)| scheme.to_string());
            return Err(ParseErrorKind::MissingProtocol { found });
        };

        let (base, query) = match uri.split_once('?') {
            Some((base, query)) => (base, Some(query)),
            None => (uri, None),
        };
        let after_host = &base[prefix.len()..];
        let host_len = after_host.find('/').unwrap_or(after_host.len());
        let stem_end = prefix.len() + host_len;
        let segments: Vec<&str> = base[stem_end..]
            .split('/')
            .filter(|s| !s.is_empty())
            .collect();

        let index = locate::identifier_pair_index(&segments)
            .ok_or(ParseErrorKind::NoIdentifierFound)?;

        // Everything before the identifier pair is custom path; it folds
        // back into the domain and must be stripped again before grammar
        // validation or compression.
        let mut domain = base[..stem_end].to_string();
        if index > 0 {
            domain.push('/');
            domain.push_str(&segments[..index].join("/"));
        }

        let identifier = (
            segments[index].to_string(),
            segments[index + 1].to_string(),
        );

        // The locator scans pair starts from the end of the list, so the
        // tail after the identifier always holds complete pairs.
        let tail = &segments[index + 2..];
        let mut key_qualifiers: Vec<(String, String)> = Vec::with_capacity(tail.len() / 2);
        for pair in tail.chunks(2) {
            upsert(&mut key_qualifiers, pair[0], pair[1]);
        }

        let mut attributes = BTreeMap::new();
        if let Some(query) = query {
            for pair in query.split('&').filter(|p| !p.is_empty()) {
                let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
                attributes.insert(key.to_string(), value.to_string());
            }
        }

        Ok(Self {
            domain,
            identifier,
            key_qualifiers,
            attributes,
            ordering: KeyQualifierOrder::Insertion,
        })
    }

    pub(crate) fn from_raw_parts(
        domain: String,
        identifier: (String, String),
        key_qualifiers: Vec<(String, String)>,
        attributes: BTreeMap<String, String>,
        ordering: KeyQualifierOrder,
    ) -> Self {
        Self {
            domain,
            identifier,
            key_qualifiers,
            attributes,
            ordering,
        }
    }

    /// Returns the domain, custom path segments included.
    #[must_use]
    pub fn domain(&self) -> &str {
        &self.domain
    }

    /// Returns the identifier as a `(code, value)` pair.
    #[must_use]
    pub fn identifier(&self) -> (&str, &str) {
        (&self.identifier.0, &self.identifier.1)
    }

    /// Returns the value of one key qualifier, by code or alias as stored.
    #[must_use]
    pub fn key_qualifier(&self, key: &str) -> Option<&str> {
        self.key_qualifiers
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates the key qualifiers in insertion order.
    pub fn key_qualifiers(&self) -> impl Iterator<Item = (&str, &str)> {
        self.key_qualifiers
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the qualifier codes in the order serialization would emit
    /// them under [`KeyQualifierOrder::Explicit`] or insertion ordering.
    #[must_use]
    pub fn key_qualifiers_order(&self) -> Vec<&str> {
        match &self.ordering {
            KeyQualifierOrder::Explicit(list) => list.iter().map(String::as_str).collect(),
            _ => self
                .key_qualifiers
                .iter()
                .map(|(k, _)| k.as_str())
                .collect(),
        }
    }

    /// Returns the value of one attribute.
    #[must_use]
    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.attributes.get(key).map(String::as_str)
    }

    /// Iterates the attributes in deterministic (sorted) order.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Returns the ordering policy.
    #[must_use]
    pub fn ordering(&self) -> &KeyQualifierOrder {
        &self.ordering
    }

    /// Replaces the domain.
    pub fn set_domain(&mut self, domain: impl Into<String>) -> &mut Self {
        self.domain = domain.into();
        self
    }

    /// Replaces the identifier pair.
    pub fn set_identifier(
        &mut self,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.identifier = (code.into(), value.into());
        self
    }

    /// Sets a key qualifier. Re-setting a code overwrites its value without
    /// duplicating its position.
    pub fn set_key_qualifier(
        &mut self,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        let code = code.into();
        let value = value.into();
        upsert(&mut self.key_qualifiers, &code, &value);
        self
    }

    /// Sets an attribute.
    pub fn set_attribute(
        &mut self,
        code: impl Into<String>,
        value: impl Into<String>,
    ) -> &mut Self {
        self.attributes.insert(code.into(), value.into());
        self
    }

    /// Switches weight-sorted serialization on or off. Turning it off
    /// reverts to insertion order unless an explicit order is stored.
    pub fn sort_key_qualifiers(&mut self, sort: bool) -> &mut Self {
        if sort {
            self.ordering = KeyQualifierOrder::WeightSorted;
        } else if self.ordering == KeyQualifierOrder::WeightSorted {
            self.ordering = KeyQualifierOrder::Insertion;
        }
        self
    }

    /// Stores an explicit qualifier order for serialization.
    pub fn set_key_qualifiers_order(&mut self, order: Vec<String>) -> &mut Self {
        self.ordering = KeyQualifierOrder::Explicit(order);
        self
    }

    /// Replaces the ordering policy.
    pub fn set_ordering(&mut self, ordering: KeyQualifierOrder) -> &mut Self {
        self.ordering = ordering;
        self
    }

    /// Serializes the record to URI form under its ordering policy.
    ///
    /// The result is byte-identical across repeated calls for an unchanged
    /// record.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::UnknownIdentifier`] under
    /// [`KeyQualifierOrder::WeightSorted`] when the identifier is not in the
    /// registry, since no canonical qualifier order exists for it.
    pub fn to_web_uri_string(&self) -> Result<String, EncodeError> {
        let mut out = self.domain.clone();
        push_pair(&mut out, &self.identifier.0, &self.identifier.1);

        match &self.ordering {
            KeyQualifierOrder::Insertion => {
                for (key, value) in &self.key_qualifiers {
                    push_pair(&mut out, key, value);
                }
            }
            KeyQualifierOrder::Explicit(order) => {
                let mut emitted: Vec<&str> = Vec::with_capacity(self.key_qualifiers.len());
                for key in order {
                    if emitted.contains(&key.as_str()) {
                        continue;
                    }
                    if let Some(value) = self.key_qualifier(key) {
                        push_pair(&mut out, key, value);
                        emitted.push(key.as_str());
                    }
                }
                for (key, value) in &self.key_qualifiers {
                    if !emitted.contains(&key.as_str()) {
                        push_pair(&mut out, key, value);
                    }
                }
            }
            KeyQualifierOrder::WeightSorted => {
                let family = registry::family_for(&self.identifier.0).ok_or_else(|| {
                    EncodeError::UnknownIdentifier {
                        code: self.identifier.0.clone(),
                    }
                })?;
                for key in ordering::weight_sorted_keys(family, &self.key_qualifiers) {
                    if let Some(value) = self.key_qualifier(key) {
                        push_pair(&mut out, key, value);
                    }
                }
            }
        }

        for (i, (key, value)) in self.attributes.iter().enumerate() {
            out.push(if i == 0 { '?' } else { '&' });
            out.push_str(key);
            out.push('=');
            out.push_str(value);
        }
        Ok(out)
    }

    /// Serializes the record and compresses it with default options.
    ///
    /// # Errors
    ///
    /// Returns [`CompressionError`] when serialization or compression fails.
    pub fn to_compressed_web_uri_string(&self) -> Result<String, CompressionError> {
        let uri = self.to_web_uri_string()?;
        compression::compress_web_uri(&uri, &CompressOptions::default())
    }

    /// Serializes the record to its flat JSON form.
    ///
    /// Key order is fixed: `domain`, `identifier`, `keyQualifiers`,
    /// `attributes`, `sortKeyQualifiers`, `keyQualifiersOrder`.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] when serialization fails.
    pub fn to_json_string(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Constructs a record from its flat JSON form.
    ///
    /// # Errors
    ///
    /// Returns [`serde_json::Error`] for malformed JSON, wrongly typed
    /// fields, or a missing/ambiguous identifier.
    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Validates the record against the grammar.
    ///
    /// The domain's custom-path segments are stripped first, since the
    /// grammar only recognizes `scheme://host/AI/...` forms. Any underlying
    /// error yields `false`; this never panics for well-typed input.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        let Ok(uri) = self.to_web_uri_string() else {
            return false;
        };
        let stripped = validate::remove_custom_path(&uri, &self.domain);
        validate::validate_web_uri(&stripped)
    }

    /// Returns the rule-by-rule validation trace for the record's URI form,
    /// custom path stripped.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError`] when the record cannot be serialized.
    pub fn validation_trace(&self) -> Result<ValidationTrace, EncodeError> {
        let uri = self.to_web_uri_string()?;
        let stripped = validate::remove_custom_path(&uri, &self.domain);
        Ok(validate::parse_with_trace(
            StartRule::for_uri(&stripped),
            &stripped,
        ))
    }

    /// Verifies the check digit embedded in the identifier value, when its
    /// AI carries one.
    #[must_use]
    pub fn verify_check_digit(&self) -> bool {
        checkdigit::verify_value(&self.identifier.0, &self.identifier.1)
    }
}

fn push_pair(out: &mut String, key: &str, value: &str) {
    out.push('/');
    out.push_str(key);
    out.push('/');
    out.push_str(value);
}

fn upsert(entries: &mut Vec<(String, String)>, key: &str, value: &str) {
    match entries.iter_mut().find(|(k, _)| k == key) {
        Some((_, v)) => *v = value.to_string(),
        None => entries.push((key.to_string(), value.to_string())),
    }
}

impl FromStr for DigitalLink {
    type Err = ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<&str> for DigitalLink {
    type Error = ParseError;

    fn try_from(s: &str) -> Result<Self, Self::Error> {
        Self::parse(s)
    }
}

/// Serializes a pair slice as a JSON object, preserving order.
struct PairsAsMap<'a>(&'a [(String, String)]);

impl Serialize for PairsAsMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (key, value) in self.0 {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for DigitalLink {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let identifier = [(self.identifier.0.clone(), self.identifier.1.clone())];
        let mut state = serializer.serialize_struct("DigitalLink", 6)?;
        state.serialize_field("domain", &self.domain)?;
        state.serialize_field("identifier", &PairsAsMap(&identifier))?;
        state.serialize_field("keyQualifiers", &PairsAsMap(&self.key_qualifiers))?;
        state.serialize_field("attributes", &self.attributes)?;
        state.serialize_field(
            "sortKeyQualifiers",
            &(self.ordering == KeyQualifierOrder::WeightSorted),
        )?;
        state.serialize_field("keyQualifiersOrder", &self.key_qualifiers_order())?;
        state.end()
    }
}

/// Deserializes a JSON object into pairs, preserving document order and
/// requiring string values.
fn ordered_pairs<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Vec<(String, String)>, D::Error> {
    struct PairsVisitor;

    impl<'de> Visitor<'de> for PairsVisitor {
        type Value = Vec<(String, String)>;

        fn expecting(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
            f.write_str("an object with string values")
        }

        fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
            let mut out = Vec::new();
            while let Some((key, value)) = access.next_entry::<String, String>()? {
                out.push((key, value));
            }
            Ok(out)
        }
    }

    deserializer.deserialize_map(PairsVisitor)
}

/// The flat construction-object shape.
#[derive(Deserialize)]
struct LinkParts {
    domain: String,
    #[serde(deserialize_with = "ordered_pairs")]
    identifier: Vec<(String, String)>,
    #[serde(default, rename = "keyQualifiers", deserialize_with = "ordered_pairs")]
    key_qualifiers: Vec<(String, String)>,
    #[serde(default, deserialize_with = "ordered_pairs")]
    attributes: Vec<(String, String)>,
    #[serde(default, rename = "sortKeyQualifiers")]
    sort_key_qualifiers: bool,
    #[serde(default, rename = "keyQualifiersOrder")]
    key_qualifiers_order: Option<Vec<String>>,
}

impl TryFrom<LinkParts> for DigitalLink {
    type Error = PartsError;

    fn try_from(parts: LinkParts) -> Result<Self, Self::Error> {
        if parts.domain.is_empty() {
            return Err(PartsError::EmptyDomain);
        }
        let mut identifier = parts.identifier;
        let identifier = match identifier.len() {
            0 => return Err(PartsError::MissingIdentifier),
            1 => identifier.remove(0),
            found => return Err(PartsError::MultipleIdentifiers { found }),
        };

        let mut key_qualifiers = Vec::with_capacity(parts.key_qualifiers.len());
        for (key, value) in &parts.key_qualifiers {
            upsert(&mut key_qualifiers, key, value);
        }
        let attributes = parts.attributes.into_iter().collect();

        let ordering = if parts.sort_key_qualifiers {
            KeyQualifierOrder::WeightSorted
        } else if let Some(order) = parts.key_qualifiers_order {
            KeyQualifierOrder::Explicit(order)
        } else {
            KeyQualifierOrder::Insertion
        };

        Ok(Self::from_raw_parts(
            parts.domain,
            identifier,
            key_qualifiers,
            attributes,
            ordering,
        ))
    }
}

impl<'de> Deserialize<'de> for DigitalLink {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let parts = LinkParts::deserialize(deserializer)?;
        Self::try_from(parts).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decode_domain_identifier() {
        let dl = DigitalLink::parse("https://gs1.evrythng.com/01/9780345418913").unwrap();
        assert_eq!(dl.domain(), "https://gs1.evrythng.com");
        assert_eq!(dl.identifier(), ("01", "9780345418913"));
        assert_eq!(dl.key_qualifiers().count(), 0);
    }

    #[test]
    fn decode_folds_custom_path_into_the_domain() {
        let dl = DigitalLink::parse(
            "https://example.com/some/other/path/info/01/01234567890128/21/12345",
        )
        .unwrap();
        assert_eq!(dl.domain(), "https://example.com/some/other/path/info");
        assert_eq!(dl.identifier(), ("01", "01234567890128"));
        assert_eq!(dl.key_qualifier("21"), Some("12345"));
    }

    #[test]
    fn decode_tolerates_duplicate_and_trailing_slashes() {
        let dl = DigitalLink::parse("https://example.com//01//9780345418913/").unwrap();
        assert_eq!(dl.identifier(), ("01", "9780345418913"));
    }

    #[test]
    fn decode_query_last_duplicate_wins() {
        let dl =
            DigitalLink::parse("https://example.com/01/9780345418913?k=1&k=2&flag").unwrap();
        assert_eq!(dl.attribute("k"), Some("2"));
        assert_eq!(dl.attribute("flag"), Some(""));
    }

    #[test]
    fn decode_errors() {
        assert!(matches!(
            DigitalLink::parse("").map_err(|e| e.kind),
            Err(ParseErrorKind::Empty)
        ));
        assert!(matches!(
            DigitalLink::parse("badurl").map_err(|e| e.kind),
            Err(ParseErrorKind::MissingProtocol { found: None })
        ));
        assert!(matches!(
            DigitalLink::parse("ftp://example.com/01/1").map_err(|e| e.kind),
            Err(ParseErrorKind::MissingProtocol { found: Some(_) })
        ));
        assert!(matches!(
            DigitalLink::parse("https://example.com/custom/path/").map_err(|e| e.kind),
            Err(ParseErrorKind::NoIdentifierFound)
        ));
        // An odd tail shifts every probe slot off the AI codes, so no
        // identifier is found rather than a half pair being decoded.
        assert!(matches!(
            DigitalLink::parse("https://example.com/01/123/21").map_err(|e| e.kind),
            Err(ParseErrorKind::NoIdentifierFound)
        ));
    }

    #[test]
    fn encode_is_the_inverse_of_decode() {
        let uri = "https://gs1.evrythng.com/01/9780345418913/10/38737643/21/58943?15=230911";
        let dl = DigitalLink::parse(uri).unwrap();
        assert_eq!(dl.to_web_uri_string().unwrap(), uri);
    }

    #[test]
    fn setter_overwrite_keeps_position() {
        let mut dl = DigitalLink::parse("https://example.com/01/12345678/10/1/21/2").unwrap();
        dl.set_key_qualifier("10", "9");
        assert_eq!(
            dl.to_web_uri_string().unwrap(),
            "https://example.com/01/12345678/10/9/21/2"
        );
    }

    #[test]
    fn explicit_order_emits_listed_then_remaining() {
        let mut dl = DigitalLink::parse("https://example.com/01/12345678/10/1/21/2/22/3").unwrap();
        dl.set_key_qualifiers_order(vec!["21".to_string(), "10".to_string()]);
        assert_eq!(
            dl.to_web_uri_string().unwrap(),
            "https://example.com/01/12345678/21/2/10/1/22/3"
        );
    }

    #[test]
    fn weight_sorted_encode_is_canonical_and_deterministic() {
        let mut dl = DigitalLink::parse("https://example.com/01/12345678/21/2121/10/211/22/122113")
            .unwrap();
        dl.sort_key_qualifiers(true);
        let first = dl.to_web_uri_string().unwrap();
        assert_eq!(
            first,
            "https://example.com/01/12345678/22/122113/10/211/21/2121"
        );
        assert_eq!(dl.to_web_uri_string().unwrap(), first);
    }

    #[test]
    fn weight_sorted_unknown_identifier_is_an_error() {
        let mut dl = DigitalLink::builder()
            .domain("https://example.com")
            .identifier("unknownKey", "1")
            .build()
            .unwrap();
        dl.sort_key_qualifiers(true);
        assert!(matches!(
            dl.to_web_uri_string(),
            Err(EncodeError::UnknownIdentifier { .. })
        ));
    }

    #[test]
    fn json_round_trip() {
        let mut dl = DigitalLink::parse(
            "https://gs1.evrythng.com/01/9780345418913/10/38737643/21/58943?15=230911",
        )
        .unwrap();
        dl.set_key_qualifiers_order(vec!["10".to_string(), "21".to_string()]);
        let json = dl.to_json_string().unwrap();
        let back = DigitalLink::from_json_str(&json).unwrap();
        assert_eq!(back, dl);
    }

    #[test]
    fn json_construction_requires_the_identifier() {
        let err = DigitalLink::from_json_str(
            r#"{"domain":"https://example.com","identifier":{}}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("identifier"));

        let err = DigitalLink::from_json_str(r#"{"domain":"https://example.com"}"#).unwrap_err();
        assert!(err.to_string().contains("identifier"));
    }

    #[test]
    fn json_construction_rejects_wrongly_typed_fields() {
        assert!(
            DigitalLink::from_json_str(
                r#"{"domain":42,"identifier":{"01":"1"}}"#
            )
            .is_err()
        );
        assert!(
            DigitalLink::from_json_str(
                r#"{"domain":"https://x.com","identifier":{"01":"1"},"keyQualifiersOrder":"10"}"#
            )
            .is_err()
        );
    }

    #[test]
    fn check_digit_verification() {
        let dl = DigitalLink::parse("https://example.com/01/9780345418913").unwrap();
        assert!(dl.verify_check_digit());
        let dl = DigitalLink::parse("https://example.com/01/9780345418914").unwrap();
        assert!(!dl.verify_check_digit());
    }
}
