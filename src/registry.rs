//! Static registries for identifier families, key qualifiers and data
//! attributes.
//!
//! The registry is the versioned configuration the ordering engine and the
//! compression tag table are driven from: one entry per GS1 identifier
//! family, with its numeric AI code, short alias, value rule and the ordered
//! list of key-qualifier codes its URIs permit.

use crate::rules::Rule;

/// A GS1 identifier family (primary key).
#[derive(Debug, Clone, Copy)]
pub struct IdentifierFamily {
    /// Numeric AI code, e.g. `"01"`
    pub code: &'static str,
    /// Short alias, e.g. `"gtin"`
    pub name: &'static str,
    /// Value rule for this family
    pub rule: Rule,
    /// Whether the identifier locator probes this family. Party and location
    /// AIs (410-413, 415, 416) are valid families but never located as the
    /// identifier of a URI.
    pub(crate) probe: bool,
    /// Permitted key-qualifier codes, in canonical order
    pub qualifiers: &'static [&'static str],
    /// Value length when the family is all-numeric and fixed-length
    pub(crate) fixed_digits: Option<usize>,
}

/// A key qualifier (secondary AI).
#[derive(Debug, Clone, Copy)]
pub struct KeyQualifier {
    /// Numeric AI code, e.g. `"10"`
    pub code: &'static str,
    /// Short alias, e.g. `"lot"`
    pub name: &'static str,
    /// Value rule for this qualifier
    pub rule: Rule,
}

/// A GS1 data attribute carried in the query string.
#[derive(Debug, Clone, Copy)]
pub struct DataAttribute {
    /// Numeric AI code or well-known name, e.g. `"15"` or `"linkType"`
    pub code: &'static str,
    /// Rule name reported in validation traces
    pub rule_name: &'static str,
    /// Value format
    pub(crate) format: AttributeFormat,
}

/// Value format of a known data attribute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum AttributeFormat {
    /// All digits, length within an inclusive range
    Digits { min: usize, max: usize },
    /// A single `0` or `1`
    Flag,
    /// A GS1 Web Vocabulary term or an absolute URL
    LinkType,
}

/// Every identifier family, in registry order.
pub static FAMILIES: &[IdentifierFamily] = &[
    IdentifierFamily {
        code: "00",
        name: "sscc",
        rule: Rule::Sscc,
        probe: true,
        qualifiers: &[],
        fixed_digits: Some(18),
    },
    IdentifierFamily {
        code: "01",
        name: "gtin",
        rule: Rule::Gtin,
        probe: true,
        qualifiers: &["22", "10", "21"],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "253",
        name: "gdti",
        rule: Rule::Gdti,
        probe: true,
        qualifiers: &[],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "255",
        name: "gcn",
        rule: Rule::Gcn,
        probe: true,
        qualifiers: &[],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "401",
        name: "ginc",
        rule: Rule::Ginc,
        probe: true,
        qualifiers: &[],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "402",
        name: "gsin",
        rule: Rule::Gsin,
        probe: true,
        qualifiers: &[],
        fixed_digits: Some(17),
    },
    IdentifierFamily {
        code: "410",
        name: "shipTo",
        rule: Rule::ShipTo,
        probe: false,
        qualifiers: &[],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "411",
        name: "billTo",
        rule: Rule::BillTo,
        probe: false,
        qualifiers: &[],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "412",
        name: "purchasedFrom",
        rule: Rule::PurchasedFrom,
        probe: false,
        qualifiers: &[],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "413",
        name: "shipFor",
        rule: Rule::ShipFor,
        probe: false,
        qualifiers: &[],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "414",
        name: "gln",
        rule: Rule::Gln,
        probe: true,
        qualifiers: &["254"],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "415",
        name: "payTo",
        rule: Rule::PayTo,
        probe: false,
        qualifiers: &["8020"],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "416",
        name: "glnProd",
        rule: Rule::GlnProd,
        probe: false,
        qualifiers: &[],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "417",
        name: "partyGln",
        rule: Rule::PartyGln,
        probe: true,
        qualifiers: &[],
        fixed_digits: Some(13),
    },
    IdentifierFamily {
        code: "8003",
        name: "grai",
        rule: Rule::Grai,
        probe: true,
        qualifiers: &[],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "8004",
        name: "giai",
        rule: Rule::Giai,
        probe: true,
        qualifiers: &[],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "8006",
        name: "itip",
        rule: Rule::Itip,
        probe: true,
        qualifiers: &["22", "10", "21"],
        fixed_digits: Some(18),
    },
    IdentifierFamily {
        code: "8010",
        name: "cpid",
        rule: Rule::Cpid,
        probe: true,
        qualifiers: &["8011"],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "8013",
        name: "gmn",
        rule: Rule::Gmn,
        probe: true,
        qualifiers: &[],
        fixed_digits: None,
    },
    IdentifierFamily {
        code: "8017",
        name: "gsrnp",
        rule: Rule::Gsrnp,
        probe: true,
        qualifiers: &["8019"],
        fixed_digits: Some(18),
    },
    IdentifierFamily {
        code: "8018",
        name: "gsrn",
        rule: Rule::Gsrn,
        probe: true,
        qualifiers: &["8019"],
        fixed_digits: Some(18),
    },
];

/// Every key qualifier, in registry order.
pub static KEY_QUALIFIERS: &[KeyQualifier] = &[
    KeyQualifier {
        code: "22",
        name: "cpv",
        rule: Rule::Cpv,
    },
    KeyQualifier {
        code: "10",
        name: "lot",
        rule: Rule::Lot,
    },
    KeyQualifier {
        code: "21",
        name: "ser",
        rule: Rule::Ser,
    },
    KeyQualifier {
        code: "254",
        name: "glnx",
        rule: Rule::Glnx,
    },
    KeyQualifier {
        code: "8011",
        name: "cpsn",
        rule: Rule::Cpsn,
    },
    KeyQualifier {
        code: "8019",
        name: "srin",
        rule: Rule::Srin,
    },
    KeyQualifier {
        code: "8020",
        name: "refno",
        rule: Rule::Refno,
    },
];

/// Known data attributes, in registry order.
pub static DATA_ATTRIBUTES: &[DataAttribute] = &[
    DataAttribute {
        code: "11",
        rule_name: "prodDateParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "13",
        rule_name: "packDateParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "15",
        rule_name: "bestBeforeDateParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "16",
        rule_name: "sellByDateParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "17",
        rule_name: "expiryDateParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "3100",
        rule_name: "netWeightParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "3101",
        rule_name: "netWeightParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "3102",
        rule_name: "netWeightParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "3103",
        rule_name: "netWeightParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "4321",
        rule_name: "dangerousGoodsParameter",
        format: AttributeFormat::Flag,
    },
    DataAttribute {
        code: "4322",
        rule_name: "authorizedToLeaveParameter",
        format: AttributeFormat::Flag,
    },
    DataAttribute {
        code: "4323",
        rule_name: "signatureRequiredParameter",
        format: AttributeFormat::Flag,
    },
    DataAttribute {
        code: "4324",
        rule_name: "notBeforeDelDateParameter",
        format: AttributeFormat::Digits { min: 10, max: 10 },
    },
    DataAttribute {
        code: "4325",
        rule_name: "notAfterDelDateParameter",
        format: AttributeFormat::Digits { min: 10, max: 10 },
    },
    DataAttribute {
        code: "4326",
        rule_name: "releaseDateParameter",
        format: AttributeFormat::Digits { min: 6, max: 6 },
    },
    DataAttribute {
        code: "7003",
        rule_name: "expiryTimeParameter",
        format: AttributeFormat::Digits { min: 10, max: 10 },
    },
    DataAttribute {
        code: "linkType",
        rule_name: "linkTypeParameter",
        format: AttributeFormat::LinkType,
    },
];

/// GS1 Web Vocabulary link-type terms accepted for the `linkType` attribute.
pub static LINK_TYPES: &[&str] = &[
    "gs1:activityIdeas",
    "gs1:allergenInfo",
    "gs1:brandHomepageClinical",
    "gs1:brandHomepagePatient",
    "gs1:careersInfo",
    "gs1:certificationInfo",
    "gs1:consumerHandlingStorageInfo",
    "gs1:defaultLink",
    "gs1:defaultLinkMulti",
    "gs1:epcis",
    "gs1:epil",
    "gs1:eventsInfo",
    "gs1:faqs",
    "gs1:handledBy",
    "gs1:hasRetailers",
    "gs1:homepage",
    "gs1:ingredientsInfo",
    "gs1:instructions",
    "gs1:jws",
    "gs1:leaveReview",
    "gs1:locationInfo",
    "gs1:logisticsInfo",
    "gs1:masterData",
    "gs1:menuInfo",
    "gs1:nutritionalInfo",
    "gs1:openingHoursInfo",
    "gs1:paymentLink",
    "gs1:pip",
    "gs1:productSustainabilityInfo",
    "gs1:promotion",
    "gs1:purchaseSuppliesOrAccessories",
    "gs1:quickStartGuide",
    "gs1:recallStatus",
    "gs1:recipeInfo",
    "gs1:registerProduct",
    "gs1:registryEntry",
    "gs1:relatedVideo",
    "gs1:review",
    "gs1:safetyInfo",
    "gs1:scheduleTime",
    "gs1:serviceInfo",
    "gs1:smartLabel",
    "gs1:smpc",
    "gs1:socialMedia",
    "gs1:statisticInfo",
    "gs1:support",
    "gs1:sustainabilityInfo",
    "gs1:traceability",
    "gs1:tutorial",
    "gs1:userAgreement",
    "gs1:verificationService",
    "gs1:whatsInTheBox",
];

/// Looks an identifier family up by numeric code or short alias.
#[must_use]
pub fn family_for(key: &str) -> Option<&'static IdentifierFamily> {
    FAMILIES.iter().find(|f| f.code == key || f.name == key)
}

/// Looks a key qualifier up by numeric code or short alias.
#[must_use]
pub fn key_qualifier_for(key: &str) -> Option<&'static KeyQualifier> {
    KEY_QUALIFIERS.iter().find(|q| q.code == key || q.name == key)
}

/// Looks a known data attribute up by code.
#[must_use]
pub fn data_attribute_for(code: &str) -> Option<&'static DataAttribute> {
    DATA_ATTRIBUTES.iter().find(|a| a.code == code)
}

impl DataAttribute {
    /// Returns whether `value` satisfies this attribute's format.
    #[must_use]
    pub fn accepts(&self, value: &str) -> bool {
        match self.format {
            AttributeFormat::Digits { min, max } => {
                value.len() >= min
                    && value.len() <= max
                    && value.bytes().all(|b| b.is_ascii_digit())
            }
            AttributeFormat::Flag => value == "0" || value == "1",
            AttributeFormat::LinkType => {
                LINK_TYPES.contains(&value) || value.contains("://")
            }
        }
    }
}
