//! Individual grammar rules that can be run with [`test_rule`].
//!
//! Each GS1 value rule is a charset-and-length matcher over the URI form of a
//! value, percent-encoded triplets included. The two composite rules validate
//! a whole (custom-path-free) Digital Link URI.

use crate::error::RuleError;
use crate::validate;

/// A named grammar rule from the closed registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Rule {
    /// GTIN value (8, 12, 13 or 14 digits)
    Gtin,
    /// ITIP value (18 digits)
    Itip,
    /// GMN value
    Gmn,
    /// CPID value
    Cpid,
    /// Ship-to GLN value
    ShipTo,
    /// Bill-to GLN value
    BillTo,
    /// Purchased-from GLN value
    PurchasedFrom,
    /// Ship-for GLN value
    ShipFor,
    /// GLN value (13 digits)
    Gln,
    /// Party GLN value
    PartyGln,
    /// Pay-to GLN value
    PayTo,
    /// Production-location GLN value
    GlnProd,
    /// GSRNP value (18 digits)
    Gsrnp,
    /// GSRN value (18 digits)
    Gsrn,
    /// GCN value (13 to 25 digits)
    Gcn,
    /// SSCC value (18 digits)
    Sscc,
    /// GDTI value (13 digits plus optional serial)
    Gdti,
    /// GINC value
    Ginc,
    /// GSIN value (17 digits)
    Gsin,
    /// GRAI value (14 digits plus optional serial)
    Grai,
    /// GIAI value
    Giai,
    /// Consumer product variant qualifier value
    Cpv,
    /// Batch/lot qualifier value
    Lot,
    /// Serial number qualifier value
    Ser,
    /// CPID serial qualifier value
    Cpsn,
    /// GLN extension qualifier value
    Glnx,
    /// Payment reference qualifier value
    Refno,
    /// Service relation instance qualifier value
    Srin,
    /// A `key=value` query pair with a non-numeric key
    ExtensionParameter,
    /// A whole Digital Link URI on any host
    CustomWebUri,
    /// A whole Digital Link URI on the canonical GS1 host
    CanonicalWebUri,
}

impl Rule {
    /// Every rule in the registry.
    pub const ALL: [Self; 31] = [
        Self::Gtin,
        Self::Itip,
        Self::Gmn,
        Self::Cpid,
        Self::ShipTo,
        Self::BillTo,
        Self::PurchasedFrom,
        Self::ShipFor,
        Self::Gln,
        Self::PartyGln,
        Self::PayTo,
        Self::GlnProd,
        Self::Gsrnp,
        Self::Gsrn,
        Self::Gcn,
        Self::Sscc,
        Self::Gdti,
        Self::Ginc,
        Self::Gsin,
        Self::Grai,
        Self::Giai,
        Self::Cpv,
        Self::Lot,
        Self::Ser,
        Self::Cpsn,
        Self::Glnx,
        Self::Refno,
        Self::Srin,
        Self::ExtensionParameter,
        Self::CustomWebUri,
        Self::CanonicalWebUri,
    ];

    /// Returns the rule's name as used by [`test_rule`].
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Gtin => "gtin-value",
            Self::Itip => "itip-value",
            Self::Gmn => "gmn-value",
            Self::Cpid => "cpid-value",
            Self::ShipTo => "shipTo-value",
            Self::BillTo => "billTo-value",
            Self::PurchasedFrom => "purchasedFrom-value",
            Self::ShipFor => "shipFor-value",
            Self::Gln => "gln-value",
            Self::PartyGln => "partyGln-value",
            Self::PayTo => "payTo-value",
            Self::GlnProd => "glnProd-value",
            Self::Gsrnp => "gsrnp-value",
            Self::Gsrn => "gsrn-value",
            Self::Gcn => "gcn-value",
            Self::Sscc => "sscc-value",
            Self::Gdti => "gdti-value",
            Self::Ginc => "ginc-value",
            Self::Gsin => "gsin-value",
            Self::Grai => "grai-value",
            Self::Giai => "giai-value",
            Self::Cpv => "cpv-value",
            Self::Lot => "lot-value",
            Self::Ser => "ser-value",
            Self::Cpsn => "cpsn-value",
            Self::Glnx => "glnx-value",
            Self::Refno => "refno-value",
            Self::Srin => "srin-value",
            Self::ExtensionParameter => "extensionParameter",
            Self::CustomWebUri => "customGS1webURI",
            Self::CanonicalWebUri => "canonicalGS1webURI",
        }
    }

    /// Looks a rule up by name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|r| r.name() == name)
    }

    /// Runs this rule against a value (or, for the composite rules, a whole
    /// URI string).
    #[must_use]
    pub fn matches(self, text: &str) -> bool {
        match self {
            Self::ExtensionParameter => extension_parameter(text),
            Self::CustomWebUri => {
                validate::parse_with_trace(validate::StartRule::Custom, text).success
            }
            Self::CanonicalWebUri => {
                validate::parse_with_trace(validate::StartRule::Canonical, text).success
            }
            _ => match self.shape() {
                Some(shape) => matches_shape(&shape, text),
                None => false,
            },
        }
    }

    /// The value shape for a value rule; `None` for the composite rules and
    /// `extensionParameter`.
    pub(crate) const fn shape(self) -> Option<ValueShape> {
        let shape = match self {
            Self::Gtin => ValueShape::Digits {
                lengths: &[8, 12, 13, 14],
            },
            Self::Itip | Self::Gsrnp | Self::Gsrn | Self::Sscc => {
                ValueShape::DigitsRange { min: 18, max: 18 }
            }
            Self::Gmn => ValueShape::Cset82 { min: 1, max: 25 },
            Self::Cpid => ValueShape::Cset39 { min: 1, max: 30 },
            Self::ShipTo
            | Self::BillTo
            | Self::PurchasedFrom
            | Self::ShipFor
            | Self::Gln
            | Self::PartyGln
            | Self::PayTo
            | Self::GlnProd => ValueShape::DigitsRange { min: 13, max: 13 },
            Self::Gcn => ValueShape::DigitsRange { min: 13, max: 25 },
            Self::Gdti => ValueShape::DigitsThenCset82 {
                digits: 13,
                max_suffix: 17,
            },
            Self::Ginc | Self::Giai => ValueShape::Cset82 { min: 1, max: 30 },
            Self::Gsin => ValueShape::DigitsRange { min: 17, max: 17 },
            Self::Grai => ValueShape::DigitsThenCset82 {
                digits: 14,
                max_suffix: 16,
            },
            Self::Cpv | Self::Lot | Self::Ser | Self::Glnx => {
                ValueShape::Cset82 { min: 1, max: 20 }
            }
            Self::Cpsn => ValueShape::DigitsRange { min: 1, max: 12 },
            Self::Refno => ValueShape::Cset82 { min: 1, max: 25 },
            Self::Srin => ValueShape::DigitsRange { min: 1, max: 10 },
            Self::ExtensionParameter | Self::CustomWebUri | Self::CanonicalWebUri => return None,
        };
        Some(shape)
    }
}

/// Test a single rule by name, such as `"gtin-value"` for a GTIN.
///
/// # Errors
///
/// Returns [`RuleError::Unknown`] when the name is not in the registry.
pub fn test_rule(name: &str, value: &str) -> Result<bool, RuleError> {
    let rule = Rule::from_name(name).ok_or_else(|| RuleError::Unknown {
        name: name.to_string(),
    })?;
    Ok(rule.matches(value))
}

/// Charset-and-length pattern of a value rule.
#[derive(Debug, Clone, Copy)]
pub(crate) enum ValueShape {
    /// All digits, with an enumerated set of permitted lengths
    Digits { lengths: &'static [usize] },
    /// All digits, length within an inclusive range
    DigitsRange { min: usize, max: usize },
    /// A fixed digit prefix followed by an optional CSET 82 serial part
    DigitsThenCset82 { digits: usize, max_suffix: usize },
    /// CSET 82 characters, logical length within an inclusive range
    Cset82 { min: usize, max: usize },
    /// CSET 39 characters, logical length within an inclusive range
    Cset39 { min: usize, max: usize },
}

/// GS1 "character set 82".
fn is_cset82_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '!' | '"'
                | '%'
                | '&'
                | '\''
                | '('
                | ')'
                | '*'
                | '+'
                | ','
                | '-'
                | '.'
                | '/'
                | ':'
                | ';'
                | '<'
                | '='
                | '>'
                | '?'
                | '_'
        )
}

/// GS1 "character set 39".
fn is_cset39_char(c: char) -> bool {
    c.is_ascii_digit() || c.is_ascii_uppercase() || matches!(c, '#' | '-' | '/')
}

/// Result of scanning a charset-constrained prefix.
struct Scan {
    /// Bytes consumed from the input
    bytes: usize,
    /// Logical characters matched (a percent triplet counts as one)
    chars: usize,
    /// Whether the whole input was consumed
    complete: bool,
}

/// Scans the longest prefix of `text` whose characters (direct or
/// percent-encoded) satisfy `allowed`, up to `max_chars` logical characters.
/// Direct `/` and `%` never match: the former is the segment separator, the
/// latter opens an escape.
fn scan_prefix(text: &str, allowed: fn(char) -> bool, max_chars: usize) -> Scan {
    let bytes = text.as_bytes();
    let mut i = 0;
    let mut chars = 0;

    while i < bytes.len() && chars < max_chars {
        let c = bytes[i] as char;
        if c == '%' {
            let Some(hex) = bytes.get(i + 1..i + 3) else {
                break;
            };
            let Some(hex) = std::str::from_utf8(hex).ok() else {
                break;
            };
            let Ok(byte) = u8::from_str_radix(hex, 16) else {
                break;
            };
            if !allowed(byte as char) {
                break;
            }
            i += 3;
        } else if c.is_ascii() && c != '/' && allowed(c) {
            i += 1;
        } else {
            break;
        }
        chars += 1;
    }

    Scan {
        bytes: i,
        chars,
        complete: i == bytes.len(),
    }
}

fn digit_run(text: &str) -> usize {
    text.bytes().take_while(u8::is_ascii_digit).count()
}

/// Returns whether `text` fully matches the shape.
pub(crate) fn matches_shape(shape: &ValueShape, text: &str) -> bool {
    match *shape {
        ValueShape::Digits { lengths } => {
            digit_run(text) == text.len() && lengths.contains(&text.len())
        }
        ValueShape::DigitsRange { min, max } => {
            digit_run(text) == text.len() && text.len() >= min && text.len() <= max
        }
        ValueShape::DigitsThenCset82 { digits, max_suffix } => {
            if text.len() < digits || digit_run(text) < digits {
                return false;
            }
            let scan = scan_prefix(&text[digits..], is_cset82_char, max_suffix);
            scan.complete
        }
        ValueShape::Cset82 { min, max } => {
            let scan = scan_prefix(text, is_cset82_char, max);
            scan.complete && scan.chars >= min
        }
        ValueShape::Cset39 { min, max } => {
            let scan = scan_prefix(text, is_cset39_char, max);
            scan.complete && scan.chars >= min
        }
    }
}

/// Returns the byte length of the longest plausible prefix of `text` for the
/// shape, for trace reporting. The prefix is not necessarily a full match.
pub(crate) fn match_prefix(shape: &ValueShape, text: &str) -> usize {
    match *shape {
        ValueShape::Digits { lengths } => {
            let run = digit_run(text);
            lengths.iter().copied().filter(|l| *l <= run).max().unwrap_or(0)
        }
        ValueShape::DigitsRange { max, .. } => digit_run(text).min(max),
        ValueShape::DigitsThenCset82 { digits, max_suffix } => {
            let run = digit_run(text).min(digits);
            if run < digits {
                return run;
            }
            digits + scan_prefix(&text[digits..], is_cset82_char, max_suffix).bytes
        }
        ValueShape::Cset82 { max, .. } => scan_prefix(text, is_cset82_char, max).bytes,
        ValueShape::Cset39 { max, .. } => scan_prefix(text, is_cset39_char, max).bytes,
    }
}

fn is_extension_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || matches!(
            c,
            '-' | '_' | '.' | '~' | ':' | '!' | '$' | '&' | '\'' | '(' | ')' | '*' | '+' | ',' | ';'
        )
}

fn is_extension_value_char(c: char) -> bool {
    is_extension_key_char(c) || matches!(c, '@' | '/' | '%' | '=')
}

/// Matches a `key=value` query pair whose key is not a (numeric) GS1 AI.
fn extension_parameter(text: &str) -> bool {
    let Some((key, value)) = text.split_once('=') else {
        return false;
    };
    !key.is_empty()
        && !value.is_empty()
        && key.chars().all(is_extension_key_char)
        && key.chars().any(|c| !c.is_ascii_digit())
        && value.chars().all(is_extension_value_char)
}
