//! Codec and ordering engine for GS1 Digital Link URIs.
//!
//! A Digital Link is a URI encoding of a GS1 identifier plus optional key
//! qualifiers and data attributes:
//!
//! ```text
//! scheme://host[/custom/path]/AICode/AIValue[/QualifierCode/QualifierValue]*[?code=value&...]
//! ```
//!
//! This crate provides a lossless, bidirectional mapping between that URI
//! form and the structured [`DigitalLink`] record, plus a compact compressed
//! URI form. Custom path segments in front of the identifier are preserved
//! through every transformation, even though the grammar and the compression
//! engine do not understand them.
//!
//! # Quick Start
//!
//! ```rust
//! use digital_link::DigitalLink;
//!
//! // Decode a URI
//! let dl = DigitalLink::parse(
//!     "https://example.com/01/9780345418913/21/12345?15=230911"
//! ).unwrap();
//! assert_eq!(dl.identifier(), ("01", "9780345418913"));
//! assert_eq!(dl.key_qualifier("21"), Some("12345"));
//! assert!(dl.is_valid());
//! assert!(dl.verify_check_digit());
//!
//! // Re-encode it
//! assert_eq!(
//!     dl.to_web_uri_string().unwrap(),
//!     "https://example.com/01/9780345418913/21/12345?15=230911"
//! );
//! ```
//!
//! # Builder
//!
//! ```rust
//! use digital_link::DigitalLink;
//!
//! let dl = DigitalLink::builder()
//!     .domain("https://example.com")
//!     .identifier("gtin", "9780345418913")
//!     .key_qualifier("ser", "12345")
//!     .build()
//!     .unwrap();
//! assert_eq!(
//!     dl.to_web_uri_string().unwrap(),
//!     "https://example.com/gtin/9780345418913/ser/12345"
//! );
//! ```
//!
//! # Compression
//!
//! The compressed form replaces the AI pairs with an opaque token while
//! custom path segments stay in place:
//!
//! ```rust
//! use digital_link::{compress_web_uri, decompress_web_uri, CompressOptions};
//!
//! let uri = "https://example.com/some/path/01/09780345418913/21/12345";
//! let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
//! assert!(compressed.starts_with("https://example.com/some/path/"));
//! assert_eq!(decompress_web_uri(&compressed, false).unwrap(), uri);
//! ```
//!
//! # Ordering
//!
//! Key qualifiers serialize under one of three policies
//! ([`KeyQualifierOrder`]): the order they were added, an explicit stored
//! order, or the canonical weight-sorted order the grammar expects.

#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

mod builder;
mod checkdigit;
mod compression;
mod constants;
mod error;
mod link;
mod locate;
mod ordering;
pub mod prelude;
mod registry;
mod rules;
mod token;
mod validate;

pub use builder::{DigitalLinkBuilder, Empty, HasDomain, Ready};
pub use checkdigit::{compute_check_digit, verify_value};
pub use compression::{
    CompressOptions, Detected, analyse_web_uri, compress_web_uri, decompress_web_uri,
    is_compressed_web_uri,
};
pub use constants::{CANONICAL_HOST, SCHEME_PREFIXES};
pub use error::{
    BuilderError, CompressionError, EncodeError, ParseError, ParseErrorKind, PartsError,
    RuleError,
};
pub use link::DigitalLink;
pub use locate::identifier_pair_index;
pub use ordering::KeyQualifierOrder;
pub use registry::{
    DATA_ATTRIBUTES, DataAttribute, FAMILIES, IdentifierFamily, KEY_QUALIFIERS, KeyQualifier,
    LINK_TYPES, data_attribute_for, family_for, key_qualifier_for,
};
pub use rules::{Rule, test_rule};
pub use validate::{
    StartRule, TraceStep, ValidationTrace, parse_with_trace, remove_custom_path,
    validate_web_uri,
};
