//! Convenient re-exports for glob imports.
//!
//! ```rust
//! use digital_link::prelude::*;
//!
//! let dl = DigitalLink::parse("https://example.com/01/9780345418913").unwrap();
//! assert!(dl.is_valid());
//! ```
//!
//! Builder state markers (`Empty`, `HasDomain`, `Ready`) are intentionally
//! excluded as they are implementation details.

pub use crate::{
    // Core types
    CompressOptions, Detected, DigitalLink, DigitalLinkBuilder, KeyQualifierOrder, Rule,
    StartRule, TraceStep, ValidationTrace,
    // Operations
    analyse_web_uri, compress_web_uri, compute_check_digit, decompress_web_uri,
    is_compressed_web_uri, parse_with_trace, remove_custom_path, test_rule, validate_web_uri,
    verify_value,
    // Errors
    BuilderError, CompressionError, EncodeError, ParseError, ParseErrorKind, PartsError,
    RuleError,
};
