//! Error types for Digital Link decoding, encoding and compression.

use std::fmt;

/// Errors that can occur when decoding a Digital Link URI.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseError {
    /// The input that failed to decode
    pub input: String,
    /// The specific error that occurred
    pub kind: ParseErrorKind,
}

/// Specific decoding error types.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// URI is empty
    Empty,
    /// Missing or invalid scheme (expected "http://" or "https://")
    MissingProtocol {
        /// The scheme that was found, if any
        found: Option<String>,
    },
    /// No path segment matched any identifier rule
    NoIdentifierFound,
    /// The input looked compressed but could not be expanded
    Compression(CompressionError),
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "failed to decode Digital Link '{}': ", self.input)?;
        match &self.kind {
            ParseErrorKind::Empty => write!(f, "input is empty"),
            ParseErrorKind::MissingProtocol { found } => match found {
                Some(s) => write!(f, "expected scheme 'http(s)://', found '{s}'"),
                None => write!(f, "string input must contain the http(s) protocol"),
            },
            ParseErrorKind::NoIdentifierFound => {
                write!(f, "must contain at least the identifier")
            }
            ParseErrorKind::Compression(e) => write!(f, "decompression failed: {e}"),
        }
    }
}

impl std::error::Error for ParseError {}

/// Errors for the rule registry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RuleError {
    /// Rule name is not in the registry
    Unknown {
        /// The name that was looked up
        name: String,
    },
}

impl fmt::Display for RuleError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown { name } => write!(f, "invalid rule: {name}"),
        }
    }
}

impl std::error::Error for RuleError {}

/// Errors that can occur when serializing a Digital Link back to URI form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Weight-sorted ordering was requested for an identifier that is not in
    /// the registry, so no canonical qualifier order exists for it
    UnknownIdentifier {
        /// The identifier code or alias
        code: String,
    },
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnknownIdentifier { code } => {
                write!(f, "identifier '{code}' is not in the registry; no qualifier order is defined for it")
            }
        }
    }
}

impl std::error::Error for EncodeError {}

/// Errors for the builder's final validation step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuilderError {
    /// Domain is empty
    EmptyDomain,
    /// Identifier code or value is empty
    EmptyIdentifier,
}

impl fmt::Display for BuilderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyDomain => write!(f, "domain cannot be empty"),
            Self::EmptyIdentifier => write!(f, "identifier code and value cannot be empty"),
        }
    }
}

impl std::error::Error for BuilderError {}

/// Errors for construction from a parts object (the JSON shape).
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PartsError {
    /// The identifier object is empty
    MissingIdentifier,
    /// The identifier object has more than one entry
    MultipleIdentifiers {
        /// Number of entries found
        found: usize,
    },
    /// Domain is empty
    EmptyDomain,
}

impl fmt::Display for PartsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingIdentifier => write!(f, "must contain at least the identifier"),
            Self::MultipleIdentifiers { found } => {
                write!(f, "identifier must be a single pair, found {found}")
            }
            Self::EmptyDomain => write!(f, "domain cannot be empty"),
        }
    }
}

impl std::error::Error for PartsError {}

/// Errors for compression and decompression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompressionError {
    /// URI lacks an "http(s)://" scheme
    MissingProtocol,
    /// No path segment matched any identifier rule
    NoIdentifierFound,
    /// An AI code has no entry in the compression table
    UnknownApplicationIdentifier {
        /// The code that was looked up
        code: String,
    },
    /// The compressed token is structurally invalid
    InvalidToken {
        /// What went wrong
        reason: &'static str,
    },
    /// The token carries a version this build does not understand
    UnsupportedVersion {
        /// The version found in the token header
        version: u8,
    },
    /// A value is too long for the token value coding
    ValueTooLong {
        /// Maximum encodable length
        max: usize,
        /// Actual length
        actual: usize,
    },
    /// A value contains a character outside the token value coding
    UnencodableCharacter {
        /// The offending character
        char: char,
    },
    /// Decompression produced a string that is not a coherent Digital Link
    Mismatch {
        /// The incoherent decompressed output
        uri: String,
    },
    /// The record could not be serialized before compression
    Encode(EncodeError),
}

impl fmt::Display for CompressionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingProtocol => write!(f, "string input must contain the http(s) protocol"),
            Self::NoIdentifierFound => write!(f, "must contain at least the identifier"),
            Self::UnknownApplicationIdentifier { code } => {
                write!(f, "AI '{code}' has no entry in the compression table")
            }
            Self::InvalidToken { reason } => write!(f, "invalid compressed token: {reason}"),
            Self::UnsupportedVersion { version } => {
                write!(f, "unsupported token version {version}")
            }
            Self::ValueTooLong { max, actual } => {
                write!(f, "value length {actual} exceeds maximum {max}")
            }
            Self::UnencodableCharacter { char } => {
                write!(f, "character '{char}' cannot be encoded in a token value")
            }
            Self::Mismatch { uri } => {
                write!(f, "decompressed output '{uri}' is not a coherent Digital Link")
            }
            Self::Encode(e) => write!(f, "{e}"),
        }
    }
}

impl std::error::Error for CompressionError {}

impl From<EncodeError> for CompressionError {
    fn from(e: EncodeError) -> Self {
        Self::Encode(e)
    }
}

impl From<CompressionError> for ParseErrorKind {
    fn from(e: CompressionError) -> Self {
        Self::Compression(e)
    }
}
