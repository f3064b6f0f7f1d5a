//! Constants for Digital Link URIs.

/// Host of the canonical GS1 resolver. URIs on this host are validated
/// against the `canonicalGS1webURI` rule instead of the custom one.
pub const CANONICAL_HOST: &str = "id.gs1.org";

/// Accepted scheme prefixes, in the order they are probed.
pub const SCHEME_PREFIXES: [&str; 2] = ["https://", "http://"];
