//! Compression facade: detection, compression and decompression of Digital
//! Link URIs, with custom-path preservation.
//!
//! The binary engine in [`crate::token`] only understands
//! `scheme://host/AI/value/...` forms, so compression splits any custom path
//! off first and splices it back into the result; decompression recomputes it
//! from the segments in front of the token.

use std::fmt;

use tracing::debug;

use crate::constants::SCHEME_PREFIXES;
use crate::error::CompressionError;
use crate::link::DigitalLink;
use crate::locate;
use crate::registry;
use crate::token::{self, TokenPayload};

/// Options for [`compress_web_uri`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompressOptions {
    /// Use the fixed-length numeric coding where the AI table permits it
    pub use_optimisations: bool,
    /// Fold the query attributes into the token instead of leaving them as a
    /// query string on the compressed URI
    pub compress_other_key_value_pairs: bool,
}

impl Default for CompressOptions {
    fn default() -> Self {
        Self {
            use_optimisations: true,
            compress_other_key_value_pairs: true,
        }
    }
}

/// What [`analyse_web_uri`] detected about a URI's form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Detected {
    /// Plain `/AI/value/...` form
    Uncompressed,
    /// Uncompressed identifier pairs followed by a token
    PartiallyCompressed,
    /// Everything folded into the token
    FullyCompressed,
}

impl fmt::Display for Detected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Uncompressed => write!(f, "uncompressed GS1 Digital Link"),
            Self::PartiallyCompressed => write!(f, "partially compressed GS1 Digital Link"),
            Self::FullyCompressed => write!(f, "fully compressed GS1 Digital Link"),
        }
    }
}

/// Splits a URI into its `scheme://host` stem and the rest.
fn split_stem(uri: &str) -> Result<(&str, &str), CompressionError> {
    let prefix = SCHEME_PREFIXES
        .iter()
        .find(|p| uri.starts_with(**p))
        .ok_or(CompressionError::MissingProtocol)?;
    let after = &uri[prefix.len()..];
    let host_len = after.find(['/', '?']).unwrap_or(after.len());
    Ok(uri.split_at(prefix.len() + host_len))
}

/// Splits the post-stem part into path and optional query.
fn split_path_query(rest: &str) -> (&str, Option<&str>) {
    match rest.split_once('?') {
        Some((path, query)) => (path, Some(query)),
        None => (rest, None),
    }
}

fn path_segments(path: &str) -> Vec<&str> {
    path.split('/').filter(|s| !s.is_empty()).collect()
}

fn query_pairs(query: &str) -> Vec<(String, String)> {
    query
        .split('&')
        .filter(|p| !p.is_empty())
        .map(|pair| {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            (key.to_string(), value.to_string())
        })
        .collect()
}

/// Resolves a path-pair code to its numeric AI form for the token table.
fn numeric_code(code: &str) -> String {
    if let Some(family) = registry::family_for(code) {
        family.code.to_string()
    } else if let Some(qualifier) = registry::key_qualifier_for(code) {
        qualifier.code.to_string()
    } else {
        code.to_string()
    }
}

/// Renders a numeric AI code back to path form, optionally as its alias.
fn rendered_code(code: &str, use_short_names: bool) -> String {
    if use_short_names {
        if let Some(family) = registry::family_for(code) {
            return family.name.to_string();
        }
        if let Some(qualifier) = registry::key_qualifier_for(code) {
            return qualifier.name.to_string();
        }
    }
    code.to_string()
}

/// Detects whether a URI looks compressed, partially compressed or plain.
///
/// This is a structural check on the trailing path segment; it does not
/// guarantee the token decompresses into a coherent Digital Link. Use
/// [`is_compressed_web_uri`] for the validity-gated answer.
#[must_use]
pub fn analyse_web_uri(uri: &str) -> Detected {
    let Ok((_, rest)) = split_stem(uri) else {
        return Detected::Uncompressed;
    };
    let (path, _) = split_path_query(rest);
    let segments = path_segments(path);
    let Some((last, leading)) = segments.split_last() else {
        return Detected::Uncompressed;
    };
    if token::decode(last).is_err() {
        return Detected::Uncompressed;
    }
    if locate::identifier_pair_index(leading).is_some() {
        Detected::PartiallyCompressed
    } else {
        Detected::FullyCompressed
    }
}

/// Returns whether a URI is a valid compressed Digital Link.
///
/// Detection is validity-gated: a string that merely resembles a compressed
/// token but does not decompress to a coherent URI is reported as not
/// compressed. This never errors for well-typed string input.
#[must_use]
pub fn is_compressed_web_uri(uri: &str) -> bool {
    match analyse_web_uri(uri) {
        Detected::Uncompressed => false,
        Detected::PartiallyCompressed | Detected::FullyCompressed => {
            decompress_web_uri(uri, false).is_ok()
        }
    }
}

/// Compresses an uncompressed Digital Link URI.
///
/// The custom path (everything before the identifier pair) is not understood
/// by the engine; it is split off before compression and spliced back into
/// the result, so
/// `https://example.com/some/path/01/.../21/...` compresses to
/// `https://example.com/some/path/<token>`.
///
/// # Errors
///
/// Returns [`CompressionError`] when the URI lacks a scheme or identifier,
/// or a value cannot be encoded.
pub fn compress_web_uri(
    uri: &str,
    options: &CompressOptions,
) -> Result<String, CompressionError> {
    let (stem, rest) = split_stem(uri)?;
    let (path, query) = split_path_query(rest);
    let segments = path_segments(path);

    let index = locate::identifier_pair_index(&segments)
        .ok_or(CompressionError::NoIdentifierFound)?;

    let custom = &segments[..index];
    let mut payload = TokenPayload::default();
    for pair in segments[index..].chunks(2) {
        payload.pairs.push((numeric_code(pair[0]), pair[1].to_string()));
    }
    if options.compress_other_key_value_pairs && let Some(query) = query {
        payload.attributes = query_pairs(query);
    }

    let token = token::encode(&payload, options.use_optimisations)?;
    let mut result = String::from(stem);
    if !custom.is_empty() {
        result.push('/');
        result.push_str(&custom.join("/"));
    }
    result.push('/');
    result.push_str(&token);
    if !options.compress_other_key_value_pairs
        && let Some(query) = query
        && !query.is_empty()
    {
        result.push('?');
        result.push_str(query);
    }
    debug!(input = uri, output = %result, "compressed Digital Link");
    Ok(result)
}

/// Decompresses a compressed Digital Link URI.
///
/// The token is the trailing path segment; any identifier pairs in front of
/// it (the partially compressed form) stay where they are, and everything
/// before those is the custom path, which the engine does not preserve and is
/// reattached here. With `use_short_names`, AI codes render as their aliases
/// (`gtin` instead of `01`).
///
/// # Errors
///
/// Returns [`CompressionError::InvalidToken`] (or a more specific kind) when
/// the trailing segment is not a token, and [`CompressionError::Mismatch`]
/// when the expansion is not a coherent Digital Link.
pub fn decompress_web_uri(
    uri: &str,
    use_short_names: bool,
) -> Result<String, CompressionError> {
    let (stem, rest) = split_stem(uri)?;
    let (path, query) = split_path_query(rest);
    let segments = path_segments(path);
    let Some((token_segment, leading)) = segments.split_last() else {
        return Err(CompressionError::InvalidToken {
            reason: "no path segment to decode",
        });
    };
    let payload = token::decode(token_segment)?;

    let (custom, open_pairs) = match locate::identifier_pair_index(leading) {
        Some(index) => (&leading[..index], &leading[index..]),
        None => (leading, &[][..]),
    };

    let mut result = String::from(stem);
    if !custom.is_empty() {
        result.push('/');
        result.push_str(&custom.join("/"));
    }
    for pair in open_pairs.chunks(2) {
        result.push('/');
        result.push_str(&rendered_code(&numeric_code(pair[0]), use_short_names));
        result.push('/');
        result.push_str(pair[1]);
    }
    for (code, value) in &payload.pairs {
        result.push('/');
        result.push_str(&rendered_code(code, use_short_names));
        result.push('/');
        result.push_str(value);
    }

    let mut attributes: Vec<(String, String)> = payload.attributes;
    if let Some(query) = query {
        attributes.extend(query_pairs(query));
    }
    for (i, (key, value)) in attributes.iter().enumerate() {
        result.push(if i == 0 { '?' } else { '&' });
        result.push_str(key);
        result.push('=');
        result.push_str(value);
    }

    if DigitalLink::decode(&result).is_err() {
        return Err(CompressionError::Mismatch { uri: result });
    }
    debug!(input = uri, output = %result, "decompressed Digital Link");
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;

    const PLAIN: &str = "https://example.com/01/09780345418913/21/12345";
    const WITH_CUSTOM_PATH: &str =
        "https://example.com/some/other/path/info/01/09780345418913/21/12345";

    #[test]
    fn compress_then_decompress_is_identity() {
        let compressed = compress_web_uri(PLAIN, &CompressOptions::default()).unwrap();
        assert_eq!(decompress_web_uri(&compressed, false).unwrap(), PLAIN);
    }

    #[test]
    fn custom_path_survives_the_round_trip() {
        let compressed = compress_web_uri(WITH_CUSTOM_PATH, &CompressOptions::default()).unwrap();
        assert!(compressed.starts_with("https://example.com/some/other/path/info/"));
        assert_eq!(
            decompress_web_uri(&compressed, false).unwrap(),
            WITH_CUSTOM_PATH
        );
    }

    #[test]
    fn attributes_fold_into_the_token_by_default() {
        let uri = "https://dlnkd.tn.gg/01/9780345418913/21/43786?foo=bar";
        let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
        assert!(!compressed.contains('?'));
        assert_eq!(decompress_web_uri(&compressed, false).unwrap(), uri);
    }

    #[test]
    fn attributes_can_stay_outside_the_token() {
        let uri = "https://dlnkd.tn.gg/01/9780345418913/21/43786?foo=bar";
        let options = CompressOptions {
            use_optimisations: false,
            compress_other_key_value_pairs: false,
        };
        let compressed = compress_web_uri(uri, &options).unwrap();
        assert!(compressed.ends_with("?foo=bar"));
        assert_eq!(decompress_web_uri(&compressed, false).unwrap(), uri);
    }

    #[test]
    fn short_name_input_decompresses_to_numeric_codes() {
        let uri = "https://dlnkd.tn.gg/gtin/09780345418913/lot/231/ser/345345?15=120820";
        let compressed = compress_web_uri(uri, &CompressOptions::default()).unwrap();
        assert_eq!(
            decompress_web_uri(&compressed, false).unwrap(),
            "https://dlnkd.tn.gg/01/09780345418913/10/231/21/345345?15=120820"
        );
        assert_eq!(
            decompress_web_uri(&compressed, true).unwrap(),
            "https://dlnkd.tn.gg/gtin/09780345418913/lot/231/ser/345345?15=120820"
        );
    }

    #[test]
    fn detection_distinguishes_the_three_forms() {
        assert_eq!(analyse_web_uri(PLAIN), Detected::Uncompressed);
        let compressed = compress_web_uri(PLAIN, &CompressOptions::default()).unwrap();
        assert_eq!(analyse_web_uri(&compressed), Detected::FullyCompressed);
        assert_eq!(
            compressed
                .rsplit_once('/')
                .map(|(_, token)| analyse_web_uri(&format!(
                    "https://example.com/01/09780345418913/{token}"
                )))
                .unwrap(),
            Detected::PartiallyCompressed
        );
    }

    #[test]
    fn is_compressed_is_validity_gated() {
        let compressed = compress_web_uri(PLAIN, &CompressOptions::default()).unwrap();
        assert!(is_compressed_web_uri(&compressed));
        assert!(!is_compressed_web_uri(PLAIN));
        assert!(!is_compressed_web_uri("https://example.com/custom/path"));
    }

    #[test]
    fn compressing_without_an_identifier_fails() {
        assert!(matches!(
            compress_web_uri("https://example.com/custom/path/", &CompressOptions::default()),
            Err(CompressionError::NoIdentifierFound)
        ));
    }

    #[test]
    fn missing_protocol_fails() {
        assert!(matches!(
            compress_web_uri("example.com/01/12345678", &CompressOptions::default()),
            Err(CompressionError::MissingProtocol)
        ));
    }

    #[test]
    fn detection_strings_match_the_engine_vocabulary() {
        assert_eq!(
            Detected::FullyCompressed.to_string(),
            "fully compressed GS1 Digital Link"
        );
        assert_eq!(
            Detected::PartiallyCompressed.to_string(),
            "partially compressed GS1 Digital Link"
        );
        assert_eq!(
            Detected::Uncompressed.to_string(),
            "uncompressed GS1 Digital Link"
        );
    }
}
