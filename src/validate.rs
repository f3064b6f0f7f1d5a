//! Composite URI validation and structural parse traces.
//!
//! The composite rules only recognize `scheme://host/AI/value/...` forms, so
//! callers holding a record with a custom path must strip it (see
//! [`remove_custom_path`]) before validating.

use crate::constants::{CANONICAL_HOST, SCHEME_PREFIXES};
use crate::registry;
use crate::rules;

/// One row of a validation trace: which rule matched which part of the
/// input, and what remained after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TraceStep {
    /// Name of the rule that matched
    pub rule: String,
    /// The matched portion of the input
    pub matched: String,
    /// The input remaining after the match
    pub remainder: String,
}

/// A rule-by-rule account of validating a URI, annotated with the overall
/// verdict. If the last steps carry a non-empty remainder, that is the part
/// that did not match.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationTrace {
    /// Whether the whole input validated
    pub success: bool,
    /// The match steps, in the order they were taken
    pub steps: Vec<TraceStep>,
}

/// The top-level rule to validate a URI against.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartRule {
    /// `canonicalGS1webURI`: the canonical GS1 resolver host
    Canonical,
    /// `customGS1webURI`: any host
    Custom,
}

impl StartRule {
    /// Picks the start rule for an input: URIs on the canonical GS1 host get
    /// the canonical rule, everything else the custom one.
    #[must_use]
    pub fn for_uri(uri: &str) -> Self {
        if uri.contains(CANONICAL_HOST) {
            Self::Canonical
        } else {
            Self::Custom
        }
    }

    /// The rule's name as reported in traces.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Canonical => "canonicalGS1webURI",
            Self::Custom => "customGS1webURI",
        }
    }
}

/// Validates a whole Digital Link URI, picking the start rule by host.
#[must_use]
pub fn validate_web_uri(uri: &str) -> bool {
    parse_with_trace(StartRule::for_uri(uri), uri).success
}

/// Path segments of `path` together with their byte offsets into the full
/// URI (empty segments from duplicate or trailing slashes are dropped).
fn segments_with_offsets(path: &str, base: usize) -> Vec<(usize, &str)> {
    let mut out = Vec::new();
    let mut offset = 0;
    for part in path.split('/') {
        if !part.is_empty() {
            out.push((base + offset, part));
        }
        offset += part.len() + 1;
    }
    out
}

fn step(steps: &mut Vec<TraceStep>, rule: impl Into<String>, matched: &str, remainder: &str) {
    steps.push(TraceStep {
        rule: rule.into(),
        matched: matched.to_string(),
        remainder: remainder.to_string(),
    });
}

/// Runs the structural parser over a URI under the given start rule and
/// returns the annotated trace.
#[must_use]
#[allow(clippy::too_many_lines)]
pub fn parse_with_trace(start: StartRule, uri: &str) -> ValidationTrace {
    let mut steps = Vec::new();

    // Scheme
    let Some(prefix) = SCHEME_PREFIXES.iter().find(|p| uri.starts_with(**p)) else {
        return ValidationTrace {
            success: false,
            steps,
        };
    };
    let scheme = &prefix[..prefix.len() - 3];
    step(&mut steps, "scheme", scheme, &uri[scheme.len()..]);

    // Hostname
    let host_start = prefix.len();
    let after_host = &uri[host_start..];
    let host_len = after_host.find(['/', '?']).unwrap_or(after_host.len());
    let host = &after_host[..host_len];
    let stem_end = host_start + host_len;
    let host_ok = !host.is_empty()
        && host
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'.' || b == b'-' || b == b':');
    if !host_ok {
        return ValidationTrace {
            success: false,
            steps,
        };
    }
    step(&mut steps, "hostname", host, &uri[stem_end..]);

    let stem_rule = match start {
        StartRule::Canonical => "canonicalURIstem",
        StartRule::Custom => "customURIstem",
    };
    step(&mut steps, stem_rule, &uri[..stem_end], &uri[stem_end..]);
    if matches!(start, StartRule::Canonical) && host != CANONICAL_HOST {
        return ValidationTrace {
            success: false,
            steps,
        };
    }

    // Path / query split
    let rest = &uri[stem_end..];
    let (path, query) = match rest.split_once('?') {
        Some((p, q)) => (p, Some(q)),
        None => (rest, None),
    };
    let path_end = stem_end + path.len();
    let segs = segments_with_offsets(path, stem_end);
    if segs.len() < 2 {
        return ValidationTrace {
            success: false,
            steps,
        };
    }

    // Identifier pair
    let (code_off, code_seg) = segs[0];
    let Some(family) = registry::family_for(code_seg) else {
        return ValidationTrace {
            success: false,
            steps,
        };
    };
    step(
        &mut steps,
        format!("{}-code", family.name),
        code_seg,
        &uri[code_off + code_seg.len()..],
    );

    let (value_off, value_seg) = segs[1];
    let Some(shape) = family.rule.shape() else {
        return ValidationTrace {
            success: false,
            steps,
        };
    };
    let matched_len = rules::match_prefix(&shape, value_seg);
    let mut path_ok = rules::matches_shape(&shape, value_seg);
    step(
        &mut steps,
        format!("{}-value", family.name),
        &value_seg[..matched_len],
        &uri[value_off + matched_len..],
    );
    let mut consumed = value_off + matched_len;
    step(
        &mut steps,
        format!("{}-path", family.name),
        &uri[code_off - 1..consumed],
        &uri[consumed..],
    );

    // Key qualifiers, canonical order enforced
    if path_ok {
        let mut last_weight = None;
        let mut i = 2;
        while i < segs.len() {
            if i + 1 >= segs.len() {
                // dangling code segment
                path_ok = false;
                break;
            }
            let (_, q_code) = segs[i];
            let (q_value_off, q_value) = segs[i + 1];
            let Some(qualifier) = registry::key_qualifier_for(q_code) else {
                path_ok = false;
                break;
            };
            let Some(weight) = family
                .qualifiers
                .iter()
                .position(|c| *c == qualifier.code)
            else {
                path_ok = false;
                break;
            };
            if last_weight.is_some_and(|last| weight <= last) {
                path_ok = false;
                break;
            }
            last_weight = Some(weight);
            step(
                &mut steps,
                format!("{}-code", qualifier.name),
                q_code,
                &uri[segs[i].0 + q_code.len()..],
            );
            let Some(q_shape) = qualifier.rule.shape() else {
                path_ok = false;
                break;
            };
            let q_matched = rules::match_prefix(&q_shape, q_value);
            let q_ok = rules::matches_shape(&q_shape, q_value);
            step(
                &mut steps,
                format!("{}-value", qualifier.name),
                &q_value[..q_matched],
                &uri[q_value_off + q_matched..],
            );
            consumed = q_value_off + q_matched;
            if !q_ok {
                path_ok = false;
                break;
            }
            i += 2;
        }
    }

    // Trailing slashes are permitted
    if path_ok && uri[consumed..path_end].bytes().all(|b| b == b'/') {
        consumed = path_end;
    } else if path_ok && consumed < path_end {
        path_ok = false;
    }
    step(
        &mut steps,
        "gs1path",
        &uri[stem_end..consumed],
        &uri[consumed..],
    );

    // Query attributes
    let mut attrs_ok = true;
    if let Some(query) = query {
        let query_start = path_end + 1;
        let mut offset = 0;
        for pair in query.split('&') {
            let pair_off = query_start + offset;
            offset += pair.len() + 1;
            if pair.is_empty() {
                continue;
            }
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            let after_pair = &uri[(pair_off + pair.len()).min(uri.len())..];
            if let Some(attribute) = registry::data_attribute_for(key) {
                step(&mut steps, attribute.rule_name, pair, after_pair);
                if !attribute.accepts(value) {
                    attrs_ok = false;
                    consumed = pair_off;
                    break;
                }
            } else if rules::Rule::ExtensionParameter.matches(pair) {
                step(&mut steps, "extensionParameter", pair, after_pair);
            } else {
                attrs_ok = false;
                consumed = pair_off;
                break;
            }
        }
    }

    let success = path_ok && attrs_ok;
    let final_end = if success { uri.len() } else { consumed };
    step(
        &mut steps,
        start.name(),
        &uri[..final_end],
        &uri[final_end..],
    );

    ValidationTrace { success, steps }
}

/// Strips a domain's custom-path segments from a URI, leaving only the
/// `scheme://host` stem in front of the identifier.
///
/// `domain` is the record's stored domain, which may carry custom path
/// segments (`https://example.com/my/custom/path`). When it does, and `uri`
/// starts with it, the custom path is removed; otherwise `uri` is returned
/// unchanged.
#[must_use]
pub fn remove_custom_path(uri: &str, domain: &str) -> String {
    let Some(scheme_end) = domain.find("://") else {
        return uri.to_string();
    };
    let after_scheme = &domain[scheme_end + 3..];
    let Some(host_len) = after_scheme.find('/') else {
        return uri.to_string();
    };
    let stem = &domain[..scheme_end + 3 + host_len];
    match uri.strip_prefix(domain) {
        Some(rest) => format!("{stem}{rest}"),
        None => uri.to_string(),
    }
}
