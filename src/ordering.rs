//! Key-qualifier ordering policies.

use crate::registry::{self, IdentifierFamily};

/// How a record's key qualifiers are ordered when it is serialized back to
/// URI form.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum KeyQualifierOrder {
    /// Sort by each qualifier's position in the identifier family's canonical
    /// list. A numeric code and its alias carry the same weight.
    WeightSorted,
    /// Emit the listed codes first, in list order; qualifiers not in the list
    /// follow in insertion order.
    Explicit(Vec<String>),
    /// Emit qualifiers in the order they were added.
    #[default]
    Insertion,
}

/// Weight of a qualifier key within a family's canonical order, resolving
/// aliases through the registry. Unknown keys get no weight.
fn weight_of(family: &IdentifierFamily, key: &str) -> Option<usize> {
    let code = if key.bytes().all(|b| b.is_ascii_digit()) {
        key
    } else {
        registry::key_qualifier_for(key)?.code
    };
    family.qualifiers.iter().position(|q| *q == code)
}

/// Returns the qualifier keys of `entries` sorted for the family: known
/// qualifiers ascending by canonical position, unknown ones after them in
/// insertion order. The sort is stable, so a code and its alias (same
/// weight) keep their insertion order.
pub(crate) fn weight_sorted_keys<'a>(
    family: &IdentifierFamily,
    entries: &'a [(String, String)],
) -> Vec<&'a str> {
    let mut keys: Vec<(usize, &str)> = entries
        .iter()
        .map(|(key, _)| (weight_of(family, key).unwrap_or(usize::MAX), key.as_str()))
        .collect();
    keys.sort_by_key(|(weight, _)| *weight);
    keys.into_iter().map(|(_, key)| key).collect()
}
