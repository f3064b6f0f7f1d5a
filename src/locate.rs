//! Identifier locator: finds the identifier pair among URI path segments.

use crate::registry;

/// Returns the index of the segment holding the identifier's AI code, or
/// `None` when no segment matches any probed identifier family.
///
/// Segments are scanned as code/value pairs from the end of the list
/// backward. A custom path may itself contain a string that collides with an
/// AI code (`/some/01/other/01/12345678/...`); the last matching pair is the
/// authoritative one, so the first hit of the backward scan wins.
///
/// # Examples
///
/// ```
/// use digital_link::identifier_pair_index;
///
/// let segments = ["some", "01", "path", "01", "12345678", "21", "4545646"];
/// assert_eq!(identifier_pair_index(&segments), Some(3));
///
/// let segments = ["custom", "path"];
/// assert_eq!(identifier_pair_index(&segments), None);
/// ```
#[must_use]
pub fn identifier_pair_index(segments: &[&str]) -> Option<usize> {
    let mut i = segments.len();
    while i >= 2 {
        let code = segments[i - 2];
        if registry::FAMILIES
            .iter()
            .any(|f| f.probe && (f.code == code || f.name == code))
        {
            return Some(i - 2);
        }
        i -= 2;
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn finds_simple_identifier() {
        assert_eq!(identifier_pair_index(&["01", "9780345418913"]), Some(0));
    }

    #[test]
    fn finds_identifier_behind_custom_path() {
        let segments = ["some", "other", "path", "info", "01", "12345678", "21", "12345"];
        assert_eq!(identifier_pair_index(&segments), Some(4));
    }

    #[test]
    fn last_colliding_pair_wins() {
        let segments = ["some", "01", "path", "01", "12345678", "21", "4545646"];
        assert_eq!(identifier_pair_index(&segments), Some(3));
    }

    #[test]
    fn alias_codes_are_probed() {
        assert_eq!(identifier_pair_index(&["gtin", "9780345418913"]), Some(0));
    }

    #[test]
    fn party_ais_are_not_probed() {
        assert_eq!(identifier_pair_index(&["410", "1234567890123"]), None);
    }

    #[test]
    fn none_when_no_identifier() {
        assert_eq!(identifier_pair_index(&["custom", "path"]), None);
        assert_eq!(identifier_pair_index(&[]), None);
        assert_eq!(identifier_pair_index(&["lonely"]), None);
    }
}
