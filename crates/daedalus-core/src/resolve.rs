//! Source key resolution.

use crate::{BindMode, FieldDescriptor, ParamMap, ParamValues};

/// A key found in the source data for a field.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolved<'a> {
    /// The key as it appears in the source data.
    pub key: &'a str,
    /// The values supplied for it.
    pub values: &'a ParamValues,
    /// `true` when the key was found by the case-insensitive fallback.
    pub folded: bool,
}

/// Finds the source values for `field` in `data`.
///
/// The mode's tag, or the declared name when there is no tag, is looked up
/// exactly first. Failing that, keys are compared after lower-casing both
/// sides; if several keys match, the lexicographically smallest wins.
pub fn resolve<'a>(
    data: &'a ParamMap,
    field: &FieldDescriptor,
    mode: BindMode,
) -> Option<Resolved<'a>> {
    resolve_key(data, field.key(mode))
}

/// Finds the values for `key`, falling back to a case-insensitive match.
pub fn resolve_key<'a>(data: &'a ParamMap, key: &str) -> Option<Resolved<'a>> {
    if let Some((key, values)) = data.get_key_value(key) {
        return Some(Resolved {
            key,
            values,
            folded: false,
        });
    }

    let wanted = key.to_lowercase();
    data.iter()
        .filter(|(k, _)| k.to_lowercase() == wanted)
        .min_by(|(a, _), (b, _)| a.cmp(b))
        .map(|(key, values)| Resolved {
            key,
            values,
            folded: true,
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_match_wins() {
        let data: ParamMap = [("name", "exact"), ("Name", "folded")].into_iter().collect();
        let resolved = resolve_key(&data, "name").unwrap();

        assert_eq!(resolved.values.first(), "exact");
        assert!(!resolved.folded);
    }

    #[test]
    fn test_case_insensitive_fallback() {
        let data: ParamMap = [("Name", "alice")].into_iter().collect();
        let resolved = resolve_key(&data, "name").unwrap();

        assert_eq!(resolved.key, "Name");
        assert_eq!(resolved.values.first(), "alice");
        assert!(resolved.folded);
    }

    #[test]
    fn test_fallback_tie_break_is_lexicographic() {
        let data: ParamMap = [("nAME", "third"), ("NAME", "first"), ("Name", "second")]
            .into_iter()
            .collect();
        let resolved = resolve_key(&data, "name").unwrap();

        assert_eq!(resolved.key, "NAME");
        assert_eq!(resolved.values.first(), "first");
    }

    #[test]
    fn test_unresolved() {
        let data: ParamMap = [("other", "x")].into_iter().collect();
        assert!(resolve_key(&data, "name").is_none());
    }

    #[test]
    fn test_resolve_uses_mode_tag() {
        let data: ParamMap = [("q", "rust"), ("search", "ignored")].into_iter().collect();
        let field = FieldDescriptor::new("search").query("q");

        assert_eq!(
            resolve(&data, &field, BindMode::Query).unwrap().values.first(),
            "rust"
        );
        assert_eq!(
            resolve(&data, &field, BindMode::Form).unwrap().values.first(),
            "ignored"
        );
    }
}
