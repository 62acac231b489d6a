//! Source data for tag-based binding.
//!
//! A [`ParamMap`] maps a source key (a query or form parameter name) to the
//! ordered, non-empty list of values supplied for it. Repeated keys such as
//! `?id=1&id=2` keep every value in arrival order.

use indexmap::IndexMap;
use std::fmt;

/// The non-empty, ordered values supplied for a single source key.
///
/// The first value is what scalar fields bind from; sequence fields bind
/// from all of them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamValues {
    first: String,
    rest: Vec<String>,
}

impl ParamValues {
    /// Creates a value list holding a single value.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            first: value.into(),
            rest: Vec::new(),
        }
    }

    /// Creates a value list from an iterator, returning `None` when it is empty.
    pub fn from_iter_opt<I, S>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut iter = values.into_iter();
        let mut values = Self::new(iter.next()?);
        values.rest.extend(iter.map(Into::into));
        Some(values)
    }

    /// Returns the first value.
    #[must_use]
    pub fn first(&self) -> &str {
        &self.first
    }

    /// Appends a value.
    pub fn push(&mut self, value: impl Into<String>) {
        self.rest.push(value.into());
    }

    /// Returns the number of values (always at least one).
    #[must_use]
    pub fn len(&self) -> usize {
        1 + self.rest.len()
    }

    /// Always `false`; present for API symmetry with collections.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Iterates over all values in order.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.first.as_str()).chain(self.rest.iter().map(String::as_str))
    }
}

impl<'a> IntoIterator for &'a ParamValues {
    type Item = &'a str;
    type IntoIter = Box<dyn Iterator<Item = &'a str> + 'a>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new(self.iter())
    }
}

/// A mapping from source key to its values.
///
/// Lookups by [`get`](Self::get) are case-sensitive. Iteration follows
/// insertion order of the first occurrence of each key.
///
/// # Example
///
/// ```
/// use daedalus_core::ParamMap;
///
/// let params: ParamMap = [("id", "1"), ("id", "2"), ("name", "alice")]
///     .into_iter()
///     .collect();
///
/// assert_eq!(params.get("id").map(|v| v.len()), Some(2));
/// assert_eq!(params.get("name").map(|v| v.first()), Some("alice"));
/// assert!(params.get("Name").is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParamMap {
    entries: IndexMap<String, ParamValues>,
}

impl ParamMap {
    /// Creates an empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a value under `key`, creating the entry if needed.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        match self.entries.get_mut(&key) {
            Some(values) => values.push(value),
            None => {
                self.entries.insert(key, ParamValues::new(value));
            }
        }
    }

    /// Appends every value of `other` after the values already present.
    pub fn extend_from(&mut self, other: &ParamMap) {
        for (key, values) in other.iter() {
            for value in values {
                self.push(key, value);
            }
        }
    }

    /// Returns the values for an exact key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&ParamValues> {
        self.entries.get(key)
    }

    /// Returns the stored key and its values for an exact key.
    #[must_use]
    pub fn get_key_value(&self, key: &str) -> Option<(&str, &ParamValues)> {
        self.entries
            .get_key_value(key)
            .map(|(k, v)| (k.as_str(), v))
    }

    /// Returns `true` if the exact key is present.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Iterates over keys and values in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &ParamValues)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Returns the number of distinct keys.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if there are no keys.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for ParamMap
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (key, value) in iter {
            map.push(key, value);
        }
        map
    }
}

/// Which family of source tags a walk consults.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BindMode {
    /// URL query parameters (`#[bind(query = "...")]`).
    Query,
    /// Form parameters (`#[bind(form = "...")]`).
    Form,
}

impl BindMode {
    /// Returns the tag name for this mode.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Query => "query",
            Self::Form => "form",
        }
    }
}

impl fmt::Display for BindMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
