//! Option sets for select, radio and checkbox-group elements.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use formwork_core::Value;

/// Ordered option key to option label choices.
///
/// Keys are what a submission normally carries; labels are what the user
/// sees. An element can be told to ignore the keys, in which case the labels
/// double as submitted values.
///
/// # Examples
///
/// ```
/// use formwork_forms::OptionSet;
///
/// let statuses = OptionSet::from_pairs([(1, "One"), (2, "Two")]);
/// assert_eq!(statuses.get("2"), Some("Two"));
///
/// let ages = OptionSet::from_labels(["10", "20", "30"]);
/// assert_eq!(ages.keys().collect::<Vec<_>>(), vec!["0", "1", "2"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionSet(IndexMap<String, String>);

impl OptionSet {
    /// Creates an empty option set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds an option set from key/label pairs.
    pub fn from_pairs<K: ToString, L: ToString>(pairs: impl IntoIterator<Item = (K, L)>) -> Self {
        Self(
            pairs
                .into_iter()
                .map(|(k, l)| (k.to_string(), l.to_string()))
                .collect(),
        )
    }

    /// Builds an option set from labels alone, keyed by position.
    pub fn from_labels<L: ToString>(labels: impl IntoIterator<Item = L>) -> Self {
        Self::from_pairs(labels.into_iter().enumerate())
    }

    /// Adds or replaces an option.
    pub fn insert(&mut self, key: impl Into<String>, label: impl Into<String>) {
        self.0.insert(key.into(), label.into());
    }

    /// Returns the label for a key.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    /// Returns the number of options.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Returns `true` if there are no options.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates the option keys in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// Iterates the option labels in order.
    pub fn labels(&self) -> impl Iterator<Item = &str> {
        self.0.values().map(String::as_str)
    }

    /// Iterates `(key, label)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, l)| (k.as_str(), l.as_str()))
    }

    /// The `(submitted value, label)` pairs an element offers.
    pub(crate) fn choices(&self, ignore_keys: bool) -> Vec<(&str, &str)> {
        self.iter()
            .map(|(k, l)| if ignore_keys { (l, l) } else { (k, l) })
            .collect()
    }

    /// The values a submission may carry: the keys, or the labels when keys are ignored.
    pub fn allowed_values(&self, ignore_keys: bool) -> Vec<Value> {
        let values: Box<dyn Iterator<Item = &str>> = if ignore_keys {
            Box::new(self.labels())
        } else {
            Box::new(self.keys())
        };
        values.map(Value::from).collect()
    }
}

impl<K: ToString, L: ToString> FromIterator<(K, L)> for OptionSet {
    fn from_iter<I: IntoIterator<Item = (K, L)>>(iter: I) -> Self {
        Self::from_pairs(iter)
    }
}
