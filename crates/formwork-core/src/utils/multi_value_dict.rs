//! A dictionary that can hold multiple values per key.
//!
//! [`MultiValueDict`] backs query strings and form bodies, where a single key
//! may appear multiple times (`tags=a&tags=b`, `age[]=10&age[]=30`). Keys keep
//! the order in which they were first seen.

use std::hash::Hash;

use indexmap::map;
use indexmap::IndexMap;

/// An insertion-ordered dictionary that maps keys to lists of values.
///
/// [`get`](MultiValueDict::get) returns the **last** value for a key, while
/// [`get_list`](MultiValueDict::get_list) returns all values.
///
/// # Examples
///
/// ```
/// use formwork_core::utils::MultiValueDict;
///
/// let mut d = MultiValueDict::new();
/// d.append("color".to_string(), "red");
/// d.append("color".to_string(), "blue");
///
/// assert_eq!(d.get(&"color".to_string()), Some(&"blue"));
/// assert_eq!(d.get_list(&"color".to_string()), Some(&vec!["red", "blue"]));
/// ```
#[derive(Debug, Clone)]
pub struct MultiValueDict<K: Eq + Hash, V> {
    inner: IndexMap<K, Vec<V>>,
}

impl<K: Eq + Hash, V> Default for MultiValueDict<K, V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Eq + Hash, V> MultiValueDict<K, V> {
    /// Creates an empty `MultiValueDict`.
    pub fn new() -> Self {
        Self {
            inner: IndexMap::new(),
        }
    }

    /// Returns a reference to the **last** value associated with the key.
    pub fn get(&self, key: &K) -> Option<&V> {
        self.inner.get(key).and_then(|v| v.last())
    }

    /// Returns all values associated with the key.
    pub fn get_list(&self, key: &K) -> Option<&Vec<V>> {
        self.inner.get(key)
    }

    /// Sets the value for a key, replacing any existing values.
    ///
    /// A key that already exists keeps its position.
    pub fn set(&mut self, key: K, value: V) {
        self.inner.insert(key, vec![value]);
    }

    /// Appends a value to the list for the given key.
    pub fn append(&mut self, key: K, value: V) {
        self.inner.entry(key).or_default().push(value);
    }

    /// Removes a key and returns its values, preserving the order of the rest.
    pub fn remove(&mut self, key: &K) -> Option<Vec<V>> {
        self.inner.shift_remove(key)
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> map::Keys<'_, K, Vec<V>> {
        self.inner.keys()
    }

    /// Returns an iterator over all value lists.
    pub fn values(&self) -> map::Values<'_, K, Vec<V>> {
        self.inner.values()
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.inner.len()
    }

    /// Returns `true` if the dictionary contains no keys.
    pub fn is_empty(&self) -> bool {
        self.inner.is_empty()
    }

    /// Returns `true` if the dictionary contains the specified key.
    pub fn contains_key(&self, key: &K) -> bool {
        self.inner.contains_key(key)
    }

    /// Returns an iterator over (key, value-list) pairs in insertion order.
    pub fn iter(&self) -> map::Iter<'_, K, Vec<V>> {
        self.inner.iter()
    }
}

impl<K: Eq + Hash, V> IntoIterator for MultiValueDict<K, V> {
    type Item = (K, Vec<V>);
    type IntoIter = map::IntoIter<K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.into_iter()
    }
}

impl<'a, K: Eq + Hash, V> IntoIterator for &'a MultiValueDict<K, V> {
    type Item = (&'a K, &'a Vec<V>);
    type IntoIter = map::Iter<'a, K, Vec<V>>;

    fn into_iter(self) -> Self::IntoIter {
        self.inner.iter()
    }
}
