//! Query string dictionary for HTTP request parameters.
//!
//! [`QueryDict`] wraps [`MultiValueDict`] to provide an immutable-by-default,
//! insertion-ordered dictionary for query strings and urlencoded bodies.
//! [`QueryDict::value`] turns the stored strings into a form [`Value`],
//! following the bracket conventions browsers use for array inputs.

use formwork_core::utils::MultiValueDict;
use formwork_core::{FormworkError, FormworkResult, Value};

/// An immutable-by-default dictionary for query string and form data.
///
/// # Examples
///
/// ```
/// use formwork_http::QueryDict;
///
/// let qd = QueryDict::parse("color=red&color=blue&size=large");
/// assert_eq!(qd.get("color"), Some("blue"));
/// assert_eq!(qd.get_list("color"), Some(&vec!["red".to_string(), "blue".to_string()]));
///
/// let mut mutable = qd.copy();
/// mutable.set("color", "green").unwrap();
/// assert_eq!(mutable.get("color"), Some("green"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryDict {
    data: MultiValueDict<String, String>,
    mutable: bool,
}

impl QueryDict {
    /// Creates a new, empty, immutable `QueryDict`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a new, empty, mutable `QueryDict`.
    pub fn new_mutable() -> Self {
        Self {
            data: MultiValueDict::new(),
            mutable: true,
        }
    }

    /// Parses a urlencoded string (e.g., `"key1=val1&key2=val2"`) into an immutable `QueryDict`.
    ///
    /// Handles percent-encoding, `+` as space, and multiple values per key.
    pub fn parse(query_string: &str) -> Self {
        let mut data = MultiValueDict::new();

        for pair in query_string.split('&').filter(|p| !p.is_empty()) {
            let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
            data.append(percent_decode(key), percent_decode(value));
        }

        Self {
            data,
            mutable: false,
        }
    }

    /// Builds an immutable `QueryDict` from key/value pairs, keeping their order.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let mut data = MultiValueDict::new();
        for (k, v) in pairs {
            data.append(k.into(), v.into());
        }
        Self {
            data,
            mutable: false,
        }
    }

    /// Returns the last value for the given key, or `None` if not present.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.data.get(&key.to_string()).map(String::as_str)
    }

    /// Returns all values for the given key, or `None` if not present.
    pub fn get_list(&self, key: &str) -> Option<&Vec<String>> {
        self.data.get_list(&key.to_string())
    }

    /// Resolves a form input name to a [`Value`].
    ///
    /// - A key submitted once yields a `String`.
    /// - A key submitted several times yields a `List`.
    /// - `name[]` keys (checkbox groups, multi-selects) yield a `List`.
    ///
    /// ```
    /// use formwork_core::Value;
    /// use formwork_http::QueryDict;
    ///
    /// let qd = QueryDict::parse("profile%5Bname%5D=John&age%5B%5D=10&age%5B%5D=30");
    /// assert_eq!(qd.value("profile[name]"), Some(Value::from("John")));
    /// assert_eq!(qd.value("age"), Some(Value::from(vec!["10", "30"])));
    /// ```
    pub fn value(&self, name: &str) -> Option<Value> {
        if let Some(values) = self.get_list(name) {
            return Some(match values.as_slice() {
                [single] => Value::from(single.as_str()),
                many => Value::from(many.to_vec()),
            });
        }

        self.get_list(&format!("{name}[]"))
            .map(|values| Value::from(values.clone()))
    }

    /// Returns `true` if [`value`](Self::value) would find anything for `name`.
    pub fn has(&self, name: &str) -> bool {
        self.contains_key(name) || self.contains_key(&format!("{name}[]"))
    }

    /// Sets a single value for the given key, replacing any existing values.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::SuspiciousOperation`] if this `QueryDict` is immutable.
    pub fn set(&mut self, key: &str, value: &str) -> FormworkResult<()> {
        self.ensure_mutable()?;
        self.data.set(key.to_string(), value.to_string());
        Ok(())
    }

    /// Appends a value to the list for the given key.
    ///
    /// # Errors
    ///
    /// Returns [`FormworkError::SuspiciousOperation`] if this `QueryDict` is immutable.
    pub fn append(&mut self, key: &str, value: &str) -> FormworkResult<()> {
        self.ensure_mutable()?;
        self.data.append(key.to_string(), value.to_string());
        Ok(())
    }

    /// Returns a mutable copy of this `QueryDict`.
    #[must_use]
    pub fn copy(&self) -> Self {
        Self {
            data: self.data.clone(),
            mutable: true,
        }
    }

    /// Encodes this `QueryDict` as a urlencoded string, in insertion order.
    pub fn urlencode(&self) -> String {
        self.data
            .iter()
            .flat_map(|(key, values)| {
                values
                    .iter()
                    .map(move |value| format!("{}={}", percent_encode(key), percent_encode(value)))
            })
            .collect::<Vec<_>>()
            .join("&")
    }

    /// Returns `true` if this `QueryDict` is mutable.
    pub const fn is_mutable(&self) -> bool {
        self.mutable
    }

    /// Returns the number of distinct keys.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns `true` if the `QueryDict` contains no keys.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Returns `true` if the specified key is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.data.contains_key(&key.to_string())
    }

    /// Returns an iterator over the keys in insertion order.
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.data.keys()
    }

    fn ensure_mutable(&self) -> FormworkResult<()> {
        if self.mutable {
            Ok(())
        } else {
            Err(FormworkError::SuspiciousOperation(
                "This QueryDict instance is immutable".to_string(),
            ))
        }
    }
}

/// Decodes a percent-encoded string.
fn percent_decode(input: &str) -> String {
    // Replace + with space (form encoding), then decode percent sequences
    let plus_decoded = input.replace('+', " ");
    percent_encoding::percent_decode_str(&plus_decoded)
        .decode_utf8_lossy()
        .into_owned()
}

/// Percent-encodes a string for use in a URL query.
fn percent_encode(input: &str) -> String {
    percent_encoding::utf8_percent_encode(input, percent_encoding::NON_ALPHANUMERIC).to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_multiple_values() {
        let qd = QueryDict::parse("color=red&color=blue&color=green");
        assert_eq!(qd.get("color"), Some("green"));
        assert_eq!(
            qd.get_list("color"),
            Some(&vec![
                "red".to_string(),
                "blue".to_string(),
                "green".to_string()
            ])
        );
    }

    #[test]
    fn test_parse_no_value_and_empty_pairs() {
        let qd = QueryDict::parse("a=1&&key&b=");
        assert_eq!(qd.get("a"), Some("1"));
        assert_eq!(qd.get("key"), Some(""));
        assert_eq!(qd.get("b"), Some(""));
        assert_eq!(qd.len(), 3);
    }

    #[test]
    fn test_parse_percent_encoded_and_plus() {
        let qd = QueryDict::parse("name=hello%20world&city=New+York");
        assert_eq!(qd.get("name"), Some("hello world"));
        assert_eq!(qd.get("city"), Some("New York"));
    }

    #[test]
    fn test_parse_bracketed_keys() {
        let qd = QueryDict::parse("myform%5Bname%5D=John");
        assert_eq!(qd.get("myform[name]"), Some("John"));
    }

    #[test]
    fn test_value_scalar_and_repeated() {
        let qd = QueryDict::parse("name=John&tag=a&tag=b");
        assert_eq!(qd.value("name"), Some(Value::from("John")));
        assert_eq!(qd.value("tag"), Some(Value::from(vec!["a", "b"])));
        assert_eq!(qd.value("missing"), None);
    }

    #[test]
    fn test_value_array_suffix() {
        let qd = QueryDict::parse("age[]=10&age[]=30&one[]=x");
        assert_eq!(qd.value("age"), Some(Value::from(vec!["10", "30"])));
        assert_eq!(qd.value("one"), Some(Value::from(vec!["x"])));
        assert!(qd.has("age"));
        assert!(!qd.has("name"));
    }

    #[test]
    fn test_immutable_mutations_fail() {
        let mut qd = QueryDict::parse("key=value");
        assert!(!qd.is_mutable());
        assert!(qd.set("key", "new_value").is_err());
        assert!(qd.append("key", "extra").is_err());
    }

    #[test]
    fn test_copy_returns_mutable() {
        let qd = QueryDict::parse("key=value");
        let mut mutable = qd.copy();
        assert!(mutable.is_mutable());
        mutable.append("key", "second").unwrap();
        assert_eq!(mutable.get("key"), Some("second"));
        assert_eq!(qd.get("key"), Some("value"));
    }

    #[test]
    fn test_from_pairs_keeps_order() {
        let qd = QueryDict::from_pairs([("b", "2"), ("a", "1"), ("b", "3")]);
        let keys: Vec<_> = qd.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a"]);
        assert_eq!(qd.get_list("b"), Some(&vec!["2".to_string(), "3".to_string()]));
    }

    #[test]
    fn test_urlencode_in_insertion_order() {
        let mut qd = QueryDict::new_mutable();
        qd.append("z", "hello world").unwrap();
        qd.append("a", "1").unwrap();
        qd.append("z", "2").unwrap();
        assert_eq!(qd.urlencode(), "z=hello%20world&z=2&a=1");
    }
}
