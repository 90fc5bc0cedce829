//! Dynamically-typed form values.
//!
//! The [`Value`] enum is the core type passed between requests, elements, and
//! forms. Submitted data arrives as strings or lists of strings, explicit
//! data handed to a form may carry numbers and booleans, and file fields
//! carry an [`UploadedFile`].
//!
//! Comparisons against option keys and captcha secrets go through
//! [`Value::loose_eq`], which coerces between numbers and numeric strings
//! explicitly instead of relying on `PartialEq`.

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::file::UploadedFile;

/// Ordered field-name to value mapping used for raw and validated form data.
pub type FormData = IndexMap<String, Value>;

/// A value submitted through a form field.
///
/// # Examples
///
/// ```
/// use formwork_core::value::Value;
///
/// let v = Value::from(42_i64);
/// assert_eq!(v, Value::Int(42));
/// assert!(v.loose_eq(&Value::from("42")));
///
/// assert!(Value::from("").is_empty());
/// assert!(Value::List(vec![]).is_empty());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// No value was submitted.
    #[default]
    Null,
    /// A boolean value.
    Bool(bool),
    /// A 64-bit signed integer.
    Int(i64),
    /// A 64-bit floating-point number.
    Float(f64),
    /// A UTF-8 string.
    String(String),
    /// A list of values (checkbox groups, multi-selects).
    List(Vec<Value>),
    /// An uploaded file.
    File(UploadedFile),
}

impl Value {
    /// Returns `true` for `Null`, `false`, the empty string, and the empty list.
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Null | Self::Bool(false) => true,
            Self::String(s) => s.is_empty(),
            Self::List(items) => items.is_empty(),
            Self::Bool(true) | Self::Int(_) | Self::Float(_) | Self::File(_) => false,
        }
    }

    /// Returns `true` for every value except lists.
    pub const fn is_scalar(&self) -> bool {
        !matches!(self, Self::List(_))
    }

    /// Returns `true` if this value is an uploaded file.
    pub const fn is_file(&self) -> bool {
        matches!(self, Self::File(_))
    }

    /// Returns the string slice if this is a `String`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    /// Returns the uploaded file if this is a `File`.
    pub const fn as_file(&self) -> Option<&UploadedFile> {
        match self {
            Self::File(f) => Some(f),
            _ => None,
        }
    }

    /// Interprets the value as a number, parsing numeric strings.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            #[allow(clippy::cast_precision_loss)]
            Self::Int(i) => Some(*i as f64),
            Self::Float(f) => Some(*f),
            Self::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        }
    }

    /// Interprets the value as an integer, parsing integer strings.
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            Self::Int(i) => Some(*i),
            Self::String(s) => s.trim().parse::<i64>().ok(),
            _ => None,
        }
    }

    /// Returns the truthiness of the value: empty values, `0`, `0.0` and
    /// `"0"` are false.
    pub fn is_truthy(&self) -> bool {
        match self {
            Self::Int(i) => *i != 0,
            Self::Float(f) => *f != 0.0,
            Self::String(s) => !s.is_empty() && s != "0",
            other => !other.is_empty(),
        }
    }

    /// Converts the value into a list: `Null` becomes `[]`, a list is kept,
    /// and any other value is wrapped.
    pub fn into_list(self) -> Vec<Self> {
        match self {
            Self::Null => Vec::new(),
            Self::List(items) => items,
            other => vec![other],
        }
    }

    /// Type-coercing equality.
    ///
    /// - `Null` equals any empty value.
    /// - A boolean equals any value with the same [truthiness](Self::is_truthy).
    /// - Two values that both read as numbers compare numerically, so
    ///   `Int(2)`, `Float(2.0)` and `"2"` are all equal.
    /// - Lists compare element-wise, files by content.
    /// - Everything else compares by string form.
    pub fn loose_eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, v) | (v, Self::Null) => v.is_empty(),
            (Self::Bool(b), v) | (v, Self::Bool(b)) => *b == v.is_truthy(),
            (Self::List(a), Self::List(b)) => {
                a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.loose_eq(y))
            }
            (Self::List(_), _) | (_, Self::List(_)) => false,
            (Self::File(a), Self::File(b)) => a == b,
            (Self::File(_), _) | (_, Self::File(_)) => false,
            (a, b) => match (a.as_f64(), b.as_f64()) {
                #[allow(clippy::float_cmp)]
                (Some(x), Some(y)) => x == y,
                _ => a.to_string() == b.to_string(),
            },
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null | Self::Bool(false) => Ok(()),
            Self::Bool(true) => write!(f, "1"),
            Self::Int(i) => write!(f, "{i}"),
            Self::Float(v) => write!(f, "{v}"),
            Self::String(s) => write!(f, "{s}"),
            Self::File(file) => write!(f, "{}", file.name),
            Self::List(vals) => {
                for (i, v) in vals.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{v}")?;
                }
                Ok(())
            }
        }
    }
}

// ── From implementations ───────────────────────────────────────────────

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i32> for Value {
    fn from(v: i32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Int(v)
    }
}

impl From<u32> for Value {
    fn from(v: u32) -> Self {
        Self::Int(i64::from(v))
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::String(v)
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::String(v.to_string())
    }
}

impl From<UploadedFile> for Value {
    fn from(v: UploadedFile) -> Self {
        Self::File(v)
    }
}

impl<T: Into<Self>> From<Vec<T>> for Value {
    fn from(v: Vec<T>) -> Self {
        Self::List(v.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Self>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

impl From<serde_json::Value> for Value {
    fn from(v: serde_json::Value) -> Self {
        match v {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => n
                .as_i64()
                .map_or_else(|| Self::Float(n.as_f64().unwrap_or_default()), Self::Int),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::List(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::String(serde_json::Value::Object(map).to_string()),
        }
    }
}

/// Builds a [`FormData`] map from `key => value` pairs.
///
/// ```
/// use formwork_core::{form_data, Value};
///
/// let data = form_data! { "name" => "John", "age" => 2 };
/// assert_eq!(data.get("age"), Some(&Value::Int(2)));
/// ```
#[macro_export]
macro_rules! form_data {
    () => {
        $crate::value::FormData::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut data = $crate::value::FormData::new();
        $(
            data.insert(::std::string::String::from($key), $crate::value::Value::from($value));
        )+
        data
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_empty() {
        assert!(Value::Null.is_empty());
        assert!(Value::Bool(false).is_empty());
        assert!(Value::from("").is_empty());
        assert!(Value::List(vec![]).is_empty());

        assert!(!Value::Int(0).is_empty());
        assert!(!Value::from("0").is_empty());
        assert!(!Value::Bool(true).is_empty());
        assert!(!Value::from(vec![1]).is_empty());
    }

    #[test]
    fn test_loose_eq_numbers_and_strings() {
        assert!(Value::Int(2).loose_eq(&Value::from("2")));
        assert!(Value::from("2").loose_eq(&Value::Int(2)));
        assert!(Value::Float(2.0).loose_eq(&Value::Int(2)));
        assert!(Value::from(" 3 ").loose_eq(&Value::Int(3)));
        assert!(!Value::Int(3).loose_eq(&Value::from("2")));
        assert!(Value::from("abc").loose_eq(&Value::from("abc")));
        assert!(!Value::from("abc").loose_eq(&Value::Int(0)));
    }

    #[test]
    fn test_loose_eq_null_and_bool() {
        assert!(Value::Null.loose_eq(&Value::from("")));
        assert!(Value::Null.loose_eq(&Value::Bool(false)));
        assert!(!Value::Null.loose_eq(&Value::from("a")));
        assert!(Value::Bool(true).loose_eq(&Value::from("abcdef")));
        assert!(!Value::Bool(true).loose_eq(&Value::from("")));
    }

    #[test]
    fn test_loose_eq_bool_and_zero() {
        assert!(!Value::Bool(true).loose_eq(&Value::Int(0)));
        assert!(!Value::Bool(true).loose_eq(&Value::from("0")));
        assert!(!Value::Int(0).loose_eq(&Value::Bool(true)));
        assert!(Value::Bool(false).loose_eq(&Value::Int(0)));
        assert!(Value::Bool(false).loose_eq(&Value::from("0")));
        assert!(Value::Bool(false).loose_eq(&Value::Float(0.0)));
        assert!(Value::Bool(true).loose_eq(&Value::from("0.0")));
        assert!(Value::Bool(true).loose_eq(&Value::Int(-1)));
    }

    #[test]
    fn test_is_truthy() {
        assert!(!Value::Null.is_truthy());
        assert!(!Value::Int(0).is_truthy());
        assert!(!Value::from("0").is_truthy());
        assert!(!Value::List(vec![]).is_truthy());
        assert!(Value::from("a").is_truthy());
        assert!(Value::from(vec![0]).is_truthy());
    }

    #[test]
    fn test_loose_eq_lists() {
        let a = Value::from(vec![1, 2]);
        let b = Value::from(vec!["1", "2"]);
        assert!(a.loose_eq(&b));
        assert!(!a.loose_eq(&Value::from(vec![1])));
        assert!(!a.loose_eq(&Value::Int(1)));
    }

    #[test]
    fn test_into_list() {
        assert_eq!(Value::Null.into_list(), Vec::<Value>::new());
        assert_eq!(Value::Int(1).into_list(), vec![Value::Int(1)]);
        assert_eq!(
            Value::from(vec![1, 3]).into_list(),
            vec![Value::Int(1), Value::Int(3)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(Value::Null.to_string(), "");
        assert_eq!(Value::Bool(true).to_string(), "1");
        assert_eq!(Value::Bool(false).to_string(), "");
        assert_eq!(Value::Int(123).to_string(), "123");
        assert_eq!(Value::from(vec!["a", "b"]).to_string(), "a, b");
    }

    #[test]
    fn test_from_json() {
        let v = Value::from(serde_json::json!({"n": 1}));
        assert_eq!(v, Value::from(r#"{"n":1}"#));
        assert_eq!(Value::from(serde_json::json!(5)), Value::Int(5));
        assert_eq!(Value::from(serde_json::json!(1.5)), Value::Float(1.5));
        assert_eq!(
            Value::from(serde_json::json!(["a", null])),
            Value::List(vec![Value::from("a"), Value::Null])
        );
    }

    #[test]
    fn test_serialize_untagged() {
        let data = crate::form_data! { "name" => "John", "age" => 2 };
        let json = serde_json::to_string(&data).unwrap();
        assert_eq!(json, r#"{"name":"John","age":2}"#);
    }

    #[test]
    fn test_form_data_macro_keeps_order() {
        let data = crate::form_data! { "b" => 1, "a" => 2, "c" => Value::Null };
        let keys: Vec<_> = data.keys().cloned().collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }
}
