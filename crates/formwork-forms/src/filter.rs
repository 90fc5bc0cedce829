//! Value filters attached to elements.
//!
//! A filter either accepts a scalar value (possibly replacing it) or rejects
//! it. Lists are filtered item by item with [`Filter::apply_list`], which
//! silently drops rejected items.

use std::fmt;
use std::sync::Arc;

use regex::Regex;

use formwork_core::Value;

/// A boolean check on a scalar value.
pub type PredicateFn = Arc<dyn Fn(&Value) -> bool + Send + Sync>;

/// A check that may rewrite the value; `None` rejects it.
pub type TransformFn = Arc<dyn Fn(&Value) -> Option<Value> + Send + Sync>;

/// A condition a submitted value has to satisfy.
///
/// # Examples
///
/// ```
/// use formwork_core::Value;
/// use formwork_forms::Filter;
///
/// let digits = Filter::pattern(r"^[0-9]+$").unwrap();
/// assert!(digits.apply(&Value::from("123")).is_some());
/// assert!(digits.apply(&Value::from("12a")).is_none());
///
/// let allowed = Filter::whitelist([1, 2]);
/// assert_eq!(allowed.apply(&Value::from("2")), Some(Value::from("2")));
///
/// let trim = Filter::transform(|v| Some(Value::from(v.to_string().trim())));
/// assert_eq!(trim.apply(&Value::from(" x ")), Some(Value::from("x")));
/// ```
#[derive(Clone)]
pub enum Filter {
    /// Accepts the value when the function returns `true`.
    Predicate(PredicateFn),
    /// Accepts the returned value; `None` rejects.
    Transform(TransformFn),
    /// Accepts values whose whole string form matches the expression.
    Pattern(Regex),
    /// Accepts values loosely equal to one of the entries.
    Whitelist(Vec<Value>),
}

impl Filter {
    /// Creates a [`Filter::Predicate`].
    pub fn predicate(f: impl Fn(&Value) -> bool + Send + Sync + 'static) -> Self {
        Self::Predicate(Arc::new(f))
    }

    /// Creates a [`Filter::Transform`].
    pub fn transform(f: impl Fn(&Value) -> Option<Value> + Send + Sync + 'static) -> Self {
        Self::Transform(Arc::new(f))
    }

    /// Compiles a [`Filter::Pattern`].
    ///
    /// The expression must match the whole value, so `[a-z]+` rejects
    /// `"abc123"`. Use `(?i)` for case-insensitive matching.
    pub fn pattern(re: &str) -> Result<Self, regex::Error> {
        Regex::new(&format!("^(?:{re})$")).map(Self::Pattern)
    }

    /// Creates a [`Filter::Whitelist`].
    pub fn whitelist<V: Into<Value>>(values: impl IntoIterator<Item = V>) -> Self {
        Self::Whitelist(values.into_iter().map(Into::into).collect())
    }

    /// Applies the filter to a scalar.
    ///
    /// Returns the accepted (possibly transformed) value, or `None` when the
    /// value is rejected. Lists are always rejected.
    pub fn apply(&self, value: &Value) -> Option<Value> {
        if !value.is_scalar() {
            return None;
        }

        match self {
            Self::Predicate(f) => f(value).then(|| value.clone()),
            Self::Transform(f) => f(value),
            Self::Pattern(re) => re.is_match(&value.to_string()).then(|| value.clone()),
            Self::Whitelist(allowed) => allowed
                .iter()
                .any(|a| a.loose_eq(value))
                .then(|| value.clone()),
        }
    }

    /// Applies the filter to every item, keeping the accepted ones in order.
    pub fn apply_list(&self, values: &[Value]) -> Vec<Value> {
        values.iter().filter_map(|v| self.apply(v)).collect()
    }
}

impl fmt::Debug for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Predicate(_) => f.write_str("Predicate(<fn>)"),
            Self::Transform(_) => f.write_str("Transform(<fn>)"),
            Self::Pattern(re) => f.debug_tuple("Pattern").field(&re.as_str()).finish(),
            Self::Whitelist(values) => f.debug_tuple("Whitelist").field(values).finish(),
        }
    }
}
