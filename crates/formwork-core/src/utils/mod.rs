//! Utility types and functions for the formwork framework.
//!
//! This module provides:
//! - [`MultiValueDict`]: An insertion-ordered dictionary that can hold multiple values per key.
//! - [`sprintf_name`]: Substitution of a field name into a message template.

mod multi_value_dict;

pub use multi_value_dict::MultiValueDict;

/// Substitutes `name` for the first `%s` in a message template.
///
/// Templates without a placeholder are returned unchanged.
///
/// ```
/// use formwork_core::utils::sprintf_name;
///
/// assert_eq!(sprintf_name("Field \"%s\" is empty", "age"), "Field \"age\" is empty");
/// assert_eq!(sprintf_name("Invalid", "age"), "Invalid");
/// ```
pub fn sprintf_name(template: &str, name: &str) -> String {
    template.replacen("%s", name, 1)
}
