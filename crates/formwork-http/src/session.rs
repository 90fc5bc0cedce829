//! Session data read by forms.
//!
//! Forms only ever read from the session: the captcha check compares the
//! submitted code with the secret stored under the captcha name. Loading,
//! expiring and persisting sessions belongs to the surrounding application,
//! which fills a [`SessionData`] and hands it to the request.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Key/value data of a user session, as loaded by the application.
///
/// # Examples
///
/// ```
/// use formwork_http::SessionData;
///
/// let mut session = SessionData::new();
/// session.set("captcha", serde_json::json!("abcdef"));
/// assert_eq!(session.get("captcha"), Some(&serde_json::json!("abcdef")));
///
/// let session: SessionData = [("captcha", serde_json::json!(1234))].into_iter().collect();
/// assert_eq!(session.get("captcha"), Some(&serde_json::json!(1234)));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionData {
    data: HashMap<String, serde_json::Value>,
}

impl SessionData {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Gets a value from the session by key.
    pub fn get(&self, key: &str) -> Option<&serde_json::Value> {
        self.data.get(key)
    }

    /// Stores a value, replacing any previous value under `key`.
    pub fn set(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.data.insert(key.into(), value);
    }
}

impl<K: Into<String>> FromIterator<(K, serde_json::Value)> for SessionData {
    fn from_iter<I: IntoIterator<Item = (K, serde_json::Value)>>(iter: I) -> Self {
        Self {
            data: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}
