//! Captcha verification.
//!
//! Generating and storing the captcha secret is up to the application: it
//! puts the expected code into the session under the captcha name. A form
//! only compares the submitted code with that session entry.

use formwork_core::Value;
use formwork_http::SessionData;

/// The outcome of a captcha check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CaptchaCheck {
    /// The submitted code matches the session secret.
    Passed,
    /// No code was submitted.
    Missing,
    /// The request has no session, or the session holds no secret.
    NoSecret,
    /// The submitted code differs from the session secret.
    Mismatch,
}

impl CaptchaCheck {
    /// Returns `true` for [`CaptchaCheck::Passed`].
    pub const fn passed(self) -> bool {
        matches!(self, Self::Passed)
    }
}

/// Compares a submitted captcha code with the secret stored under `name`.
///
/// The comparison is loose, so a numeric code stored as a number matches
/// the same digits submitted as a string.
///
/// ```
/// use formwork_core::Value;
/// use formwork_forms::captcha::{verify, CaptchaCheck};
/// use formwork_http::SessionData;
///
/// let mut session = SessionData::new();
/// session.set("heyho", serde_json::json!(1234));
///
/// assert_eq!(verify(&Value::from("1234"), Some(&session), "heyho"), CaptchaCheck::Passed);
/// assert_eq!(verify(&Value::Null, Some(&session), "heyho"), CaptchaCheck::Missing);
/// ```
pub fn verify(submitted: &Value, session: Option<&SessionData>, name: &str) -> CaptchaCheck {
    if submitted.is_empty() {
        return CaptchaCheck::Missing;
    }

    let Some(secret) = session.and_then(|s| s.get(name)) else {
        return CaptchaCheck::NoSecret;
    };

    if Value::from(secret.clone()).loose_eq(submitted) {
        CaptchaCheck::Passed
    } else {
        CaptchaCheck::Mismatch
    }
}
