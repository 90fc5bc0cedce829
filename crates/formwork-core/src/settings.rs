//! Settings system for the formwork framework.
//!
//! This module provides the [`Settings`] struct, which holds framework
//! configuration such as the user-facing message templates, and
//! [`LazySettings`], a globally-accessible, lazily-initialized settings instance.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{FormworkError, FormworkResult};

/// User-facing message templates.
///
/// `%s` in `required` and `wrong` is replaced with the element's display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageSettings {
    /// Template for a required element that received an empty value.
    pub required: String,
    /// Template for a value rejected by a filter.
    pub wrong: String,
    /// Message for a missing or mismatched captcha.
    pub captcha: String,
}

impl Default for MessageSettings {
    fn default() -> Self {
        Self {
            required: "Required field \"%s\" is empty".to_string(),
            wrong: "Field \"%s\" is filled incorrectly".to_string(),
            captcha: "Captcha code is incorrect".to_string(),
        }
    }
}

/// The complete set of framework settings.
///
/// # Examples
///
/// ```
/// use formwork_core::settings::Settings;
///
/// let settings = Settings::default();
/// assert!(settings.debug);
/// assert_eq!(settings.captcha_field, "captcha");
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Whether debug mode is enabled.
    pub debug: bool,

    // ── Logging ──────────────────────────────────────────────────────

    /// The log level filter (e.g. "info", "formwork_forms=debug").
    pub log_level: String,

    // ── Forms ────────────────────────────────────────────────────────

    /// Field and session key used when a captcha is enabled without a name.
    pub captcha_field: String,
    /// Message templates for validation errors.
    pub messages: MessageSettings,

    // ── Uploads ──────────────────────────────────────────────────────

    /// Largest accepted uploaded file, in bytes.
    pub file_upload_max_memory_size: usize,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            debug: true,
            log_level: "info".to_string(),
            captcha_field: "captcha".to_string(),
            messages: MessageSettings::default(),
            file_upload_max_memory_size: 2_621_440, // 2.5 MB
        }
    }
}

/// A lazily-initialized, globally-accessible settings container.
///
/// Call [`configure`](LazySettings::configure) once at startup. Until then
/// [`current`](LazySettings::current) hands out the defaults.
pub struct LazySettings {
    inner: OnceLock<Settings>,
}

impl Default for LazySettings {
    fn default() -> Self {
        Self::new()
    }
}

impl LazySettings {
    /// Creates a new, unconfigured `LazySettings`.
    pub const fn new() -> Self {
        Self {
            inner: OnceLock::new(),
        }
    }

    /// Configures the global settings. May only succeed once.
    pub fn configure(&self, settings: Settings) -> FormworkResult<()> {
        self.inner.set(settings).map_err(|_| {
            FormworkError::ConfigurationError("Settings have already been configured".to_string())
        })
    }

    /// Returns the configured settings, if any.
    pub fn get(&self) -> Option<&Settings> {
        self.inner.get()
    }

    /// Returns a copy of the configured settings, or the defaults.
    pub fn current(&self) -> Settings {
        self.get().cloned().unwrap_or_default()
    }

    /// Returns `true` if settings have been configured.
    pub fn is_configured(&self) -> bool {
        self.inner.get().is_some()
    }
}

/// The global settings instance.
pub static SETTINGS: LazySettings = LazySettings::new();
