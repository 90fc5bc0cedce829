//! Settings loading from configuration files.
//!
//! ## Loading Order
//!
//! 1. Start with default settings.
//! 2. Load from a TOML or JSON file (overriding defaults).
//! 3. Apply environment variable overrides (highest priority).
//!
//! ## Environment Variable Mapping
//!
//! | Env Var | Setting |
//! |---|---|
//! | `FORMWORK_DEBUG` | `debug` |
//! | `FORMWORK_LOG_LEVEL` | `log_level` |
//! | `FORMWORK_CAPTCHA_FIELD` | `captcha_field` |
//! | `FORMWORK_FILE_UPLOAD_MAX_MEMORY_SIZE` | `file_upload_max_memory_size` |
//! | `FORMWORK_MESSAGE_REQUIRED` | `messages.required` |
//! | `FORMWORK_MESSAGE_WRONG` | `messages.wrong` |
//! | `FORMWORK_MESSAGE_CAPTCHA` | `messages.captcha` |
//!
//! ## Examples
//!
//! ```rust,no_run
//! use formwork_core::settings_loader;
//!
//! let settings = settings_loader::from_toml_file("config/forms.toml").unwrap();
//! let settings = settings_loader::from_toml_file_with_env("config/forms.toml").unwrap();
//! ```

use std::path::Path;

use crate::error::FormworkError;
use crate::settings::Settings;

/// Loads settings from a TOML string.
///
/// Any keys not present in the TOML keep their default values, including
/// individual keys of nested tables such as `[messages]`.
pub fn from_toml_str(toml_str: &str) -> Result<Settings, FormworkError> {
    let toml_value: toml::Value = toml::from_str(toml_str)
        .map_err(|e| FormworkError::ConfigurationError(format!("Failed to parse TOML: {e}")))?;

    merge_with_defaults(toml_to_json(toml_value), "TOML")
}

/// Loads settings from a TOML file.
pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Settings, FormworkError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        FormworkError::ConfigurationError(format!(
            "Failed to read TOML file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_toml_str(&content)
}

/// Loads settings from a TOML file and then applies environment variable overrides.
pub fn from_toml_file_with_env(path: impl AsRef<Path>) -> Result<Settings, FormworkError> {
    let mut settings = from_toml_file(path)?;
    apply_env_overrides(&mut settings);
    Ok(settings)
}

/// Loads settings from a JSON string.
pub fn from_json_str(json_str: &str) -> Result<Settings, FormworkError> {
    let json_value: serde_json::Value = serde_json::from_str(json_str)
        .map_err(|e| FormworkError::ConfigurationError(format!("Failed to parse JSON: {e}")))?;

    merge_with_defaults(json_value, "JSON")
}

/// Loads settings from a JSON file.
pub fn from_json_file(path: impl AsRef<Path>) -> Result<Settings, FormworkError> {
    let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
        FormworkError::ConfigurationError(format!(
            "Failed to read JSON file '{}': {e}",
            path.as_ref().display()
        ))
    })?;
    from_json_str(&content)
}

/// Loads settings from just environment variables (starting from defaults).
pub fn from_env() -> Settings {
    let mut settings = Settings::default();
    apply_env_overrides(&mut settings);
    settings
}

/// Applies `FORMWORK_*` environment variable overrides to a settings struct.
pub fn apply_env_overrides(settings: &mut Settings) {
    apply_overrides(settings, |key| std::env::var(key).ok());
}

/// Applies overrides from an arbitrary lookup, keyed like the environment.
fn apply_overrides(settings: &mut Settings, lookup: impl Fn(&str) -> Option<String>) {
    if let Some(val) = lookup("FORMWORK_DEBUG") {
        settings.debug = matches!(val.to_lowercase().as_str(), "true" | "1" | "yes");
    }

    if let Some(val) = lookup("FORMWORK_LOG_LEVEL") {
        settings.log_level = val;
    }

    if let Some(val) = lookup("FORMWORK_CAPTCHA_FIELD") {
        settings.captcha_field = val;
    }

    if let Some(val) = lookup("FORMWORK_FILE_UPLOAD_MAX_MEMORY_SIZE") {
        if let Ok(size) = val.parse::<usize>() {
            settings.file_upload_max_memory_size = size;
        } else {
            tracing::warn!(value = %val, "ignoring non-numeric FORMWORK_FILE_UPLOAD_MAX_MEMORY_SIZE");
        }
    }

    if let Some(val) = lookup("FORMWORK_MESSAGE_REQUIRED") {
        settings.messages.required = val;
    }

    if let Some(val) = lookup("FORMWORK_MESSAGE_WRONG") {
        settings.messages.wrong = val;
    }

    if let Some(val) = lookup("FORMWORK_MESSAGE_CAPTCHA") {
        settings.messages.captcha = val;
    }
}

// ============================================================
// Helpers
// ============================================================

/// Deep-merges `overrides` over the serialized defaults and deserializes the result.
fn merge_with_defaults(
    overrides: serde_json::Value,
    format: &str,
) -> Result<Settings, FormworkError> {
    let default_json = serde_json::to_value(Settings::default()).map_err(|e| {
        FormworkError::ConfigurationError(format!("Failed to serialize default settings: {e}"))
    })?;

    let merged = merge_json(default_json, overrides);
    serde_json::from_value(merged).map_err(|e| {
        FormworkError::ConfigurationError(format!(
            "Failed to deserialize settings from {format}: {e}"
        ))
    })
}

/// Converts a TOML value to a `serde_json::Value`.
fn toml_to_json(value: toml::Value) -> serde_json::Value {
    match value {
        toml::Value::String(s) => serde_json::Value::String(s),
        toml::Value::Integer(i) => serde_json::json!(i),
        toml::Value::Float(f) => serde_json::json!(f),
        toml::Value::Boolean(b) => serde_json::Value::Bool(b),
        toml::Value::Datetime(dt) => serde_json::Value::String(dt.to_string()),
        toml::Value::Array(arr) => {
            serde_json::Value::Array(arr.into_iter().map(toml_to_json).collect())
        }
        toml::Value::Table(table) => {
            let map: serde_json::Map<String, serde_json::Value> = table
                .into_iter()
                .map(|(k, v)| (k, toml_to_json(v)))
                .collect();
            serde_json::Value::Object(map)
        }
    }
}

/// Deep-merges two JSON values. The `override_val` takes precedence.
fn merge_json(base: serde_json::Value, override_val: serde_json::Value) -> serde_json::Value {
    match (base, override_val) {
        (serde_json::Value::Object(mut base_map), serde_json::Value::Object(override_map)) => {
            for (key, override_v) in override_map {
                let merged = if let Some(base_v) = base_map.remove(&key) {
                    merge_json(base_v, override_v)
                } else {
                    override_v
                };
                base_map.insert(key, merged);
            }
            serde_json::Value::Object(base_map)
        }
        (_, override_val) => override_val,
    }
}
