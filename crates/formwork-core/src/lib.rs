//! # formwork-core
//!
//! Core types, settings, and error types for the formwork framework.
//! This crate has no web-framework dependencies and provides the foundation for the other crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and result aliases
//! - [`value`] - The dynamically-typed [`Value`] submitted through forms
//! - [`file`] - Uploaded file handles
//! - [`utils`] - Utility types (`MultiValueDict`)
//! - [`settings`] - Framework settings and global configuration
//! - [`settings_loader`] - Loading settings from TOML, JSON, and the environment
//! - [`logging`] - Tracing-based logging integration

pub mod error;
pub mod file;
pub mod logging;
pub mod settings;
pub mod settings_loader;
pub mod utils;
pub mod value;

// Re-export the most commonly used types at the crate root.
pub use error::{FormworkError, FormworkResult};
pub use file::UploadedFile;
pub use settings::{MessageSettings, Settings, SETTINGS};
pub use value::{FormData, Value};
