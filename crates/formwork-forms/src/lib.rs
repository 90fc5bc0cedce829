//! # formwork-forms
//!
//! Server-side forms for the formwork framework: elements with filters and
//! option sets, deterministic tag rendering, and the [`Form`] validation
//! pipeline with hooks and a captcha check.
//!
//! ## Modules
//!
//! - [`element`] - [`Element`] and its variants
//! - [`filter`] - Predicates, transforms, patterns and whitelists
//! - [`options`] - [`OptionSet`] for select, radio and checkbox groups
//! - [`tag`] - HTML tag model used by rendering
//! - [`captcha`] - Captcha code verification against the session
//! - [`form`] - [`Form`] and its validation pipeline

pub mod captcha;
pub mod element;
pub mod filter;
pub mod form;
pub mod options;
pub mod tag;

pub use captcha::CaptchaCheck;
pub use element::{Element, ElementKind};
pub use filter::Filter;
pub use form::{DataHook, Form, ProcessHook};
pub use options::OptionSet;
pub use tag::{Attrs, Tag};
