//! # formwork-http
//!
//! HTTP collaborators for the formwork framework: query/body dictionaries,
//! multipart upload parsing, session data, and the [`RequestSource`] trait
//! forms read their submitted values from.

pub mod querydict;
pub mod request;
pub mod session;
pub mod upload;

pub use querydict::QueryDict;
pub use request::{FormRequest, FormRequestBuilder, RequestSource};
pub use session::SessionData;
pub use upload::{extract_boundary, parse_multipart, MultipartData};
