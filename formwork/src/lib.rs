//! # formwork
//!
//! Server-side forms for Rust.
//!
//! This is the meta-crate that re-exports all sub-crates for convenient access.
//! You can depend on `formwork` to get everything, or depend on individual
//! crates for finer-grained control.
//!
//! ```
//! use std::sync::Arc;
//!
//! use formwork::prelude::*;
//!
//! let request = FormRequest::builder()
//!     .query_string("name=John&age=2")
//!     .build();
//!
//! let mut form = Form::new(Arc::new(request), None);
//! form.add_input("name", Some("Name")).set_required(true);
//! form.add_select("age", OptionSet::from_pairs([(1, "One"), (2, "Two")]), None);
//!
//! assert!(form.validate(None).unwrap());
//! assert_eq!(form.value("age"), Some(&Value::from("2")));
//! ```

/// Values, settings, errors and logging.
pub use formwork_core as core;

/// Request data: query strings, form bodies, uploads and sessions.
#[cfg(feature = "http")]
pub use formwork_http as http;

/// Elements, filters, rendering and the form validation pipeline.
#[cfg(feature = "forms")]
pub use formwork_forms as forms;

pub use formwork_core::form_data;

/// Third-party crates that appear in the public API.
pub mod deps {
    pub use ::http;
    pub use serde;
    pub use serde_json;
    pub use tracing;
    pub use tracing_subscriber;
}

/// The types most applications need.
pub mod prelude {
    pub use formwork_core::{
        form_data, FormData, FormworkError, FormworkResult, Settings, UploadedFile, Value,
        SETTINGS,
    };

    #[cfg(feature = "http")]
    pub use formwork_http::{FormRequest, QueryDict, RequestSource, SessionData};

    #[cfg(feature = "forms")]
    pub use formwork_forms::{Attrs, Element, ElementKind, Filter, Form, OptionSet, Tag};
}
