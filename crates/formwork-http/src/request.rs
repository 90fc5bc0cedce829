//! Request sources for form submissions.
//!
//! Forms never parse HTTP themselves. They read submitted values through the
//! [`RequestSource`] trait, which [`FormRequest`] implements over a parsed
//! query string, request body, uploaded files and session.

use indexmap::IndexMap;

use http::Method;

use formwork_core::{UploadedFile, Value};

use crate::querydict::QueryDict;
use crate::session::SessionData;
use crate::upload::{extract_boundary, parse_multipart};

/// Default upload limit used by [`FormRequestBuilder`], in bytes.
const DEFAULT_MAX_UPLOAD_SIZE: usize = 2_621_440;

/// Read access to submitted data, as seen by a form.
///
/// `name` is always a full input name, so named forms look up
/// `profile[age]` rather than `age`.
pub trait RequestSource: Send + Sync {
    /// Returns the submitted value for an input name.
    fn get(&self, name: &str) -> Option<Value>;

    /// Returns the file uploaded under an input name.
    fn file(&self, name: &str) -> Option<UploadedFile>;

    /// Returns the session attached to the request, if any.
    fn session(&self) -> Option<&SessionData>;

    /// Returns `true` if the request carries a value or a file for `name`.
    fn has(&self, name: &str) -> bool {
        self.get(name).is_some() || self.file(name).is_some()
    }
}

/// A parsed form submission.
///
/// # Examples
///
/// ```
/// use formwork_core::Value;
/// use formwork_http::{FormRequest, RequestSource};
///
/// let request = FormRequest::builder()
///     .method(http::Method::POST)
///     .content_type("application/x-www-form-urlencoded")
///     .body(b"name=John&age=3".to_vec())
///     .build();
///
/// assert_eq!(request.get("name"), Some(Value::from("John")));
/// assert!(!request.has("missing"));
/// ```
#[derive(Debug, Default)]
pub struct FormRequest {
    method: Method,
    query: QueryDict,
    post: QueryDict,
    files: IndexMap<String, Vec<UploadedFile>>,
    session: Option<SessionData>,
}

impl FormRequest {
    /// Creates a new [`FormRequestBuilder`].
    pub fn builder() -> FormRequestBuilder {
        FormRequestBuilder::default()
    }

    /// Creates a `FormRequest` from HTTP request parts and the collected body.
    ///
    /// Urlencoded and multipart bodies are parsed; any other content type
    /// leaves the body data empty. A multipart body that cannot be parsed
    /// (for example an oversized upload) is logged and dropped.
    pub fn from_parts(parts: http::request::Parts, body: &[u8], max_upload_size: usize) -> Self {
        let query = QueryDict::parse(parts.uri.query().unwrap_or(""));

        let content_type = parts
            .headers
            .get(http::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok());

        let (post, files) = parse_body(content_type, body, max_upload_size);

        Self {
            method: parts.method,
            query,
            post,
            files,
            session: None,
        }
    }

    /// Attaches a session, replacing any previous one.
    #[must_use]
    pub fn with_session(mut self, session: SessionData) -> Self {
        self.session = Some(session);
        self
    }

    /// Returns the HTTP method.
    pub const fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the query string parameters.
    pub const fn query(&self) -> &QueryDict {
        &self.query
    }

    /// Returns the body parameters.
    pub const fn post(&self) -> &QueryDict {
        &self.post
    }

    /// Returns all uploaded files, keyed by input name.
    pub const fn files(&self) -> &IndexMap<String, Vec<UploadedFile>> {
        &self.files
    }

}

impl RequestSource for FormRequest {
    fn get(&self, name: &str) -> Option<Value> {
        self.query.value(name).or_else(|| self.post.value(name))
    }

    fn file(&self, name: &str) -> Option<UploadedFile> {
        self.files
            .get(name)
            .and_then(|files| files.first())
            .cloned()
    }

    fn session(&self) -> Option<&SessionData> {
        self.session.as_ref()
    }
}

/// Builder for constructing [`FormRequest`] instances, mostly in tests.
#[derive(Debug)]
pub struct FormRequestBuilder {
    method: Method,
    query_string: String,
    content_type: Option<String>,
    body: Vec<u8>,
    max_upload_size: usize,
    files: IndexMap<String, Vec<UploadedFile>>,
    session: Option<SessionData>,
}

impl Default for FormRequestBuilder {
    fn default() -> Self {
        Self {
            method: Method::GET,
            query_string: String::new(),
            content_type: None,
            body: Vec::new(),
            max_upload_size: DEFAULT_MAX_UPLOAD_SIZE,
            files: IndexMap::new(),
            session: None,
        }
    }
}

impl FormRequestBuilder {
    /// Sets the HTTP method.
    #[must_use]
    pub fn method(mut self, method: Method) -> Self {
        self.method = method;
        self
    }

    /// Sets the query string (without leading `?`).
    #[must_use]
    pub fn query_string(mut self, qs: &str) -> Self {
        self.query_string = qs.to_string();
        self
    }

    /// Sets the content type.
    #[must_use]
    pub fn content_type(mut self, ct: &str) -> Self {
        self.content_type = Some(ct.to_string());
        self
    }

    /// Sets the request body.
    #[must_use]
    pub fn body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }

    /// Sets the largest accepted uploaded file, in bytes.
    #[must_use]
    pub const fn max_upload_size(mut self, size: usize) -> Self {
        self.max_upload_size = size;
        self
    }

    /// Adds an uploaded file under an input name.
    #[must_use]
    pub fn file(mut self, name: &str, file: UploadedFile) -> Self {
        self.files.entry(name.to_string()).or_default().push(file);
        self
    }

    /// Attaches a session.
    #[must_use]
    pub fn session(mut self, session: SessionData) -> Self {
        self.session = Some(session);
        self
    }

    /// Builds the [`FormRequest`].
    pub fn build(self) -> FormRequest {
        let (post, mut files) =
            parse_body(self.content_type.as_deref(), &self.body, self.max_upload_size);

        for (name, uploaded) in self.files {
            files.entry(name).or_default().extend(uploaded);
        }

        FormRequest {
            method: self.method,
            query: QueryDict::parse(&self.query_string),
            post,
            files,
            session: self.session,
        }
    }
}

/// Parses a request body according to its content type.
fn parse_body(
    content_type: Option<&str>,
    body: &[u8],
    max_upload_size: usize,
) -> (QueryDict, IndexMap<String, Vec<UploadedFile>>) {
    let Some(ct) = content_type else {
        return (QueryDict::new(), IndexMap::new());
    };

    if ct.starts_with("application/x-www-form-urlencoded") {
        return (
            QueryDict::parse(&String::from_utf8_lossy(body)),
            IndexMap::new(),
        );
    }

    if !ct.starts_with("multipart/form-data") {
        return (QueryDict::new(), IndexMap::new());
    }

    let Some(boundary) = extract_boundary(ct) else {
        tracing::warn!(content_type = ct, "multipart body without boundary");
        return (QueryDict::new(), IndexMap::new());
    };

    match parse_multipart(body, boundary, max_upload_size) {
        Ok(multipart) => {
            let pairs = multipart
                .fields
                .into_iter()
                .flat_map(|(name, values)| values.into_iter().map(move |v| (name.clone(), v)));
            (QueryDict::from_pairs(pairs), multipart.files)
        }
        Err(e) => {
            tracing::warn!(error = %e, "discarding unparseable multipart body");
            (QueryDict::new(), IndexMap::new())
        }
    }
}
