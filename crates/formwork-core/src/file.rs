//! Uploaded file handles.
//!
//! Forms never store or move uploads; they only check that a file field
//! received an [`UploadedFile`] and pass it through to the validated data.

use serde::{Deserialize, Serialize};

/// An uploaded file from a multipart form submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadedFile {
    /// The original filename as provided by the client.
    pub name: String,
    /// The MIME content type of the file.
    pub content_type: String,
    /// The size of the file content in bytes.
    pub size: usize,
    /// The raw file content.
    pub content: Vec<u8>,
}

impl UploadedFile {
    /// Creates an uploaded file from a client filename and its content.
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, content: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            size: content.len(),
            content,
        }
    }

    /// The client filename without any directory components.
    pub fn file_name(&self) -> &str {
        self.name
            .rsplit(['/', '\\'])
            .next()
            .unwrap_or(&self.name)
    }

    /// The extension of the client filename, if it has one.
    pub fn extension(&self) -> Option<&str> {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => None,
            Some(pos) => Some(&name[pos + 1..]),
        }
    }
}
