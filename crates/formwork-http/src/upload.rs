//! Multipart form-data parsing for file uploads.
//!
//! Provides [`parse_multipart`] to extract form fields and uploaded files
//! from `multipart/form-data` request bodies. Field names are kept verbatim,
//! so a named form's `profile[avatar]` input arrives under that exact key.

use indexmap::IndexMap;

use formwork_core::{FormworkError, FormworkResult, UploadedFile};

/// The result of parsing a multipart form-data body.
#[derive(Debug, Clone, Default)]
pub struct MultipartData {
    /// Regular form fields: name -> list of values, in submission order.
    pub fields: IndexMap<String, Vec<String>>,
    /// Uploaded files: field name -> list of uploaded files.
    pub files: IndexMap<String, Vec<UploadedFile>>,
}

/// Extracts the boundary string from a `Content-Type: multipart/form-data` header.
///
/// Returns `None` if the boundary cannot be found or is empty.
pub fn extract_boundary(content_type: &str) -> Option<&str> {
    content_type
        .split(';')
        .find_map(|part| part.trim().strip_prefix("boundary="))
        .map(|boundary| boundary.trim_matches('"'))
        .filter(|boundary| !boundary.is_empty())
}

/// Parses a multipart/form-data request body.
///
/// Splits the raw body on the boundary delimiter, then reads each part's
/// `Content-Disposition` to decide whether it is a regular field or a file.
/// Only header blocks are decoded as text; file content is kept byte for
/// byte. File parts with neither a filename nor content (an untouched file
/// input) are skipped.
///
/// # Errors
///
/// Returns [`FormworkError::BadRequest`] if a file exceeds `max_file_size` bytes.
pub fn parse_multipart(
    body: &[u8],
    boundary: &str,
    max_file_size: usize,
) -> FormworkResult<MultipartData> {
    let mut data = MultipartData::default();
    let delimiter = format!("--{boundary}");

    for part in split_parts(body, delimiter.as_bytes()) {
        let Some((headers, content)) = split_part(part) else {
            continue;
        };

        let disposition = PartHeaders::parse(&String::from_utf8_lossy(headers));
        let Some(name) = disposition.name else {
            continue;
        };

        match disposition.filename {
            Some(filename) => {
                if filename.is_empty() && content.is_empty() {
                    continue;
                }

                if content.len() > max_file_size {
                    tracing::warn!(file = %filename, size = content.len(), "rejecting oversized upload");
                    return Err(FormworkError::BadRequest(format!(
                        "File '{filename}' exceeds maximum upload size of {max_file_size} bytes"
                    )));
                }

                let file = UploadedFile::new(filename, disposition.content_type, content.to_vec());
                data.files.entry(name).or_default().push(file);
            }
            None => {
                data.fields
                    .entry(name)
                    .or_default()
                    .push(String::from_utf8_lossy(content).into_owned());
            }
        }
    }

    Ok(data)
}

/// Returns the parts between delimiters, without the line break that follows
/// each delimiter and the one that precedes the next.
///
/// Parsing stops at the closing `--boundary--` delimiter; a part with no
/// delimiter after it is incomplete and dropped.
fn split_parts<'a>(body: &'a [u8], delimiter: &[u8]) -> Vec<&'a [u8]> {
    let mut parts = Vec::new();
    let Some(mut start) = find(body, delimiter, 0) else {
        return parts;
    };

    loop {
        let after = start + delimiter.len();
        let rest = &body[after..];
        if rest.starts_with(b"--") {
            break;
        }

        let content_start = after + line_break_len(rest);
        let Some(next) = find(body, delimiter, content_start) else {
            break;
        };
        parts.push(strip_line_break(&body[content_start..next]));
        start = next;
    }

    parts
}

/// Finds `needle` in `haystack` at or after `from`.
fn find(haystack: &[u8], needle: &[u8], from: usize) -> Option<usize> {
    haystack
        .get(from..)?
        .windows(needle.len())
        .position(|window| window == needle)
        .map(|pos| pos + from)
}

fn line_break_len(bytes: &[u8]) -> usize {
    if bytes.starts_with(b"\r\n") {
        2
    } else if bytes.starts_with(b"\n") {
        1
    } else {
        0
    }
}

/// Removes exactly one trailing CRLF (or LF).
fn strip_line_break(bytes: &[u8]) -> &[u8] {
    bytes
        .strip_suffix(b"\r\n")
        .or_else(|| bytes.strip_suffix(b"\n"))
        .unwrap_or(bytes)
}

/// Splits a part into its header block and body (double CRLF or double LF).
fn split_part(part: &[u8]) -> Option<(&[u8], &[u8])> {
    find(part, b"\r\n\r\n", 0)
        .map(|pos| (&part[..pos], &part[pos + 4..]))
        .or_else(|| find(part, b"\n\n", 0).map(|pos| (&part[..pos], &part[pos + 2..])))
}

/// The headers of one multipart part that matter for forms.
struct PartHeaders {
    name: Option<String>,
    filename: Option<String>,
    content_type: String,
}

impl PartHeaders {
    fn parse(headers: &str) -> Self {
        let mut parsed = Self {
            name: None,
            filename: None,
            content_type: "text/plain".to_string(),
        };

        for line in headers.lines().map(str::trim).filter(|l| !l.is_empty()) {
            let Some((header, value)) = line.split_once(':') else {
                continue;
            };
            let value = value.trim();

            if header.eq_ignore_ascii_case("content-disposition") {
                parsed.name = extract_header_param(value, "name");
                parsed.filename = extract_header_param(value, "filename");
            } else if header.eq_ignore_ascii_case("content-type") {
                parsed.content_type = value.to_string();
            }
        }

        parsed
    }
}

/// Extracts a parameter value from a header value string.
///
/// For example, from `form-data; name="field1"; filename="file.txt"`,
/// `extract_header_param(value, "name")` returns `Some("field1")`.
fn extract_header_param(header_value: &str, param_name: &str) -> Option<String> {
    header_value.split(';').skip(1).find_map(|param| {
        let (key, value) = param.trim().split_once('=')?;
        key.trim()
            .eq_ignore_ascii_case(param_name)
            .then(|| value.trim().trim_matches('"').to_string())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const LIMIT: usize = 2_621_440;

    #[test]
    fn test_extract_boundary() {
        let ct = "multipart/form-data; boundary=----WebKitFormBoundary";
        assert_eq!(extract_boundary(ct), Some("----WebKitFormBoundary"));

        let ct = "multipart/form-data; boundary=\"----boundary123\"";
        assert_eq!(extract_boundary(ct), Some("----boundary123"));

        assert_eq!(extract_boundary("multipart/form-data"), None);
        assert_eq!(extract_boundary("multipart/form-data; boundary="), None);
    }

    #[test]
    fn test_parse_single_file() {
        let boundary = "boundary123";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"test.txt\"\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             Hello, World!\r\n\
             --{boundary}--\r\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert!(result.fields.is_empty());
        let files = result.files.get("file").unwrap();
        assert_eq!(files.len(), 1);
        assert_eq!(files[0].name, "test.txt");
        assert_eq!(files[0].content_type, "text/plain");
        assert_eq!(files[0].content, b"Hello, World!");
        assert_eq!(files[0].size, 13);
    }

    #[test]
    fn test_parse_named_form_fields_and_files() {
        let boundary = "b";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"myform[name]\"\r\n\
             \r\n\
             John\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"myform[image]\"; filename=\"test.php\"\r\n\
             Content-Type: application/x-php\r\n\
             \r\n\
             <?php echo 1;\r\n\
             --{boundary}--\r\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert_eq!(result.fields.get("myform[name]").unwrap(), &vec!["John"]);
        let files = result.files.get("myform[image]").unwrap();
        assert_eq!(files[0].name, "test.php");
        assert_eq!(files[0].content_type, "application/x-php");
    }

    #[test]
    fn test_parse_multiple_values_same_field() {
        let boundary = "boundary123";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"color[]\"\r\n\
             \r\n\
             red\r\n\
             --{boundary}\r\n\
             Content-Disposition: form-data; name=\"color[]\"\r\n\
             \r\n\
             blue\r\n\
             --{boundary}--\r\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert_eq!(result.fields.get("color[]").unwrap(), &vec!["red", "blue"]);
    }

    #[test]
    fn test_parse_binary_file_kept_byte_for_byte() {
        let png = [137_u8, 80, 78, 71, 255, 0, 10];
        let mut body = b"--xyz\r\n\
            Content-Disposition: form-data; name=\"image\"; filename=\"a.png\"\r\n\
            Content-Type: image/png\r\n\
            \r\n"
            .to_vec();
        body.extend_from_slice(&png);
        body.extend_from_slice(b"\r\n--xyz--\r\n");

        let result = parse_multipart(&body, "xyz", LIMIT).unwrap();
        let file = &result.files.get("image").unwrap()[0];
        assert_eq!(file.content, png);
        assert_eq!(file.size, png.len());
        assert_eq!(file.content_type, "image/png");
    }

    #[test]
    fn test_parse_keeps_trailing_line_breaks_in_content() {
        let boundary = "xyz";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"notes\"; filename=\"notes.txt\"\r\n\
             \r\n\
             line\r\n\n\r\n\
             --{boundary}--\r\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert_eq!(result.files.get("notes").unwrap()[0].content, b"line\r\n\n");
    }

    #[test]
    fn test_parse_empty_body() {
        let result = parse_multipart(b"", "boundary", LIMIT).unwrap();
        assert!(result.fields.is_empty());
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_parse_empty_file_field_skipped() {
        let boundary = "boundary123";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"\"\r\n\
             Content-Type: application/octet-stream\r\n\
             \r\n\
             \r\n\
             --{boundary}--\r\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_parse_large_file_rejected() {
        let boundary = "boundary123";
        let body = format!(
            "--{boundary}\r\n\
             Content-Disposition: form-data; name=\"file\"; filename=\"large.bin\"\r\n\
             \r\n\
             0123456789\r\n\
             --{boundary}--\r\n"
        );

        let err = parse_multipart(body.as_bytes(), boundary, 5).unwrap_err();
        assert_eq!(err.status_code(), 400);
        assert!(err.to_string().contains("large.bin"));
    }

    #[test]
    fn test_parse_lf_line_endings() {
        let boundary = "boundary123";
        let body = format!(
            "--{boundary}\n\
             Content-Disposition: form-data; name=\"field\"\n\
             \n\
             value\n\
             --{boundary}--\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert_eq!(result.fields.get("field").unwrap(), &vec!["value"]);
    }

    #[test]
    fn test_parse_missing_content_disposition() {
        let boundary = "boundary123";
        let body = format!(
            "--{boundary}\r\n\
             Content-Type: text/plain\r\n\
             \r\n\
             orphan data\r\n\
             --{boundary}--\r\n"
        );

        let result = parse_multipart(body.as_bytes(), boundary, LIMIT).unwrap();
        assert!(result.fields.is_empty());
        assert!(result.files.is_empty());
    }

    #[test]
    fn test_extract_header_param() {
        let value = "form-data; filename=\"test.txt\"; name=\"field1\"";
        assert_eq!(extract_header_param(value, "name"), Some("field1".to_string()));
        assert_eq!(
            extract_header_param(value, "filename"),
            Some("test.txt".to_string())
        );
        assert_eq!(extract_header_param("form-data; name=\"x\"", "filename"), None);
    }
}
