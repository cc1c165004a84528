//! Multipart form decoding
//!
//! The admin upload endpoints receive `multipart/form-data` bodies carrying
//! text fields plus one image file. Bodies are already collected into memory
//! by the router's size-checked read, so parsing works on a single chunk.

use hyper::body::Bytes;
use std::collections::HashMap;
use std::convert::Infallible;

/// One uploaded file part
#[derive(Debug)]
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

/// Decoded multipart form: text fields by name, plus at most one file
#[derive(Debug, Default)]
pub struct UploadForm {
    pub fields: HashMap<String, String>,
    pub file: Option<UploadedFile>,
}

impl UploadForm {
    /// Text field value by name
    pub fn field(&self, name: &str) -> Option<&str> {
        self.fields.get(name).map(String::as_str)
    }

    /// Parse a text field as a number, with a caller-facing error message
    pub fn numeric_field<T: std::str::FromStr>(&self, name: &str) -> Result<T, String> {
        let value = self
            .field(name)
            .ok_or_else(|| format!("Missing field: {name}"))?;
        value
            .trim()
            .parse()
            .map_err(|_| format!("Invalid value for field {name}: '{value}'"))
    }
}

/// Extract the multipart boundary from a Content-Type header value
pub fn parse_boundary(content_type: Option<&str>) -> Option<String> {
    content_type.and_then(|ct| multer::parse_boundary(ct).ok())
}

/// Decode a collected multipart body
pub async fn parse_form(body: Bytes, boundary: String) -> Result<UploadForm, multer::Error> {
    let stream = futures_util::stream::once(async move { Ok::<Bytes, Infallible>(body) });
    let mut multipart = multer::Multipart::new(stream, boundary);

    let mut form = UploadForm::default();
    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(ToString::to_string);
        let filename = field.file_name().map(ToString::to_string);

        if let Some(filename) = filename {
            let data = field.bytes().await?;
            form.file = Some(UploadedFile { filename, data });
        } else if let Some(name) = name {
            form.fields.insert(name, field.text().await?);
        }
    }

    Ok(form)
}

/// Strip path components and unsafe characters from an uploaded filename
pub fn sanitize_filename(raw: &str) -> String {
    let base = raw.rsplit(['/', '\\']).next().unwrap_or(raw);
    let cleaned: String = base
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '-' | '_') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.trim_matches(['.', '_']).is_empty() {
        "upload.bin".to_string()
    } else {
        cleaned
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BOUNDARY: &str = "XSTOREBOUNDARY";

    fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Bytes {
        let mut body = Vec::new();
        for (name, filename, data) in parts {
            body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
            match filename {
                Some(f) => body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{f}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                ),
                None => body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n").as_bytes(),
                ),
            }
            body.extend_from_slice(data);
            body.extend_from_slice(b"\r\n");
        }
        body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
        Bytes::from(body)
    }

    #[tokio::test]
    async fn test_parse_fields_and_file() {
        let body = multipart_body(&[
            ("name", None, b"Sneakers"),
            ("price", None, b"25000"),
            ("image", Some("shoes.png"), b"\x89PNG fake bytes"),
        ]);

        let form = parse_form(body, BOUNDARY.to_string()).await.unwrap();
        assert_eq!(form.field("name"), Some("Sneakers"));
        assert_eq!(form.numeric_field::<f64>("price").unwrap(), 25000.0);

        let file = form.file.expect("file part");
        assert_eq!(file.filename, "shoes.png");
        assert_eq!(&file.data[..], b"\x89PNG fake bytes");
    }

    #[tokio::test]
    async fn test_missing_numeric_field() {
        let body = multipart_body(&[("name", None, b"Sneakers")]);
        let form = parse_form(body, BOUNDARY.to_string()).await.unwrap();

        assert!(form.numeric_field::<u32>("stock").is_err());
        assert!(form.file.is_none());
    }

    #[test]
    fn test_parse_boundary_from_content_type() {
        let boundary = parse_boundary(Some("multipart/form-data; boundary=abc123"));
        assert_eq!(boundary.as_deref(), Some("abc123"));
        assert!(parse_boundary(Some("application/json")).is_none());
        assert!(parse_boundary(None).is_none());
    }

    #[test]
    fn test_sanitize_filename() {
        assert_eq!(sanitize_filename("shoes.png"), "shoes.png");
        assert_eq!(sanitize_filename("../../etc/passwd"), "passwd");
        assert_eq!(sanitize_filename("my photo (1).jpg"), "my_photo__1_.jpg");
        assert_eq!(sanitize_filename("..."), "upload.bin");
        assert_eq!(sanitize_filename(""), "upload.bin");
    }
}
