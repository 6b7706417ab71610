//! Multipart form parsing
//!
//! The quote form carries text fields plus one optional file part. Text
//! fields are flattened through the first-value contract; the file part is
//! spooled to disk under the configured upload directory, mirroring how the
//! hosting platform's parser hands uploads to the handler as temp files.
//! The spool file is owned by the handler from then on: attachment
//! derivation deletes it regardless of whether the email send succeeds.

use futures_util::Stream;
use hyper::body::Bytes;
use multer::{Constraints, Multipart, SizeLimit};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tokio::io::AsyncWriteExt;
use uuid::Uuid;

use crate::error::IntakeError;
use crate::forms::fields::normalize_fields;
use crate::logger;

/// Hard cap on the uploaded file, matching the original pipeline.
pub const MAX_UPLOAD_BYTES: u64 = 10 * 1024 * 1024;

/// Field name of the single accepted file part.
pub const FILE_FIELD: &str = "payrollFile";

/// A file part written to disk by the parsing step.
#[derive(Debug)]
pub struct SpooledUpload {
    pub path: PathBuf,
    pub original_filename: Option<String>,
    pub content_type: Option<String>,
}

/// Result of parsing the quote form.
#[derive(Debug, Default)]
pub struct ParsedForm {
    pub fields: HashMap<String, String>,
    pub upload: Option<SpooledUpload>,
}

/// Parse a multipart body stream into text fields and an optional spooled
/// upload. Oversized or malformed content surfaces as an error; there is no
/// silent truncation.
pub async fn parse_quote_form<S, E>(
    stream: S,
    boundary: &str,
    upload_dir: &Path,
    max_body_size: u64,
) -> Result<ParsedForm, IntakeError>
where
    S: Stream<Item = Result<Bytes, E>> + Send + 'static,
    E: Into<Box<dyn std::error::Error + Send + Sync>> + 'static,
{
    let constraints = Constraints::new().size_limit(
        SizeLimit::new()
            .whole_stream(max_body_size)
            .for_field(FILE_FIELD, MAX_UPLOAD_BYTES),
    );
    let mut multipart = Multipart::with_constraints(stream, boundary, constraints);

    let mut raw_fields = Vec::new();
    let mut upload = None;

    while let Some(mut field) = multipart.next_field().await? {
        let Some(name) = field.name().map(ToString::to_string) else {
            continue;
        };

        if name == FILE_FIELD {
            if upload.is_some() {
                // Only the first file part counts; drain extras to keep the
                // stream position consistent.
                while field.chunk().await?.is_some() {}
                continue;
            }

            let original_filename = field.file_name().map(ToString::to_string);
            let content_type = field.content_type().map(ToString::to_string);
            let path = spool_path(upload_dir, original_filename.as_deref());

            if let Err(e) = spool_field(&mut field, &path).await {
                // Partial spool files must not outlive the request
                if let Err(rm) = tokio::fs::remove_file(&path).await {
                    logger::log_warning(&format!(
                        "Failed to remove partial upload {}: {rm}",
                        path.display()
                    ));
                }
                return Err(e);
            }

            upload = Some(SpooledUpload {
                path,
                original_filename,
                content_type,
            });
        } else {
            let value = field.text().await?;
            raw_fields.push((name, value));
        }
    }

    Ok(ParsedForm {
        fields: normalize_fields(raw_fields),
        upload,
    })
}

/// Unique spool location keeping the client's file extension, so downstream
/// tooling opening the attachment sees a sensible suffix.
fn spool_path(upload_dir: &Path, original_filename: Option<&str>) -> PathBuf {
    let ext = original_filename
        .and_then(|name| Path::new(name).extension())
        .and_then(|ext| ext.to_str())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    upload_dir.join(format!("{}{ext}", Uuid::new_v4()))
}

async fn spool_field(
    field: &mut multer::Field<'_>,
    path: &Path,
) -> Result<(), IntakeError> {
    let mut file = tokio::fs::File::create(path).await?;
    while let Some(chunk) = field.chunk().await? {
        file.write_all(&chunk).await?;
    }
    file.flush().await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures_util::stream;
    use std::convert::Infallible;

    const BOUNDARY: &str = "X-LEAD-RELAY-BOUNDARY";

    fn text_part(name: &str, value: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n"
        )
    }

    fn file_part(name: &str, filename: &str, content: &str) -> String {
        format!(
            "--{BOUNDARY}\r\nContent-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\nContent-Type: text/csv\r\n\r\n{content}\r\n"
        )
    }

    fn body_stream(
        body: String,
    ) -> impl Stream<Item = Result<Bytes, Infallible>> + Send + 'static {
        stream::once(async move { Ok(Bytes::from(body)) })
    }

    async fn parse(body: String, dir: &Path) -> Result<ParsedForm, IntakeError> {
        parse_quote_form(body_stream(body), BOUNDARY, dir, 12 * 1024 * 1024).await
    }

    #[tokio::test]
    async fn test_fields_only() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            text_part("companyName", "Acme"),
            text_part("timing", "asap"),
        );

        let form = parse(body, dir.path()).await.unwrap();
        assert_eq!(form.fields.get("companyName").map(String::as_str), Some("Acme"));
        assert_eq!(form.fields.get("timing").map(String::as_str), Some("asap"));
        assert!(form.upload.is_none());
    }

    #[tokio::test]
    async fn test_repeated_field_keeps_first() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            text_part("industry", "Retail"),
            text_part("industry", "Tech"),
        );

        let form = parse(body, dir.path()).await.unwrap();
        assert_eq!(form.fields.get("industry").map(String::as_str), Some("Retail"));
    }

    #[tokio::test]
    async fn test_file_is_spooled_with_extension() {
        let dir = tempfile::tempdir().unwrap();
        let body = format!(
            "{}{}--{BOUNDARY}--\r\n",
            text_part("companyName", "Acme"),
            file_part(FILE_FIELD, "payroll-2026.csv", "name,salary\nJane,50000\n"),
        );

        let form = parse(body, dir.path()).await.unwrap();
        let upload = form.upload.expect("upload missing");
        assert_eq!(upload.original_filename.as_deref(), Some("payroll-2026.csv"));
        assert_eq!(upload.content_type.as_deref(), Some("text/csv"));
        assert_eq!(upload.path.extension().and_then(|e| e.to_str()), Some("csv"));

        let content = std::fs::read_to_string(&upload.path).unwrap();
        assert_eq!(content, "name,salary\nJane,50000\n");
        std::fs::remove_file(&upload.path).unwrap();
    }

    #[tokio::test]
    async fn test_oversized_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let padding = "x".repeat(256);
        let body = format!(
            "{}--{BOUNDARY}--\r\n",
            file_part(FILE_FIELD, "big.bin", &padding),
        );

        // Shrunken whole-stream cap keeps the test body small; the 10 MB
        // per-field cap trips the same error path.
        let result = parse_quote_form(body_stream(body), BOUNDARY, dir.path(), 32).await;
        assert!(matches!(result, Err(IntakeError::Multipart(_))));

        // No spool files left behind
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_malformed_body_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let body = "this is not multipart at all".to_string();
        let result = parse(body, dir.path()).await;
        assert!(matches!(result, Err(IntakeError::Multipart(_))));
    }
}
