//! Quote endpoint
//!
//! Multipart quote form with an optional payroll file. The pipeline is
//! strictly ordered: parse, derive the attachment (deleting the spool file),
//! send the sales notification, then best-effort send the confirmation to
//! the submitter. A confirmation failure never affects the response; the
//! sales send alone decides success.

use chrono::Utc;
use futures_util::TryStreamExt;
use http_body_util::{BodyStream, Full};
use hyper::body::Bytes;
use hyper::header::CONTENT_TYPE;
use hyper::{Request, Response, StatusCode};
use std::path::PathBuf;

use crate::config::AppState;
use crate::email::template::{self, CONFIRMATION_SUBJECT};
use crate::email::{EmailAttachment, Mailer, OutboundEmail, QUOTE_CC, SALES_RECIPIENT, SENDER};
use crate::error::IntakeError;
use crate::forms::multipart::parse_quote_form;
use crate::forms::ParsedForm;
use crate::http::json_response;
use crate::logger;

pub const PATH: &str = "/api/quote-upload";

pub async fn handle<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
{
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let boundary = match multer::parse_boundary(content_type) {
        Ok(boundary) => boundary,
        Err(e) => {
            logger::log_error(&format!("Quote submission error: {e}"));
            return failure_response(&IntakeError::Multipart(e));
        }
    };

    let upload_dir = PathBuf::from(&state.config.upload.dir);
    let max_body_size = state.config.http.max_body_size;
    let stream = BodyStream::new(req.into_body())
        .try_filter_map(|frame| async move { Ok(frame.into_data().ok()) });

    let form = match parse_quote_form(stream, &boundary, &upload_dir, max_body_size).await {
        Ok(form) => form,
        Err(e) => {
            logger::log_error(&format!("Quote submission error: {e}"));
            return failure_response(&e);
        }
    };

    match process(form, state.mailer.as_ref()).await {
        Ok(has_attachment) => json_response(
            StatusCode::OK,
            &serde_json::json!({
                "success": true,
                "message": "Quote request submitted successfully",
                "hasAttachment": has_attachment,
            }),
        ),
        Err(e) => {
            logger::log_error(&format!("Quote submission error: {e}"));
            failure_response(&e)
        }
    }
}

/// Run the quote pipeline against a parsed form: attachment derivation,
/// sales notification, best-effort confirmation. Returns whether an
/// attachment was present.
///
/// The spool file is consumed (and deleted) before any send happens, so a
/// delivery failure cannot leave it behind.
pub(crate) async fn process(form: ParsedForm, mailer: &dyn Mailer) -> Result<bool, IntakeError> {
    let attachment = match &form.upload {
        Some(upload) => Some(EmailAttachment::from_spooled(upload).await?),
        None => None,
    };

    let field = |name: &str| form.fields.get(name).cloned().unwrap_or_default();

    let sales = OutboundEmail {
        to: SALES_RECIPIENT.to_string(),
        cc: Some(QUOTE_CC.to_string()),
        from: SENDER.to_string(),
        subject: template::quote_subject(&field("companyName"), &field("employeeCount")),
        text: None,
        html: Some(template::quote_email_html(
            &form.fields,
            attachment.as_ref(),
            Utc::now(),
        )),
        reply_to: None,
        attachments: attachment.iter().cloned().collect(),
    };
    mailer.send(&sales).await?;

    // Sales notification went out; from here on the request is a success.
    let confirmation = OutboundEmail {
        to: field("email"),
        cc: None,
        from: SENDER.to_string(),
        subject: CONFIRMATION_SUBJECT.to_string(),
        text: None,
        html: Some(template::confirmation_email_html()),
        reply_to: None,
        attachments: Vec::new(),
    };
    if let Err(e) = mailer.send(&confirmation).await {
        logger::log_confirmation_failure(&e);
    }

    Ok(attachment.is_some())
}

fn failure_response(err: &IntakeError) -> Response<Full<Bytes>> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &serde_json::json!({
            "error": "Failed to submit quote request",
            "details": err.to_string(),
        }),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::mock::MockMailer;
    use crate::forms::SpooledUpload;
    use std::collections::HashMap;
    use std::path::Path;

    fn quote_fields() -> HashMap<String, String> {
        [
            ("companyName", "Acme"),
            ("industry", "Manufacturing"),
            ("employeeCount", "120"),
            ("companyLocation", "Boise, ID"),
            ("contactName", "Jane Doe"),
            ("title", "HR Director"),
            ("email", "jane@acme.com"),
            ("timing", "asap"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
    }

    fn spooled(dir: &Path) -> SpooledUpload {
        let path = dir.join("spool.csv");
        std::fs::write(&path, b"name,salary\n").unwrap();
        SpooledUpload {
            path,
            original_filename: Some("payroll.csv".to_string()),
            content_type: Some("text/csv".to_string()),
        }
    }

    #[tokio::test]
    async fn test_without_file_uses_estimates() {
        let mailer = MockMailer::new();
        let form = ParsedForm {
            fields: quote_fields(),
            upload: None,
        };

        let has_attachment = process(form, &mailer).await.unwrap();
        assert!(!has_attachment);

        let sent = mailer.sent_messages();
        assert_eq!(sent.len(), 2);

        // Sales notification first, then confirmation
        assert_eq!(sent[0].to, SALES_RECIPIENT);
        assert_eq!(sent[0].cc.as_deref(), Some(QUOTE_CC));
        assert!(sent[0].subject.contains("Acme (120 employees)"));
        assert!(sent[0].html.as_deref().unwrap().contains("estimated calculations"));
        assert!(sent[0].attachments.is_empty());

        assert_eq!(sent[1].to, "jane@acme.com");
        assert_eq!(sent[1].subject, CONFIRMATION_SUBJECT);
        assert!(sent[1].attachments.is_empty());
    }

    #[tokio::test]
    async fn test_with_file_attaches_and_cleans_up() {
        let dir = tempfile::tempdir().unwrap();
        let upload = spooled(dir.path());
        let spool_path = upload.path.clone();

        let mailer = MockMailer::new();
        let form = ParsedForm {
            fields: quote_fields(),
            upload: Some(upload),
        };

        let has_attachment = process(form, &mailer).await.unwrap();
        assert!(has_attachment);
        assert!(!spool_path.exists());

        let sent = mailer.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].attachments.len(), 1);
        assert_eq!(sent[0].attachments[0].filename, "payroll.csv");
        assert!(sent[0].html.as_deref().unwrap().contains("exact calculations"));
        // Attachment rides on the sales message only
        assert!(sent[1].attachments.is_empty());
    }

    #[tokio::test]
    async fn test_confirmation_failure_is_swallowed() {
        let mailer = MockMailer::failing_for("jane@acme.com");
        let form = ParsedForm {
            fields: quote_fields(),
            upload: None,
        };

        let result = process(form, &mailer).await;
        assert!(result.is_ok());

        let sent = mailer.sent_messages();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].to, SALES_RECIPIENT);
    }

    #[tokio::test]
    async fn test_primary_failure_skips_confirmation() {
        let mailer = MockMailer::failing_for(SALES_RECIPIENT);
        let form = ParsedForm {
            fields: quote_fields(),
            upload: None,
        };

        let result = process(form, &mailer).await;
        assert!(matches!(result, Err(IntakeError::Email(_))));
        assert!(mailer.sent_messages().is_empty());
    }

    #[tokio::test]
    async fn test_spool_deleted_even_when_primary_fails() {
        let dir = tempfile::tempdir().unwrap();
        let upload = spooled(dir.path());
        let spool_path = upload.path.clone();

        let mailer = MockMailer::failing_for(SALES_RECIPIENT);
        let form = ParsedForm {
            fields: quote_fields(),
            upload: Some(upload),
        };

        assert!(process(form, &mailer).await.is_err());
        assert!(!spool_path.exists());
    }

    #[tokio::test]
    async fn test_missing_fields_render_empty_not_fail() {
        let mailer = MockMailer::new();
        let form = ParsedForm::default();

        // No validation on this endpoint; only the swallowed confirmation
        // send can notice the absent submitter address.
        let has_attachment = process(form, &mailer).await.unwrap();
        assert!(!has_attachment);
        assert_eq!(mailer.sent_messages().len(), 2);
    }
}
