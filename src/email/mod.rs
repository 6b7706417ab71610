//! Email delivery module
//!
//! Message model, the `Mailer` capability trait and its implementations.
//! Handlers receive a mailer by injection; which implementation runs is
//! decided once at startup (SendGrid when an API key is configured, a
//! logging fallback otherwise). Every logical message is sent exactly once;
//! there are no retries.

pub mod sendgrid;
pub mod template;

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;
use base64::Engine;
use serde::Serialize;

use crate::error::{EmailError, IntakeError};
use crate::forms::SpooledUpload;
use crate::logger;

/// Sales inbox that receives every lead notification.
pub const SALES_RECIPIENT: &str = "bryce@gullstack.com";

/// Carbon copy on quote notifications only.
pub const QUOTE_CC: &str = "brian@optivhealthbenefits.com";

/// Verified sender address.
pub const SENDER: &str = "leads@gullstack.com";

/// A single outbound message.
#[derive(Debug, Clone, Serialize)]
pub struct OutboundEmail {
    pub to: String,
    pub cc: Option<String>,
    pub from: String,
    pub subject: String,
    pub text: Option<String>,
    pub html: Option<String>,
    pub reply_to: Option<String>,
    pub attachments: Vec<EmailAttachment>,
}

/// File attachment carried on an outbound message, content already
/// base64-encoded for transport.
#[derive(Debug, Clone, Serialize)]
pub struct EmailAttachment {
    pub content: String,
    pub filename: String,
    pub mime_type: String,
    pub disposition: String,
}

impl EmailAttachment {
    /// Derive an attachment from a spooled upload.
    ///
    /// The spool file is deleted immediately after the read attempt,
    /// success or failure; it never outlives this call.
    pub async fn from_spooled(upload: &SpooledUpload) -> Result<Self, IntakeError> {
        let read = tokio::fs::read(&upload.path).await;

        if let Err(e) = tokio::fs::remove_file(&upload.path).await {
            logger::log_warning(&format!(
                "Failed to remove spooled upload {}: {e}",
                upload.path.display()
            ));
        }

        let bytes = read?;
        let mime_type = upload
            .content_type
            .clone()
            .unwrap_or_else(|| "application/octet-stream".to_string());
        let filename = upload
            .original_filename
            .clone()
            .unwrap_or_else(|| fallback_filename(&mime_type));

        Ok(Self {
            content: BASE64_STANDARD.encode(bytes),
            filename,
            mime_type,
            disposition: "attachment".to_string(),
        })
    }
}

/// Generated name for uploads the client sent without a filename, with the
/// extension recovered from the declared MIME type where possible.
fn fallback_filename(mime_type: &str) -> String {
    let ext = mime_guess::get_mime_extensions_str(mime_type)
        .and_then(|exts| exts.first())
        .map(|ext| format!(".{ext}"))
        .unwrap_or_default();
    format!("payroll-report{ext}")
}

/// Email-delivery capability injected into the handlers.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send(&self, message: &OutboundEmail) -> Result<(), EmailError>;
}

/// Fallback mailer installed when no API key is configured: logs the
/// composed message instead of sending it.
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send(&self, message: &OutboundEmail) -> Result<(), EmailError> {
        logger::log_email_fallback(message);
        Ok(())
    }
}

#[cfg(test)]
pub mod mock {
    use super::{EmailError, Mailer, OutboundEmail};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Test mailer: records every message, optionally failing sends to
    /// chosen recipients.
    #[derive(Default)]
    pub struct MockMailer {
        pub sent: Mutex<Vec<OutboundEmail>>,
        pub fail_recipients: Vec<String>,
    }

    impl MockMailer {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn failing_for(recipient: &str) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_recipients: vec![recipient.to_string()],
            }
        }

        pub fn sent_messages(&self) -> Vec<OutboundEmail> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for MockMailer {
        async fn send(&self, message: &OutboundEmail) -> Result<(), EmailError> {
            if self.fail_recipients.contains(&message.to) {
                return Err(EmailError::Rejected {
                    status: 503,
                    body: "simulated delivery failure".to_string(),
                });
            }
            self.sent.lock().unwrap().push(message.clone());
            Ok(())
        }
    }
}
