//! SendGrid v3 mail client
//!
//! Thin wrapper over the `/v3/mail/send` JSON endpoint. The provider is
//! treated as opaque: one POST per message, bearer auth, non-2xx means the
//! message was rejected.

use async_trait::async_trait;
use serde::Serialize;

use super::{Mailer, OutboundEmail};
use crate::error::EmailError;
use crate::logger;

const SEND_URL: &str = "https://api.sendgrid.com/v3/mail/send";

pub struct SendGridMailer {
    client: reqwest::Client,
    api_key: String,
}

impl SendGridMailer {
    pub fn new(api_key: String) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key,
        }
    }
}

#[async_trait]
impl Mailer for SendGridMailer {
    async fn send(&self, message: &OutboundEmail) -> Result<(), EmailError> {
        let payload = build_payload(message);

        let response = self
            .client
            .post(SEND_URL)
            .bearer_auth(&self.api_key)
            .json(&payload)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(EmailError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        logger::log_email_sent(&message.to, &message.subject);
        Ok(())
    }
}

// ============== Wire format ==============

#[derive(Debug, Serialize)]
struct MailSendRequest {
    personalizations: Vec<Personalization>,
    from: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    reply_to: Option<Address>,
    subject: String,
    content: Vec<Content>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    attachments: Vec<WireAttachment>,
}

#[derive(Debug, Serialize)]
struct Personalization {
    to: Vec<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    cc: Option<Vec<Address>>,
}

#[derive(Debug, Serialize)]
struct Address {
    email: String,
}

#[derive(Debug, Serialize)]
struct Content {
    #[serde(rename = "type")]
    content_type: String,
    value: String,
}

#[derive(Debug, Serialize)]
struct WireAttachment {
    content: String,
    filename: String,
    #[serde(rename = "type")]
    mime_type: String,
    disposition: String,
}

fn build_payload(message: &OutboundEmail) -> MailSendRequest {
    let mut content = Vec::new();
    // SendGrid requires text/plain before text/html
    if let Some(text) = &message.text {
        content.push(Content {
            content_type: "text/plain".to_string(),
            value: text.clone(),
        });
    }
    if let Some(html) = &message.html {
        content.push(Content {
            content_type: "text/html".to_string(),
            value: html.clone(),
        });
    }

    MailSendRequest {
        personalizations: vec![Personalization {
            to: vec![Address {
                email: message.to.clone(),
            }],
            cc: message.cc.as_ref().map(|cc| {
                vec![Address { email: cc.clone() }]
            }),
        }],
        from: Address {
            email: message.from.clone(),
        },
        reply_to: message.reply_to.as_ref().map(|addr| Address {
            email: addr.clone(),
        }),
        subject: message.subject.clone(),
        content,
        attachments: message
            .attachments
            .iter()
            .map(|a| WireAttachment {
                content: a.content.clone(),
                filename: a.filename.clone(),
                mime_type: a.mime_type.clone(),
                disposition: a.disposition.clone(),
            })
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::email::{EmailAttachment, QUOTE_CC, SALES_RECIPIENT, SENDER};

    #[test]
    fn test_payload_shape() {
        let message = OutboundEmail {
            to: SALES_RECIPIENT.to_string(),
            cc: Some(QUOTE_CC.to_string()),
            from: SENDER.to_string(),
            subject: "Quote Request: Acme".to_string(),
            text: None,
            html: Some("<p>summary</p>".to_string()),
            reply_to: None,
            attachments: vec![EmailAttachment {
                content: "QUJD".to_string(),
                filename: "payroll.csv".to_string(),
                mime_type: "text/csv".to_string(),
                disposition: "attachment".to_string(),
            }],
        };

        let value = serde_json::to_value(build_payload(&message)).unwrap();
        assert_eq!(
            value["personalizations"][0]["to"][0]["email"],
            SALES_RECIPIENT
        );
        assert_eq!(value["personalizations"][0]["cc"][0]["email"], QUOTE_CC);
        assert_eq!(value["from"]["email"], SENDER);
        assert_eq!(value["content"][0]["type"], "text/html");
        assert_eq!(value["attachments"][0]["filename"], "payroll.csv");
        assert_eq!(value["attachments"][0]["type"], "text/csv");
        assert_eq!(value["attachments"][0]["disposition"], "attachment");
        assert!(value.get("reply_to").is_none());
    }

    #[test]
    fn test_payload_text_before_html() {
        let message = OutboundEmail {
            to: SALES_RECIPIENT.to_string(),
            cc: None,
            from: SENDER.to_string(),
            subject: "Lead".to_string(),
            text: Some("plain".to_string()),
            html: Some("<br>".to_string()),
            reply_to: Some("jane@acme.com".to_string()),
            attachments: Vec::new(),
        };

        let value = serde_json::to_value(build_payload(&message)).unwrap();
        assert_eq!(value["content"][0]["type"], "text/plain");
        assert_eq!(value["content"][1]["type"], "text/html");
        assert_eq!(value["reply_to"]["email"], "jane@acme.com");
        assert!(value["personalizations"][0].get("cc").is_none());
        assert!(value.get("attachments").is_none());
    }
}
