//! Contact endpoint
//!
//! JSON lead form: anti-spam checks, required-field validation, then one
//! lead email to the sales inbox. Both spam checks short-circuit to a fake
//! success response so bots cannot tell they were detected.

use chrono::Utc;
use http_body_util::{BodyExt, Full, Limited};
use hyper::body::Bytes;
use hyper::{Request, Response, StatusCode};

use crate::config::AppState;
use crate::email::{template, Mailer, OutboundEmail, SALES_RECIPIENT, SENDER};
use crate::forms::{coerce_millis, is_valid_email, spam, LeadSubmission};
use crate::http::json_response;
use crate::logger;

pub const PATH: &str = "/api/contact";

const THANK_YOU: &str = "Thank you for your interest! We'll be in touch within 24 hours.";
const GENERIC_THANKS: &str = "Thank you!";
const INTERNAL_ERROR: &str = "Internal server error. Please try again or contact us directly.";

pub async fn handle<B>(req: Request<B>, state: &AppState) -> Response<Full<Bytes>>
where
    B: hyper::body::Body<Data = Bytes> + Send + 'static,
    B::Error: Into<Box<dyn std::error::Error + Send + Sync>> + Send + 'static,
{
    let limit = usize::try_from(state.config.http.max_body_size).unwrap_or(usize::MAX);
    let body = match Limited::new(req.into_body(), limit).collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            logger::log_error(&format!("Contact form error: {e}"));
            return internal_error();
        }
    };
    process(&body, state.mailer.as_ref()).await
}

/// Run the contact pipeline against a raw JSON body.
///
/// A body that is not valid JSON is treated as an empty form, which falls
/// through to the missing-required-fields response.
pub(crate) async fn process(body: &[u8], mailer: &dyn Mailer) -> Response<Full<Bytes>> {
    let lead: LeadSubmission = serde_json::from_slice(body).unwrap_or_default();

    if spam::honeypot_tripped(lead.fax_number.as_deref()) {
        logger::log_bot_detected();
        return ok_message(GENERIC_THANKS);
    }

    let now_millis = Utc::now().timestamp_millis();
    if spam::submitted_too_fast(coerce_millis(lead.timestamp.as_ref()), now_millis) {
        logger::log_fast_submission();
        return ok_message(GENERIC_THANKS);
    }

    let (Some(_), Some(email), Some(company), Some(employees)) = (
        LeadSubmission::non_empty(lead.name.as_ref()),
        LeadSubmission::non_empty(lead.email.as_ref()),
        LeadSubmission::non_empty(lead.company.as_ref()),
        LeadSubmission::non_empty(lead.employees.as_ref()),
    ) else {
        return json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({"message": "Missing required fields"}),
        );
    };

    if !is_valid_email(email) {
        return json_response(
            StatusCode::BAD_REQUEST,
            &serde_json::json!({"message": "Invalid email address"}),
        );
    }

    let text = template::lead_email_text(&lead, Utc::now());
    let message = OutboundEmail {
        to: SALES_RECIPIENT.to_string(),
        cc: None,
        from: SENDER.to_string(),
        subject: template::lead_subject(company, employees),
        html: Some(template::lead_email_html(&text)),
        text: Some(text),
        reply_to: Some(email.to_string()),
        attachments: Vec::new(),
    };

    match mailer.send(&message).await {
        Ok(()) => ok_message(THANK_YOU),
        Err(e) => {
            logger::log_error(&format!("Contact form error: {e}"));
            internal_error()
        }
    }
}

fn ok_message(message: &str) -> Response<Full<Bytes>> {
    json_response(StatusCode::OK, &serde_json::json!({ "message": message }))
}

fn internal_error() -> Response<Full<Bytes>> {
    json_response(
        StatusCode::INTERNAL_SERVER_ERROR,
        &serde_json::json!({ "message": INTERNAL_ERROR }),
    )
}
