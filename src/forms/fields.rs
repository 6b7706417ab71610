//! Field extraction and validation
//!
//! The contact form arrives as JSON, the quote form as multipart fields.
//! Both are normalized here into plain owned values with an explicit
//! contract: first value if multiple were provided, else the single value,
//! else absent.

use serde::Deserialize;
use std::collections::HashMap;

/// Contact form submission. All fields are optional at the parsing layer;
/// the handler decides which ones are required.
#[derive(Debug, Default, Deserialize)]
pub struct LeadSubmission {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
    #[serde(default)]
    pub company: Option<String>,
    #[serde(default)]
    pub employees: Option<String>,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub message: Option<String>,
    /// Honeypot decoy field. Humans never see it; bots fill it.
    #[serde(default)]
    pub fax_number: Option<String>,
    /// Client-supplied form load time in epoch milliseconds. The front-end
    /// sends a string, but a bare number is accepted too.
    #[serde(rename = "_timestamp", default)]
    pub timestamp: Option<serde_json::Value>,
}

impl LeadSubmission {
    /// Returns a field only when it is present and non-empty.
    pub fn non_empty(field: Option<&String>) -> Option<&str> {
        field.map(String::as_str).filter(|v| !v.is_empty())
    }
}

/// Permissive `local@domain.tld` shape check: no whitespace, exactly one
/// `@`, non-empty local part, and a dot inside the domain with at least one
/// character on each side.
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

/// Coerce a JSON value (string or number) to epoch milliseconds.
///
/// String parsing mimics a leading-integer parse: an optional sign followed
/// by digits, trailing garbage ignored. Anything else is `None`.
pub fn coerce_millis(value: Option<&serde_json::Value>) -> Option<i64> {
    match value? {
        serde_json::Value::Number(n) => n.as_i64(),
        serde_json::Value::String(s) => parse_leading_int(s),
        _ => None,
    }
}

fn parse_leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let (sign, rest) = match s.strip_prefix('-') {
        Some(rest) => (-1, rest),
        None => (1, s.strip_prefix('+').unwrap_or(s)),
    };
    let digits: String = rest.chars().take_while(char::is_ascii_digit).collect();
    if digits.is_empty() {
        return None;
    }
    digits.parse::<i64>().ok().map(|v| v * sign)
}

/// Flatten repeated multipart fields into a name → value map, keeping the
/// first occurrence of each name.
pub fn normalize_fields(raw: Vec<(String, String)>) -> HashMap<String, String> {
    let mut fields = HashMap::new();
    for (name, value) in raw {
        fields.entry(name).or_insert(value);
    }
    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_emails() {
        assert!(is_valid_email("jane@acme.com"));
        assert!(is_valid_email("jane.doe+tag@mail.acme.co.uk"));
        assert!(is_valid_email("a@b.c"));
        // The pattern is deliberately permissive about dot placement
        assert!(is_valid_email("a@b..c"));
    }

    #[test]
    fn test_invalid_emails() {
        assert!(!is_valid_email("janeacme.com"));
        assert!(!is_valid_email("jane@acmecom"));
        assert!(!is_valid_email("jane@@acme.com"));
        assert!(!is_valid_email("jane doe@acme.com"));
        assert!(!is_valid_email("@acme.com"));
        assert!(!is_valid_email("jane@.com"));
        assert!(!is_valid_email("jane@acme."));
        assert!(!is_valid_email(""));
    }

    #[test]
    fn test_coerce_millis() {
        let num = serde_json::json!(1_700_000_000_000_i64);
        assert_eq!(coerce_millis(Some(&num)), Some(1_700_000_000_000));

        let text = serde_json::json!("1700000000000");
        assert_eq!(coerce_millis(Some(&text)), Some(1_700_000_000_000));

        // Leading-integer parse ignores trailing garbage
        let messy = serde_json::json!("123abc");
        assert_eq!(coerce_millis(Some(&messy)), Some(123));

        let garbage = serde_json::json!("abc");
        assert_eq!(coerce_millis(Some(&garbage)), None);
        assert_eq!(coerce_millis(Some(&serde_json::Value::Null)), None);
        assert_eq!(coerce_millis(None), None);
    }

    #[test]
    fn test_normalize_first_value_wins() {
        let raw = vec![
            ("industry".to_string(), "Retail".to_string()),
            ("industry".to_string(), "Tech".to_string()),
            ("timing".to_string(), "asap".to_string()),
        ];
        let fields = normalize_fields(raw);
        assert_eq!(fields.get("industry").map(String::as_str), Some("Retail"));
        assert_eq!(fields.get("timing").map(String::as_str), Some("asap"));
        assert!(!fields.contains_key("email"));
    }

    #[test]
    fn test_lead_submission_tolerant_parse() {
        let lead: LeadSubmission =
            serde_json::from_slice(br#"{"name":"Jane","_timestamp":"123","extra":true}"#)
                .unwrap_or_default();
        assert_eq!(lead.name.as_deref(), Some("Jane"));
        assert!(lead.email.is_none());

        // Not JSON at all: falls back to an empty form
        let empty: LeadSubmission =
            serde_json::from_slice(b"not json").unwrap_or_default();
        assert!(empty.name.is_none());
        assert!(empty.fax_number.is_none());
    }
}
