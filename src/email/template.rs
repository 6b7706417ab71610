//! Email body composition
//!
//! The lead email is plain text with a bullet layout; its HTML variant is a
//! straight substitution (newline to `<br>`, bullet to `&bull;`). The quote
//! emails are HTML. Timestamps are rendered in the fixed time zones the
//! sales team reads.

use chrono::{DateTime, Utc};
use chrono_tz::America::{Boise, Denver};
use std::collections::HashMap;

use super::EmailAttachment;
use crate::forms::LeadSubmission;

pub fn lead_subject(company: &str, employees: &str) -> String {
    format!("\u{1f3e5} New Optiv Health Lead: {company} ({employees} employees)")
}

/// Plain-text lead summary. Optional fields render their "not provided"
/// placeholders rather than disappearing.
pub fn lead_email_text(lead: &LeadSubmission, submitted_at: DateTime<Utc>) -> String {
    let get = |field: Option<&String>, fallback: &str| {
        LeadSubmission::non_empty(field)
            .unwrap_or(fallback)
            .to_string()
    };
    let timestamp = submitted_at
        .with_timezone(&Denver)
        .format("%B %-d, %Y at %I:%M %p %Z");

    format!(
        "\nNew Optiv Health Lead Submission\n\n\
         Contact Information:\n\
         \u{2022} Name: {name}\n\
         \u{2022} Email: {email}\n\
         \u{2022} Phone: {phone}\n\
         \u{2022} Company: {company}\n\
         \u{2022} Role: {role}\n\n\
         Company Details:\n\
         \u{2022} Number of Employees: {employees}\n\
         \u{2022} Additional Message: {message}\n\n\
         Submitted: {timestamp}\n\n\
         Lead Source: Optiv Health Website (optiv-health.vercel.app)\n",
        name = get(lead.name.as_ref(), ""),
        email = get(lead.email.as_ref(), ""),
        phone = get(lead.phone.as_ref(), "Not provided"),
        company = get(lead.company.as_ref(), ""),
        role = get(lead.role.as_ref(), "Not specified"),
        employees = get(lead.employees.as_ref(), ""),
        message = get(lead.message.as_ref(), "None provided"),
    )
}

/// HTML variant of the lead summary: newline and bullet substitution only.
pub fn lead_email_html(text: &str) -> String {
    text.replace('\n', "<br>").replace('\u{2022}', "&bull;")
}

/// Priority label derived from the `timing` field.
pub fn priority_label(timing: &str) -> &'static str {
    match timing {
        "asap" => "HIGH - They need info ASAP",
        "1-month" => "MEDIUM - 1 month timeline",
        _ => "STANDARD",
    }
}

pub fn quote_subject(company: &str, employee_count: &str) -> String {
    format!("\u{1f3af} Quote Request: {company} ({employee_count} employees)")
}

/// Sales-facing HTML summary of a quote request. The call to action branches
/// on attachment presence: exact calculations from payroll data versus
/// estimates from the employee count.
pub fn quote_email_html(
    fields: &HashMap<String, String>,
    attachment: Option<&EmailAttachment>,
    submitted_at: DateTime<Utc>,
) -> String {
    let field = |name: &str| fields.get(name).map(String::as_str).unwrap_or("");
    let field_or = |name: &str, fallback| {
        fields
            .get(name)
            .map(String::as_str)
            .filter(|v| !v.is_empty())
            .unwrap_or(fallback)
    };

    let employee_count = field("employeeCount");
    let contact_email = field("email");
    let timing = field("timing");

    let challenges_block = fields
        .get("currentChallenges")
        .filter(|v| !v.is_empty())
        .map(|challenges| {
            format!(
                "<p><strong>Current Challenges:</strong></p>\
                 <p style=\"background: #fff; padding: 15px; border-radius: 4px; border-left: 3px solid #F5A623;\">{challenges}</p>"
            )
        })
        .unwrap_or_default();

    let payroll_line = attachment.map_or_else(
        || "\u{1f4ca} No file uploaded - Provide estimate based on employee count".to_string(),
        |a| {
            format!(
                "\u{2705} Attached ({}) - Can provide exact calculations",
                a.filename
            )
        },
    );

    let (review_action, roi_action) = if attachment.is_some() {
        (
            "Review payroll data (see attachment) for exact calculations".to_string(),
            "Calculate FICA savings and total ROI with actual payroll numbers",
        )
    } else {
        (
            format!("Use employee count ({employee_count}) for estimated calculations"),
            "Calculate FICA savings and total ROI using industry averages",
        )
    };

    let timestamp = submitted_at
        .with_timezone(&Boise)
        .format("%A, %B %-d, %Y at %-I:%M %p");

    format!(
        r#"<div style="font-family: Arial, sans-serif; max-width: 800px; margin: 0 auto; padding: 20px;">
  <h2 style="color: #1E3A5F; border-bottom: 3px solid #F5A623; padding-bottom: 10px;">
    🎯 New Self-Service Quote Request
  </h2>

  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #1E3A5F; margin-top: 0;">Company Information</h3>
    <p><strong>Company:</strong> {company}</p>
    <p><strong>Industry:</strong> {industry}</p>
    <p><strong>Employee Count:</strong> {employee_count}</p>
    <p><strong>Location:</strong> {location}</p>
  </div>

  <div style="background: #fff; padding: 20px; border-left: 4px solid #4A90A4; margin: 20px 0;">
    <h3 style="color: #1E3A5F; margin-top: 0;">Contact Details</h3>
    <p><strong>Name:</strong> {contact_name}</p>
    <p><strong>Title:</strong> {title}</p>
    <p><strong>Email:</strong> {contact_email}</p>
    <p><strong>Phone:</strong> {phone}</p>
  </div>

  <div style="background: #f8f9fa; padding: 20px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #1E3A5F; margin-top: 0;">Current Benefits</h3>
    <p><strong>Current Carrier:</strong> {carrier}</p>
    <p><strong>Monthly Premium Range:</strong> {premium}</p>
    {challenges_block}
  </div>

  <div style="background: #e8f5e8; padding: 20px; border-radius: 8px; margin: 20px 0; border-left: 4px solid #28a745;">
    <h3 style="color: #1E3A5F; margin-top: 0;">Urgency &amp; Next Steps</h3>
    <p><strong>Timeline:</strong> {timing}</p>
    <p><strong>Payroll File:</strong> {payroll_line}</p>

    <div style="background: #fff; padding: 15px; border-radius: 4px; margin-top: 15px;">
      <strong>Action Required:</strong>
      <ul style="margin: 10px 0;">
        <li>{review_action}</li>
        <li>{roi_action}</li>
        <li>Prepare custom quote with implementation timeline</li>
        <li><strong>Respond within 24 hours as promised</strong></li>
      </ul>
    </div>
  </div>

  <div style="background: #fff3cd; padding: 15px; border-radius: 4px; border-left: 4px solid #ffc107; margin: 20px 0;">
    <p style="margin: 0;"><strong>⚡ Priority Level:</strong> {priority}</p>
  </div>

  <hr style="margin: 30px 0; border: none; border-top: 2px solid #e9ecef;">

  <div style="background: #1E3A5F; color: white; padding: 20px; border-radius: 8px; text-align: center;">
    <h3 style="margin: 0 0 10px 0;">Next Steps</h3>
    <p style="margin: 0;">Process this quote request and respond to <strong>{contact_email}</strong> within 24 hours with detailed savings analysis and implementation plan.</p>
  </div>

  <p style="font-size: 12px; color: #6c757d; margin-top: 30px; text-align: center;">
    Generated from OptivHealthBenefits.com self-service quote system<br>
    Timestamp: {timestamp}
  </p>
</div>"#,
        company = field("companyName"),
        industry = field("industry"),
        location = field("companyLocation"),
        contact_name = field("contactName"),
        title = field("title"),
        phone = field_or("phone", "Not provided"),
        carrier = field_or("currentCarrier", "Not specified"),
        premium = field_or("monthlyPremium", "Not specified"),
        priority = priority_label(timing),
    )
}

pub const CONFIRMATION_SUBJECT: &str =
    "Quote Request Received - Custom Analysis Coming Within 24 Hours";

/// Customer-facing confirmation: next steps and the 24-hour commitment.
/// Never carries an attachment.
pub fn confirmation_email_html() -> String {
    r#"<div style="font-family: Arial, sans-serif; max-width: 600px; margin: 0 auto; padding: 20px;">
  <div style="text-align: center; margin-bottom: 30px;">
    <h1 style="color: #1E3A5F; margin-bottom: 10px;">Quote Request Received ✅</h1>
    <p style="color: #4A90A4; font-size: 18px; margin: 0;">We're already working on your custom analysis</p>
  </div>

  <div style="background: #f8f9fa; padding: 25px; border-radius: 8px; margin: 20px 0;">
    <h3 style="color: #1E3A5F; margin-top: 0;">What happens next:</h3>
    <ol>
      <li style="margin: 15px 0;"><strong>Within 2 hours:</strong> Confirmation that we've received your payroll data</li>
      <li style="margin: 15px 0;"><strong>Within 24 hours:</strong> Your detailed quote with exact savings amounts</li>
      <li style="margin: 15px 0;"><strong>Your choice:</strong> Schedule a call or proceed with implementation</li>
    </ol>
  </div>

  <div style="background: #e8f5e8; padding: 20px; border-radius: 8px; margin: 20px 0; text-align: center;">
    <h4 style="color: #28a745; margin: 0 0 15px 0;">Your Quote Will Include:</h4>
    <p style="margin: 5px 0;">💰 Exact FICA tax savings calculation</p>
    <p style="margin: 5px 0;">📊 Total ROI analysis for your specific payroll</p>
    <p style="margin: 5px 0;">📋 Implementation timeline and next steps</p>
    <p style="margin: 5px 0;">📞 Direct calendar link to schedule a discussion</p>
  </div>

  <div style="text-align: center; margin: 30px 0;">
    <p style="color: #6c757d;">While you wait, feel free to explore:</p>
    <div style="margin: 20px 0;">
      <a href="https://optivhealthbenefits.com/calculator/" style="display: inline-block; background: #4A90A4; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin: 0 10px 10px 0;">Savings Calculator</a>
      <a href="https://optivhealthbenefits.com/blog/" style="display: inline-block; background: #1E3A5F; color: white; padding: 12px 24px; text-decoration: none; border-radius: 6px; margin: 0 10px 10px 0;">Benefits Research</a>
    </div>
  </div>

  <hr style="margin: 30px 0; border: none; border-top: 1px solid #e9ecef;">

  <div style="text-align: center; color: #6c757d; font-size: 14px;">
    <p><strong>Questions?</strong> Simply reply to this email.</p>
    <p style="margin-top: 20px;">
      Optiv Health Benefits<br>
      Supplemental Health Plans &amp; Section 125 Solutions<br>
      <a href="https://optivhealthbenefits.com" style="color: #4A90A4;">OptivHealthBenefits.com</a>
    </p>
  </div>
</div>"#
        .to_string()
}
