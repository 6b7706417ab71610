//! Form processing module
//!
//! Everything between the raw request body and a composed email:
//! - Anti-spam heuristics (honeypot field, timestamp delta)
//! - Field extraction, normalization and validation
//! - Multipart parsing with a temp-file spool for the upload

pub mod fields;
pub mod multipart;
pub mod spam;

pub use fields::{coerce_millis, is_valid_email, LeadSubmission};
pub use multipart::{ParsedForm, SpooledUpload};
