// Error taxonomy for the intake pipeline
// Spam suspicion is deliberately not an error: it resolves to a fake success
// response inside the contact handler.

use thiserror::Error;

/// Failure while delivering an outbound email.
#[derive(Debug, Error)]
pub enum EmailError {
    #[error("email API request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The provider accepted the connection but rejected the message.
    #[error("email API rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Failure while processing a form submission.
///
/// Every variant maps to the owning endpoint's 500 path; validation and
/// spam checks never produce an `IntakeError`.
#[derive(Debug, Error)]
pub enum IntakeError {
    #[error("multipart parse error: {0}")]
    Multipart(#[from] multer::Error),

    #[error("upload I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Email(#[from] EmailError),
}
