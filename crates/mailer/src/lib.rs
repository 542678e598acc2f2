//! Email delivery backends.
//!
//! `Mailer` abstracts the transactional email service so the dispatch loop
//! can run against the real Resend HTTP API in production or a no-op backend
//! in tests and local development. Backend selection happens once at startup
//! via `MAILER_BACKEND`.

mod noop;
mod resend;

use async_trait::async_trait;
use thiserror::Error;

pub use noop::NoopMailer;
pub use resend::ResendMailer;

/// A single outbound email, fully rendered.
#[derive(Debug, Clone)]
pub struct EmailMessage {
    pub to: String,
    pub subject: String,
    /// Sent as HTML content verbatim.
    pub html_body: String,
}

/// Failure of a single delivery attempt.
#[derive(Debug, Error)]
pub enum MailerError {
    /// Transport-level failure: connect error, timeout, malformed response.
    #[error("email service request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The service answered with a non-success status.
    #[error("email service rejected message ({status}): {body}")]
    Rejected { status: u16, body: String },
}

/// Email delivery, one message at a time.
///
/// A failed send must not poison the caller's loop; errors carry enough
/// detail to log and move on to the next recipient.
#[async_trait]
pub trait Mailer: Send + Sync {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), MailerError>;
}
