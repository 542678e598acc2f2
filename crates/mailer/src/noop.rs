//! No-op backend: logs the would-be send and reports success.

use async_trait::async_trait;

use crate::{EmailMessage, Mailer, MailerError};

/// Mailer that never talks to an email service.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopMailer;

#[async_trait]
impl Mailer for NoopMailer {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), MailerError> {
        tracing::info!(to = %email.to, subject = %email.subject, "Noop mailer: skipping send");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_send_always_succeeds() {
        let mailer = NoopMailer;
        let email = EmailMessage {
            to: "ada@example.com".to_string(),
            subject: "Ada: Launch day".to_string(),
            html_body: "<p>Doors open at 9.</p>".to_string(),
        };

        assert!(mailer.send_email(&email).await.is_ok());
    }
}
