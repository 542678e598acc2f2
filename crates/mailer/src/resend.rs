//! Resend HTTP API backend.
//!
//! One `POST /emails` per message with bearer-token auth. The per-send
//! timeout is enforced by the underlying HTTP client, so a slow service
//! surfaces as an `Http` error for that recipient only.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{EmailMessage, Mailer, MailerError};

const RESEND_API_URL: &str = "https://api.resend.com/emails";

/// Mailer backed by the Resend transactional email API.
pub struct ResendMailer {
    client: reqwest::Client,
    api_key: String,
    from: String,
    api_url: String,
}

#[derive(Debug, Serialize)]
struct SendRequest<'a> {
    from: &'a str,
    to: [&'a str; 1],
    subject: &'a str,
    html: &'a str,
}

#[derive(Debug, Deserialize)]
struct SendResponse {
    id: String,
}

impl ResendMailer {
    /// Build a mailer with a fixed sender identity and per-send timeout.
    pub fn new(api_key: String, from: String, send_timeout: Duration) -> Result<Self, MailerError> {
        let client = reqwest::Client::builder().timeout(send_timeout).build()?;

        Ok(Self {
            client,
            api_key,
            from,
            api_url: RESEND_API_URL.to_string(),
        })
    }

    /// Point the mailer at a different endpoint (local Resend emulator).
    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }
}

#[async_trait]
impl Mailer for ResendMailer {
    async fn send_email(&self, email: &EmailMessage) -> Result<(), MailerError> {
        let request = SendRequest {
            from: &self.from,
            to: [email.to.as_str()],
            subject: &email.subject,
            html: &email.html_body,
        };

        let response = self
            .client
            .post(&self.api_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(MailerError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let accepted: SendResponse = response.json().await?;
        tracing::debug!(to = %email.to, message_id = %accepted.id, "Email accepted by Resend");

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_send_request_shape() {
        let request = SendRequest {
            from: "events@example.com",
            to: ["ada@example.com"],
            subject: "Ada: Launch day",
            html: "<p>Doors open at 9.</p>",
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "from": "events@example.com",
                "to": ["ada@example.com"],
                "subject": "Ada: Launch day",
                "html": "<p>Doors open at 9.</p>"
            })
        );
    }

    #[test]
    fn test_api_url_override() {
        let mailer = ResendMailer::new(
            "re_test".to_string(),
            "events@example.com".to_string(),
            Duration::from_secs(10),
        )
        .unwrap()
        .with_api_url("http://localhost:8025/emails");

        assert_eq!(mailer.api_url, "http://localhost:8025/emails");
    }
}
