//! Dispatch orchestration: fetch → send loop → finalize.
//!
//! For each trigger message:
//! 1. Parse the body into a notification id
//! 2. Load the notification's message and subject
//! 3. Load the full attendee table as the recipient set
//! 4. Send one personalized email per attendee, in order
//! 5. Stamp the notification row with `"Notified {N} attendees"` and the
//!    completion timestamp

use std::sync::Arc;

use chrono::Utc;
use sqlx::PgPool;

use courier_common::error::DispatchError;
use courier_common::types::{
    Attendee, DispatchSummary, NotificationContent, SendReport, SendStatus,
};
use courier_mailer::{EmailMessage, Mailer};

use crate::repo;
use crate::trigger::parse_trigger;

/// Outcome of handling one trigger message.
///
/// `Failed` is terminal by default: the worker logs it and acknowledges the
/// message anyway, so the queue never redelivers. Retry-capable deployments
/// opt in via `REQUEUE_ON_FAILURE`.
#[derive(Debug)]
pub enum DispatchOutcome {
    Completed(DispatchSummary),
    Failed(DispatchError),
}

/// Runs one dispatch invocation per trigger message.
pub struct Dispatcher {
    mailer: Arc<dyn Mailer>,
}

impl Dispatcher {
    pub fn new(mailer: Arc<dyn Mailer>) -> Self {
        Self { mailer }
    }

    /// Handle a raw trigger message body.
    ///
    /// Every failure is caught here and folded into the outcome; nothing
    /// propagates to the caller as an `Err`.
    pub async fn handle_trigger(&self, pool: &PgPool, body: &str) -> DispatchOutcome {
        let notification_id = match parse_trigger(body) {
            Ok(id) => id,
            Err(err) => {
                tracing::error!(body, error = %err, "Discarding malformed trigger message");
                return DispatchOutcome::Failed(err);
            }
        };

        match self.dispatch(pool, notification_id).await {
            Ok(summary) => {
                tracing::info!(
                    notification_id,
                    attendees = summary.attendees,
                    delivered = summary.delivered,
                    failed = summary.failed,
                    "Dispatch completed"
                );
                DispatchOutcome::Completed(summary)
            }
            Err(err) => {
                tracing::error!(notification_id, error = %err, "Dispatch failed");
                DispatchOutcome::Failed(err)
            }
        }
    }

    /// Run the full pipeline for a parsed notification id.
    pub async fn dispatch(
        &self,
        pool: &PgPool,
        notification_id: i32,
    ) -> Result<DispatchSummary, DispatchError> {
        let content = repo::fetch_notification(pool, notification_id)
            .await?
            .ok_or(DispatchError::NotificationNotFound(notification_id))?;

        let attendees = repo::fetch_attendees(pool).await?;

        let reports = self.send_all(&content, &attendees).await;
        let delivered = reports
            .iter()
            .filter(|r| r.status == SendStatus::Delivered)
            .count();
        let failed = reports.len() - delivered;

        // Finalize regardless of individual send failures; the persisted
        // count is the audience size, not the delivery tally.
        let completed_at = Utc::now();
        repo::mark_notified(pool, notification_id, attendees.len(), completed_at).await?;

        Ok(DispatchSummary {
            notification_id,
            attendees: attendees.len(),
            delivered,
            failed,
            completed_at,
        })
    }

    /// Send one personalized email per attendee, strictly in order.
    ///
    /// A failed send is recorded and the loop moves on; one bounced address
    /// never blocks the rest of the audience.
    pub async fn send_all(
        &self,
        content: &NotificationContent,
        attendees: &[Attendee],
    ) -> Vec<SendReport> {
        let mut reports = Vec::with_capacity(attendees.len());

        for attendee in attendees {
            let email = EmailMessage {
                to: attendee.email.clone(),
                subject: format!("{}: {}", attendee.first_name, content.subject),
                html_body: content.message.clone(),
            };

            match self.mailer.send_email(&email).await {
                Ok(()) => {
                    tracing::debug!(to = %attendee.email, "Email sent");
                    reports.push(SendReport {
                        email: attendee.email.clone(),
                        status: SendStatus::Delivered,
                        error: None,
                    });
                }
                Err(err) => {
                    tracing::warn!(
                        to = %attendee.email,
                        error = %err,
                        "Email send failed; continuing with remaining attendees"
                    );
                    reports.push(SendReport {
                        email: attendee.email.clone(),
                        status: SendStatus::Failed,
                        error: Some(err.to_string()),
                    });
                }
            }
        }

        reports
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use courier_mailer::MailerError;
    use std::sync::Mutex;

    /// Records every accepted message; fails for listed recipients.
    #[derive(Default)]
    struct RecordingMailer {
        sent: Mutex<Vec<EmailMessage>>,
        fail_for: Vec<String>,
    }

    impl RecordingMailer {
        fn failing_for(addresses: &[&str]) -> Self {
            Self {
                sent: Mutex::new(Vec::new()),
                fail_for: addresses.iter().map(|a| a.to_string()).collect(),
            }
        }

        fn sent(&self) -> Vec<EmailMessage> {
            self.sent.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl Mailer for RecordingMailer {
        async fn send_email(&self, email: &EmailMessage) -> Result<(), MailerError> {
            if self.fail_for.contains(&email.to) {
                return Err(MailerError::Rejected {
                    status: 500,
                    body: "simulated outage".to_string(),
                });
            }
            self.sent.lock().unwrap().push(email.clone());
            Ok(())
        }
    }

    fn content() -> NotificationContent {
        NotificationContent {
            message: "<p>Doors open at 9.</p>".to_string(),
            subject: "Launch day".to_string(),
        }
    }

    fn attendee(email: &str, first_name: &str) -> Attendee {
        Attendee {
            email: email.to_string(),
            first_name: first_name.to_string(),
        }
    }

    #[tokio::test]
    async fn test_send_all_personalizes_subject_and_keeps_body() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = Dispatcher::new(mailer.clone());

        let attendees = vec![attendee("ada@example.com", "Ada")];
        let reports = dispatcher.send_all(&content(), &attendees).await;

        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].status, SendStatus::Delivered);

        let sent = mailer.sent();
        assert_eq!(sent[0].to, "ada@example.com");
        assert_eq!(sent[0].subject, "Ada: Launch day");
        assert_eq!(sent[0].html_body, "<p>Doors open at 9.</p>");
    }

    #[tokio::test]
    async fn test_send_all_continues_past_failures() {
        let mailer = Arc::new(RecordingMailer::failing_for(&["grace@example.com"]));
        let dispatcher = Dispatcher::new(mailer.clone());

        let attendees = vec![
            attendee("ada@example.com", "Ada"),
            attendee("grace@example.com", "Grace"),
            attendee("alan@example.com", "Alan"),
        ];
        let reports = dispatcher.send_all(&content(), &attendees).await;

        assert_eq!(reports.len(), 3);
        assert_eq!(reports[0].status, SendStatus::Delivered);
        assert_eq!(reports[1].status, SendStatus::Failed);
        assert!(reports[1].error.as_deref().unwrap().contains("simulated outage"));
        assert_eq!(reports[2].status, SendStatus::Delivered);

        // The failing recipient did not block the ones after it
        let sent = mailer.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].to, "alan@example.com");
    }

    #[tokio::test]
    async fn test_send_all_preserves_attendee_order() {
        let mailer = Arc::new(RecordingMailer::default());
        let dispatcher = Dispatcher::new(mailer.clone());

        let attendees = vec![
            attendee("a@example.com", "A"),
            attendee("b@example.com", "B"),
            attendee("c@example.com", "C"),
        ];
        dispatcher.send_all(&content(), &attendees).await;

        let sent = mailer.sent();
        let order: Vec<&str> = sent.iter().map(|e| e.to.as_str()).collect();
        assert_eq!(order, ["a@example.com", "b@example.com", "c@example.com"]);
    }

    #[tokio::test]
    async fn test_send_all_with_empty_audience() {
        let dispatcher = Dispatcher::new(Arc::new(RecordingMailer::default()));
        let reports = dispatcher.send_all(&content(), &[]).await;
        assert!(reports.is_empty());
    }
}
