use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Message body and subject line for one notification campaign.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct NotificationContent {
    pub message: String,
    pub subject: String,
}

/// A recipient record.
///
/// Every attendee currently receives every campaign; recipient selection
/// lives in the repository query, not on this type.
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Attendee {
    pub email: String,
    pub first_name: String,
}

/// Per-attendee delivery outcome.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SendStatus {
    Delivered,
    Failed,
}

impl std::fmt::Display for SendStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SendStatus::Delivered => write!(f, "delivered"),
            SendStatus::Failed => write!(f, "failed"),
        }
    }
}

/// Outcome of one send attempt, held in memory for the invocation summary.
/// Individual outcomes are not persisted.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SendReport {
    pub email: String,
    pub status: SendStatus,
    pub error: Option<String>,
}

/// Summary of one completed dispatch invocation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchSummary {
    pub notification_id: i32,
    /// Total attendees fetched. This count goes into the persisted status
    /// string, whether or not every send succeeded.
    pub attendees: usize,
    pub delivered: usize,
    pub failed: usize,
    pub completed_at: DateTime<Utc>,
}
