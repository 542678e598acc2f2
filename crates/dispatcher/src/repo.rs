//! Database reads and writes for the dispatch pipeline.
//!
//! Recipient selection lives entirely in `fetch_attendees`, which currently
//! returns the whole attendee table: every attendee receives every
//! notification. An audience predicate, if one is ever introduced, goes into
//! that single query; the send loop never needs to change.

use chrono::{DateTime, Utc};
use sqlx::PgPool;

use courier_common::types::{Attendee, NotificationContent};

/// Load a notification's message body and subject line by id.
///
/// Returns `None` when no row matches; callers decide how loudly to fail.
pub async fn fetch_notification(
    pool: &PgPool,
    id: i32,
) -> Result<Option<NotificationContent>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT message, subject FROM notification WHERE id = $1
        "#,
    )
    .bind(id)
    .fetch_optional(pool)
    .await
}

/// Load the recipient set for a send. Unscoped: every attendee row.
pub async fn fetch_attendees(pool: &PgPool) -> Result<Vec<Attendee>, sqlx::Error> {
    sqlx::query_as(
        r#"
        SELECT email, first_name FROM attendee
        "#,
    )
    .fetch_all(pool)
    .await
}

/// Status string recorded after the send loop finishes.
///
/// The count is the number of attendees fetched, not the number of
/// successful deliveries.
pub fn notified_status(attendee_count: usize) -> String {
    format!("Notified {} attendees", attendee_count)
}

/// Stamp the notification row with its completion status.
///
/// Plain last-write-wins update: concurrent dispatches of the same id race
/// on this row and the later writer prevails.
pub async fn mark_notified(
    pool: &PgPool,
    id: i32,
    attendee_count: usize,
    completed_at: DateTime<Utc>,
) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        UPDATE notification SET status = $1, completed_date = $2 WHERE id = $3
        "#,
    )
    .bind(notified_status(attendee_count))
    .bind(completed_at)
    .bind(id)
    .execute(pool)
    .await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_string_embeds_count() {
        assert_eq!(notified_status(3), "Notified 3 attendees");
    }

    #[test]
    fn test_status_string_for_empty_audience() {
        assert_eq!(notified_status(0), "Notified 0 attendees");
    }
}
