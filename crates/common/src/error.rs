use thiserror::Error;

/// Failures surfaced by the dispatch pipeline.
///
/// Every variant is logged and swallowed at the worker boundary by default;
/// the trigger queue only sees a redelivery when requeue-on-failure is
/// enabled, and then only for retryable kinds.
#[derive(Debug, Error)]
pub enum DispatchError {
    /// Trigger message body is not the decimal text of a notification id.
    /// Never requeued; redelivery cannot fix the payload.
    #[error("malformed trigger payload {0:?}: not a decimal notification id")]
    MalformedTrigger(String),

    /// No notification row matches the triggered id. No email is sent and
    /// no status is written.
    #[error("notification {0} not found")]
    NotificationNotFound(i32),

    /// Database unreachable, a fetch failed, or the final status update
    /// failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),
}

impl DispatchError {
    /// Whether redelivering the trigger message could plausibly succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, DispatchError::Database(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_malformed_trigger_is_not_retryable() {
        assert!(!DispatchError::MalformedTrigger("abc".to_string()).is_retryable());
    }

    #[test]
    fn test_not_found_is_not_retryable() {
        assert!(!DispatchError::NotificationNotFound(7).is_retryable());
    }

    #[test]
    fn test_database_error_is_retryable() {
        assert!(DispatchError::Database(sqlx::Error::PoolClosed).is_retryable());
    }
}
