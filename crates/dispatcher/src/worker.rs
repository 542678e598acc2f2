//! Trigger queue consumer.
//!
//! Pops trigger messages off a Redis list and runs each through the
//! dispatcher. The blocking pop uses a short timeout so the loop stays
//! responsive to shutdown. By default a failed dispatch is still consumed
//! and the queue never sees the failure; `REQUEUE_ON_FAILURE` pushes
//! retryable failures back onto the list instead.

use std::time::Duration;

use redis::aio::ConnectionManager;
use sqlx::PgPool;
use tracing::Instrument;
use uuid::Uuid;

use crate::dispatch::{DispatchOutcome, Dispatcher};

/// Consumes the trigger queue and feeds the dispatcher.
pub struct QueueWorker {
    queue_key: String,
    pop_timeout_secs: u64,
    requeue_on_failure: bool,
}

impl QueueWorker {
    pub fn new(queue_key: String, pop_timeout_secs: u64, requeue_on_failure: bool) -> Self {
        Self {
            queue_key,
            pop_timeout_secs,
            requeue_on_failure,
        }
    }

    /// Consume trigger messages until the task is cancelled.
    pub async fn run(
        &self,
        redis: &mut ConnectionManager,
        pool: &PgPool,
        dispatcher: &Dispatcher,
    ) -> anyhow::Result<()> {
        tracing::info!(
            queue = %self.queue_key,
            requeue_on_failure = self.requeue_on_failure,
            "Trigger queue worker started"
        );

        loop {
            let body = match self.pop_trigger(redis).await {
                Ok(Some(body)) => body,
                // Timed out on an empty queue
                Ok(None) => continue,
                Err(err) => {
                    // Queue unreachable: wait and retry rather than exiting
                    tracing::warn!(error = %err, "Trigger queue pop failed, retrying...");
                    tokio::time::sleep(Duration::from_secs(1)).await;
                    continue;
                }
            };

            let invocation_id = Uuid::new_v4();
            let span = tracing::info_span!("dispatch", %invocation_id);
            let outcome = dispatcher.handle_trigger(pool, &body).instrument(span).await;

            if let DispatchOutcome::Failed(err) = &outcome
                && self.requeue_on_failure
                && err.is_retryable()
            {
                tracing::warn!(body, error = %err, "Requeueing trigger for redelivery");
                if let Err(err) = self.requeue(redis, &body).await {
                    tracing::error!(body, error = %err, "Failed to requeue trigger");
                }
            }
        }
    }

    /// Block-pop one message; `None` when the timeout elapsed.
    async fn pop_trigger(
        &self,
        redis: &mut ConnectionManager,
    ) -> Result<Option<String>, redis::RedisError> {
        // BLPOP replies (key, value) on arrival, nil on timeout
        let reply: Option<(String, String)> = redis::cmd("BLPOP")
            .arg(&self.queue_key)
            .arg(self.pop_timeout_secs)
            .query_async(redis)
            .await?;

        Ok(reply.map(|(_, body)| body))
    }

    /// Push a message back onto the tail of the queue.
    async fn requeue(
        &self,
        redis: &mut ConnectionManager,
        body: &str,
    ) -> Result<(), redis::RedisError> {
        let _: i64 = redis::cmd("RPUSH")
            .arg(&self.queue_key)
            .arg(body)
            .query_async(redis)
            .await?;

        Ok(())
    }
}
