use std::sync::Arc;
use std::time::Duration;

use courier_common::config::{AppConfig, MailerBackend};
use courier_common::db;
use courier_common::queue;
use courier_mailer::{Mailer, NoopMailer, ResendMailer};

use courier_dispatcher::dispatch::Dispatcher;
use courier_dispatcher::worker::QueueWorker;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "courier_dispatcher=info,courier_mailer=info".into()),
        )
        .json()
        .init();

    tracing::info!("EventCourier dispatcher starting...");

    // Load configuration
    let config = AppConfig::from_env()?;

    // Connect to database
    let pool = db::create_pool(&config).await?;

    // Run migrations
    sqlx::migrate!("../../migrations").run(&pool).await?;
    tracing::info!("Database migrations applied");

    // Connect to the trigger queue
    let mut redis = queue::connect(&config.redis_url).await?;

    // Select the email backend
    let mailer: Arc<dyn Mailer> = match config.mailer_backend {
        MailerBackend::Resend => {
            let api_key = config.resend_api_key.clone().ok_or_else(|| {
                anyhow::anyhow!("RESEND_API_KEY is required when MAILER_BACKEND=resend")
            })?;
            Arc::new(ResendMailer::new(
                api_key,
                config.email_from.clone(),
                Duration::from_secs(config.send_timeout_secs),
            )?)
        }
        MailerBackend::Noop => Arc::new(NoopMailer),
    };

    let dispatcher = Dispatcher::new(mailer);
    let worker = QueueWorker::new(
        config.trigger_queue_key.clone(),
        config.queue_pop_timeout_secs,
        config.requeue_on_failure,
    );

    // Run with graceful shutdown on Ctrl+C
    tokio::select! {
        result = worker.run(&mut redis, &pool, &dispatcher) => {
            if let Err(e) = result {
                tracing::error!(error = %e, "Trigger queue worker exited with error");
                return Err(e);
            }
        }
        _ = tokio::signal::ctrl_c() => {
            tracing::info!("Received shutdown signal, stopping gracefully...");
        }
    }

    tracing::info!("EventCourier dispatcher stopped.");
    Ok(())
}
