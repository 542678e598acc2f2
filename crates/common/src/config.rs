use serde::Deserialize;

/// Which email backend delivers outbound messages.
///
/// `Noop` logs instead of sending; used in local development and tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MailerBackend {
    Resend,
    Noop,
}

impl std::str::FromStr for MailerBackend {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "resend" => Ok(MailerBackend::Resend),
            "noop" => Ok(MailerBackend::Noop),
            other => Err(anyhow::anyhow!(
                "MAILER_BACKEND must be 'resend' or 'noop', got '{other}'"
            )),
        }
    }
}

/// Global application configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// PostgreSQL connection string
    pub database_url: String,

    /// Redis connection string
    pub redis_url: String,

    /// Redis list the trigger messages arrive on
    pub trigger_queue_key: String,

    /// Blocking-pop timeout in seconds; bounds shutdown latency
    pub queue_pop_timeout_secs: u64,

    /// Email backend selection (default: resend)
    pub mailer_backend: MailerBackend,

    /// Resend API key; required when the resend backend is selected
    pub resend_api_key: Option<String>,

    /// Fixed sender address for every outbound email
    pub email_from: String,

    /// Per-send timeout against the email service, in seconds (default: 10)
    pub send_timeout_secs: u64,

    /// Push failed trigger messages back onto the queue for redelivery
    /// (default: false, meaning failures are logged and the message is consumed)
    pub requeue_on_failure: bool,

    /// Maximum number of PostgreSQL connections in the pool (default: 5)
    pub db_max_connections: u32,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            database_url: std::env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL environment variable is required"))?,
            redis_url: std::env::var("REDIS_URL")
                .unwrap_or_else(|_| "redis://localhost:6379".to_string()),
            trigger_queue_key: std::env::var("TRIGGER_QUEUE_KEY")
                .unwrap_or_else(|_| "courier:triggers".to_string()),
            queue_pop_timeout_secs: std::env::var("QUEUE_POP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("QUEUE_POP_TIMEOUT_SECS must be a valid u64"))?,
            mailer_backend: std::env::var("MAILER_BACKEND")
                .unwrap_or_else(|_| "resend".to_string())
                .parse()?,
            resend_api_key: std::env::var("RESEND_API_KEY").ok(),
            email_from: std::env::var("EMAIL_FROM")
                .map_err(|_| anyhow::anyhow!("EMAIL_FROM environment variable is required"))?,
            send_timeout_secs: std::env::var("SEND_TIMEOUT_SECS")
                .unwrap_or_else(|_| "10".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("SEND_TIMEOUT_SECS must be a valid u64"))?,
            requeue_on_failure: std::env::var("REQUEUE_ON_FAILURE")
                .unwrap_or_else(|_| "false".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("REQUEUE_ON_FAILURE must be 'true' or 'false'"))?,
            db_max_connections: std::env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| "5".to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("DB_MAX_CONNECTIONS must be a valid u32"))?,
        };

        if config.mailer_backend == MailerBackend::Resend && config.resend_api_key.is_none() {
            return Err(anyhow::anyhow!(
                "RESEND_API_KEY is required when MAILER_BACKEND=resend"
            ));
        }

        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backend_parses_known_values() {
        assert_eq!(
            "resend".parse::<MailerBackend>().unwrap(),
            MailerBackend::Resend
        );
        assert_eq!("noop".parse::<MailerBackend>().unwrap(), MailerBackend::Noop);
    }

    #[test]
    fn test_backend_rejects_unknown_value() {
        assert!("sendgrid".parse::<MailerBackend>().is_err());
    }
}
