use redis::Client;
use redis::aio::ConnectionManager;

/// Connect to the Redis instance that carries the trigger queue.
///
/// `ConnectionManager` reconnects on its own, so a queue hiccup does not
/// require rebuilding the worker.
pub async fn connect(redis_url: &str) -> anyhow::Result<ConnectionManager> {
    let client = Client::open(redis_url)?;
    let manager = ConnectionManager::new(client).await?;

    tracing::info!("Connected to trigger queue");
    Ok(manager)
}
