use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::application::ports::RepositoryError;

const CONNECT_ATTEMPTS: u32 = 5;
const FIRST_RETRY_DELAY: Duration = Duration::from_millis(250);
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Open the PostgreSQL pool, backing off between attempts until the
/// database accepts connections.
#[tracing::instrument(skip(url))]
pub async fn connect_pool(url: &str, max_connections: u32) -> Result<PgPool, RepositoryError> {
    let mut attempt = 1u32;
    loop {
        match PgPoolOptions::new()
            .max_connections(max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect(url)
            .await
        {
            Ok(pool) => {
                tracing::info!(attempt, max_connections, "PostgreSQL pool ready");
                return Ok(pool);
            }
            Err(e) if attempt >= CONNECT_ATTEMPTS => {
                return Err(RepositoryError::ConnectionFailed(e.to_string()));
            }
            Err(e) => {
                let delay = FIRST_RETRY_DELAY * 2u32.pow(attempt - 1);
                tracing::warn!(
                    error = %e,
                    attempt,
                    delay_ms = delay.as_millis() as u64,
                    "PostgreSQL not reachable yet"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}
