use once_cell::sync::OnceCell;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;
use tracing::{info, warn};

use crate::db::errors::{DatabaseError, Result};

static DB_POOL: OnceCell<PgPool> = OnceCell::new();

/// Initialize the database connection pool.
/// Called once at application startup.
pub async fn init_pool() -> Result<()> {
    let database_url = std::env::var("DATABASE_URL").map_err(|_| {
        DatabaseError::ConnectionError("DATABASE_URL environment variable not set".to_string())
    })?;

    info!("Initializing database connection pool");

    let pool = PgPoolOptions::new()
        .max_connections(10)
        .min_connections(0)
        .acquire_timeout(Duration::from_secs(3))
        .idle_timeout(Duration::from_secs(10))
        .max_lifetime(Duration::from_secs(300))
        .test_before_acquire(true)
        .connect_lazy(&database_url)
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))?;

    sqlx::query("SELECT 1")
        .fetch_one(&pool)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to test connection: {}", e)))?;

    DB_POOL
        .set(pool)
        .map_err(|_| DatabaseError::ConnectionError("Pool already initialized".to_string()))?;

    info!("Database connection pool initialized successfully");
    Ok(())
}

/// Get a reference to the database pool
pub fn get_pool() -> Result<&'static PgPool> {
    DB_POOL.get().ok_or_else(|| {
        DatabaseError::ConnectionError("Database pool not initialized. Call init_pool() first".to_string())
    })
}

/// Create a standalone pool for tests or isolated operations
pub async fn create_pool(database_url: &str) -> Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .acquire_timeout(Duration::from_secs(3))
        .connect(database_url)
        .await
        .map_err(|e| DatabaseError::ConnectionError(format!("Failed to create pool: {}", e)))?;

    Ok(pool)
}

/// Health check for the database connection
pub async fn health_check(pool: &PgPool) -> Result<()> {
    sqlx::query("SELECT 1")
        .fetch_one(pool)
        .await
        .map_err(DatabaseError::QueryError)?;

    Ok(())
}

/// Execute an operation with retry logic for transient errors.
/// Backoff doubles per attempt, capped at one second.
pub async fn with_retry<F, Fut, T>(max_retries: u8, mut operation: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T>>,
{
    let mut attempt = 0;

    loop {
        attempt += 1;

        match operation().await {
            Ok(result) => return Ok(result),
            Err(e) if e.is_retryable() && attempt < max_retries => {
                warn!(
                    attempt = attempt,
                    max_retries = max_retries,
                    error = %e,
                    "Retryable error occurred, retrying..."
                );

                let delay_ms = (50 * 2_u64.pow(attempt as u32 - 1)).min(1000);
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
            Err(e) if attempt >= max_retries && e.is_retryable() => {
                return Err(DatabaseError::RetryLimitExceeded { attempts: max_retries });
            }
            Err(e) => return Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_retry_recovers_from_transient_error() {
        let mut call_count = 0;

        let result = with_retry(3, || {
            call_count += 1;
            async move {
                if call_count < 3 {
                    Err(DatabaseError::ConnectionError("test error".to_string()))
                } else {
                    Ok(42)
                }
            }
        })
        .await;

        assert!(result.is_ok());
        assert_eq!(result.unwrap(), 42);
    }

    #[tokio::test]
    async fn test_retry_limit_exceeded() {
        let result: Result<i32> = with_retry(2, || async {
            Err(DatabaseError::ConnectionError("test error".to_string()))
        })
        .await;

        assert!(matches!(
            result.unwrap_err(),
            DatabaseError::RetryLimitExceeded { attempts: 2 }
        ));
    }

    #[tokio::test]
    async fn test_non_retryable_error_fails_immediately() {
        let mut call_count = 0;

        let result: Result<i32> = with_retry(5, || {
            call_count += 1;
            async move { Err(DatabaseError::NotFound("user 7".to_string())) }
        })
        .await;

        assert!(matches!(result.unwrap_err(), DatabaseError::NotFound(_)));
        assert_eq!(call_count, 1);
    }
}
