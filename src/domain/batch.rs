use futures::stream::{self, StreamExt};
use sqlx::PgPool;
use std::future::Future;
use tracing::{info, warn};

use crate::db::connection::with_retry;
use crate::db::errors::Result;
use crate::db::read_ops::load_eligible_user_ids;
use crate::domain::reputation::calculate_reputation;

/// Account statuses included in a full recompute. Suspended accounts stay
/// eligible so reputation history survives an access restriction.
pub const ELIGIBLE_STATUSES: &[&str] = &["active", "verified", "suspended"];

const DEFAULT_CONCURRENCY: usize = 8;
const STORE_WRITE_RETRIES: u8 = 3;

/// One failed user from a batch run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BatchFailure {
    pub user_id: i64,
    pub reason: String,
}

/// Structured outcome of a batch run. Failures are data, not log
/// side-effects, so isolation is observable by callers.
#[derive(Debug, Clone, Default)]
pub struct BatchSummary {
    pub processed: Vec<i64>,
    pub failed: Vec<BatchFailure>,
}

impl BatchSummary {
    pub fn processed_count(&self) -> usize {
        self.processed.len()
    }
}

/// Drive a per-user operation across a set of users with bounded
/// concurrency, isolating failures. One bad user never aborts the batch;
/// its outcome lands in `failed` with the cause.
pub async fn recompute_users<F, Fut>(user_ids: Vec<i64>, concurrency: usize, op: F) -> BatchSummary
where
    F: Fn(i64) -> Fut,
    Fut: Future<Output = Result<()>>,
{
    let outcomes: Vec<(i64, std::result::Result<(), String>)> = stream::iter(user_ids)
        .map(|user_id| {
            let fut = op(user_id);
            async move { (user_id, fut.await.map_err(|e| e.to_string())) }
        })
        .buffer_unordered(concurrency.max(1))
        .collect()
        .await;

    let mut summary = BatchSummary::default();
    for (user_id, outcome) in outcomes {
        match outcome {
            Ok(()) => summary.processed.push(user_id),
            Err(reason) => {
                warn!(user_id = user_id, reason = %reason, "Reputation recompute failed for user");
                summary.failed.push(BatchFailure { user_id, reason });
            }
        }
    }

    summary
}

/// Recompute reputation for every eligible user. Per-user pipelines touch
/// disjoint keyed state, so they run concurrently; transient store errors
/// are retried before a user is recorded as failed.
#[tracing::instrument(skip(pool))]
pub async fn recompute_all(pool: &PgPool) -> Result<BatchSummary> {
    let user_ids = load_eligible_user_ids(pool, ELIGIBLE_STATUSES).await?;
    let concurrency = batch_concurrency();

    info!(
        eligible = user_ids.len(),
        concurrency = concurrency,
        "Starting full reputation recompute"
    );

    let summary = recompute_users(user_ids, concurrency, |user_id| async move {
        with_retry(STORE_WRITE_RETRIES, || async move {
            calculate_reputation(pool, user_id).await.map(|_| ())
        })
        .await
    })
    .await;

    info!(
        processed = summary.processed_count(),
        failed = summary.failed.len(),
        "Completed full reputation recompute"
    );

    Ok(summary)
}

fn batch_concurrency() -> usize {
    std::env::var("BATCH_CONCURRENCY")
        .ok()
        .and_then(|v| v.parse::<usize>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_CONCURRENCY)
}
