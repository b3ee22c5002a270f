use sqlx::PgPool;

use crate::db::errors::Result;
use crate::db::read_ops::{load_top_rated, load_trusted_sellers};
use crate::models::api::LeaderboardEntry;

const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

fn clamp_limit(limit: Option<i64>) -> i64 {
    limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
}

/// Top-rated users ordered by reliability score descending. Tie order among
/// equal scores is unspecified.
#[tracing::instrument(skip(pool))]
pub async fn top_rated(pool: &PgPool, limit: Option<i64>) -> Result<Vec<LeaderboardEntry>> {
    let rows = load_top_rated(pool, clamp_limit(limit)).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}

/// Trusted sellers ordered by total sales descending.
#[tracing::instrument(skip(pool))]
pub async fn trusted_sellers(pool: &PgPool, limit: Option<i64>) -> Result<Vec<LeaderboardEntry>> {
    let rows = load_trusted_sellers(pool, clamp_limit(limit)).await?;
    Ok(rows.into_iter().map(Into::into).collect())
}
