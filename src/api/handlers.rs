use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;
use sqlx::PgPool;
use tracing::info;

use crate::api::error::ApiResult;
use crate::domain::{batch, leaderboard, reputation};
use crate::models::api::{LeaderboardEntry, RecomputeSummaryResponse, ReputationResponse};

#[derive(Debug, Deserialize)]
pub struct LimitParams {
    pub limit: Option<i64>,
}

/// GET /reputation/{user_id} - read the persisted record, lazily creating
/// the zero-valued default for users with no prior record.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn get_reputation_handler(
    Path(user_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<ReputationResponse>> {
    let record = reputation::get_reputation(&pool, user_id).await?;
    Ok(Json(record.into()))
}

/// POST /reputation/{user_id}/calculate - run the full pipeline for one user
/// and return the freshly persisted record.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn calculate_reputation_handler(
    Path(user_id): Path<i64>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<ReputationResponse>> {
    let record = reputation::calculate_reputation(&pool, user_id).await?;

    info!(
        reliability_score = %record.reliability_score,
        "Reputation recalculated"
    );
    Ok(Json(record.into()))
}

/// POST /reputation/recompute - recompute every eligible user, returning the
/// structured summary. Per-user failures are listed, never propagated.
#[tracing::instrument(skip(pool))]
pub async fn recompute_all_handler(State(pool): State<PgPool>) -> ApiResult<Json<RecomputeSummaryResponse>> {
    let summary = batch::recompute_all(&pool).await?;
    Ok(Json(summary.into()))
}

/// GET /reputation/leaderboard/top-rated?limit=N
#[tracing::instrument(skip(pool))]
pub async fn top_rated_handler(
    Query(params): Query<LimitParams>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let entries = leaderboard::top_rated(&pool, params.limit).await?;
    Ok(Json(entries))
}

/// GET /reputation/leaderboard/trusted-sellers?limit=N
#[tracing::instrument(skip(pool))]
pub async fn trusted_sellers_handler(
    Query(params): Query<LimitParams>,
    State(pool): State<PgPool>,
) -> ApiResult<Json<Vec<LeaderboardEntry>>> {
    let entries = leaderboard::trusted_sellers(&pool, params.limit).await?;
    Ok(Json(entries))
}
