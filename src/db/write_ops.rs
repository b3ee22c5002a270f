use sqlx::PgPool;
use tracing::{debug, info};

use crate::db::errors::{DatabaseError, Result};
use crate::models::internal::ReputationSnapshot;
use crate::models::records::ReputationRecordRow;

/// Return the persisted reputation record for a user, creating the
/// zero-valued default (neutral score 50, all counts zero, ratings absent,
/// badges false) if none exists. A single statement, so concurrent first
/// reads cannot race into duplicates.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn get_or_create_reputation(pool: &PgPool, user_id: i64) -> Result<ReputationRecordRow> {
    debug!("Fetching or creating reputation record for user {}", user_id);

    let row = sqlx::query_as::<_, ReputationRecordRow>(
        r#"
        INSERT INTO reputation_record (
            user_id,
            seller_rating,
            total_sales,
            sales_volume,
            buyer_rating,
            total_purchases,
            completion_rate,
            avg_response_time_minutes,
            response_rate,
            reliability_score,
            trusted_seller,
            fast_responder,
            top_rated,
            last_calculated_at
        )
        VALUES ($1, NULL, 0, 0, NULL, 0, 0, NULL, 0, 50, FALSE, FALSE, FALSE, NOW())
        ON CONFLICT (user_id)
        DO UPDATE SET user_id = EXCLUDED.user_id
        RETURNING
            user_id,
            seller_rating,
            total_sales,
            sales_volume,
            buyer_rating,
            total_purchases,
            completion_rate,
            avg_response_time_minutes,
            response_rate,
            reliability_score,
            trusted_seller,
            fast_responder,
            top_rated,
            last_calculated_at
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(row)
}

/// Replace a user's entire reputation record with a freshly computed
/// snapshot. Every field is overwritten; the prior record stays valid until
/// this statement commits.
#[tracing::instrument(skip(pool, snapshot), fields(user_id = snapshot.user_id))]
pub async fn upsert_reputation(pool: &PgPool, snapshot: &ReputationSnapshot) -> Result<ReputationRecordRow> {
    let row = sqlx::query_as::<_, ReputationRecordRow>(
        r#"
        INSERT INTO reputation_record (
            user_id,
            seller_rating,
            total_sales,
            sales_volume,
            buyer_rating,
            total_purchases,
            completion_rate,
            avg_response_time_minutes,
            response_rate,
            reliability_score,
            trusted_seller,
            fast_responder,
            top_rated,
            last_calculated_at
        )
        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
        ON CONFLICT (user_id)
        DO UPDATE SET
            seller_rating = EXCLUDED.seller_rating,
            total_sales = EXCLUDED.total_sales,
            sales_volume = EXCLUDED.sales_volume,
            buyer_rating = EXCLUDED.buyer_rating,
            total_purchases = EXCLUDED.total_purchases,
            completion_rate = EXCLUDED.completion_rate,
            avg_response_time_minutes = EXCLUDED.avg_response_time_minutes,
            response_rate = EXCLUDED.response_rate,
            reliability_score = EXCLUDED.reliability_score,
            trusted_seller = EXCLUDED.trusted_seller,
            fast_responder = EXCLUDED.fast_responder,
            top_rated = EXCLUDED.top_rated,
            last_calculated_at = EXCLUDED.last_calculated_at
        RETURNING
            user_id,
            seller_rating,
            total_sales,
            sales_volume,
            buyer_rating,
            total_purchases,
            completion_rate,
            avg_response_time_minutes,
            response_rate,
            reliability_score,
            trusted_seller,
            fast_responder,
            top_rated,
            last_calculated_at
        "#,
    )
    .bind(snapshot.user_id)
    .bind(snapshot.seller_rating)
    .bind(snapshot.total_sales)
    .bind(snapshot.sales_volume)
    .bind(snapshot.buyer_rating)
    .bind(snapshot.total_purchases)
    .bind(snapshot.completion_rate)
    .bind(snapshot.avg_response_time_minutes)
    .bind(snapshot.response_rate)
    .bind(snapshot.reliability_score)
    .bind(snapshot.trusted_seller)
    .bind(snapshot.fast_responder)
    .bind(snapshot.top_rated)
    .bind(snapshot.last_calculated_at)
    .fetch_one(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    info!(
        user_id = row.user_id,
        reliability_score = %row.reliability_score,
        "Stored reputation record"
    );
    Ok(row)
}
