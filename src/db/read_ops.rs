use sqlx::PgPool;
use tracing::debug;

use crate::db::errors::{DatabaseError, Result};
use crate::models::internal::{ParticipantRole, TransactionKind};
use crate::models::records::{LeaderboardRow, MessageRow, OrderOutcomeRow, TransactionRow, UserRow};

/// Structured predicate for transaction queries. Composed by callers and
/// bound into a single static SQL statement rather than assembled as SQL
/// fragments.
#[derive(Debug, Clone)]
pub struct TransactionFilter {
    pub user_id: i64,
    pub role: ParticipantRole,
    pub kinds: Vec<TransactionKind>,
    /// None matches any status.
    pub status: Option<String>,
}

impl TransactionFilter {
    /// Completed orders and bookings on one side of the marketplace.
    pub fn completed(user_id: i64, role: ParticipantRole) -> Self {
        Self {
            user_id,
            role,
            kinds: vec![TransactionKind::Order, TransactionKind::Booking],
            status: Some("completed".to_string()),
        }
    }
}

/// Load a user row, mapping a missing row to NotFound.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn load_user(pool: &PgPool, user_id: i64) -> Result<UserRow> {
    let user = sqlx::query_as::<_, UserRow>(
        r#"
        SELECT id, display_name, status
        FROM marketplace_user
        WHERE id = $1
        "#,
    )
    .bind(user_id)
    .fetch_one(pool)
    .await
    .map_err(|e| match e {
        sqlx::Error::RowNotFound => DatabaseError::NotFound(format!("User not found: {}", user_id)),
        _ => DatabaseError::QueryError(e),
    })?;

    Ok(user)
}

/// Load transactions matching the filter, each with the ratings of its
/// attached reviews aggregated into an array. Transactions without reviews
/// carry an empty array.
#[tracing::instrument(skip(pool, filter), fields(user_id = filter.user_id))]
pub async fn load_transactions(pool: &PgPool, filter: &TransactionFilter) -> Result<Vec<TransactionRow>> {
    let kinds: Vec<String> = filter.kinds.iter().map(|k| k.as_str().to_string()).collect();

    let rows = sqlx::query_as::<_, TransactionRow>(
        r#"
        SELECT
            t.id,
            t.kind,
            t.buyer_id,
            t.seller_id,
            t.amount,
            t.status,
            COALESCE(ARRAY_AGG(r.rating) FILTER (WHERE r.rating IS NOT NULL), ARRAY[]::int4[]) AS ratings
        FROM marketplace_transaction t
        LEFT JOIN transaction_review r ON r.transaction_id = t.id
        WHERE (($2 AND t.seller_id = $1) OR ($3 AND t.buyer_id = $1))
            AND t.kind = ANY($4)
            AND ($5::text IS NULL OR t.status = $5)
        GROUP BY t.id, t.kind, t.buyer_id, t.seller_id, t.amount, t.status
        ORDER BY t.id
        "#,
    )
    .bind(filter.user_id)
    .bind(filter.role.includes_seller())
    .bind(filter.role.includes_buyer())
    .bind(&kinds[..])
    .bind(filter.status.as_deref())
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    debug!("Loaded {} transactions for user {}", rows.len(), filter.user_id);
    Ok(rows)
}

/// Load order outcomes on either side of the user, all statuses. Only
/// order-kind transactions feed the completion-rate denominator.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn load_order_outcomes(pool: &PgPool, user_id: i64) -> Result<Vec<OrderOutcomeRow>> {
    let rows = sqlx::query_as::<_, OrderOutcomeRow>(
        r#"
        SELECT t.id, (t.status = 'cancelled') AS cancelled
        FROM marketplace_transaction t
        WHERE t.kind = 'order'
            AND (t.buyer_id = $1 OR t.seller_id = $1)
        ORDER BY t.id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}

/// Ids of every thread the user participates in.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn load_thread_ids(pool: &PgPool, user_id: i64) -> Result<Vec<i64>> {
    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT thread_id
        FROM message_thread_participant
        WHERE user_id = $1
        ORDER BY thread_id
        "#,
    )
    .bind(user_id)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(ids)
}

/// The first `limit` messages of one thread, ascending by send time. The
/// earliest exchange is all that response metrics need, so a bounded prefix
/// is sufficient.
#[tracing::instrument(skip(pool), fields(thread_id = thread_id))]
pub async fn load_thread_messages(pool: &PgPool, thread_id: i64, limit: i64) -> Result<Vec<MessageRow>> {
    let rows = sqlx::query_as::<_, MessageRow>(
        r#"
        SELECT thread_id, sender_id, sent_at
        FROM thread_message
        WHERE thread_id = $1
        ORDER BY sent_at ASC
        LIMIT $2
        "#,
    )
    .bind(thread_id)
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}

/// Ids of users whose account status makes them batch-eligible.
#[tracing::instrument(skip(pool, statuses))]
pub async fn load_eligible_user_ids(pool: &PgPool, statuses: &[&str]) -> Result<Vec<i64>> {
    let statuses: Vec<String> = statuses.iter().map(|s| s.to_string()).collect();

    let ids = sqlx::query_scalar::<_, i64>(
        r#"
        SELECT id
        FROM marketplace_user
        WHERE status = ANY($1)
        ORDER BY id
        "#,
    )
    .bind(&statuses[..])
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    debug!("Found {} eligible users", ids.len());
    Ok(ids)
}

/// Top-rated records ordered by reliability score, joined with display names.
#[tracing::instrument(skip(pool))]
pub async fn load_top_rated(pool: &PgPool, limit: i64) -> Result<Vec<LeaderboardRow>> {
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT
            r.user_id,
            u.display_name,
            r.reliability_score,
            r.seller_rating,
            r.total_sales,
            r.trusted_seller,
            r.fast_responder,
            r.top_rated
        FROM reputation_record r
        JOIN marketplace_user u ON u.id = r.user_id
        WHERE r.top_rated
        ORDER BY r.reliability_score DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}

/// Trusted sellers ordered by sales count, joined with display names.
#[tracing::instrument(skip(pool))]
pub async fn load_trusted_sellers(pool: &PgPool, limit: i64) -> Result<Vec<LeaderboardRow>> {
    let rows = sqlx::query_as::<_, LeaderboardRow>(
        r#"
        SELECT
            r.user_id,
            u.display_name,
            r.reliability_score,
            r.seller_rating,
            r.total_sales,
            r.trusted_seller,
            r.fast_responder,
            r.top_rated
        FROM reputation_record r
        JOIN marketplace_user u ON u.id = r.user_id
        WHERE r.trusted_seller
        ORDER BY r.total_sales DESC
        LIMIT $1
        "#,
    )
    .bind(limit)
    .fetch_all(pool)
    .await
    .map_err(DatabaseError::QueryError)?;

    Ok(rows)
}
