use chrono::Utc;
use sqlx::PgPool;
use tracing::info;

use crate::db::errors::Result;
use crate::db::read_ops::{
    load_order_outcomes, load_thread_ids, load_thread_messages, load_transactions, load_user,
    TransactionFilter,
};
use crate::db::write_ops::{get_or_create_reputation, upsert_reputation};
use crate::domain::calculation::build_snapshot;
use crate::domain::metrics::aggregate_transactions;
use crate::domain::response_time::estimate_response;
use crate::models::internal::{
    MessageFact, OrderOutcomeFact, ParticipantRole, ResponseMetrics, ThreadMessages,
    TransactionFact, TransactionMetrics,
};
use crate::models::records::ReputationRecordRow;

/// Finding the earliest exchange never needs more than the start of a
/// thread, so message loads are bounded to this prefix.
const THREAD_MESSAGE_PREFIX: i64 = 50;

/// Fetch a user's persisted reputation, lazily creating the zero-valued
/// default. Fails with NotFound before touching the store if the user does
/// not exist.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn get_reputation(pool: &PgPool, user_id: i64) -> Result<ReputationRecordRow> {
    load_user(pool, user_id).await?;
    get_or_create_reputation(pool, user_id).await
}

/// Run the full pipeline for one user: aggregate transaction and messaging
/// history, derive score and badges, and atomically replace the persisted
/// record. Reads are snapshot-style; recomputation is idempotent, so no
/// transaction spans the reads and the final write.
#[tracing::instrument(skip(pool), fields(user_id = user_id))]
pub async fn calculate_reputation(pool: &PgPool, user_id: i64) -> Result<ReputationRecordRow> {
    load_user(pool, user_id).await?;

    let transactions = load_transaction_metrics(pool, user_id).await?;
    let response = load_response_metrics(pool, user_id).await?;

    let snapshot = build_snapshot(user_id, transactions, response, Utc::now());

    info!(
        reliability_score = %snapshot.reliability_score,
        total_sales = snapshot.total_sales,
        total_purchases = snapshot.total_purchases,
        "Calculated reputation"
    );

    upsert_reputation(pool, &snapshot).await
}

/// Load completed-transaction facts for both sides plus order outcomes, and
/// aggregate them.
async fn load_transaction_metrics(pool: &PgPool, user_id: i64) -> Result<TransactionMetrics> {
    let seller_side: Vec<TransactionFact> =
        load_transactions(pool, &TransactionFilter::completed(user_id, ParticipantRole::Seller))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    let buyer_side: Vec<TransactionFact> =
        load_transactions(pool, &TransactionFilter::completed(user_id, ParticipantRole::Buyer))
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

    let orders: Vec<OrderOutcomeFact> = load_order_outcomes(pool, user_id)
        .await?
        .into_iter()
        .map(Into::into)
        .collect();

    Ok(aggregate_transactions(&seller_side, &buyer_side, &orders))
}

/// Load the bounded message prefix of every thread the user participates in,
/// and estimate response metrics from them.
async fn load_response_metrics(pool: &PgPool, user_id: i64) -> Result<ResponseMetrics> {
    let thread_ids = load_thread_ids(pool, user_id).await?;

    let mut threads = Vec::with_capacity(thread_ids.len());
    for thread_id in thread_ids {
        let messages: Vec<MessageFact> = load_thread_messages(pool, thread_id, THREAD_MESSAGE_PREFIX)
            .await?
            .into_iter()
            .map(Into::into)
            .collect();

        threads.push(ThreadMessages { thread_id, messages });
    }

    Ok(estimate_response(user_id, &threads))
}
