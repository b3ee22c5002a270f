use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;

/// marketplace_user table (owned by the accounts collaborator, read-only here)
#[derive(Debug, Clone, FromRow)]
pub struct UserRow {
    pub id: i64,
    pub display_name: String,
    pub status: String,
}

/// One completed transaction with the ratings of its attached reviews.
///
/// Produced by a LEFT JOIN against transaction_review with ARRAY_AGG, so a
/// transaction without reviews carries an empty ratings array rather than
/// being dropped.
#[derive(Debug, Clone, FromRow)]
pub struct TransactionRow {
    pub id: i64,
    pub kind: String,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub amount: Decimal,
    pub status: String,
    pub ratings: Vec<i32>,
}

/// Order outcome used for the completion-rate denominator.
#[derive(Debug, Clone, FromRow)]
pub struct OrderOutcomeRow {
    pub id: i64,
    pub cancelled: bool,
}

/// thread_message table, ordered ascending by sent_at when loaded.
#[derive(Debug, Clone, FromRow)]
pub struct MessageRow {
    pub thread_id: i64,
    pub sender_id: i64,
    pub sent_at: DateTime<Utc>,
}

/// reputation_record table - the one table this service owns.
#[derive(Debug, Clone, FromRow)]
pub struct ReputationRecordRow {
    pub user_id: i64,
    pub seller_rating: Option<Decimal>,
    pub total_sales: i64,
    pub sales_volume: Decimal,
    pub buyer_rating: Option<Decimal>,
    pub total_purchases: i64,
    pub completion_rate: Decimal,
    pub avg_response_time_minutes: Option<i64>,
    pub response_rate: Decimal,
    pub reliability_score: Decimal,
    pub trusted_seller: bool,
    pub fast_responder: bool,
    pub top_rated: bool,
    pub last_calculated_at: DateTime<Utc>,
}

/// Leaderboard projection joined with the user's display name.
#[derive(Debug, Clone, FromRow)]
pub struct LeaderboardRow {
    pub user_id: i64,
    pub display_name: String,
    pub reliability_score: Decimal,
    pub seller_rating: Option<Decimal>,
    pub total_sales: i64,
    pub trusted_seller: bool,
    pub fast_responder: bool,
    pub top_rated: bool,
}
