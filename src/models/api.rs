use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Reputation record as served over HTTP.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReputationResponse {
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

/// One leaderboard entry with minimal display fields from the user record.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LeaderboardEntry {
    pub user_id: i64,
    pub display_name: String,
    pub reliability_score: Decimal,
    pub seller_rating: Option<Decimal>,
    pub total_sales: i64,
    pub trusted_seller: bool,
    pub fast_responder: bool,
    pub top_rated: bool,
}

/// A single failed user from a batch run, with the failure cause.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailedUser {
    pub user_id: i64,
    pub error: String,
}

/// Outcome of a full recompute pass. `processed_count` is the number of users
/// whose pipeline completed and persisted; failures are listed individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecomputeSummaryResponse {
    pub processed_count: usize,
    pub processed: Vec<i64>,
    pub failed: Vec<FailedUser>,
}
