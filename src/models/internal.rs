use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::Serialize;

/// Transaction kind. Orders and bookings both count toward sales and
/// purchases; only orders feed the completion-rate denominator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransactionKind {
    Order,
    Booking,
}

impl TransactionKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Order => "order",
            Self::Booking => "booking",
        }
    }
}

/// Which side of a transaction the subject user is on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParticipantRole {
    Seller,
    Buyer,
    Either,
}

impl ParticipantRole {
    pub fn includes_seller(&self) -> bool {
        matches!(self, Self::Seller | Self::Either)
    }

    pub fn includes_buyer(&self) -> bool {
        matches!(self, Self::Buyer | Self::Either)
    }
}

/// Clean internal model for one completed transaction and its review ratings.
#[derive(Debug, Clone)]
pub struct TransactionFact {
    pub id: i64,
    pub kind: TransactionKind,
    pub buyer_id: i64,
    pub seller_id: i64,
    pub amount: Decimal,
    pub ratings: Vec<i32>,
}

/// Order outcome fact for completion-rate counting.
#[derive(Debug, Clone)]
pub struct OrderOutcomeFact {
    pub id: i64,
    pub cancelled: bool,
}

/// A single message within a thread.
#[derive(Debug, Clone)]
pub struct MessageFact {
    pub sender_id: i64,
    pub sent_at: DateTime<Utc>,
}

/// The bounded message prefix of one thread, ordered ascending by sent_at.
#[derive(Debug, Clone)]
pub struct ThreadMessages {
    pub thread_id: i64,
    pub messages: Vec<MessageFact>,
}

/// Aggregated transaction-side metrics for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct TransactionMetrics {
    pub seller_rating: Option<Decimal>,
    pub total_sales: i64,
    pub sales_volume: Decimal,
    pub buyer_rating: Option<Decimal>,
    pub total_purchases: i64,
    pub completion_rate: Decimal,
}

impl TransactionMetrics {
    /// Metrics for a user with no transaction history at all.
    pub fn empty() -> Self {
        Self {
            seller_rating: None,
            total_sales: 0,
            sales_volume: Decimal::ZERO,
            buyer_rating: None,
            total_purchases: 0,
            completion_rate: Decimal::ZERO,
        }
    }
}

/// Aggregated messaging-side metrics for one user.
#[derive(Debug, Clone, PartialEq)]
pub struct ResponseMetrics {
    pub avg_response_time_minutes: Option<i64>,
    pub response_rate: Decimal,
}

impl ResponseMetrics {
    pub fn empty() -> Self {
        Self {
            avg_response_time_minutes: None,
            response_rate: Decimal::ZERO,
        }
    }
}

/// The fully computed reputation for one user, ready to be persisted as a
/// whole. Badge fields are derived from the metric fields and never set
/// independently of them.
#[derive(Debug, Clone, Serialize)]
pub struct ReputationSnapshot {
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
