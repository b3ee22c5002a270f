//! Conversions between raw database rows, internal facts, and wire types.

use crate::domain::batch::BatchSummary;
use crate::models::api::{FailedUser, LeaderboardEntry, RecomputeSummaryResponse, ReputationResponse};
use crate::models::internal::{MessageFact, OrderOutcomeFact, TransactionFact, TransactionKind};
use crate::models::records::{LeaderboardRow, MessageRow, OrderOutcomeRow, ReputationRecordRow, TransactionRow};

impl From<TransactionRow> for TransactionFact {
    fn from(row: TransactionRow) -> Self {
        // Anything that is not an order is a booking; the fact queries only
        // select the two known kinds.
        let kind = if row.kind == "order" {
            TransactionKind::Order
        } else {
            TransactionKind::Booking
        };

        TransactionFact {
            id: row.id,
            kind,
            buyer_id: row.buyer_id,
            seller_id: row.seller_id,
            amount: row.amount,
            ratings: row.ratings,
        }
    }
}

impl From<OrderOutcomeRow> for OrderOutcomeFact {
    fn from(row: OrderOutcomeRow) -> Self {
        OrderOutcomeFact {
            id: row.id,
            cancelled: row.cancelled,
        }
    }
}

impl From<MessageRow> for MessageFact {
    fn from(row: MessageRow) -> Self {
        MessageFact {
            sender_id: row.sender_id,
            sent_at: row.sent_at,
        }
    }
}

impl From<ReputationRecordRow> for ReputationResponse {
    fn from(row: ReputationRecordRow) -> Self {
        ReputationResponse {
            user_id: row.user_id,
            seller_rating: row.seller_rating,
            total_sales: row.total_sales,
            sales_volume: row.sales_volume,
            buyer_rating: row.buyer_rating,
            total_purchases: row.total_purchases,
            completion_rate: row.completion_rate,
            avg_response_time_minutes: row.avg_response_time_minutes,
            response_rate: row.response_rate,
            reliability_score: row.reliability_score,
            trusted_seller: row.trusted_seller,
            fast_responder: row.fast_responder,
            top_rated: row.top_rated,
            last_calculated_at: row.last_calculated_at,
        }
    }
}

impl From<LeaderboardRow> for LeaderboardEntry {
    fn from(row: LeaderboardRow) -> Self {
        LeaderboardEntry {
            user_id: row.user_id,
            display_name: row.display_name,
            reliability_score: row.reliability_score,
            seller_rating: row.seller_rating,
            total_sales: row.total_sales,
            trusted_seller: row.trusted_seller,
            fast_responder: row.fast_responder,
            top_rated: row.top_rated,
        }
    }
}

impl From<BatchSummary> for RecomputeSummaryResponse {
    fn from(summary: BatchSummary) -> Self {
        RecomputeSummaryResponse {
            processed_count: summary.processed.len(),
            processed: summary.processed,
            failed: summary
                .failed
                .into_iter()
                .map(|f| FailedUser {
                    user_id: f.user_id,
                    error: f.reason,
                })
                .collect(),
        }
    }
}
