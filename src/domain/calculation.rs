use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use crate::models::internal::{ReputationSnapshot, ResponseMetrics, TransactionMetrics};

const NEUTRAL_SCORE: i64 = 50;
const SLOW_RESPONSE_MINUTES: i64 = 60;
const FAST_RESPONSE_MINUTES: i64 = 30;
const TRUSTED_SELLER_MIN_SALES: i64 = 10;

fn trusted_seller_min_rating() -> Decimal {
    Decimal::new(45, 1) // 4.5
}

fn top_rated_min_rating() -> Decimal {
    Decimal::new(48, 1) // 4.8
}

/// The derived score and badge set, always produced together from the same
/// metrics so two identical metric sets yield identical badges.
#[derive(Debug, Clone, PartialEq)]
pub struct ReliabilityOutcome {
    pub reliability_score: Decimal,
    pub trusted_seller: bool,
    pub fast_responder: bool,
    pub top_rated: bool,
}

/// Compute the reliability score from aggregated metrics.
///
/// Starts from a neutral 50 and applies:
/// - seller rating vs the 3.0 midpoint, weighted x10
/// - buyer rating vs the midpoint, weighted x5
/// - completion rate, capped at +20
/// - response rate, capped at +10
/// - a flat -10 penalty for average response times over an hour
///
/// The result is clamped to [0, 100] for every input combination.
pub fn compute_reliability_score(transactions: &TransactionMetrics, response: &ResponseMetrics) -> Decimal {
    let mut score = Decimal::from(NEUTRAL_SCORE);

    if let Some(rating) = transactions.seller_rating {
        score += (rating - Decimal::from(3)) * Decimal::from(10);
    }
    if let Some(rating) = transactions.buyer_rating {
        score += (rating - Decimal::from(3)) * Decimal::from(5);
    }

    score += (transactions.completion_rate / Decimal::from(2)).min(Decimal::from(20));
    score += (response.response_rate / Decimal::from(5)).min(Decimal::from(10));

    if let Some(minutes) = response.avg_response_time_minutes {
        if minutes > SLOW_RESPONSE_MINUTES {
            score -= Decimal::from(10);
        }
    }

    score.clamp(Decimal::ZERO, Decimal::from(100))
}

/// Evaluate badges from the metrics, independently of the score.
pub fn evaluate_badges(transactions: &TransactionMetrics, response: &ResponseMetrics) -> (bool, bool, bool) {
    let trusted_seller = transactions.total_sales >= TRUSTED_SELLER_MIN_SALES
        && transactions.seller_rating.is_some_and(|r| r >= trusted_seller_min_rating());

    let fast_responder = response
        .avg_response_time_minutes
        .is_some_and(|m| m < FAST_RESPONSE_MINUTES)
        && response.response_rate >= Decimal::from(80);

    let top_rated = transactions.seller_rating.is_some_and(|r| r >= top_rated_min_rating())
        || transactions.buyer_rating.is_some_and(|r| r >= top_rated_min_rating());

    (trusted_seller, fast_responder, top_rated)
}

/// Derive score and badges together.
pub fn compute_reliability(transactions: &TransactionMetrics, response: &ResponseMetrics) -> ReliabilityOutcome {
    let (trusted_seller, fast_responder, top_rated) = evaluate_badges(transactions, response);

    ReliabilityOutcome {
        reliability_score: compute_reliability_score(transactions, response),
        trusted_seller,
        fast_responder,
        top_rated,
    }
}

/// Assemble the full record to persist for one user.
pub fn build_snapshot(
    user_id: i64,
    transactions: TransactionMetrics,
    response: ResponseMetrics,
    calculated_at: DateTime<Utc>,
) -> ReputationSnapshot {
    let outcome = compute_reliability(&transactions, &response);

    ReputationSnapshot {
        user_id,
        seller_rating: transactions.seller_rating,
        total_sales: transactions.total_sales,
        sales_volume: transactions.sales_volume,
        buyer_rating: transactions.buyer_rating,
        total_purchases: transactions.total_purchases,
        completion_rate: transactions.completion_rate,
        avg_response_time_minutes: response.avg_response_time_minutes,
        response_rate: response.response_rate,
        reliability_score: outcome.reliability_score,
        trusted_seller: outcome.trusted_seller,
        fast_responder: outcome.fast_responder,
        top_rated: outcome.top_rated,
        last_calculated_at: calculated_at,
    }
}
