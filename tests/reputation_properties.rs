use chrono::{DateTime, Duration, Utc};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use reputation_scorer::domain::{aggregate_transactions, build_snapshot, compute_reliability, estimate_response};
use reputation_scorer::models::internal::{
    MessageFact, OrderOutcomeFact, ResponseMetrics, ThreadMessages, TransactionFact, TransactionKind,
    TransactionMetrics,
};

const USER: i64 = 1;
const COUNTERPARTY: i64 = 2;

fn sale(id: i64, kind: TransactionKind, amount: Decimal, ratings: Vec<i32>) -> TransactionFact {
    TransactionFact {
        id,
        kind,
        buyer_id: COUNTERPARTY,
        seller_id: USER,
        amount,
        ratings,
    }
}

fn base_time() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339("2024-03-01T09:00:00Z").unwrap().with_timezone(&Utc)
}

fn thread(thread_id: i64, messages: Vec<(i64, i64)>) -> ThreadMessages {
    ThreadMessages {
        thread_id,
        messages: messages
            .into_iter()
            .map(|(sender_id, minutes)| MessageFact {
                sender_id,
                sent_at: base_time() + Duration::minutes(minutes),
            })
            .collect(),
    }
}

#[test]
fn seller_with_orders_and_bookings_end_to_end() {
    // 2 completed orders (ratings 5, 4) and 1 completed booking (rating 5)
    let seller_side = vec![
        sale(1, TransactionKind::Order, dec!(20), vec![5]),
        sale(2, TransactionKind::Order, dec!(35), vec![4]),
        sale(3, TransactionKind::Booking, dec!(80), vec![5]),
    ];
    let orders = vec![
        OrderOutcomeFact { id: 1, cancelled: false },
        OrderOutcomeFact { id: 2, cancelled: false },
    ];

    let metrics = aggregate_transactions(&seller_side, &[], &orders);

    assert_eq!(metrics.total_sales, 3);
    assert_eq!(metrics.sales_volume, dec!(135));
    assert_eq!(metrics.seller_rating.unwrap().round_dp(4), dec!(4.6667));
    assert_eq!(metrics.completion_rate, dec!(100));

    let snapshot = build_snapshot(USER, metrics, ResponseMetrics::empty(), Utc::now());
    assert!(snapshot.reliability_score >= Decimal::ZERO);
    assert!(snapshot.reliability_score <= dec!(100));
    // 3 sales is below the trusted-seller floor no matter the rating
    assert!(!snapshot.trusted_seller);
}

#[test]
fn brand_new_user_gets_the_neutral_default() {
    let metrics = aggregate_transactions(&[], &[], &[]);
    let response = estimate_response(USER, &[]);

    assert!(metrics.seller_rating.is_none());
    assert!(metrics.buyer_rating.is_none());
    assert_eq!(metrics.total_sales, 0);
    assert_eq!(metrics.completion_rate, Decimal::ZERO);
    assert!(response.avg_response_time_minutes.is_none());
    assert_eq!(response.response_rate, Decimal::ZERO);

    let snapshot = build_snapshot(USER, metrics, response, Utc::now());
    assert_eq!(snapshot.reliability_score, dec!(50));
    assert!(!snapshot.trusted_seller);
    assert!(!snapshot.fast_responder);
    assert!(!snapshot.top_rated);
}

#[test]
fn fast_responder_scenario() {
    // 10 threads, 9 answered within 25 minutes on average
    let mut threads: Vec<ThreadMessages> = (0..9)
        .map(|i| thread(i, vec![(COUNTERPARTY, 0), (USER, 25)]))
        .collect();
    threads.push(thread(9, vec![(USER, 0)]));

    let response = estimate_response(USER, &threads);
    assert_eq!(response.avg_response_time_minutes, Some(25));
    assert_eq!(response.response_rate, dec!(90));

    let snapshot = build_snapshot(USER, TransactionMetrics::empty(), response, Utc::now());
    assert!(snapshot.fast_responder);
}

#[test]
fn slow_response_penalty_applies_before_clamping() {
    let threads = vec![thread(1, vec![(COUNTERPARTY, 0), (USER, 70)])];

    let response = estimate_response(USER, &threads);
    assert_eq!(response.avg_response_time_minutes, Some(70));

    // 50 + min(100/5, 10) - 10 = 50
    let outcome = compute_reliability(&TransactionMetrics::empty(), &response);
    assert_eq!(outcome.reliability_score, dec!(50));
    assert!(!outcome.fast_responder);
}

#[test]
fn score_clamped_under_adversarial_extremes() {
    let all_fives = vec![
        sale(1, TransactionKind::Order, dec!(10), vec![5; 20]),
        sale(2, TransactionKind::Booking, dec!(10), vec![5; 20]),
    ];
    let all_ones = vec![sale(3, TransactionKind::Order, dec!(10), vec![1; 40])];
    let orders = vec![OrderOutcomeFact { id: 1, cancelled: false }];
    let cancelled_only: Vec<OrderOutcomeFact> = (0..50)
        .map(|id| OrderOutcomeFact { id, cancelled: true })
        .collect();

    let fact_sets: Vec<(Vec<TransactionFact>, Vec<TransactionFact>, Vec<OrderOutcomeFact>)> = vec![
        (all_fives.clone(), vec![], orders.clone()),
        (all_ones.clone(), all_ones.clone(), cancelled_only.clone()),
        (all_fives, all_ones, cancelled_only),
    ];

    let responses = [
        ResponseMetrics { avg_response_time_minutes: Some(i64::MAX / 2), response_rate: dec!(0) },
        ResponseMetrics { avg_response_time_minutes: Some(0), response_rate: dec!(100) },
        ResponseMetrics::empty(),
    ];

    for (seller, buyer, orders) in &fact_sets {
        let metrics = aggregate_transactions(seller, buyer, orders);

        if let Some(r) = metrics.seller_rating {
            assert!(r >= dec!(1) && r <= dec!(5));
        }

        for response in &responses {
            let outcome = compute_reliability(&metrics, response);
            assert!(
                outcome.reliability_score >= Decimal::ZERO && outcome.reliability_score <= dec!(100),
                "score out of bounds: {}",
                outcome.reliability_score
            );
        }
    }
}

#[test]
fn trusted_seller_implies_sales_floor_and_rating() {
    // Sweep sales counts and ratings; wherever the badge is set, the defining
    // conditions must hold
    for total_sales in [0_i64, 5, 9, 10, 11, 50] {
        for rating_tenths in [40_i64, 44, 45, 46, 50] {
            let rating = Decimal::new(rating_tenths, 1);
            let metrics = TransactionMetrics {
                seller_rating: Some(rating),
                total_sales,
                sales_volume: dec!(10),
                buyer_rating: None,
                total_purchases: 0,
                completion_rate: dec!(100),
            };

            let outcome = compute_reliability(&metrics, &ResponseMetrics::empty());
            if outcome.trusted_seller {
                assert!(total_sales >= 10);
                assert!(rating >= dec!(4.5));
            }
        }
    }
}

#[test]
fn identical_metrics_produce_identical_badges() {
    let metrics = TransactionMetrics {
        seller_rating: Some(dec!(4.9)),
        total_sales: 15,
        sales_volume: dec!(1234.56),
        buyer_rating: Some(dec!(4.2)),
        total_purchases: 4,
        completion_rate: dec!(96),
    };
    let response = ResponseMetrics {
        avg_response_time_minutes: Some(12),
        response_rate: dec!(88),
    };

    let a = build_snapshot(USER, metrics.clone(), response.clone(), Utc::now());
    let b = build_snapshot(COUNTERPARTY, metrics, response, Utc::now());

    assert_eq!(a.trusted_seller, b.trusted_seller);
    assert_eq!(a.fast_responder, b.fast_responder);
    assert_eq!(a.top_rated, b.top_rated);
    assert_eq!(a.reliability_score, b.reliability_score);
}
