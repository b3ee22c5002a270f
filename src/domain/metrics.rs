use rust_decimal::Decimal;

use crate::models::internal::{OrderOutcomeFact, TransactionFact, TransactionMetrics};

/// Aggregate a user's completed-transaction history into rating, volume and
/// completion metrics.
///
/// `seller_side` and `buyer_side` hold completed orders and bookings where
/// the user is seller respectively buyer; their review rating pools are
/// independent. `orders` holds order-kind transactions of any status on
/// either side - only those feed the completion-rate denominator, while
/// sales and purchases span both kinds.
pub fn aggregate_transactions(
    seller_side: &[TransactionFact],
    buyer_side: &[TransactionFact],
    orders: &[OrderOutcomeFact],
) -> TransactionMetrics {
    let total_sales = seller_side.len() as i64;
    let sales_volume: Decimal = seller_side.iter().map(|t| t.amount).sum();
    let seller_rating = mean_rating(seller_side);

    let total_purchases = buyer_side.len() as i64;
    let buyer_rating = mean_rating(buyer_side);

    let total_orders = orders.len() as i64;
    let cancelled_orders = orders.iter().filter(|o| o.cancelled).count() as i64;
    let completion_rate = if total_orders > 0 {
        Decimal::from((total_orders - cancelled_orders) * 100) / Decimal::from(total_orders)
    } else {
        Decimal::ZERO
    };

    TransactionMetrics {
        seller_rating,
        total_sales,
        sales_volume,
        buyer_rating,
        total_purchases,
        completion_rate,
    }
}

/// Mean of all review ratings across a set of transactions, or None if no
/// reviews exist on that side.
fn mean_rating(transactions: &[TransactionFact]) -> Option<Decimal> {
    let ratings: Vec<i32> = transactions.iter().flat_map(|t| t.ratings.iter().copied()).collect();

    if ratings.is_empty() {
        return None;
    }

    let sum: i64 = ratings.iter().map(|r| *r as i64).sum();
    Some(Decimal::from(sum) / Decimal::from(ratings.len() as i64))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::internal::TransactionKind;
    use rust_decimal_macros::dec;

    fn completed_tx(id: i64, kind: TransactionKind, amount: Decimal, ratings: Vec<i32>) -> TransactionFact {
        TransactionFact {
            id,
            kind,
            buyer_id: 100,
            seller_id: 1,
            amount,
            ratings,
        }
    }

    #[test]
    fn test_seller_metrics_across_orders_and_bookings() {
        // 2 completed orders (ratings 5 and 4) and 1 completed booking (rating 5)
        let seller_side = vec![
            completed_tx(1, TransactionKind::Order, dec!(25.00), vec![5]),
            completed_tx(2, TransactionKind::Order, dec!(40.00), vec![4]),
            completed_tx(3, TransactionKind::Booking, dec!(100.00), vec![5]),
        ];

        let metrics = aggregate_transactions(&seller_side, &[], &[]);

        assert_eq!(metrics.total_sales, 3);
        assert_eq!(metrics.sales_volume, dec!(165.00));
        assert_eq!(metrics.seller_rating.unwrap().round_dp(4), dec!(4.6667));
        assert_eq!(metrics.total_purchases, 0);
        assert!(metrics.buyer_rating.is_none());
    }

    #[test]
    fn test_rating_absent_when_no_reviews() {
        // Sales without reviews still count toward volume but produce no rating
        let seller_side = vec![
            completed_tx(1, TransactionKind::Order, dec!(10.00), vec![]),
            completed_tx(2, TransactionKind::Booking, dec!(15.50), vec![]),
        ];

        let metrics = aggregate_transactions(&seller_side, &[], &[]);

        assert_eq!(metrics.total_sales, 2);
        assert_eq!(metrics.sales_volume, dec!(25.50));
        assert!(metrics.seller_rating.is_none());
    }

    #[test]
    fn test_buyer_pool_independent_of_seller_pool() {
        let seller_side = vec![completed_tx(1, TransactionKind::Order, dec!(10.00), vec![5, 5])];
        let buyer_side = vec![completed_tx(2, TransactionKind::Order, dec!(30.00), vec![1])];

        let metrics = aggregate_transactions(&seller_side, &buyer_side, &[]);

        assert_eq!(metrics.seller_rating, Some(dec!(5)));
        assert_eq!(metrics.buyer_rating, Some(dec!(1)));
        assert_eq!(metrics.total_purchases, 1);
    }

    #[test]
    fn test_completion_rate() {
        let orders = vec![
            OrderOutcomeFact { id: 1, cancelled: false },
            OrderOutcomeFact { id: 2, cancelled: false },
            OrderOutcomeFact { id: 3, cancelled: true },
            OrderOutcomeFact { id: 4, cancelled: false },
        ];

        let metrics = aggregate_transactions(&[], &[], &orders);

        assert_eq!(metrics.completion_rate, dec!(75));
    }

    #[test]
    fn test_completion_rate_zero_without_orders() {
        let metrics = aggregate_transactions(&[], &[], &[]);
        assert_eq!(metrics.completion_rate, Decimal::ZERO);
    }

    #[test]
    fn test_mean_rating_stays_in_range() {
        for ratings in [vec![1, 1, 1], vec![5, 5, 5, 5], vec![1, 5], vec![2, 3, 4]] {
            let txs = vec![completed_tx(1, TransactionKind::Order, dec!(1), ratings)];
            let rating = aggregate_transactions(&txs, &[], &[]).seller_rating.unwrap();
            assert!(rating >= dec!(1) && rating <= dec!(5), "rating out of range: {}", rating);
        }
    }
}
