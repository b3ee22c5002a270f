use rust_decimal::Decimal;

use crate::models::internal::{ResponseMetrics, ThreadMessages};

/// Estimate a user's responsiveness from the earliest exchange of each thread
/// they participate in.
///
/// A thread is "responded" when the user's first message comes at or after
/// the first message someone else sent them; its latency is the gap between
/// the two. A thread where the user spoke first, or where either side never
/// wrote, counts against the response rate but contributes no latency.
pub fn estimate_response(user_id: i64, threads: &[ThreadMessages]) -> ResponseMetrics {
    let total_threads = threads.len() as i64;
    if total_threads == 0 {
        return ResponseMetrics::empty();
    }

    let mut latency_seconds: Vec<i64> = Vec::new();

    for thread in threads {
        let first_inbound = thread.messages.iter().find(|m| m.sender_id != user_id);
        let first_outbound = thread.messages.iter().find(|m| m.sender_id == user_id);

        if let (Some(inbound), Some(outbound)) = (first_inbound, first_outbound) {
            if outbound.sent_at >= inbound.sent_at {
                latency_seconds.push((outbound.sent_at - inbound.sent_at).num_seconds());
            }
        }
    }

    let responded = latency_seconds.len() as i64;

    let avg_response_time_minutes = if responded > 0 {
        let total: i64 = latency_seconds.iter().sum();
        Some(total / responded / 60)
    } else {
        None
    };

    ResponseMetrics {
        avg_response_time_minutes,
        response_rate: Decimal::from(responded * 100) / Decimal::from(total_threads),
    }
}
