// Domain layer - business logic with no HTTP concerns.

pub mod batch;
pub mod calculation;
pub mod leaderboard;
pub mod metrics;
pub mod reputation;
pub mod response_time;

pub use batch::{recompute_all, recompute_users, BatchFailure, BatchSummary};
pub use calculation::{build_snapshot, compute_reliability, compute_reliability_score, ReliabilityOutcome};
pub use metrics::aggregate_transactions;
pub use reputation::{calculate_reputation, get_reputation};
pub use response_time::estimate_response;
