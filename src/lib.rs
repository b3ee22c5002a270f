pub mod api;
pub mod db;
pub mod domain;
pub mod models;

// Re-export commonly used types
pub use models::{
    LeaderboardEntry, RecomputeSummaryResponse, ReputationResponse, ReputationSnapshot,
    ResponseMetrics, TransactionMetrics,
};

pub use db::{get_pool, health_check, init_pool, with_retry, DatabaseError};

pub use domain::{
    aggregate_transactions, build_snapshot, calculate_reputation, compute_reliability,
    estimate_response, get_reputation, recompute_all, BatchSummary,
};
