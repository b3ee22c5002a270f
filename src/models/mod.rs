pub mod api;
pub mod internal;
pub mod records;
pub mod translation;

pub use api::{LeaderboardEntry, RecomputeSummaryResponse, ReputationResponse};
pub use internal::{
    MessageFact, OrderOutcomeFact, ParticipantRole, ReputationSnapshot, ResponseMetrics,
    ThreadMessages, TransactionFact, TransactionKind, TransactionMetrics,
};
pub use records::{
    LeaderboardRow, MessageRow, OrderOutcomeRow, ReputationRecordRow, TransactionRow, UserRow,
};
