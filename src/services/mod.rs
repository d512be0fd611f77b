//! Service layer for initiatived
//!
//! Business logic shared between the HTTP handlers and the CLI commands:
//! the lifecycle state machine, the capacity-throttling sweep, the
//! statistics aggregation engine and the urgency scoring adapter.

pub mod lifecycle;
pub mod statistics;
pub mod sweep;
pub mod urgency;

// Re-export commonly used types
pub use lifecycle::{respond, ResponsePolicy};
pub use statistics::{compute_admin_statistics, compute_statistics};
pub use sweep::{run_capacity_sweep, SweepOutcome, DEFAULT_PENDING_LIMIT};
pub use urgency::{
    parse_priority_score, score_batch, HttpScorer, ScoredInitiative, UrgencyRequest, UrgencyScorer,
    DEFAULT_SCORE,
};
