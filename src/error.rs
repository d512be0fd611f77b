//! Core error taxonomy
//!
//! `NotFound`, `Validation` and `Conflict` surface to callers as explicit
//! failures. `AdapterUnavailable` is always absorbed inside the urgency
//! scoring adapter and replaced with neutral default scores.

use uuid::Uuid;

#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("initiative not found: {0}")]
    NotFound(Uuid),

    #[error("validation failed: {0}")]
    Validation(String),

    #[error("initiative {0} already has a response")]
    Conflict(Uuid),

    #[error("urgency scoring unavailable: {0}")]
    AdapterUnavailable(String),
}

impl CoreError {
    pub fn validation(msg: impl Into<String>) -> Self {
        CoreError::Validation(msg.into())
    }
}
