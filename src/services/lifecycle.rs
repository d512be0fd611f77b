//! Lifecycle manager
//!
//! The state machine has two states (`Pending`, `Responded`) and a single
//! forward transition. `Responded` is terminal; there is no way back to
//! `Pending`.

use crate::error::CoreError;
use crate::models::{Initiative, InitiativeStatus};
use crate::store::JsonStore;
use chrono::Utc;
use uuid::Uuid;

/// Behavior of `respond` on an already-responded initiative.
///
/// `Reject` is the default: the first response wins and a second attempt
/// fails with `Conflict`. `Overwrite` replaces the previous response and
/// its timestamp.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponsePolicy {
    #[default]
    Reject,
    Overwrite,
}

/// Record a response on a pending initiative.
///
/// Marks the store dirty; the caller decides when to persist.
pub fn respond(
    store: &mut JsonStore,
    id: Uuid,
    text: &str,
    policy: ResponsePolicy,
) -> Result<Initiative, CoreError> {
    if text.trim().is_empty() {
        return Err(CoreError::validation("response text must not be empty"));
    }

    let current = store.get(id).ok_or(CoreError::NotFound(id))?;
    if current.is_responded() && policy == ResponsePolicy::Reject {
        return Err(CoreError::Conflict(id));
    }

    store.update(id, |item| {
        item.response_text = Some(text.to_string());
        item.responded_at = Some(Utc::now());
        item.status = InitiativeStatus::Responded;
    })
}
