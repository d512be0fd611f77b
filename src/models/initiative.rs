//! Initiative entity and its two-state lifecycle

use super::Category;
use crate::error::CoreError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Sentinel contact stored when a bulk-imported record carries no
/// submitter address.
pub const ANONYMOUS_CONTACT: &str = "anonymous";

/// Lifecycle state of an initiative
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InitiativeStatus {
    /// Submitted, awaiting a response
    Pending,
    /// Terminal: a response has been recorded
    Responded,
}

/// A citizen-submitted initiative
///
/// Invariants: `status == Responded` exactly when both `response_text` and
/// `responded_at` are set, and `responded_at >= created_at` whenever both
/// timestamps are present.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Initiative {
    /// Unique identifier, assigned at creation
    pub id: Uuid,

    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,

    /// Submitter contact address
    pub submitter_contact: String,

    /// Always a member of the fixed taxonomy; free-form input is
    /// normalized before it reaches this field.
    pub category: Category,

    pub status: InitiativeStatus,
    pub created_at: DateTime<Utc>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub response_text: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub responded_at: Option<DateTime<Utc>>,

    /// Opaque reference to an uploaded asset, owned by the upload layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_ref: Option<String>,
}

impl Initiative {
    pub fn is_pending(&self) -> bool {
        self.status == InitiativeStatus::Pending
    }

    pub fn is_responded(&self) -> bool {
        self.status == InitiativeStatus::Responded
    }
}

/// Submission payload, validated and normalized at the write boundary
#[derive(Debug, Clone, Deserialize)]
pub struct NewInitiative {
    pub title: String,
    pub description: String,
    pub location: String,
    pub latitude: f64,
    pub longitude: f64,
    pub submitter_contact: String,
    /// Free-form category name; normalized to the fixed set
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub image_ref: Option<String>,
}

impl NewInitiative {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.title.trim().is_empty() {
            return Err(CoreError::validation("title must not be empty"));
        }
        if self.description.trim().is_empty() {
            return Err(CoreError::validation("description must not be empty"));
        }
        if self.location.trim().is_empty() {
            return Err(CoreError::validation("location must not be empty"));
        }
        if self.submitter_contact.trim().is_empty() {
            return Err(CoreError::validation("submitter_contact must not be empty"));
        }
        if !(-90.0..=90.0).contains(&self.latitude) {
            return Err(CoreError::validation("latitude out of range"));
        }
        if !(-180.0..=180.0).contains(&self.longitude) {
            return Err(CoreError::validation("longitude out of range"));
        }
        Ok(())
    }

    /// Build the stored record. Callers run `validate` first; the
    /// category string is normalized here so raw values never land in
    /// the store.
    pub fn into_initiative(self, now: DateTime<Utc>) -> Initiative {
        let category = self
            .category
            .as_deref()
            .map(Category::normalize)
            .unwrap_or(Category::Other);

        Initiative {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            submitter_contact: self.submitter_contact,
            category,
            status: InitiativeStatus::Pending,
            created_at: now,
            response_text: None,
            responded_at: None,
            image_ref: self.image_ref,
        }
    }
}
