//! Bulk JSON import
//!
//! One-off seeding from exported datasets. Records are normalized at this
//! boundary: unknown categories become `other`, a missing contact gets the
//! anonymous sentinel, and the response fields are made consistent with
//! the lifecycle invariant before anything is stored.

use crate::models::{
    Category, Initiative, InitiativeStatus, InitiativedConfig, ANONYMOUS_CONTACT,
};
use crate::store::JsonStore;
use crate::{Context, Result};
use chrono::{DateTime, Utc};
use colored::Colorize;
use dialoguer::Confirm;
use indicatif::{ProgressBar, ProgressStyle};
use serde::Deserialize;
use std::path::Path;
use uuid::Uuid;

const DEFAULT_IMPORT_RESPONSE: &str =
    "Thank you for your initiative. It has been reviewed and addressed.";

#[derive(Debug, Deserialize)]
struct ImportRecord {
    title: String,
    description: String,
    location: String,
    latitude: f64,
    longitude: f64,
    #[serde(default)]
    email: Option<String>,
    #[serde(default)]
    category: Option<String>,
    #[serde(default)]
    created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    response: Option<String>,
    #[serde(default)]
    responded_at: Option<DateTime<Utc>>,
    #[serde(default)]
    image_path: Option<String>,
}

impl ImportRecord {
    fn into_initiative(self, now: DateTime<Utc>) -> Initiative {
        let created_at = self.created_at.unwrap_or(now);

        // Response fields drive the status; a record claiming to be
        // responded without a timestamp stays pending.
        let (status, response_text, responded_at) = match self.responded_at {
            Some(responded_at) => (
                InitiativeStatus::Responded,
                Some(
                    self.response
                        .unwrap_or_else(|| DEFAULT_IMPORT_RESPONSE.to_string()),
                ),
                Some(responded_at.max(created_at)),
            ),
            None => (InitiativeStatus::Pending, None, None),
        };

        Initiative {
            id: Uuid::new_v4(),
            title: self.title,
            description: self.description,
            location: self.location,
            latitude: self.latitude,
            longitude: self.longitude,
            submitter_contact: self
                .email
                .filter(|e| !e.trim().is_empty())
                .unwrap_or_else(|| ANONYMOUS_CONTACT.to_string()),
            category: self
                .category
                .as_deref()
                .map(Category::normalize)
                .unwrap_or(Category::Other),
            status,
            created_at,
            response_text,
            responded_at,
            image_ref: self.image_path,
        }
    }
}

pub fn run(config_path: &Path, pattern: &str, clear: bool, yes: bool) -> Result<()> {
    let config = InitiativedConfig::load(config_path)?;
    let mut store = JsonStore::load(&config.data_file)?;

    let files: Vec<_> = glob::glob(pattern)
        .context("Invalid glob pattern")?
        .filter_map(|entry| entry.ok())
        .collect();

    if files.is_empty() {
        println!("{}", format!("No files match '{}'", pattern).red());
        return Ok(());
    }

    println!("📁 Found {} file(s) to import", files.len());

    if clear && !store.is_empty() {
        let confirmed = yes
            || Confirm::new()
                .with_prompt(format!("Delete all {} existing initiatives?", store.len()))
                .default(false)
                .interact()?;
        if !confirmed {
            println!("{}", "Aborted".yellow());
            return Ok(());
        }
        store.clear();
    }

    let now = Utc::now();
    let mut imported = 0usize;
    let mut skipped = 0usize;

    for file in &files {
        let content = std::fs::read_to_string(file)
            .with_context(|| format!("Failed to read {}", file.display()))?;
        let records: Vec<serde_json::Value> = serde_json::from_str(&content)
            .with_context(|| format!("{} is not a JSON array", file.display()))?;

        let bar = ProgressBar::new(records.len() as u64);
        bar.set_style(
            ProgressStyle::with_template("{msg} [{bar:30}] {pos}/{len}")
                .expect("valid progress template"),
        );
        bar.set_message(file.display().to_string());

        for value in records {
            match serde_json::from_value::<ImportRecord>(value) {
                Ok(record) => {
                    store.insert(record.into_initiative(now));
                    imported += 1;
                }
                Err(_) => skipped += 1,
            }
            bar.inc(1);
        }
        bar.finish();
    }

    store.save_if_dirty()?;

    println!(
        "{}",
        format!("✅ Imported {} initiatives ({} skipped)", imported, skipped).green()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_without_email_gets_sentinel_contact() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"title":"t","description":"d","location":"Center","latitude":46.0,"longitude":14.5}"#,
        )
        .unwrap();
        let item = record.into_initiative(Utc::now());
        assert_eq!(item.submitter_contact, ANONYMOUS_CONTACT);
        assert_eq!(item.category, Category::Other);
        assert_eq!(item.status, InitiativeStatus::Pending);
    }

    #[test]
    fn test_responded_record_gets_default_text_and_clamped_timestamp() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"title":"t","description":"d","location":"Center","latitude":46.0,"longitude":14.5,
                "created_at":"2025-06-10T12:00:00Z","responded_at":"2025-06-01T12:00:00Z"}"#,
        )
        .unwrap();
        let item = record.into_initiative(Utc::now());
        assert_eq!(item.status, InitiativeStatus::Responded);
        assert!(item.response_text.is_some());
        assert!(item.responded_at.unwrap() >= item.created_at);
    }

    #[test]
    fn test_response_text_without_timestamp_stays_pending() {
        let record: ImportRecord = serde_json::from_str(
            r#"{"title":"t","description":"d","location":"Center","latitude":46.0,"longitude":14.5,
                "response":"orphaned text"}"#,
        )
        .unwrap();
        let item = record.into_initiative(Utc::now());
        assert_eq!(item.status, InitiativeStatus::Pending);
        assert!(item.response_text.is_none());
        assert!(item.responded_at.is_none());
    }
}
