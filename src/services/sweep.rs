//! Capacity-throttling sweep
//!
//! Maintenance operation bounding the publicly visible pending backlog.
//! Runs out-of-band (CLI or admin endpoint), never inline with a user
//! request; the overflow mutations commit as one batch save.

use crate::models::InitiativeStatus;
use crate::store::JsonStore;
use anyhow::Result;
use chrono::{DateTime, Duration, Utc};
use rand::Rng;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Reference ceiling on the pending backlog
pub const DEFAULT_PENDING_LIMIT: usize = 10;

/// Canned acknowledgements for throttled items
pub const ACK_RESPONSES: &[&str] = &[
    "Thank you for your initiative. We are reviewing the issue and will work towards a resolution.",
    "Your initiative has been forwarded to the responsible department. We will inspect the situation and report back.",
    "Thank you for the report. The initiative has been taken under review and action will be taken as soon as possible.",
    "The initiative has been registered. The responsible services will assess the situation and share the outcome.",
    "Thank you for your initiative. We have taken it under review; an inspection will be carried out and action taken where needed.",
    "Your initiative has been passed on to the responsible services. An inspection will follow and you will be notified of the results.",
    "Thank you for the report. The initiative is under review and we will act on it shortly.",
    "The initiative has been registered and forwarded to the responsible department for assessment.",
];

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct SweepOutcome {
    /// Pending items remaining after the sweep
    pub kept: usize,
    /// Items transitioned to responded by this run
    pub throttled: usize,
}

/// Bound the pending backlog to `limit` items.
///
/// Keeps the `limit` most recently created pending items; every older one
/// is transitioned exactly like a respond, with a canned acknowledgement
/// and a `responded_at` back-dated 1 to 30 days (clamped to `created_at`
/// so the ordering invariant holds). Idempotent: a second run right after
/// reports `throttled == 0`.
pub fn run_capacity_sweep(
    store: &mut JsonStore,
    limit: usize,
    rng: &mut impl Rng,
    now: DateTime<Utc>,
) -> Result<SweepOutcome> {
    let mut pending: Vec<(Uuid, DateTime<Utc>)> = store
        .find(|item| item.is_pending())
        .iter()
        .map(|item| (item.id, item.created_at))
        .collect();

    if pending.len() <= limit {
        return Ok(SweepOutcome {
            kept: pending.len(),
            throttled: 0,
        });
    }

    // Most recent first; everything past `limit` overflows
    pending.sort_by(|a, b| b.1.cmp(&a.1));
    let overflow: Vec<Uuid> = pending[limit..].iter().map(|(id, _)| *id).collect();

    let mut throttled = 0;
    for id in overflow {
        // Re-check: a concurrent respond may have won the race between the
        // snapshot above and this mutation.
        match store.get(id) {
            Some(item) if item.is_pending() => {}
            _ => continue,
        }

        let text = ACK_RESPONSES[rng.gen_range(0..ACK_RESPONSES.len())];
        let days_ago = rng.gen_range(1..=30);
        let backdated = now - Duration::days(days_ago);

        store.update(id, |item| {
            item.response_text = Some(text.to_string());
            item.responded_at = Some(backdated.max(item.created_at));
            item.status = InitiativeStatus::Responded;
        })?;
        throttled += 1;
    }

    // Single batch commit, then re-count to confirm the bound
    store.save()?;
    let kept = store.find(|item| item.is_pending()).len();
    debug_assert!(kept <= limit);

    Ok(SweepOutcome { kept, throttled })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Initiative, NewInitiative};
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn pending_item(title: &str, created_at: DateTime<Utc>) -> Initiative {
        let mut item = NewInitiative {
            title: title.to_string(),
            description: "desc".to_string(),
            location: "Center".to_string(),
            latitude: 46.05,
            longitude: 14.51,
            submitter_contact: "a@example.org".to_string(),
            category: Some("roads".to_string()),
            image_ref: None,
        }
        .into_initiative(created_at);
        item.created_at = created_at;
        item
    }

    #[test]
    fn test_sweep_keeps_ten_most_recent_of_fifteen() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
        let now = Utc::now();

        // Distinct creation times: item 0 oldest, item 14 newest
        let mut ids = Vec::new();
        for i in 0..15 {
            let created = now - Duration::days(60 - i as i64);
            ids.push(store.insert(pending_item(&format!("item-{}", i), created)).id);
        }

        let mut rng = StdRng::seed_from_u64(7);
        let outcome = run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();

        assert_eq!(outcome.kept, 10);
        assert_eq!(outcome.throttled, 5);

        // The 10 most recently created stay pending
        for id in &ids[5..] {
            assert!(store.get(*id).unwrap().is_pending());
        }
        // The 5 oldest got a canned response within the last 30 days
        for id in &ids[..5] {
            let item = store.get(*id).unwrap();
            assert!(item.is_responded());
            assert!(item.response_text.is_some());
            let responded_at = item.responded_at.unwrap();
            assert!(responded_at <= now);
            assert!(responded_at >= now - Duration::days(30));
        }
    }

    #[test]
    fn test_sweep_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
        let now = Utc::now();

        for i in 0..15 {
            store.insert(pending_item(&format!("item-{}", i), now - Duration::days(i + 1)));
        }

        let mut rng = StdRng::seed_from_u64(7);
        run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();
        let second = run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();

        assert_eq!(second.throttled, 0);
        assert_eq!(second.kept, 10);
    }

    #[test]
    fn test_sweep_below_limit_is_a_noop() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
        let now = Utc::now();

        for i in 0..3 {
            store.insert(pending_item(&format!("item-{}", i), now - Duration::days(i + 1)));
        }

        let mut rng = StdRng::seed_from_u64(7);
        let outcome = run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();

        assert_eq!(outcome.kept, 3);
        assert_eq!(outcome.throttled, 0);
        assert_eq!(store.find(|i| i.is_pending()).len(), 3);
    }

    #[test]
    fn test_backdated_response_never_precedes_creation() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
        let now = Utc::now();

        // All overflow candidates created within the back-dating window
        let mut ids = Vec::new();
        for i in 0..12 {
            let created = now - Duration::hours(i + 1);
            ids.push(store.insert(pending_item(&format!("item-{}", i), created)).id);
        }

        let mut rng = StdRng::seed_from_u64(42);
        run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();

        for item in store.iter().filter(|i| i.is_responded()) {
            assert!(item.responded_at.unwrap() >= item.created_at);
        }
    }
}
