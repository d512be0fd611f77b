//! Integration tests for the lifecycle manager and the capacity sweep
//!
//! Exercises the services against a real store file: mutations survive a
//! reload and the sweep properties hold end to end.

use chrono::{Duration, Utc};
use initiatived::models::{InitiativeStatus, NewInitiative};
use initiatived::services::{respond, run_capacity_sweep, ResponsePolicy};
use initiatived::store::JsonStore;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;
use uuid::Uuid;

fn seed_store(dir: &TempDir, pending: usize) -> (JsonStore, Vec<Uuid>) {
    let mut store = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
    let now = Utc::now();
    let mut ids = Vec::new();

    // Oldest first: item 0 is the oldest submission
    for i in 0..pending {
        let mut item = NewInitiative {
            title: format!("initiative-{}", i),
            description: "integration seed".to_string(),
            location: format!("District {}", i % 3),
            latitude: 46.05,
            longitude: 14.51,
            submitter_contact: "seed@example.org".to_string(),
            category: Some("roads".to_string()),
            image_ref: None,
        }
        .into_initiative(now);
        item.created_at = now - Duration::days(pending as i64 - i as i64);
        ids.push(store.insert(item).id);
    }

    store.save().unwrap();
    (store, ids)
}

#[test]
fn test_respond_persists_across_reload() {
    let dir = TempDir::new().unwrap();
    let (mut store, ids) = seed_store(&dir, 3);

    respond(&mut store, ids[0], "Resolved by the road crew.", ResponsePolicy::Reject).unwrap();
    store.save().unwrap();

    let reloaded = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
    let item = reloaded.get(ids[0]).unwrap();
    assert_eq!(item.status, InitiativeStatus::Responded);
    assert_eq!(item.response_text.as_deref(), Some("Resolved by the road crew."));
    assert!(item.responded_at.unwrap() >= item.created_at);
}

#[test]
fn test_status_and_response_fields_stay_in_lockstep() {
    let dir = TempDir::new().unwrap();
    let (mut store, ids) = seed_store(&dir, 15);

    respond(&mut store, ids[3], "done", ResponsePolicy::Reject).unwrap();
    let mut rng = StdRng::seed_from_u64(5);
    run_capacity_sweep(&mut store, 10, &mut rng, Utc::now()).unwrap();

    for item in store.iter() {
        let responded = item.status == InitiativeStatus::Responded;
        assert_eq!(responded, item.response_text.is_some());
        assert_eq!(responded, item.responded_at.is_some());
        if let Some(responded_at) = item.responded_at {
            assert!(responded_at >= item.created_at);
        }
    }
}

#[test]
fn test_sweep_bounds_backlog_and_is_idempotent() {
    let dir = TempDir::new().unwrap();
    let (mut store, ids) = seed_store(&dir, 15);
    let now = Utc::now();

    let mut rng = StdRng::seed_from_u64(11);
    let first = run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();
    assert_eq!(first.kept, 10);
    assert_eq!(first.throttled, 5);

    // The 10 most recent (highest index) stay pending; the 5 oldest are
    // responded with a back-dated timestamp inside the last 30 days.
    for id in &ids[5..] {
        assert!(store.get(*id).unwrap().is_pending());
    }
    for id in &ids[..5] {
        let item = store.get(*id).unwrap();
        assert!(item.is_responded());
        let responded_at = item.responded_at.unwrap();
        assert!(responded_at >= now - Duration::days(30));
        assert!(responded_at <= now);
    }

    let second = run_capacity_sweep(&mut store, 10, &mut rng, now).unwrap();
    assert_eq!(second.throttled, 0);

    // The batch commit landed on disk
    let reloaded = JsonStore::load(dir.path().join("initiatives.json")).unwrap();
    assert_eq!(reloaded.find(|i| i.is_pending()).len(), 10);
}

#[test]
fn test_respond_already_responded_conflicts_without_mutation() {
    let dir = TempDir::new().unwrap();
    let (mut store, ids) = seed_store(&dir, 2);

    respond(&mut store, ids[1], "first answer", ResponsePolicy::Reject).unwrap();
    let first_at = store.get(ids[1]).unwrap().responded_at;

    let err = respond(&mut store, ids[1], "second answer", ResponsePolicy::Reject).unwrap_err();
    assert!(matches!(err, initiatived::CoreError::Conflict(_)));

    let item = store.get(ids[1]).unwrap();
    assert_eq!(item.response_text.as_deref(), Some("first answer"));
    assert_eq!(item.responded_at, first_at);
}
