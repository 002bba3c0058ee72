use std::sync::{Arc, Mutex};

use activation_signals::{ActivationEvent, ActivationRegistry};
use serde::{Deserialize, Serialize};
use serde_json::json;

use crate::backend::MemoryBackend;
use crate::traits::{Activatable, ActivatableRecord, DeleteOutcome, RecordStore};
use crate::update::UpdatePatch;
use crate::EntityStoreError;

use super::GuardedStore;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Account {
    id: u32,
    name: String,
    is_active: bool,
}

impl Account {
    fn new(id: u32, name: &str, is_active: bool) -> Self {
        Self {
            id,
            name: name.to_string(),
            is_active,
        }
    }
}

impl ActivatableRecord for Account {
    type Id = u32;

    fn entity_name() -> &'static str {
        "account"
    }

    fn id(&self) -> &u32 {
        &self.id
    }

    fn is_active(&self) -> bool {
        self.is_active
    }

    fn set_active(&mut self, is_active: bool) {
        self.is_active = is_active;
    }
}

type AccountStore = GuardedStore<Account, MemoryBackend<Account>>;

/// Capture every event the store emits, the way the original signal-handler
/// tests hang a mock on the dispatch channel.
fn store_with_capture() -> (AccountStore, Arc<Mutex<Vec<ActivationEvent>>>) {
    let registry = Arc::new(ActivationRegistry::new());
    let seen = Arc::new(Mutex::new(Vec::new()));
    let events = seen.clone();
    registry.subscribe("account", move |event: &ActivationEvent| {
        events.lock().unwrap().push(event.clone());
    });
    let store = GuardedStore::new(MemoryBackend::new(), Some(registry));
    (store, seen)
}

fn events(seen: &Arc<Mutex<Vec<ActivationEvent>>>) -> Vec<ActivationEvent> {
    seen.lock().unwrap().clone()
}

#[test]
fn test_records_default_inactive() {
    assert!(!Account::default().is_active());
}

#[tokio::test]
async fn test_create_persists_and_emits_nothing() {
    let (store, seen) = store_with_capture();
    let created = store.create(Account::new(1, "a", false)).await.unwrap();

    assert!(!created.is_active());
    assert_eq!(store.count().await.unwrap(), 1);
    assert!(events(&seen).is_empty());
}

#[tokio::test]
async fn test_delete_without_force_deactivates_and_notifies() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", true)).await.unwrap();

    let outcome = store.delete(&1, false).await.unwrap();
    assert!(matches!(outcome, DeleteOutcome::Deactivated(ref records) if records.len() == 1));

    // Still retrievable, just inactive.
    let stored = store.get_by_id(&1).await.unwrap().unwrap();
    assert!(!stored.is_active());

    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].is_active);
    assert_eq!(seen[0].entity, "account");
    assert_eq!(seen[0].records, vec![serde_json::to_value(&stored).unwrap()]);
}

#[tokio::test]
async fn test_delete_of_inactive_record_still_notifies() {
    // Coarse semantics: the guard announces the write, not a value change.
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", false)).await.unwrap();

    store.delete(&1, false).await.unwrap();

    assert_eq!(events(&seen).len(), 1);
    assert!(!events(&seen)[0].is_active);
}

#[tokio::test]
async fn test_delete_with_force_removes_and_stays_silent() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "b", true)).await.unwrap();

    let outcome = store.delete(&1, true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Removed(vec![1]));
    assert!(store.get_by_id(&1).await.unwrap().is_none());
    assert!(events(&seen).is_empty());
}

#[tokio::test]
async fn test_delete_many_without_force() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", true)).await.unwrap();
    store.create(Account::new(2, "b", false)).await.unwrap();

    let outcome = store.delete_many(&[1, 2], false).await.unwrap();
    assert_eq!(outcome.affected(), 2);
    assert_eq!(store.count().await.unwrap(), 2);
    assert_eq!(store.count_active().await.unwrap(), 0);

    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].record_count(), 2);
    assert!(!seen[0].is_active);
}

#[tokio::test]
async fn test_delete_many_with_force() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", true)).await.unwrap();
    store.create(Account::new(2, "b", false)).await.unwrap();

    let outcome = store.delete_many(&[1, 2], true).await.unwrap();
    assert_eq!(outcome, DeleteOutcome::Removed(vec![1, 2]));
    assert_eq!(store.count().await.unwrap(), 0);
    assert!(events(&seen).is_empty());
}

#[tokio::test]
async fn test_delete_of_missing_record_emits_nothing() {
    let (store, seen) = store_with_capture();
    let outcome = store.delete(&42, false).await.unwrap();
    assert_eq!(outcome.affected(), 0);
    assert!(events(&seen).is_empty());
}

#[tokio::test]
async fn test_deactivate_collection() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", false)).await.unwrap();
    store.create(Account::new(2, "b", true)).await.unwrap();

    let updated = store.deactivate(&[1, 2]).await.unwrap();
    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|r| !r.is_active()));
    assert_eq!(store.count_active().await.unwrap(), 0);

    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].record_count(), 2);
    assert!(!seen[0].is_active);
}

#[tokio::test]
async fn test_activate_collection() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", false)).await.unwrap();
    store.create(Account::new(2, "b", true)).await.unwrap();

    let updated = store.activate(&[1, 2]).await.unwrap();
    assert!(updated.iter().all(|r| r.is_active()));
    assert_eq!(store.count_active().await.unwrap(), 2);
    assert_eq!(store.list_active().await.unwrap().len(), 2);

    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_active);
    assert_eq!(seen[0].record_count(), 2);
}

#[tokio::test]
async fn test_bulk_update_touching_active_field_notifies() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", false)).await.unwrap();
    store.create(Account::new(2, "b", true)).await.unwrap();

    let patch = UpdatePatch::new()
        .set("name", json!("hi"))
        .unwrap()
        .set("is_active", json!(true))
        .unwrap();
    let updated = store.bulk_update(&[1, 2], patch).await.unwrap();

    assert!(updated.iter().all(|r| r.is_active() && r.name == "hi"));

    // One event covering both members, regardless of prior values.
    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_active);
    assert_eq!(seen[0].record_count(), 2);
}

#[tokio::test]
async fn test_bulk_update_without_active_field_is_silent() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", false)).await.unwrap();
    store.create(Account::new(2, "b", false)).await.unwrap();

    let patch = UpdatePatch::new().set("name", json!("hi")).unwrap();
    let updated = store.bulk_update(&[1, 2], patch).await.unwrap();

    assert_eq!(updated.len(), 2);
    assert!(updated.iter().all(|r| r.name == "hi" && !r.is_active()));
    assert!(events(&seen).is_empty());
}

#[tokio::test]
async fn test_bulk_update_with_empty_patch_touches_nothing() {
    let (store, seen) = store_with_capture();
    store.create(Account::new(1, "a", true)).await.unwrap();
    store.create(Account::new(2, "b", false)).await.unwrap();

    let updated = store.bulk_update(&[1, 2], UpdatePatch::new()).await.unwrap();

    assert!(updated.is_empty());
    assert!(events(&seen).is_empty());
    assert_eq!(store.get_by_id(&1).await.unwrap().unwrap().name, "a");
    assert_eq!(store.count_active().await.unwrap(), 1);
}

#[tokio::test]
async fn test_bulk_update_rejects_non_boolean_active_value() {
    let (store, _seen) = store_with_capture();
    store.create(Account::new(1, "a", false)).await.unwrap();

    let patch = UpdatePatch::new().set("is_active", json!("yes")).unwrap();
    let err = store.bulk_update(&[1], patch).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::Validation { .. }));
}

#[tokio::test]
async fn test_save_with_changed_active_value_notifies_once() {
    let (store, seen) = store_with_capture();
    let mut account = store.create(Account::new(1, "a", false)).await.unwrap();

    account.set_active(true);
    let written = store.save(account).await.unwrap();
    assert!(written.is_active());

    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert!(seen[0].is_active);
    assert_eq!(seen[0].record_count(), 1);
}

#[tokio::test]
async fn test_save_with_unchanged_active_value_is_silent() {
    let (store, seen) = store_with_capture();
    let mut account = store.create(Account::new(1, "a", false)).await.unwrap();

    account.name = "renamed".to_string();
    store.save(account).await.unwrap();

    assert!(events(&seen).is_empty());
    assert_eq!(
        store.get_by_id(&1).await.unwrap().unwrap().name,
        "renamed"
    );
}

#[tokio::test]
async fn test_save_of_missing_record_fails() {
    let (store, _seen) = store_with_capture();
    let err = store.save(Account::new(9, "ghost", false)).await.unwrap_err();
    assert!(matches!(err, EntityStoreError::NotFound(_)));
}

#[tokio::test]
async fn test_store_without_registry_still_toggles_state() {
    let store: AccountStore = GuardedStore::new(MemoryBackend::new(), None);
    store.create(Account::new(1, "a", true)).await.unwrap();

    store.delete(&1, false).await.unwrap();
    assert!(!store.get_by_id(&1).await.unwrap().unwrap().is_active());
}

#[tokio::test]
async fn test_strict_mode_skips_noop_collection_writes() {
    let (store, seen) = store_with_capture();
    let store = store.with_strict_change_detection(true);
    store.create(Account::new(1, "a", false)).await.unwrap();
    store.create(Account::new(2, "b", false)).await.unwrap();

    // Nothing changes value, so strict mode emits nothing.
    store.deactivate(&[1, 2]).await.unwrap();
    assert!(events(&seen).is_empty());

    // Only the record that actually flips is announced.
    let mut account = store.get_by_id(&2).await.unwrap().unwrap();
    account.set_active(true);
    store.save(account).await.unwrap();
    seen.lock().unwrap().clear();

    store.deactivate(&[1, 2]).await.unwrap();
    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].record_count(), 1);
    assert_eq!(seen[0].records[0]["id"], 2);
}

#[tokio::test]
async fn test_strict_mode_filters_bulk_update_notifications() {
    let (store, seen) = store_with_capture();
    let store = store.with_strict_change_detection(true);
    store.create(Account::new(1, "a", true)).await.unwrap();
    store.create(Account::new(2, "b", false)).await.unwrap();

    let patch = UpdatePatch::new().set("is_active", json!(true)).unwrap();
    store.bulk_update(&[1, 2], patch).await.unwrap();

    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].record_count(), 1);
    assert_eq!(seen[0].records[0]["id"], 2);
}

// Scenario from the behavioral contract: soft delete keeps the record.
#[tokio::test]
async fn test_soft_delete_round_trip() {
    let (store, seen) = store_with_capture();
    let a = store.create(Account::new(10, "a", false)).await.unwrap();

    store.delete(a.id(), false).await.unwrap();

    let still_there = store.get_by_id(&10).await.unwrap().unwrap();
    assert!(!still_there.is_active());
    let seen = events(&seen);
    assert_eq!(seen.len(), 1);
    assert!(!seen[0].is_active);
    assert_eq!(seen[0].records[0]["id"], 10);
}

// Scenario from the behavioral contract: forced delete leaves no trace.
#[tokio::test]
async fn test_forced_delete_round_trip() {
    let (store, seen) = store_with_capture();
    let b = store.create(Account::new(11, "b", true)).await.unwrap();

    store.delete(b.id(), true).await.unwrap();

    assert!(store.get_by_id(&11).await.unwrap().is_none());
    assert!(events(&seen).is_empty());
}
