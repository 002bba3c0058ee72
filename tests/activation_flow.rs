//! End-to-end tests for runtime initialization, schema validation and the
//! guarded delete/update flow over the in-memory backend.

use std::sync::{Arc, Mutex};

use activatable::prelude::*;
use serde::{Deserialize, Serialize};
use serde_json::json;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
struct Account {
    id: u32,
    name: String,
    is_active: bool,
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

fn valid_runtime() -> ActivationRuntime {
    let mut runtime = ActivationRuntime::new();
    runtime.register_entity::<Account>().unwrap();
    runtime
        .declare_relation(
            RelationDecl::new("invoice", "account_ref", "account").on_delete(OnDelete::Protect),
        )
        .unwrap();
    runtime
}

#[test]
fn initialization_rejects_cascade_references() {
    let mut runtime = ActivationRuntime::new();
    runtime.register_entity::<Account>().unwrap();
    runtime
        .declare_relation(RelationDecl::new("invoice", "account_ref", "account"))
        .unwrap();

    let err = runtime.initialize().unwrap_err();
    let message = err.to_string();
    assert!(message.contains("invoice.account_ref"), "{message}");
    assert!(!runtime.is_initialized());

    // An invalid schema blocks store registration entirely.
    let store: AccountStore = GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()));
    let err = runtime.register_store("accounts".to_string(), store);
    assert!(matches!(err, Err(ActivatableError::NotInitialized)));
}

#[test]
fn initialization_accepts_non_cascade_references_once() {
    let mut runtime = valid_runtime();
    runtime.initialize().unwrap();
    assert!(runtime.is_initialized());

    // The pass runs once per runtime.
    assert!(matches!(
        runtime.initialize(),
        Err(ActivatableError::AlreadyInitialized)
    ));
    // Declarations are frozen after initialization.
    assert!(matches!(
        runtime.register_entity::<Account>(),
        Err(ActivatableError::AlreadyInitialized)
    ));
}

#[test]
fn store_registry_round_trip() {
    let mut runtime = valid_runtime();
    runtime.initialize().unwrap();

    let store: AccountStore = GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()));
    runtime
        .register_store("accounts".to_string(), store)
        .unwrap();

    assert!(runtime.get_store::<AccountStore>("accounts").is_ok());
    assert!(matches!(
        runtime.get_store::<AccountStore>("missing"),
        Err(ActivatableError::StoreNotFound(_))
    ));

    let duplicate: AccountStore = GuardedStore::new(MemoryBackend::new(), None);
    assert!(matches!(
        runtime.register_store("accounts".to_string(), duplicate),
        Err(ActivatableError::StoreAlreadyRegistered(_))
    ));

    runtime.unregister_store("accounts").unwrap();
    assert!(runtime.list_stores().is_empty());
}

#[tokio::test]
async fn guarded_flow_end_to_end() {
    let mut runtime = valid_runtime();
    runtime.initialize().unwrap();

    let seen: Arc<Mutex<Vec<ActivationEvent>>> = Arc::new(Mutex::new(Vec::new()));
    let events = seen.clone();
    runtime.signals().subscribe("account", move |event| {
        events.lock().unwrap().push(event.clone());
    });

    let store: AccountStore = GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()))
        .with_strict_change_detection(runtime.notifier_config().strict_change_detection);
    runtime
        .register_store("accounts".to_string(), store)
        .unwrap();
    let store = runtime.get_store::<AccountStore>("accounts").unwrap();

    let ada = store
        .create(Account {
            id: 1,
            name: "Ada".to_string(),
            is_active: true,
        })
        .await
        .unwrap();
    store
        .create(Account {
            id: 2,
            name: "Grace".to_string(),
            is_active: false,
        })
        .await
        .unwrap();

    // Soft delete keeps the record and announces the deactivation.
    store.delete(ada.id(), false).await.unwrap();
    assert!(store.get_by_id(&1).await.unwrap().is_some());
    assert_eq!(seen.lock().unwrap().len(), 1);
    assert!(!seen.lock().unwrap()[0].is_active);

    // Bulk update touching the active field announces once for the batch.
    let patch = UpdatePatch::new().set("is_active", json!(true)).unwrap();
    store.bulk_update(&[1, 2], patch).await.unwrap();
    assert_eq!(seen.lock().unwrap().len(), 2);
    assert_eq!(seen.lock().unwrap()[1].record_count(), 2);
    assert!(seen.lock().unwrap()[1].is_active);

    // Forced delete removes for real and stays silent.
    store.delete(&2, true).await.unwrap();
    assert!(store.get_by_id(&2).await.unwrap().is_none());
    assert_eq!(seen.lock().unwrap().len(), 2);

    runtime.shutdown();
    assert_eq!(runtime.signals().total_observer_count(), 0);
}
