use std::collections::HashMap;
use std::sync::RwLock;

use uuid::Uuid;

use crate::event::ActivationEvent;

/// Identifier returned by [`ActivationRegistry::subscribe`], used to remove
/// an observer again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CallbackId(Uuid);

impl CallbackId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }
}

type ObserverCallback = Box<dyn Fn(&ActivationEvent) + Send + Sync>;

/// Publish/subscribe registry for activation-change events, keyed by entity
/// type name.
///
/// One registry instance is created at application startup, shared via `Arc`
/// with every store that should announce state changes, and cleared only at
/// process teardown. There is no hidden global instance; callers inject the
/// registry explicitly.
///
/// Dispatch is synchronous and in-process: every observer registered for the
/// event's entity runs before `emit` returns. There are no delivery
/// guarantees beyond "called once per logical state-change operation".
pub struct ActivationRegistry {
    observers: RwLock<HashMap<String, Vec<(CallbackId, ObserverCallback)>>>,
}

impl std::fmt::Debug for ActivationRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActivationRegistry")
            .field("observer_count", &self.total_observer_count())
            .finish()
    }
}

impl ActivationRegistry {
    pub fn new() -> Self {
        Self {
            observers: RwLock::new(HashMap::new()),
        }
    }

    /// Register an observer for the given entity type.
    pub fn subscribe<F>(&self, entity: impl Into<String>, callback: F) -> CallbackId
    where
        F: Fn(&ActivationEvent) + Send + Sync + 'static,
    {
        let id = CallbackId::generate();
        if let Ok(mut observers) = self.observers.write() {
            observers
                .entry(entity.into())
                .or_default()
                .push((id, Box::new(callback)));
        }
        id
    }

    /// Remove a previously registered observer. Returns whether it was found.
    pub fn unsubscribe(&self, entity: &str, id: CallbackId) -> bool {
        if let Ok(mut observers) = self.observers.write() {
            if let Some(entries) = observers.get_mut(entity) {
                let before = entries.len();
                entries.retain(|(cb_id, _)| *cb_id != id);
                return entries.len() < before;
            }
        }
        false
    }

    /// Dispatch an event to all observers registered for its entity type.
    pub fn emit(&self, event: ActivationEvent) {
        if let Ok(observers) = self.observers.read() {
            if let Some(entries) = observers.get(&event.entity) {
                tracing::debug!(
                    entity = %event.entity,
                    records = event.record_count(),
                    is_active = event.is_active,
                    observers = entries.len(),
                    "dispatching activation event"
                );
                for (_id, callback) in entries.iter() {
                    #[cfg(feature = "debug-logging")]
                    tracing::trace!(callback_id = ?_id, "invoking observer");
                    callback(&event);
                }
            }
        }
    }

    /// Number of observers registered for an entity type.
    pub fn observer_count(&self, entity: &str) -> usize {
        self.observers
            .read()
            .map(|o| o.get(entity).map(|e| e.len()).unwrap_or(0))
            .unwrap_or(0)
    }

    /// Total observers across all entity types.
    pub fn total_observer_count(&self) -> usize {
        self.observers
            .read()
            .map(|o| o.values().map(|e| e.len()).sum())
            .unwrap_or(0)
    }

    /// Remove all observers. Intended for process teardown.
    pub fn clear(&self) {
        if let Ok(mut observers) = self.observers.write() {
            observers.clear();
        }
    }
}

impl Default for ActivationRegistry {
    fn default() -> Self {
        Self::new()
    }
}
