use std::marker::PhantomData;
use std::sync::Arc;

use activation_signals::{ActivationEvent, ActivationRegistry};

use crate::backend::RecordBackend;
use crate::traits::ActivatableRecord;
use crate::update::UpdatePatch;
use crate::EntityStoreError;

/// Store for activatable records that intercepts delete and bulk-update
/// operations.
///
/// Deletes without `force` become deactivations; writes that touch the
/// active field are announced synchronously through the injected
/// [`ActivationRegistry`] after they are persisted. The guard adds no retry
/// or recovery of its own; backend failures propagate unchanged.
pub struct GuardedStore<T: ActivatableRecord, B: RecordBackend<T>> {
    pub(crate) backend: B,
    pub(crate) signals: Option<Arc<ActivationRegistry>>,
    pub(crate) strict_change_detection: bool,
    pub(crate) _phantom: PhantomData<T>,
}

impl<T: ActivatableRecord, B: RecordBackend<T>> std::fmt::Debug for GuardedStore<T, B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardedStore")
            .field("entity", &T::entity_name())
            .field("has_signals", &self.has_signals())
            .field("strict_change_detection", &self.strict_change_detection)
            .finish()
    }
}

impl<T: ActivatableRecord, B: RecordBackend<T>> GuardedStore<T, B> {
    pub fn new(backend: B, signals: Option<Arc<ActivationRegistry>>) -> Self {
        Self {
            backend,
            signals,
            strict_change_detection: false,
            _phantom: PhantomData,
        }
    }

    /// Opt into strict changed-value notification semantics on the
    /// collection paths: only records whose active value actually changed
    /// are announced, and a write that changes nothing emits no event.
    /// The default is the coarse "state was written" signal.
    pub fn with_strict_change_detection(mut self, strict: bool) -> Self {
        self.strict_change_detection = strict;
        self
    }

    /// Set signal registry for this store
    pub fn set_signal_registry(&mut self, signals: Arc<ActivationRegistry>) {
        self.signals = Some(signals);
    }

    /// Remove signal registry from this store
    pub fn remove_signal_registry(&mut self) {
        self.signals = None;
    }

    /// Check if a signal registry is set
    pub fn has_signals(&self) -> bool {
        self.signals.is_some()
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Emit one activation event covering `records`, after the write has
    /// been persisted. Empty batches emit nothing.
    pub(crate) fn notify(&self, records: &[T], is_active: bool) -> Result<(), EntityStoreError> {
        if records.is_empty() {
            return Ok(());
        }
        let Some(signals) = &self.signals else {
            return Ok(());
        };
        let event = ActivationEvent::new(T::entity_name(), is_active)
            .with_serialized(records)
            .map_err(|e| EntityStoreError::serialization(T::entity_name(), e))?;
        signals.emit(event);
        Ok(())
    }

    /// Write the active flag on the addressed records and announce the
    /// write. Shared by deactivating deletes, activate and deactivate.
    pub(crate) async fn write_active(
        &self,
        ids: &[T::Id],
        is_active: bool,
    ) -> Result<Vec<T>, EntityStoreError> {
        let changed_ids = self.changed_ids(ids, is_active).await?;

        let patch = UpdatePatch::new().set(T::active_field(), is_active)?;
        #[cfg(feature = "debug-logging")]
        tracing::trace!(
            entity = T::entity_name(),
            ids = ids.len(),
            is_active,
            "writing active flag"
        );
        let updated = self.backend.update_fields(ids, &patch).await?;

        tracing::debug!(
            entity = T::entity_name(),
            affected = updated.len(),
            is_active,
            "active state written"
        );

        match &changed_ids {
            Some(changed) => {
                let to_notify: Vec<T> = updated
                    .iter()
                    .filter(|r| changed.contains(r.id()))
                    .cloned()
                    .collect();
                self.notify(&to_notify, is_active)?;
            }
            None => self.notify(&updated, is_active)?,
        }
        Ok(updated)
    }

    /// Under strict change detection, the ids whose stored active value
    /// differs from the value about to be written. `None` means coarse
    /// semantics: notify for everything affected.
    pub(crate) async fn changed_ids(
        &self,
        ids: &[T::Id],
        is_active: bool,
    ) -> Result<Option<Vec<T::Id>>, EntityStoreError> {
        if !self.strict_change_detection {
            return Ok(None);
        }
        let prior = self.backend.fetch_many(ids).await?;
        Ok(Some(
            prior
                .iter()
                .filter(|r| r.is_active() != is_active)
                .map(|r| r.id().clone())
                .collect(),
        ))
    }
}
