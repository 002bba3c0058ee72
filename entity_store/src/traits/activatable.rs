//! Activation capability trait
//!
//! This module defines the guarded delete/update operations that turn hard
//! deletion into an active/inactive state toggle.

use crate::traits::record::ActivatableRecord;
use crate::traits::store::{ModelId, RecordStore};
use crate::update::UpdatePatch;
use crate::EntityStoreError;
use async_trait::async_trait;

/// Result of a guarded delete.
///
/// The soft path returns the deactivated records to make explicit that
/// nothing left storage; only the forced path reports removed ids.
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome<T: ActivatableRecord> {
    /// Records were set inactive and persisted; none were removed
    Deactivated(Vec<T>),
    /// Records were physically removed from storage
    Removed(Vec<T::Id>),
}

impl<T: ActivatableRecord> DeleteOutcome<T> {
    /// Number of records the operation touched.
    pub fn affected(&self) -> usize {
        match self {
            DeleteOutcome::Deactivated(records) => records.len(),
            DeleteOutcome::Removed(ids) => ids.len(),
        }
    }
}

/// Guarded operations for stores of activatable records.
///
/// `delete`/`delete_many` with `force = false` rewrite deletion into a
/// deactivation and announce it; `force = true` is the escape hatch that
/// performs real removal and bypasses the notifier, since removal is a
/// distinct outcome rather than an activation change.
///
/// Collection writes (`activate`, `deactivate`, `bulk_update` touching the
/// active field) emit one event covering every addressed record, even for
/// members that already held the written value. This is a coarse "state was
/// written" signal; strict changed-value semantics are available through the
/// store's configuration.
#[async_trait]
pub trait Activatable: RecordStore {
    /// Soft-delete (or, with `force`, hard-delete) a single record
    async fn delete(
        &self,
        id: &ModelId<Self>,
        force: bool,
    ) -> Result<DeleteOutcome<Self::Model>, EntityStoreError>;

    /// Soft-delete (or, with `force`, hard-delete) a collection of records
    async fn delete_many(
        &self,
        ids: &[ModelId<Self>],
        force: bool,
    ) -> Result<DeleteOutcome<Self::Model>, EntityStoreError>;

    /// Set active=true on every addressed record and announce it
    async fn activate(
        &self,
        ids: &[ModelId<Self>],
    ) -> Result<Vec<Self::Model>, EntityStoreError>;

    /// Set active=false on every addressed record and announce it
    async fn deactivate(
        &self,
        ids: &[ModelId<Self>],
    ) -> Result<Vec<Self::Model>, EntityStoreError>;

    /// Apply a field patch to a collection of records.
    ///
    /// If the patch contains the active field its value must be a JSON
    /// boolean, and one activation event with the written value is emitted
    /// for the affected records. Patches that do not touch the active field
    /// behave as a plain update with no notification.
    async fn bulk_update(
        &self,
        ids: &[ModelId<Self>],
        patch: UpdatePatch,
    ) -> Result<Vec<Self::Model>, EntityStoreError>;

    /// List only active records
    async fn list_active(&self) -> Result<Vec<Self::Model>, EntityStoreError>;

    /// Count active records
    async fn count_active(&self) -> Result<i64, EntityStoreError>;
}
