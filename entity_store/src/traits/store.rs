//! Base store trait
//!
//! This module defines the common operations every entity store exposes,
//! independent of activation semantics.

use crate::traits::record::ActivatableRecord;
use crate::EntityStoreError;
use async_trait::async_trait;

/// Shorthand for the id type of a store's model.
pub type ModelId<S> = <<S as RecordStore>::Model as ActivatableRecord>::Id;

/// Common persistence operations for a single record type.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// The record type this store manages
    type Model: ActivatableRecord;

    /// Insert a new record. Emits no activation event; the record enters the
    /// state machine in whatever state it was constructed with.
    async fn create(&self, record: Self::Model) -> Result<Self::Model, EntityStoreError>;

    /// Get a record by its id
    async fn get_by_id(&self, id: &ModelId<Self>)
        -> Result<Option<Self::Model>, EntityStoreError>;

    /// List all records of this type
    async fn list_all(&self) -> Result<Vec<Self::Model>, EntityStoreError>;

    /// Full-row update of an existing record.
    ///
    /// Emits a single-record activation event only when the persisted active
    /// value actually changed with this write.
    async fn save(&self, record: Self::Model) -> Result<Self::Model, EntityStoreError>;

    /// Count all records of this type
    async fn count(&self) -> Result<i64, EntityStoreError>;
}
