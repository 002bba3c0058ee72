//! Storage backends
//!
//! This module defines the persistence seam the guarded store drives, plus
//! the bundled in-memory and PostgreSQL implementations.

pub mod memory;
pub mod postgres;

pub use memory::MemoryBackend;
pub use postgres::{PgTable, PostgresBackend};

use crate::traits::ActivatableRecord;
use crate::update::UpdatePatch;
use crate::EntityStoreError;
use async_trait::async_trait;

/// Primitive persistence operations for one record type.
///
/// Backends carry no activation semantics of their own; the guarded store
/// decides what to write and what to announce. Each call is expected to run
/// within whatever transactional context the backend provides, so the
/// guard's read-decide-write sequence shares one boundary per call chain.
#[async_trait]
pub trait RecordBackend<T: ActivatableRecord>: Send + Sync {
    async fn insert(&self, record: T) -> Result<T, EntityStoreError>;

    async fn fetch(&self, id: &T::Id) -> Result<Option<T>, EntityStoreError>;

    async fn fetch_many(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError>;

    async fn fetch_all(&self) -> Result<Vec<T>, EntityStoreError>;

    /// Fetch records whose active field holds the given value
    async fn fetch_by_active(&self, is_active: bool) -> Result<Vec<T>, EntityStoreError>;

    /// Full-row update of an existing record
    async fn write(&self, record: T) -> Result<T, EntityStoreError>;

    /// Apply a field patch to the addressed records, returning the updated
    /// rows in their final persisted state
    async fn update_fields(
        &self,
        ids: &[T::Id],
        patch: &UpdatePatch,
    ) -> Result<Vec<T>, EntityStoreError>;

    /// Physically remove the addressed records, returning the removed ids
    async fn remove(&self, ids: &[T::Id]) -> Result<Vec<T::Id>, EntityStoreError>;

    async fn count(&self) -> Result<i64, EntityStoreError>;

    /// Count records whose active field holds the given value
    async fn count_by_active(&self, is_active: bool) -> Result<i64, EntityStoreError>;
}
