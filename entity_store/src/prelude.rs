//! Convenience re-exports for entity-store usage

pub use crate::backend::{MemoryBackend, PgTable, PostgresBackend, RecordBackend};
pub use crate::errors::EntityStoreError;
pub use crate::guarded::GuardedStore;
pub use crate::schema::{OnDelete, RelationDecl, SchemaRegistry, SchemaViolation};
pub use crate::traits::{Activatable, ActivatableRecord, DeleteOutcome, ModelId, RecordStore};
pub use crate::update::UpdatePatch;
