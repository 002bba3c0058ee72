//! Entity Store - activation-guarded persistence layer
//!
//! This crate provides the traits and store implementations that turn hard
//! deletion of records into an active/inactive state toggle, backed by a
//! pluggable storage seam and announced through activation signals.

pub mod backend;
pub mod errors;
pub mod guarded;
pub mod prelude;
pub mod schema;
pub mod traits;
pub mod update;

pub use backend::{MemoryBackend, PgTable, PostgresBackend, RecordBackend};
pub use errors::EntityStoreError;
pub use guarded::GuardedStore;
pub use schema::{OnDelete, RelationDecl, SchemaRegistry, SchemaViolation};
pub use traits::{Activatable, ActivatableRecord, DeleteOutcome, ModelId, RecordStore};
pub use update::{IdentifierError, UpdatePatch, ValidatedFieldName};

use sqlx::PgPool;

pub type DbPool = PgPool;
