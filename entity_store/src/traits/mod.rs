//! Trait definitions
//!
//! This module defines the core traits for activation-guarded storage.

pub mod activatable;
pub mod record;
pub mod store;

pub use activatable::{Activatable, DeleteOutcome};
pub use record::ActivatableRecord;
pub use store::{ModelId, RecordStore};
