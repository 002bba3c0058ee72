//! Record trait definitions
//!
//! This module defines the contract a record type must satisfy to take part
//! in activation-guarded storage.

use serde::{Deserialize, Serialize};
use std::fmt::Debug;
use std::hash::Hash;

/// A record type whose decommissioning mechanism is an active/inactive flag
/// rather than physical deletion.
///
/// Implementors keep a boolean column/field (named by [`active_field`]) that
/// defaults to `false` on construction, so records are created inactive
/// unless explicitly created active. The guarded store paths never remove
/// that field from storage; they only write its value.
///
/// [`active_field`]: ActivatableRecord::active_field
pub trait ActivatableRecord:
    Clone + Send + Sync + Debug + Serialize + for<'de> Deserialize<'de> + 'static
{
    /// The type used for the primary key
    type Id: Clone + Send + Sync + Debug + PartialEq + Eq + Hash + Serialize + 'static;

    /// Entity type name, used to key activation events and schema
    /// declarations
    fn entity_name() -> &'static str;

    /// Name of the boolean active field as it appears in serialized records
    /// and storage columns
    fn active_field() -> &'static str {
        "is_active"
    }

    fn id(&self) -> &Self::Id;

    fn is_active(&self) -> bool;

    fn set_active(&mut self, is_active: bool);
}
