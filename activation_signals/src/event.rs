//! Activation event types and definitions
//!
//! This module defines the structure of activation-change events
//! that flow through the signal registry.

use serde::{Deserialize, Serialize};

/// Notification payload describing which records had their active state
/// written and to what value.
///
/// Events are ephemeral: they exist only for the duration of synchronous
/// dispatch to the observers registered for `entity`. Affected records are
/// carried as serialized JSON values so that a single registry can fan out
/// events for any record type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActivationEvent {
    /// Entity type name the event belongs to
    pub entity: String,
    /// Affected records, serialized at emit time
    pub records: Vec<serde_json::Value>,
    /// The active value that was written
    pub is_active: bool,
    /// Event timestamp (UTC)
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl ActivationEvent {
    pub fn new(entity: impl Into<String>, is_active: bool) -> Self {
        Self {
            entity: entity.into(),
            records: Vec::new(),
            is_active,
            timestamp: chrono::Utc::now(),
        }
    }

    pub fn with_records(mut self, records: Vec<serde_json::Value>) -> Self {
        self.records = records;
        self
    }

    /// Serialize a batch of records into the event.
    pub fn with_serialized<T: Serialize>(
        self,
        records: &[T],
    ) -> Result<Self, serde_json::Error> {
        let records = records
            .iter()
            .map(serde_json::to_value)
            .collect::<Result<Vec<_>, _>>()?;
        Ok(self.with_records(records))
    }

    pub fn record_count(&self) -> usize {
        self.records.len()
    }
}
