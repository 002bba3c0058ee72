//! In-memory backend
//!
//! Keeps records in a `Vec` behind an `RwLock`, in insertion order. Intended
//! for tests and demos; patches are applied through a serde round trip so
//! the same field-name semantics hold as for the SQL backend.

use std::sync::RwLock;

use async_trait::async_trait;

use super::RecordBackend;
use crate::traits::ActivatableRecord;
use crate::update::UpdatePatch;
use crate::EntityStoreError;

pub struct MemoryBackend<T: ActivatableRecord> {
    records: RwLock<Vec<T>>,
}

impl<T: ActivatableRecord> MemoryBackend<T> {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(Vec::new()),
        }
    }

    fn read(&self) -> Result<std::sync::RwLockReadGuard<'_, Vec<T>>, EntityStoreError> {
        self.records
            .read()
            .map_err(|_| EntityStoreError::internal("record lock poisoned"))
    }

    fn write_lock(&self) -> Result<std::sync::RwLockWriteGuard<'_, Vec<T>>, EntityStoreError> {
        self.records
            .write()
            .map_err(|_| EntityStoreError::internal("record lock poisoned"))
    }

    fn apply_patch(record: &T, patch: &UpdatePatch) -> Result<T, EntityStoreError> {
        let mut value = serde_json::to_value(record)
            .map_err(|e| EntityStoreError::serialization(T::entity_name(), e))?;
        let object = value.as_object_mut().ok_or_else(|| {
            EntityStoreError::serialization(
                T::entity_name(),
                "record did not serialize to an object",
            )
        })?;

        for (field, new_value) in patch.fields() {
            if !object.contains_key(field) {
                return Err(EntityStoreError::validation(
                    T::entity_name(),
                    field,
                    "unknown field",
                ));
            }
            object.insert(field.to_string(), new_value.clone());
        }

        serde_json::from_value(value)
            .map_err(|e| EntityStoreError::serialization(T::entity_name(), e))
    }
}

impl<T: ActivatableRecord> Default for MemoryBackend<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: ActivatableRecord> RecordBackend<T> for MemoryBackend<T> {
    async fn insert(&self, record: T) -> Result<T, EntityStoreError> {
        let mut records = self.write_lock()?;
        if records.iter().any(|r| r.id() == record.id()) {
            return Err(EntityStoreError::validation(
                T::entity_name(),
                "id",
                format!("duplicate id {:?}", record.id()),
            ));
        }
        records.push(record.clone());
        Ok(record)
    }

    async fn fetch(&self, id: &T::Id) -> Result<Option<T>, EntityStoreError> {
        Ok(self.read()?.iter().find(|r| r.id() == id).cloned())
    }

    async fn fetch_many(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| ids.contains(r.id()))
            .cloned()
            .collect())
    }

    async fn fetch_all(&self) -> Result<Vec<T>, EntityStoreError> {
        Ok(self.read()?.clone())
    }

    async fn fetch_by_active(&self, is_active: bool) -> Result<Vec<T>, EntityStoreError> {
        Ok(self
            .read()?
            .iter()
            .filter(|r| r.is_active() == is_active)
            .cloned()
            .collect())
    }

    async fn write(&self, record: T) -> Result<T, EntityStoreError> {
        let mut records = self.write_lock()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id() == record.id())
            .ok_or_else(|| EntityStoreError::not_found(T::entity_name(), record.id()))?;
        *slot = record.clone();
        Ok(record)
    }

    async fn update_fields(
        &self,
        ids: &[T::Id],
        patch: &UpdatePatch,
    ) -> Result<Vec<T>, EntityStoreError> {
        // Same contract as the SQL backend: nothing to write, nothing touched.
        if patch.is_empty() || ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut records = self.write_lock()?;
        let mut updated = Vec::new();
        for record in records.iter_mut() {
            if ids.contains(record.id()) {
                let patched = Self::apply_patch(record, patch)?;
                *record = patched.clone();
                updated.push(patched);
            }
        }
        Ok(updated)
    }

    async fn remove(&self, ids: &[T::Id]) -> Result<Vec<T::Id>, EntityStoreError> {
        let mut records = self.write_lock()?;
        let mut removed = Vec::new();
        records.retain(|r| {
            if ids.contains(r.id()) {
                removed.push(r.id().clone());
                false
            } else {
                true
            }
        });
        Ok(removed)
    }

    async fn count(&self) -> Result<i64, EntityStoreError> {
        Ok(self.read()?.len() as i64)
    }

    async fn count_by_active(&self, is_active: bool) -> Result<i64, EntityStoreError> {
        Ok(self.read()?.iter().filter(|r| r.is_active() == is_active).count() as i64)
    }
}
