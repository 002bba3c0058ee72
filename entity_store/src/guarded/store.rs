use async_trait::async_trait;

use crate::backend::RecordBackend;
use crate::traits::{ActivatableRecord, RecordStore};
use crate::EntityStoreError;

use super::GuardedStore;

#[async_trait]
impl<T, B> RecordStore for GuardedStore<T, B>
where
    T: ActivatableRecord,
    B: RecordBackend<T>,
{
    type Model = T;

    async fn create(&self, record: T) -> Result<T, EntityStoreError> {
        let created = self.backend.insert(record).await?;
        tracing::debug!(
            entity = T::entity_name(),
            is_active = created.is_active(),
            "record created"
        );
        Ok(created)
    }

    async fn get_by_id(&self, id: &T::Id) -> Result<Option<T>, EntityStoreError> {
        self.backend.fetch(id).await
    }

    async fn list_all(&self) -> Result<Vec<T>, EntityStoreError> {
        self.backend.fetch_all().await
    }

    async fn save(&self, record: T) -> Result<T, EntityStoreError> {
        let prior = self
            .backend
            .fetch(record.id())
            .await?
            .ok_or_else(|| EntityStoreError::not_found(T::entity_name(), record.id()))?;

        // The save path is always strict: a saved record only announces its
        // active state when that state actually changed with this write.
        let changed = prior.is_active() != record.is_active();
        let written = self.backend.write(record).await?;
        if changed {
            self.notify(std::slice::from_ref(&written), written.is_active())?;
        }
        Ok(written)
    }

    async fn count(&self) -> Result<i64, EntityStoreError> {
        self.backend.count().await
    }
}
