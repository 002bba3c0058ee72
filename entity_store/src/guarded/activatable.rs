use async_trait::async_trait;

use crate::backend::RecordBackend;
use crate::traits::{Activatable, ActivatableRecord, DeleteOutcome};
use crate::update::UpdatePatch;
use crate::EntityStoreError;

use super::GuardedStore;

#[async_trait]
impl<T, B> Activatable for GuardedStore<T, B>
where
    T: ActivatableRecord,
    B: RecordBackend<T>,
{
    async fn delete(
        &self,
        id: &T::Id,
        force: bool,
    ) -> Result<DeleteOutcome<T>, EntityStoreError> {
        self.delete_many(std::slice::from_ref(id), force).await
    }

    async fn delete_many(
        &self,
        ids: &[T::Id],
        force: bool,
    ) -> Result<DeleteOutcome<T>, EntityStoreError> {
        if force {
            // Real removal exits the state machine; it is not an activation
            // change, so the notifier is bypassed.
            let removed = self.backend.remove(ids).await?;
            tracing::debug!(
                entity = T::entity_name(),
                removed = removed.len(),
                "records force-deleted"
            );
            return Ok(DeleteOutcome::Removed(removed));
        }

        let deactivated = self.write_active(ids, false).await?;
        Ok(DeleteOutcome::Deactivated(deactivated))
    }

    async fn activate(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError> {
        self.write_active(ids, true).await
    }

    async fn deactivate(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError> {
        self.write_active(ids, false).await
    }

    async fn bulk_update(
        &self,
        ids: &[T::Id],
        patch: UpdatePatch,
    ) -> Result<Vec<T>, EntityStoreError> {
        let Some(active_value) = patch.get(T::active_field()) else {
            // Patch does not touch the active field: plain update, no event.
            return self.backend.update_fields(ids, &patch).await;
        };

        let is_active = active_value.as_bool().ok_or_else(|| {
            EntityStoreError::validation(
                T::entity_name(),
                T::active_field(),
                "active field requires a boolean value",
            )
        })?;

        let changed_ids = self.changed_ids(ids, is_active).await?;
        let updated = self.backend.update_fields(ids, &patch).await?;

        match &changed_ids {
            Some(changed) => {
                let to_notify: Vec<T> = updated
                    .iter()
                    .filter(|r| changed.contains(r.id()))
                    .cloned()
                    .collect();
                self.notify(&to_notify, is_active)?;
            }
            None => self.notify(&updated, is_active)?,
        }
        Ok(updated)
    }

    async fn list_active(&self) -> Result<Vec<T>, EntityStoreError> {
        self.backend.fetch_by_active(true).await
    }

    async fn count_active(&self) -> Result<i64, EntityStoreError> {
        self.backend.count_by_active(true).await
    }
}
