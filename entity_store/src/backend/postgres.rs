//! PostgreSQL backend
//!
//! Drives a Postgres table through sqlx. Row payloads travel as JSONB and
//! are expanded server-side with `jsonb_populate_record`, so one generic
//! backend covers any record type that describes its table.

use std::marker::PhantomData;

use async_trait::async_trait;
use sqlx::PgPool;

use super::RecordBackend;
use crate::traits::ActivatableRecord;
use crate::update::UpdatePatch;
use crate::EntityStoreError;

/// Table description for records stored in PostgreSQL.
pub trait PgTable: ActivatableRecord {
    /// The table name in the database
    fn table_name() -> &'static str;

    /// The primary key column
    fn id_column() -> &'static str {
        "id"
    }

    /// All column names, in table order
    fn columns() -> &'static [&'static str];
}

pub struct PostgresBackend<T: PgTable> {
    pool: PgPool,
    _phantom: PhantomData<T>,
}

impl<T: PgTable> PostgresBackend<T> {
    pub fn new(pool: PgPool) -> Self {
        Self {
            pool,
            _phantom: PhantomData,
        }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    fn row_payload(record: &T) -> Result<sqlx::types::Json<serde_json::Value>, EntityStoreError> {
        let value = serde_json::to_value(record)
            .map_err(|e| EntityStoreError::serialization(T::entity_name(), e))?;
        Ok(sqlx::types::Json(value))
    }

    /// `SET col = r.col, ...` fragment for the given columns, with `r` bound
    /// to the jsonb-populated row
    fn set_fragment<'a>(columns: impl Iterator<Item = &'a str>) -> String {
        columns
            .map(|c| format!("{c} = r.{c}"))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

#[async_trait]
impl<T> RecordBackend<T> for PostgresBackend<T>
where
    T: PgTable + for<'r> sqlx::FromRow<'r, sqlx::postgres::PgRow> + Unpin,
    T::Id: for<'q> sqlx::Encode<'q, sqlx::Postgres>
        + for<'r> sqlx::Decode<'r, sqlx::Postgres>
        + sqlx::Type<sqlx::Postgres>
        + sqlx::postgres::PgHasArrayType
        + Unpin,
{
    async fn insert(&self, record: T) -> Result<T, EntityStoreError> {
        let sql = format!(
            "INSERT INTO {table} SELECT * FROM jsonb_populate_record(NULL::{table}, $1) RETURNING *",
            table = T::table_name()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(Self::row_payload(&record)?)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "insert", e))
    }

    async fn fetch(&self, id: &T::Id) -> Result<Option<T>, EntityStoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1",
            T::table_name(),
            T::id_column()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(id.clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "fetch", e))
    }

    async fn fetch_many(&self, ids: &[T::Id]) -> Result<Vec<T>, EntityStoreError> {
        let sql = format!(
            "SELECT * FROM {table} WHERE {id} = ANY($1) ORDER BY {id}",
            table = T::table_name(),
            id = T::id_column()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "fetch_many", e))
    }

    async fn fetch_all(&self) -> Result<Vec<T>, EntityStoreError> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {}",
            T::table_name(),
            T::id_column()
        );
        sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "fetch_all", e))
    }

    async fn fetch_by_active(&self, is_active: bool) -> Result<Vec<T>, EntityStoreError> {
        let sql = format!(
            "SELECT * FROM {} WHERE {} = $1 ORDER BY {}",
            T::table_name(),
            T::active_field(),
            T::id_column()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(is_active)
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "fetch_by_active", e))
    }

    async fn write(&self, record: T) -> Result<T, EntityStoreError> {
        let columns = T::columns()
            .iter()
            .copied()
            .filter(|c| *c != T::id_column());
        let sql = format!(
            "UPDATE {table} AS t SET {set} FROM jsonb_populate_record(NULL::{table}, $1) AS r \
             WHERE t.{id} = $2 RETURNING t.*",
            table = T::table_name(),
            set = Self::set_fragment(columns),
            id = T::id_column()
        );
        sqlx::query_as::<_, T>(&sql)
            .bind(Self::row_payload(&record)?)
            .bind(record.id().clone())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "write", e))?
            .ok_or_else(|| EntityStoreError::not_found(T::entity_name(), record.id()))
    }

    async fn update_fields(
        &self,
        ids: &[T::Id],
        patch: &UpdatePatch,
    ) -> Result<Vec<T>, EntityStoreError> {
        if patch.is_empty() || ids.is_empty() {
            return Ok(Vec::new());
        }
        let sql = format!(
            "UPDATE {table} AS t SET {set} FROM jsonb_populate_record(NULL::{table}, $1) AS r \
             WHERE t.{id} = ANY($2) RETURNING t.*",
            table = T::table_name(),
            set = Self::set_fragment(patch.fields().map(|(name, _)| name)),
            id = T::id_column()
        );
        let payload = sqlx::types::Json(serde_json::Value::Object(patch.to_json_object()));
        sqlx::query_as::<_, T>(&sql)
            .bind(payload)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "update_fields", e))
    }

    async fn remove(&self, ids: &[T::Id]) -> Result<Vec<T::Id>, EntityStoreError> {
        let sql = format!(
            "DELETE FROM {table} WHERE {id} = ANY($1) RETURNING {id}",
            table = T::table_name(),
            id = T::id_column()
        );
        sqlx::query_scalar::<_, T::Id>(&sql)
            .bind(ids.to_vec())
            .fetch_all(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "remove", e))
    }

    async fn count(&self) -> Result<i64, EntityStoreError> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::table_name());
        sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "count", e))
    }

    async fn count_by_active(&self, is_active: bool) -> Result<i64, EntityStoreError> {
        let sql = format!(
            "SELECT COUNT(*) FROM {} WHERE {} = $1",
            T::table_name(),
            T::active_field()
        );
        sqlx::query_scalar::<_, i64>(&sql)
            .bind(is_active)
            .fetch_one(&self.pool)
            .await
            .map_err(|e| EntityStoreError::storage(T::entity_name(), "count_by_active", e))
    }
}
