//! Core runtime coordination
//!
//! This module contains the `ActivationRuntime`, the startup-time
//! coordinator that owns the signal registry, runs the cascade-delete
//! schema pass exactly once, and hands out registered stores.

use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use activation_signals::ActivationRegistry;
use config::{DatabaseConfig, NotifierConfig};
use entity_store::traits::RecordStore;
use entity_store::{ActivatableRecord, RelationDecl, SchemaRegistry};

use crate::errors::{ActivatableError, SchemaViolations};

/// Application-level coordinator for activatable entities.
///
/// Lifecycle: declare entities and relations, call [`initialize`] once (the
/// cascade-delete validation pass runs here and aborts startup on
/// violations), then register and use stores. [`shutdown`] clears the
/// observer registry at process teardown.
///
/// [`initialize`]: ActivationRuntime::initialize
/// [`shutdown`]: ActivationRuntime::shutdown
pub struct ActivationRuntime {
    signals: Arc<ActivationRegistry>,
    schema: SchemaRegistry,
    notifier: NotifierConfig,
    pool: Option<PgPool>,
    stores: HashMap<String, Box<dyn std::any::Any + Send + Sync>>,
    initialized: bool,
}

impl ActivationRuntime {
    pub fn new() -> Self {
        Self::with_notifier(NotifierConfig::default())
    }

    pub fn with_notifier(notifier: NotifierConfig) -> Self {
        Self {
            signals: Arc::new(ActivationRegistry::new()),
            schema: SchemaRegistry::new(),
            notifier,
            pool: None,
            stores: HashMap::new(),
            initialized: false,
        }
    }

    /// Create a runtime with a PostgreSQL connection pool for
    /// [`PostgresBackend`](entity_store::PostgresBackend) stores.
    pub async fn with_database(
        database: DatabaseConfig,
        notifier: NotifierConfig,
    ) -> Result<Self, ActivatableError> {
        let connection_string = database.connection_string();

        let mut pool_options = sqlx::postgres::PgPoolOptions::new()
            .max_connections(database.max_connections)
            .min_connections(database.min_connections)
            .idle_timeout(Duration::from_secs(database.idle_timeout_seconds));

        if database.max_lifetime_seconds > 0 {
            pool_options =
                pool_options.max_lifetime(Duration::from_secs(database.max_lifetime_seconds));
        }

        let pool = pool_options.connect(&connection_string).await?;

        let mut runtime = Self::with_notifier(notifier);
        runtime.pool = Some(pool);
        Ok(runtime)
    }

    /// The shared observer registry, for subscribing and for injecting into
    /// stores.
    pub fn signals(&self) -> Arc<ActivationRegistry> {
        self.signals.clone()
    }

    pub fn notifier_config(&self) -> &NotifierConfig {
        &self.notifier
    }

    /// Get database pool reference, if the runtime was created with one
    pub fn pool(&self) -> Option<&PgPool> {
        self.pool.as_ref()
    }

    /// Mark a record type as activatable in the schema pass.
    pub fn register_entity<T: ActivatableRecord>(&mut self) -> Result<(), ActivatableError> {
        if self.initialized {
            return Err(ActivatableError::AlreadyInitialized);
        }
        self.schema.register_entity::<T>();
        Ok(())
    }

    /// Declare a foreign-key-like reference for the schema pass.
    pub fn declare_relation(&mut self, relation: RelationDecl) -> Result<(), ActivatableError> {
        if self.initialized {
            return Err(ActivatableError::AlreadyInitialized);
        }
        self.schema.declare_relation(relation);
        Ok(())
    }

    pub fn schema(&self) -> &SchemaRegistry {
        &self.schema
    }

    /// Run the cascade-delete validation pass over every declared relation.
    ///
    /// Runs exactly once per runtime; violations are fatal and leave the
    /// runtime uninitialized, so no store can be registered on top of an
    /// invalid schema.
    pub fn initialize(&mut self) -> Result<(), ActivatableError> {
        if self.initialized {
            return Err(ActivatableError::AlreadyInitialized);
        }
        self.schema
            .validate()
            .map_err(|violations| ActivatableError::Schema(SchemaViolations(violations)))?;
        self.initialized = true;
        tracing::debug!(
            entities = self.schema.activatable_entities().count(),
            relations = self.schema.relations().len(),
            "schema validated"
        );
        Ok(())
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Register a store object with a given name
    pub fn register_store<T>(&mut self, name: String, store: T) -> Result<(), ActivatableError>
    where
        T: RecordStore + 'static,
    {
        if !self.initialized {
            return Err(ActivatableError::NotInitialized);
        }
        if self.stores.contains_key(&name) {
            return Err(ActivatableError::StoreAlreadyRegistered(name));
        }

        self.stores.insert(name, Box::new(store));
        Ok(())
    }

    /// Get a registered store object by name
    pub fn get_store<T>(&self, name: &str) -> Result<&T, ActivatableError>
    where
        T: RecordStore + 'static,
    {
        self.stores
            .get(name)
            .and_then(|store| store.downcast_ref::<T>())
            .ok_or_else(|| ActivatableError::StoreNotFound(name.to_string()))
    }

    /// Get a mutable reference to a registered store object by name
    pub fn get_store_mut<T>(&mut self, name: &str) -> Result<&mut T, ActivatableError>
    where
        T: RecordStore + 'static,
    {
        self.stores
            .get_mut(name)
            .and_then(|store| store.downcast_mut::<T>())
            .ok_or_else(|| ActivatableError::StoreNotFound(name.to_string()))
    }

    /// List all registered store names
    pub fn list_stores(&self) -> Vec<&String> {
        self.stores.keys().collect()
    }

    /// Remove a store object by name
    pub fn unregister_store(&mut self, name: &str) -> Result<(), ActivatableError> {
        self.stores
            .remove(name)
            .map(|_| ())
            .ok_or_else(|| ActivatableError::StoreNotFound(name.to_string()))
    }

    /// Check database connection health
    pub async fn health_check(&self) -> Result<(), ActivatableError> {
        let pool = self.pool.as_ref().ok_or(ActivatableError::NotConnected)?;
        sqlx::query("SELECT 1").fetch_one(pool).await?;
        Ok(())
    }

    /// Drop every registered observer. Intended for process teardown.
    pub fn shutdown(&self) {
        self.signals.clear();
    }
}

impl Default for ActivationRuntime {
    fn default() -> Self {
        Self::new()
    }
}
