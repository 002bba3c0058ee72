//! # Activatable
//!
//! A soft-delete activation layer for Rust data stores. Deleting an
//! activatable record flips its active flag instead of removing it, every
//! activation-state write is announced synchronously to registered
//! observers, and a startup-time schema pass rejects references that could
//! cascade-delete an activatable record behind the guard's back.
//!
//! ## Quick Start
//!
//! ```rust
//! use activatable::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Debug, Clone, Default, Serialize, Deserialize)]
//! pub struct Account {
//!     pub id: u32,
//!     pub name: String,
//!     pub is_active: bool,
//! }
//!
//! impl ActivatableRecord for Account {
//!     type Id = u32;
//!
//!     fn entity_name() -> &'static str {
//!         "account"
//!     }
//!
//!     fn id(&self) -> &u32 {
//!         &self.id
//!     }
//!
//!     fn is_active(&self) -> bool {
//!         self.is_active
//!     }
//!
//!     fn set_active(&mut self, is_active: bool) {
//!         self.is_active = is_active;
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut runtime = ActivationRuntime::new();
//!     runtime.register_entity::<Account>()?;
//!     runtime.declare_relation(
//!         RelationDecl::new("invoice", "account_ref", "account")
//!             .on_delete(OnDelete::Protect),
//!     )?;
//!     runtime.initialize()?;
//!
//!     runtime.signals().subscribe("account", |event| {
//!         println!("{} -> active={}", event.entity, event.is_active);
//!     });
//!
//!     let store: GuardedStore<Account, MemoryBackend<Account>> =
//!         GuardedStore::new(MemoryBackend::new(), Some(runtime.signals()));
//!     runtime.register_store("accounts".to_string(), store)?;
//!     let store =
//!         runtime.get_store::<GuardedStore<Account, MemoryBackend<Account>>>("accounts")?;
//!
//!     let account = store
//!         .create(Account { id: 1, name: "Ada".to_string(), is_active: true })
//!         .await?;
//!
//!     // Soft delete: the record stays, inactive, and observers hear it.
//!     store.delete(account.id(), false).await?;
//!     assert!(store.get_by_id(&1).await?.is_some());
//!
//!     Ok(())
//! }
//! ```

/// Conditional debug logging macros
/// These macros only compile in code when the `debug-logging` feature is enabled
#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        tracing::debug!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {};
}

#[cfg(feature = "debug-logging")]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {
        tracing::trace!($($arg)*)
    };
}

#[cfg(not(feature = "debug-logging"))]
#[macro_export]
macro_rules! trace_log {
    ($($arg:tt)*) => {};
}

pub mod core;
pub mod errors;
pub mod prelude;

// Re-export the main public types for convenience
pub use core::ActivationRuntime;
pub use errors::{ActivatableError, SchemaViolations};

// Re-export centralized config
pub use config::{AppConfig, DatabaseConfig, NotifierConfig};

// Re-export internal crates used by the public API
pub use activation_signals;
pub use entity_store;

// Re-export external dependencies used in public API
pub use async_trait;
pub use sqlx;
