//! Convenience re-exports for common usage
//!
//! This prelude re-exports the most commonly used items from the
//! activatable ecosystem, making it easier to import everything you need
//! with a single use statement.
//!
//! # Example
//!
//! ```rust
//! use activatable::prelude::*;
//! ```

// Core components
pub use crate::core::ActivationRuntime;
pub use crate::errors::{ActivatableError, SchemaViolations};

// Re-export centralized config
pub use config::{AppConfig, ConfigError, DatabaseConfig, NotifierConfig};

// Re-export commonly used entity-store types
pub use entity_store::prelude::*;

// Re-export signal types for event handling
pub use activation_signals::prelude::*;

// Common external dependencies
pub use async_trait;
pub use sqlx;
pub use tokio;

// Commonly used sqlx types
pub use sqlx::{FromRow, PgPool, Row};

// Commonly used id and timestamp types
pub use chrono::{DateTime, Utc};
pub use uuid::Uuid;
