//! Error types for the activatable crate
//!
//! This module contains all error types that can be returned by runtime
//! coordination operations.

use std::fmt;

use entity_store::SchemaViolation;
use thiserror::Error;

/// Cascade-delete violations found by the schema pass, reported together.
#[derive(Debug, Clone)]
pub struct SchemaViolations(pub Vec<SchemaViolation>);

impl fmt::Display for SchemaViolations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let messages: Vec<String> = self.0.iter().map(|v| v.to_string()).collect();
        write!(f, "{}", messages.join("; "))
    }
}

#[derive(Error, Debug)]
pub enum ActivatableError {
    #[error("Database connection error: {0}")]
    DatabaseConnection(#[from] sqlx::Error),

    #[error("Schema validation failed: {0}")]
    Schema(SchemaViolations),

    #[error("Runtime has not been initialized; call initialize() before registering stores")]
    NotInitialized,

    #[error("Runtime is already initialized")]
    AlreadyInitialized,

    #[error("No database configured for this runtime")]
    NotConnected,

    #[error("Store not found: {0}")]
    StoreNotFound(String),

    #[error("Store already registered: {0}")]
    StoreAlreadyRegistered(String),
}
