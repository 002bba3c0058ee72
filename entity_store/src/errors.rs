use thiserror::Error;

use crate::update::IdentifierError;

#[derive(Error, Debug)]
pub enum EntityStoreError {
    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error in {entity}.{field}: {reason}")]
    Validation {
        entity: String,
        field: String,
        reason: String,
    },

    #[error("Invalid identifier: {0}")]
    Identifier(#[from] IdentifierError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl EntityStoreError {
    pub fn storage(
        entity: &str,
        operation: &str,
        err: impl std::fmt::Display,
    ) -> Self {
        Self::Storage(format!("{entity}.{operation}: {err}"))
    }

    pub fn serialization(entity: &str, err: impl std::fmt::Display) -> Self {
        Self::Serialization(format!("{entity}: {err}"))
    }

    pub fn not_found(entity: &str, id: impl std::fmt::Debug) -> Self {
        Self::NotFound(format!("{entity} with id {id:?}"))
    }

    pub fn validation(
        entity: impl Into<String>,
        field: impl Into<String>,
        reason: impl Into<String>,
    ) -> Self {
        Self::Validation {
            entity: entity.into(),
            field: field.into(),
            reason: reason.into(),
        }
    }

    pub fn internal(err: impl std::fmt::Display) -> Self {
        Self::Internal(err.to_string())
    }
}
