//! Field update patches
//!
//! This module provides the validated field/value patch applied by bulk
//! updates, together with identifier validation for the field names that end
//! up in generated SQL.

use std::fmt;

/// Validation errors for storage identifiers
#[derive(Debug, Clone, PartialEq)]
pub enum IdentifierError {
    /// Name contains invalid characters (only alphanumeric and underscore allowed)
    InvalidCharacters(String),
    /// Name is too long (PostgreSQL limit is 63 characters)
    TooLong {
        name: String,
        length: usize,
        max_length: usize,
    },
    /// Name is empty
    Empty,
    /// Name starts with invalid character (must start with letter or underscore)
    InvalidStartCharacter(String),
    /// Name is a reserved SQL keyword
    ReservedKeyword(String),
}

impl fmt::Display for IdentifierError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IdentifierError::InvalidCharacters(name) => {
                write!(f, "Invalid characters in name '{}': only alphanumeric characters and underscores are allowed", name)
            }
            IdentifierError::TooLong {
                name,
                length,
                max_length,
            } => {
                write!(
                    f,
                    "Name '{}' is too long: {} characters (max {})",
                    name, length, max_length
                )
            }
            IdentifierError::Empty => {
                write!(f, "Name cannot be empty")
            }
            IdentifierError::InvalidStartCharacter(name) => {
                write!(f, "Name '{}' must start with a letter or underscore", name)
            }
            IdentifierError::ReservedKeyword(name) => {
                write!(f, "Name '{}' is a reserved SQL keyword", name)
            }
        }
    }
}

impl std::error::Error for IdentifierError {}

/// A validated field name that is safe to interpolate into SQL
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ValidatedFieldName(String);

impl ValidatedFieldName {
    /// PostgreSQL identifier length limit
    const MAX_LENGTH: usize = 63;

    const RESERVED_KEYWORDS: &'static [&'static str] = &[
        "select", "insert", "update", "delete", "from", "where", "table", "order", "group",
        "user", "join", "and", "or", "not", "null",
    ];

    pub fn new(name: &str) -> Result<Self, IdentifierError> {
        Self::validate_identifier(name)?;
        Ok(Self(name.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn validate_identifier(name: &str) -> Result<(), IdentifierError> {
        if name.is_empty() {
            return Err(IdentifierError::Empty);
        }

        if name.len() > Self::MAX_LENGTH {
            return Err(IdentifierError::TooLong {
                name: name.to_string(),
                length: name.len(),
                max_length: Self::MAX_LENGTH,
            });
        }

        let first_char = name.chars().next().ok_or(IdentifierError::Empty)?;
        if !first_char.is_ascii_alphabetic() && first_char != '_' {
            return Err(IdentifierError::InvalidStartCharacter(name.to_string()));
        }

        if !name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_')
        {
            return Err(IdentifierError::InvalidCharacters(name.to_string()));
        }

        if Self::RESERVED_KEYWORDS.contains(&name.to_ascii_lowercase().as_str()) {
            return Err(IdentifierError::ReservedKeyword(name.to_string()));
        }

        Ok(())
    }
}

/// An ordered set of field/value assignments for a bulk update.
///
/// Field names are validated at construction time, so a patch that exists is
/// safe to turn into SQL. Values are carried as JSON and coerced by the
/// backend.
#[derive(Debug, Clone, Default)]
pub struct UpdatePatch {
    fields: Vec<(ValidatedFieldName, serde_json::Value)>,
}

impl UpdatePatch {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field assignment. Replaces an earlier assignment to the same
    /// field.
    pub fn set(
        mut self,
        field: &str,
        value: impl Into<serde_json::Value>,
    ) -> Result<Self, IdentifierError> {
        let field = ValidatedFieldName::new(field)?;
        let value = value.into();
        if let Some(entry) = self.fields.iter_mut().find(|(name, _)| *name == field) {
            entry.1 = value;
        } else {
            self.fields.push((field, value));
        }
        Ok(self)
    }

    pub fn get(&self, field: &str) -> Option<&serde_json::Value> {
        self.fields
            .iter()
            .find(|(name, _)| name.as_str() == field)
            .map(|(_, value)| value)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.get(field).is_some()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &serde_json::Value)> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str(), value))
    }

    /// The patch as a JSON object, in assignment order.
    pub fn to_json_object(&self) -> serde_json::Map<String, serde_json::Value> {
        self.fields
            .iter()
            .map(|(name, value)| (name.as_str().to_string(), value.clone()))
            .collect()
    }
}
