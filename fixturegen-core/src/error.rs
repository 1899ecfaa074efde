//! Error types for fixture generation and record introspection.

use thiserror::Error;

/// Main error type for fixturegen operations.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FixtureError {
    /// The type tag matched no built-in category and the custom hook declined it.
    #[error("Unsupported value type '{tag}'")]
    UnsupportedType { tag: String },

    /// A character class name outside the fixed registry was requested.
    #[error("Unknown character class '{name}'")]
    UnknownCharacterClass { name: String },

    /// Neither a direct property nor an accessor resolved the field.
    #[error("Field '{field}' wasn't found in '{type_name}' object")]
    FieldNotFound { field: String, type_name: String },

    /// The introspection target is not a structured record.
    #[error("Value of kind '{kind}' is not an object")]
    NotAnObject { kind: String },

    /// A typed property was given a value of another kind.
    #[error("Field '{field}' expects {expected}, got {found}")]
    FieldTypeMismatch {
        field: String,
        expected: String,
        found: String,
    },

    /// String generation was asked for characters from an empty set.
    #[error("Cannot generate {length} characters from an empty character set")]
    EmptyCharacterSet { length: usize },

    /// The uniqueness loop ran out of its configured retry budget.
    #[error("No unique value found for key {key:?} after {attempts} attempts")]
    UniquenessExhausted {
        key: Option<String>,
        attempts: usize,
    },

    /// A constraint could not be parsed or carries an invalid parameter.
    #[error("Invalid constraint: {message}")]
    InvalidConstraint { message: String },

    /// A field table is malformed or names a field it has no rule for.
    #[error("Invalid field table: {message}")]
    InvalidTable { message: String },

    /// The content repository collaborator reported a failure.
    #[error("Repository error: {message}")]
    Repository { message: String },
}

impl FixtureError {
    /// Build a `FieldNotFound` for `field` on an object of `type_name`.
    pub fn field_not_found(field: &str, type_name: &str) -> Self {
        FixtureError::FieldNotFound {
            field: field.to_string(),
            type_name: type_name.to_string(),
        }
    }

    /// Build an `InvalidConstraint` from any message.
    pub fn invalid_constraint(message: impl Into<String>) -> Self {
        FixtureError::InvalidConstraint {
            message: message.into(),
        }
    }

    /// Build an `InvalidTable` from any message.
    pub fn invalid_table(message: impl Into<String>) -> Self {
        FixtureError::InvalidTable {
            message: message.into(),
        }
    }

    /// Build a `Repository` error from any message.
    pub fn repository(message: impl Into<String>) -> Self {
        FixtureError::Repository {
            message: message.into(),
        }
    }
}

/// Result type for fixturegen operations.
pub type Result<T> = std::result::Result<T, FixtureError>;
