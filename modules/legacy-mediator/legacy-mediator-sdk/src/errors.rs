//! Public error types for the `legacy_mediator` module.
//!
//! These errors are safe to expose to other modules and consumers.

use thiserror::Error;

/// Errors that can be returned by `RecordStorage`.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MediatorError {
    /// The id is not a well-formed integer where one is required.
    #[error("Invalid identifier: '{id}'")]
    InvalidIdentifier { id: String },

    /// A keyed lookup found no rows.
    #[error("Record not found: {record_type} with id {id}")]
    NotFound { record_type: String, id: String },

    /// The operation has no defined behavior for the record type.
    #[error("{operation} is not implemented for {record_type}")]
    NotImplemented {
        operation: String,
        record_type: String,
    },

    /// The supplied record, filter or stored data is malformed.
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// The execution facility failed.
    #[error("Backend failure: {message}")]
    Backend { message: String },
}

impl MediatorError {
    #[must_use]
    pub fn invalid_identifier(id: impl Into<String>) -> Self {
        Self::InvalidIdentifier { id: id.into() }
    }

    #[must_use]
    pub fn not_found(record_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            record_type: record_type.into(),
            id: id.into(),
        }
    }

    #[must_use]
    pub fn not_implemented(operation: impl Into<String>, record_type: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation: operation.into(),
            record_type: record_type.into(),
        }
    }

    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    #[must_use]
    pub fn backend(message: impl Into<String>) -> Self {
        Self::Backend {
            message: message.into(),
        }
    }
}
