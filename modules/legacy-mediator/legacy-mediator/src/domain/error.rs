use legacy_mediator_sdk::MediatorError;
use thiserror::Error;

/// Domain-specific errors using thiserror
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("Invalid identifier: '{id}'")]
    InvalidIdentifier { id: String },

    #[error("{record_type} not found: {id}")]
    NotFound { record_type: String, id: String },

    #[error("{operation} is not implemented for {record_type}")]
    NotImplemented {
        operation: &'static str,
        record_type: String,
    },

    #[error("Validation failed: {message}")]
    Validation { message: String },

    #[error("Backend failure: {source:#}")]
    Backend {
        #[source]
        source: anyhow::Error,
    },
}

impl DomainError {
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
    pub fn not_implemented(operation: &'static str, record_type: impl Into<String>) -> Self {
        Self::NotImplemented {
            operation,
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
    pub fn backend(source: anyhow::Error) -> Self {
        Self::Backend { source }
    }
}

/// Parse a record id that must be integer-valued.
///
/// # Errors
/// Returns `DomainError::InvalidIdentifier` when `id` is not a well-formed integer.
pub fn parse_id(id: &str) -> Result<i64, DomainError> {
    id.parse::<i64>()
        .map_err(|_| DomainError::invalid_identifier(id))
}

/// Convert domain errors to SDK errors for public API consumption.
impl From<DomainError> for MediatorError {
    fn from(domain_error: DomainError) -> Self {
        match domain_error {
            DomainError::InvalidIdentifier { id } => MediatorError::invalid_identifier(id),
            DomainError::NotFound { record_type, id } => MediatorError::not_found(record_type, id),
            DomainError::NotImplemented {
                operation,
                record_type,
            } => MediatorError::not_implemented(operation, record_type),
            DomainError::Validation { message } => MediatorError::validation(message),
            DomainError::Backend { source } => MediatorError::backend(format!("{source:#}")),
        }
    }
}
