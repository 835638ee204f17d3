//! Store error types.

use thiserror::Error;

/// Failures resolving resource identifiers.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The identified resource does not exist.
    #[error("Resource {resource_type}:{id} not found")]
    NotFound { resource_type: String, id: String },

    /// No adapter is registered for the resource type. This is a
    /// configuration error, not a client error.
    #[error("No adapter registered for resource type '{0}'")]
    UnknownType(String),

    /// The backing adapter failed.
    #[error("Adapter for '{resource_type}' failed: {message}")]
    Adapter {
        resource_type: String,
        message: String,
    },

    /// Seed data for an in-memory store is malformed.
    #[error("Invalid seed records: {0}")]
    InvalidSeed(String),
}

impl StoreError {
    pub fn not_found(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            resource_type: resource_type.into(),
            id: id.into(),
        }
    }

    pub fn adapter(resource_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Adapter {
            resource_type: resource_type.into(),
            message: message.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type Result<T> = std::result::Result<T, StoreError>;
