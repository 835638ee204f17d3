//! Error types for validator construction and configuration.
//!
//! Neither type describes client input. Problems with a request document
//! are reported as an [`ErrorCollection`](jsonapi_core::ErrorCollection).

use std::path::PathBuf;

use jsonapi_core::error::UnknownErrorCode;
use jsonapi_store::StoreError;
use thiserror::Error;

/// Fatal failures while running or selecting validators.
#[derive(Error, Debug)]
pub enum ValidatorError {
    #[error("Resource type '{resource_type}' has no relationship '{key}'")]
    UnknownRelationship { resource_type: String, key: String },

    #[error("No validators configured for resource type '{0}'")]
    UnknownResourceType(String),

    #[error("Store lookup failed: {0}")]
    Store(#[from] StoreError),

    #[error("Invalid validator configuration: {0}")]
    Configuration(String),
}

/// Failures loading a validation schema.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read schema {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse schema: {0}")]
    Parse(#[from] toml::de::Error),

    #[error(transparent)]
    UnknownErrorCode(#[from] UnknownErrorCode),

    #[error("Invalid pattern for attribute '{attribute}': {source}")]
    InvalidPattern {
        attribute: String,
        #[source]
        source: regex::Error,
    },

    #[error("Resource type '{0}' is declared more than once")]
    DuplicateResource(String),

    #[error("Relationship '{key}' of '{resource_type}' {reason}")]
    InvalidRelationship {
        resource_type: String,
        key: String,
        reason: String,
    },
}
