//! Copying validated resource objects onto domain records.
//!
//! A [`Hydrator`] fills attributes first and then each relationship it has
//! a hook for. Relationships without a hook are skipped by
//! [`hydrate`](Hydrator::hydrate) but are an error when asked for by name
//! through [`hydrate_relationship`](Hydrator::hydrate_relationship).

use jsonapi_core::{DocumentError, Relationship, ResourceObject, StandardObject};
use thiserror::Error;
use tracing::debug;

/// Failures while hydrating a record.
#[derive(Error, Debug)]
pub enum HydratorError {
    #[error("Cannot hydrate relationship: {0}")]
    UnsupportedRelationship(String),

    #[error("Invalid value for attribute '{key}': {reason}")]
    InvalidAttribute { key: String, reason: String },

    #[error("Invalid relationship '{key}': {source}")]
    InvalidRelationship {
        key: String,
        #[source]
        source: DocumentError,
    },
}

impl HydratorError {
    pub fn invalid_attribute(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAttribute {
            key: key.into(),
            reason: reason.into(),
        }
    }

    pub fn invalid_relationship(key: impl Into<String>, source: DocumentError) -> Self {
        Self::InvalidRelationship { key: key.into(), source }
    }
}

/// Hydrates one relationship onto a record.
pub type RelationshipHook<H, R> = fn(&H, &Relationship, &mut R) -> Result<(), HydratorError>;

/// Transfers data from resource objects to records of type `R`.
pub trait Hydrator<R>: Sized {
    fn hydrate_attributes(&self, attributes: &StandardObject, record: &mut R) -> Result<(), HydratorError>;

    /// The hook for relationship `key`, or `None` if this hydrator does not
    /// handle it.
    fn relationship_hook(&self, key: &str) -> Option<RelationshipHook<Self, R>>;

    /// Hydrate the attributes, then every relationship that has a hook, in
    /// document order.
    fn hydrate(&self, resource: &ResourceObject, record: &mut R) -> Result<(), HydratorError> {
        self.hydrate_attributes(&resource.attributes(), record)?;

        for (key, relationship) in resource.relationships().iter() {
            match self.relationship_hook(&key) {
                Some(hook) => hook(self, &relationship, record)?,
                None => debug!("No hydrator hook for relationship '{}'", key),
            }
        }
        Ok(())
    }

    /// Hydrate a single relationship, as for a relationship endpoint.
    fn hydrate_relationship(&self, key: &str, relationship: &Relationship, record: &mut R) -> Result<(), HydratorError> {
        let hook = self
            .relationship_hook(key)
            .ok_or_else(|| HydratorError::UnsupportedRelationship(key.to_string()))?;
        hook(self, relationship, record)
    }

    /// A new record hydrated from `resource`.
    fn create(&self, resource: &ResourceObject) -> Result<R, HydratorError>
    where
        R: Default,
    {
        let mut record = R::default();
        self.hydrate(resource, &mut record)?;
        Ok(record)
    }
}
