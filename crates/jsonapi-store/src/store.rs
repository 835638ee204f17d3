//! The store that validators and request handlers resolve identifiers through.

use std::sync::Arc;

use jsonapi_core::{ResourceIdentifier, ResourceIdentifierCollection};
use tracing::debug;

use crate::adapter::{Adapter, AdapterContainer};
use crate::error::{Result, StoreError};
use crate::record::Record;

/// Resolves resource identifiers to domain records.
///
/// Identifiers without an id never resolve. Lookups are synchronous.
pub trait Store: Send + Sync {
    /// Whether the store knows the resource type at all.
    fn is_type(&self, resource_type: &str) -> bool;

    fn exists(&self, identifier: &ResourceIdentifier) -> Result<bool>;

    fn find(&self, identifier: &ResourceIdentifier) -> Result<Option<Record>>;

    /// Like [`find`](Self::find), but absence is [`StoreError::NotFound`].
    fn find_or_fail(&self, identifier: &ResourceIdentifier) -> Result<Record> {
        self.find(identifier)?.ok_or_else(|| {
            StoreError::not_found(identifier.resource_type(), identifier.id().unwrap_or_default())
        })
    }

    /// Records for every identifier that resolves, in collection order.
    fn find_many(&self, identifiers: &ResourceIdentifierCollection) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(identifiers.len());
        for identifier in identifiers {
            if let Some(record) = self.find(identifier)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// A [`Store`] that dispatches to per-type adapters.
///
/// Every lookup reaches the adapter. The store lives as long as the
/// validators built over it, so it keeps no records of its own.
#[derive(Debug, Default)]
pub struct ResourceStore {
    adapters: AdapterContainer,
}

impl ResourceStore {
    pub fn new(adapters: AdapterContainer) -> Self {
        Self { adapters }
    }

    pub fn adapters(&self) -> &AdapterContainer {
        &self.adapters
    }

    fn adapter(&self, resource_type: &str) -> Result<&Arc<dyn Adapter>> {
        self.adapters
            .get(resource_type)
            .ok_or_else(|| StoreError::UnknownType(resource_type.to_string()))
    }
}

impl Store for ResourceStore {
    fn is_type(&self, resource_type: &str) -> bool {
        self.adapters.has(resource_type)
    }

    fn exists(&self, identifier: &ResourceIdentifier) -> Result<bool> {
        let Some(id) = identifier.id() else {
            return Ok(false);
        };

        let exists = self.adapter(identifier.resource_type())?.exists(id)?;
        debug!("Resource {} exists: {}", identifier, exists);
        Ok(exists)
    }

    fn find(&self, identifier: &ResourceIdentifier) -> Result<Option<Record>> {
        let Some(id) = identifier.id() else {
            return Ok(None);
        };

        let record = self.adapter(identifier.resource_type())?.find(id)?;
        debug!("Resolved {}: {}", identifier, record.is_some());
        Ok(record)
    }
}
