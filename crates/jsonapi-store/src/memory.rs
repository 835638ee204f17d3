//! In-memory adapter.

use std::any::Any;

use dashmap::DashMap;
use jsonapi_core::ResourceIdentifier;
use serde_json::Value;

use crate::adapter::{Adapter, AdapterContainer};
use crate::error::{Result, StoreError};
use crate::record::Record;

/// Holds the records of one resource type in memory.
#[derive(Debug)]
pub struct MemoryAdapter {
    resource_type: String,
    records: DashMap<String, Record>,
}

impl MemoryAdapter {
    pub fn new(resource_type: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            records: DashMap::new(),
        }
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    /// Store a domain value under `id`, replacing any previous record.
    pub fn insert<T: Any + Send + Sync>(&self, id: impl Into<String>, value: T) -> Record {
        let id = id.into();
        let record = Record::new(ResourceIdentifier::new(self.resource_type.clone(), id.clone()), value);
        self.records.insert(id, record.clone());
        record
    }

    /// Seed from JSON values keyed by id. Each record holds its JSON value.
    pub fn with_json<I>(self, records: I) -> Self
    where
        I: IntoIterator<Item = (String, Value)>,
    {
        for (id, value) in records {
            self.insert(id, value);
        }
        self
    }

    pub fn remove(&self, id: &str) -> Option<Record> {
        self.records.remove(id).map(|(_, record)| record)
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Build one [`MemoryAdapter`] per type from seed records shaped as
/// `{"<type>": [{"id": "1", ...}, ...], ...}`. Each record holds its JSON
/// object, including the `id` member.
pub fn adapters_from_json(seed: &Value) -> Result<AdapterContainer> {
    let types = seed
        .as_object()
        .ok_or_else(|| StoreError::InvalidSeed("expecting an object keyed by resource type".to_string()))?;

    let mut container = AdapterContainer::new();
    for (resource_type, records) in types {
        let records = records.as_array().ok_or_else(|| {
            StoreError::InvalidSeed(format!("records for '{}' must be an array", resource_type))
        })?;

        let adapter = MemoryAdapter::new(resource_type.clone());
        for (index, record) in records.iter().enumerate() {
            let id = match record.get("id") {
                Some(Value::String(id)) => id.clone(),
                Some(Value::Number(id)) => id.to_string(),
                _ => {
                    return Err(StoreError::InvalidSeed(format!(
                        "record {} of '{}' has no id",
                        index, resource_type
                    )))
                }
            };
            adapter.insert(id, record.clone());
        }

        tracing::debug!("Seeded {} '{}' record(s)", adapter.len(), resource_type);
        container.register(resource_type.clone(), std::sync::Arc::new(adapter));
    }

    Ok(container)
}

impl Adapter for MemoryAdapter {
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.records.contains_key(id))
    }

    fn find(&self, id: &str) -> Result<Option<Record>> {
        Ok(self.records.get(id).map(|entry| entry.value().clone()))
    }
}
