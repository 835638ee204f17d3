//! Per-type store adapters.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::warn;

use crate::error::Result;
use crate::record::Record;

/// Looks up records of one resource type by id.
pub trait Adapter: Send + Sync {
    fn exists(&self, id: &str) -> Result<bool> {
        Ok(self.find(id)?.is_some())
    }

    fn find(&self, id: &str) -> Result<Option<Record>>;

    /// Records for each id that exists, in the order given.
    fn find_many(&self, ids: &[String]) -> Result<Vec<Record>> {
        let mut records = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(record) = self.find(id)? {
                records.push(record);
            }
        }
        Ok(records)
    }
}

/// Adapters keyed by the resource type they serve.
#[derive(Clone, Default)]
pub struct AdapterContainer {
    adapters: HashMap<String, Arc<dyn Adapter>>,
}

impl AdapterContainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an adapter, replacing any existing one for the type.
    pub fn register(&mut self, resource_type: impl Into<String>, adapter: Arc<dyn Adapter>) -> &mut Self {
        let resource_type = resource_type.into();
        if self.adapters.insert(resource_type.clone(), adapter).is_some() {
            warn!("Replacing existing adapter for resource type '{}'", resource_type);
        }
        self
    }

    pub fn with(mut self, resource_type: impl Into<String>, adapter: Arc<dyn Adapter>) -> Self {
        self.register(resource_type, adapter);
        self
    }

    pub fn get(&self, resource_type: &str) -> Option<&Arc<dyn Adapter>> {
        self.adapters.get(resource_type)
    }

    pub fn has(&self, resource_type: &str) -> bool {
        self.adapters.contains_key(resource_type)
    }

    /// Registered resource types, sorted.
    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<&str> = self.adapters.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl std::fmt::Debug for AdapterContainer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdapterContainer")
            .field("types", &self.types())
            .finish()
    }
}
