//! Ordered, de-duplicated collection of resource identifiers.

use std::collections::HashMap;

use indexmap::{IndexMap, IndexSet};
use serde_json::Value;

use super::{ObjectError, ResourceIdentifier};

/// Resource identifiers in insertion order, unique by `(type, id)`.
///
/// Adding an identifier that is already present is a no-op.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResourceIdentifierCollection {
    stack: IndexSet<ResourceIdentifier>,
}

impl ResourceIdentifierCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build from a decoded array of identifier objects.
    pub fn from_values(values: &[Value]) -> Result<Self, ObjectError> {
        values.iter().map(ResourceIdentifier::from_value).collect()
    }

    /// Add an identifier unless an equal one is already present.
    pub fn add(&mut self, identifier: ResourceIdentifier) -> &mut Self {
        self.stack.insert(identifier);
        self
    }

    pub fn has(&self, identifier: &ResourceIdentifier) -> bool {
        self.stack.contains(identifier)
    }

    pub fn clear(&mut self) -> &mut Self {
        self.stack.clear();
        self
    }

    pub fn is_empty(&self) -> bool {
        self.stack.is_empty()
    }

    pub fn len(&self) -> usize {
        self.stack.len()
    }

    pub fn get(&self, index: usize) -> Option<&ResourceIdentifier> {
        self.stack.get_index(index)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ResourceIdentifier> {
        self.stack.iter()
    }

    /// Every member is complete. Vacuously true when empty.
    pub fn is_complete(&self) -> bool {
        self.stack.iter().all(ResourceIdentifier::is_complete)
    }

    /// Every member has one of the given types. Vacuously true when empty.
    pub fn is_only<S: AsRef<str>>(&self, types: &[S]) -> bool {
        self.stack.iter().all(|identifier| identifier.is_type(types))
    }

    /// Member ids in order. Identifiers without an id are skipped.
    pub fn ids(&self) -> Vec<String> {
        self.stack
            .iter()
            .filter_map(|identifier| identifier.id().map(str::to_string))
            .collect()
    }

    /// Group ids by type, optionally renaming types through `aliases`.
    ///
    /// Types missing from `aliases` are kept as they are.
    pub fn map(&self, aliases: Option<&HashMap<String, String>>) -> IndexMap<String, Vec<String>> {
        let mut grouped: IndexMap<String, Vec<String>> = IndexMap::new();

        for identifier in &self.stack {
            let key = aliases
                .and_then(|aliases| identifier.map_type(aliases).ok())
                .unwrap_or(identifier.resource_type())
                .to_string();

            let ids = grouped.entry(key).or_default();
            if let Some(id) = identifier.id() {
                ids.push(id.to_string());
            }
        }

        grouped
    }

    pub fn to_value(&self) -> Value {
        Value::Array(self.stack.iter().map(ResourceIdentifier::to_value).collect())
    }
}

impl FromIterator<ResourceIdentifier> for ResourceIdentifierCollection {
    fn from_iter<I: IntoIterator<Item = ResourceIdentifier>>(iter: I) -> Self {
        let mut collection = Self::new();
        for identifier in iter {
            collection.add(identifier);
        }
        collection
    }
}

impl Extend<ResourceIdentifier> for ResourceIdentifierCollection {
    fn extend<I: IntoIterator<Item = ResourceIdentifier>>(&mut self, iter: I) {
        for identifier in iter {
            self.add(identifier);
        }
    }
}

impl IntoIterator for ResourceIdentifierCollection {
    type Item = ResourceIdentifier;
    type IntoIter = indexmap::set::IntoIter<ResourceIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.stack.into_iter()
    }
}

impl<'a> IntoIterator for &'a ResourceIdentifierCollection {
    type Item = &'a ResourceIdentifier;
    type IntoIter = indexmap::set::Iter<'a, ResourceIdentifier>;

    fn into_iter(self) -> Self::IntoIter {
        self.stack.iter()
    }
}
