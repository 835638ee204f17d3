//! Opaque domain record handles.

use std::any::Any;
use std::fmt;
use std::sync::Arc;

use jsonapi_core::ResourceIdentifier;

/// A resolved domain record.
///
/// Records are cheap to clone and carry the identifier they were resolved
/// from. The domain value is reached through [`downcast_ref`](Self::downcast_ref).
#[derive(Clone)]
pub struct Record {
    identifier: ResourceIdentifier,
    value: Arc<dyn Any + Send + Sync>,
}

impl Record {
    pub fn new<T: Any + Send + Sync>(identifier: ResourceIdentifier, value: T) -> Self {
        Self {
            identifier,
            value: Arc::new(value),
        }
    }

    pub fn identifier(&self) -> &ResourceIdentifier {
        &self.identifier
    }

    pub fn resource_type(&self) -> &str {
        self.identifier.resource_type()
    }

    pub fn id(&self) -> Option<&str> {
        self.identifier.id()
    }

    pub fn is<T: Any>(&self) -> bool {
        self.value.is::<T>()
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }
}

impl fmt::Debug for Record {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Record")
            .field("identifier", &self.identifier.to_string())
            .finish_non_exhaustive()
    }
}

impl PartialEq for Record {
    fn eq(&self, other: &Self) -> bool {
        self.identifier == other.identifier && Arc::ptr_eq(&self.value, &other.value)
    }
}
