//! Structural and existence checks shared by the relationship validators.

use std::sync::Arc;

use jsonapi_core::{keyword, ErrorCode, ErrorScope, ResourceIdentifier};
use jsonapi_store::Store;
use serde_json::Value;

use crate::error::ValidatorError;

/// The acceptable types of a relationship and how to resolve them.
#[derive(Clone, Default)]
pub(crate) struct Target {
    pub types: Vec<String>,
    pub store: Option<Arc<dyn Store>>,
}

impl Target {
    /// An empty type list accepts any type the store knows.
    pub fn accepts(&self, resource_type: &str) -> bool {
        if self.types.is_empty() {
            self.store.as_ref().map_or(true, |store| store.is_type(resource_type))
        } else {
            self.types.iter().any(|t| t == resource_type)
        }
    }

    /// Check one identifier object at `pointer`, raising every structural
    /// error. Returns the identifier only when it is structurally valid.
    pub fn check(&self, scope: &mut ErrorScope<'_>, value: &Value, pointer: &str) -> Option<ResourceIdentifier> {
        let Some(object) = value.as_object() else {
            scope
                .error(ErrorCode::MemberObjectExpected, pointer)
                .set_detail("Expecting a resource identifier object.");
            return None;
        };

        let type_pointer = format!("{}/{}", pointer, keyword::TYPE);
        let resource_type = match object.get(keyword::TYPE) {
            None => {
                scope
                    .error(ErrorCode::MemberRequired, &type_pointer)
                    .interpolate(&[keyword::TYPE]);
                None
            }
            Some(Value::String(t)) if !t.is_empty() && self.accepts(t) => Some(t.as_str()),
            Some(Value::String(_)) => {
                scope.error(ErrorCode::InvalidType, &type_pointer);
                None
            }
            Some(_) => {
                scope
                    .error(ErrorCode::MemberStringExpected, &type_pointer)
                    .interpolate(&[keyword::TYPE]);
                None
            }
        };

        let id = match object.get(keyword::ID) {
            Some(Value::String(id)) if !id.is_empty() => Some(id.as_str()),
            _ => {
                scope.error(ErrorCode::InvalidId, &format!("{}/{}", pointer, keyword::ID));
                None
            }
        };

        Some(ResourceIdentifier::new(resource_type?, id?))
    }

    /// Whether the identifier resolves. Always true without a store.
    pub fn exists(&self, identifier: &ResourceIdentifier) -> Result<bool, ValidatorError> {
        match &self.store {
            Some(store) => Ok(store.exists(identifier)?),
            None => Ok(true),
        }
    }
}

impl std::fmt::Debug for Target {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Target")
            .field("types", &self.types)
            .field("check_exists", &self.store.is_some())
            .finish()
    }
}
