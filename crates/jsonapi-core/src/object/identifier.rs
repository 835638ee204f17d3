//! Resource identifier objects.

use std::collections::HashMap;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde_json::{Map, Value};

use super::{ObjectError, StandardObject};
use crate::keyword;

/// A `{type, id, meta}` resource identifier.
///
/// Equality and hashing only consider the `(type, id)` pair; `meta` is
/// carried along but never compared.
#[derive(Debug, Clone, Default)]
pub struct ResourceIdentifier {
    resource_type: String,
    id: Option<String>,
    meta: StandardObject,
}

impl ResourceIdentifier {
    pub fn new(resource_type: impl Into<String>, id: impl Into<String>) -> Self {
        Self {
            resource_type: resource_type.into(),
            id: Some(id.into()),
            meta: StandardObject::new(),
        }
    }

    /// Read an identifier from a decoded identifier object.
    ///
    /// Numeric ids are converted to strings. Members of the wrong shape are
    /// treated as absent; structural checking is the validators' concern.
    pub fn from_object(object: &StandardObject) -> Self {
        let resource_type = object.get_str(keyword::TYPE).unwrap_or_default().to_string();
        let id = match object.get(keyword::ID) {
            Some(Value::String(id)) => Some(id.clone()),
            Some(Value::Number(id)) => Some(id.to_string()),
            _ => None,
        };
        let meta = object.object(keyword::META).unwrap_or_default();

        Self {
            resource_type,
            id,
            meta,
        }
    }

    /// Read an identifier from a decoded value, which must be an object.
    pub fn from_value(value: &Value) -> Result<Self, ObjectError> {
        StandardObject::from_value_ref(value)
            .map(|object| Self::from_object(&object))
            .ok_or(ObjectError::ObjectExpected("resource identifier"))
    }

    pub fn with_meta(mut self, meta: StandardObject) -> Self {
        self.meta = meta;
        self
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn set_type(&mut self, resource_type: impl Into<String>) -> &mut Self {
        self.resource_type = resource_type.into();
        self
    }

    pub fn has_type(&self) -> bool {
        !self.resource_type.is_empty()
    }

    /// Whether the type is one of `types`.
    pub fn is_type<S: AsRef<str>>(&self, types: &[S]) -> bool {
        types.iter().any(|t| t.as_ref() == self.resource_type)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn set_id(&mut self, id: impl Into<String>) -> &mut Self {
        self.id = Some(id.into());
        self
    }

    pub fn has_id(&self) -> bool {
        self.id.as_deref().is_some_and(|id| !id.is_empty())
    }

    /// Both type and id are non-empty.
    pub fn is_complete(&self) -> bool {
        self.has_type() && self.has_id()
    }

    pub fn meta(&self) -> &StandardObject {
        &self.meta
    }

    /// Look up the alias for this identifier's type.
    pub fn map_type<'a>(&self, aliases: &'a HashMap<String, String>) -> Result<&'a str, ObjectError> {
        aliases
            .get(&self.resource_type)
            .map(String::as_str)
            .ok_or_else(|| ObjectError::UnmappedType(self.resource_type.clone()))
    }

    /// Encode as a JSON identifier object. Empty meta is omitted.
    pub fn to_value(&self) -> Value {
        let mut members = Map::new();
        members.insert(keyword::TYPE.into(), Value::String(self.resource_type.clone()));
        members.insert(
            keyword::ID.into(),
            self.id.clone().map(Value::String).unwrap_or(Value::Null),
        );
        if !self.meta.is_empty() {
            members.insert(keyword::META.into(), self.meta.to_value());
        }
        Value::Object(members)
    }
}

impl PartialEq for ResourceIdentifier {
    fn eq(&self, other: &Self) -> bool {
        self.resource_type == other.resource_type && self.id == other.id
    }
}

impl Eq for ResourceIdentifier {}

impl Hash for ResourceIdentifier {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.resource_type.hash(state);
        self.id.hash(state);
    }
}

impl fmt::Display for ResourceIdentifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.resource_type, self.id.as_deref().unwrap_or("<none>"))
    }
}
