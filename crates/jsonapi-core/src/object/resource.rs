//! Resource objects.

use serde_json::Value;

use super::{Relationships, ResourceIdentifier, StandardObject};
use crate::keyword;

/// A resource object (`{type, id, attributes, relationships, meta}`).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ResourceObject {
    object: StandardObject,
}

impl ResourceObject {
    pub fn new(object: StandardObject) -> Self {
        Self { object }
    }

    pub fn from_value(value: &Value) -> Option<Self> {
        StandardObject::from_value_ref(value).map(Self::new)
    }

    pub fn as_object(&self) -> &StandardObject {
        &self.object
    }

    pub fn resource_type(&self) -> Option<&str> {
        self.object.get_str(keyword::TYPE)
    }

    pub fn id(&self) -> Option<&str> {
        self.object.get_str(keyword::ID)
    }

    pub fn has_id(&self) -> bool {
        self.object.has(keyword::ID)
    }

    pub fn identifier(&self) -> ResourceIdentifier {
        ResourceIdentifier::from_object(&self.object)
    }

    /// The attributes member, empty when absent.
    pub fn attributes(&self) -> StandardObject {
        self.object.object(keyword::ATTRIBUTES).unwrap_or_default()
    }

    pub fn has_attributes(&self) -> bool {
        self.object.has(keyword::ATTRIBUTES)
    }

    /// The relationships member, empty when absent.
    pub fn relationships(&self) -> Relationships {
        Relationships::new(self.object.object(keyword::RELATIONSHIPS).unwrap_or_default())
    }

    pub fn has_relationships(&self) -> bool {
        self.object.has(keyword::RELATIONSHIPS)
    }

    pub fn meta(&self) -> StandardObject {
        self.object.object(keyword::META).unwrap_or_default()
    }

    pub fn has_meta(&self) -> bool {
        self.object.has(keyword::META)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn resource() -> ResourceObject {
        ResourceObject::from_value(&json!({
            "type": "foo",
            "id": "123",
            "attributes": {"foo": "bar"},
            "relationships": {"baz": {"data": null}},
            "meta": {"bat": "foobar"}
        }))
        .unwrap()
    }

    #[test]
    fn test_members() {
        let resource = resource();
        assert_eq!(resource.resource_type(), Some("foo"));
        assert_eq!(resource.id(), Some("123"));
        assert_eq!(resource.identifier(), ResourceIdentifier::new("foo", "123"));
        assert_eq!(resource.attributes().get_str("foo"), Some("bar"));
        assert!(resource.relationships().get("baz").is_has_one());
        assert_eq!(resource.meta().get_str("bat"), Some("foobar"));
    }

    #[test]
    fn test_absent_members() {
        let resource = ResourceObject::from_value(&json!({"type": "foo"})).unwrap();
        assert!(!resource.has_id());
        assert!(!resource.has_attributes());
        assert!(resource.attributes().is_empty());
        assert!(!resource.has_relationships());
        assert!(!resource.has_meta());
    }
}
