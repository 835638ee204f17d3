//! Top-level documents.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::{DocumentError, Relationship, ResourceObject, StandardObject};
use crate::keyword;

/// A decoded top-level JSON:API document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    object: StandardObject,
}

impl Document {
    pub fn new(object: StandardObject) -> Self {
        Self { object }
    }

    pub fn as_object(&self) -> &StandardObject {
        &self.object
    }

    pub fn has_data(&self) -> bool {
        self.object.has(keyword::DATA)
    }

    /// The raw `data` member.
    pub fn data_value(&self) -> Option<&Value> {
        self.object.get(keyword::DATA)
    }

    /// The `data` member as an object.
    pub fn data(&self) -> Result<StandardObject, DocumentError> {
        match self.object.get(keyword::DATA) {
            None => Err(DocumentError::MissingData),
            Some(value) => StandardObject::from_value_ref(value).ok_or(DocumentError::DataNotObject),
        }
    }

    /// The `data` member as a resource object.
    pub fn resource(&self) -> Result<ResourceObject, DocumentError> {
        self.data().map(ResourceObject::new)
    }

    /// The whole document read as a relationship object.
    pub fn relationship(&self) -> Relationship {
        Relationship::new(self.object.clone())
    }

    pub fn meta(&self) -> StandardObject {
        self.object.object(keyword::META).unwrap_or_default()
    }

    pub fn to_value(&self) -> Value {
        self.object.to_value()
    }
}

impl From<StandardObject> for Document {
    fn from(object: StandardObject) -> Self {
        Self::new(object)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn document(value: Value) -> Document {
        Document::new(StandardObject::from_value(value).unwrap())
    }

    #[test]
    fn test_resource() {
        let doc = document(json!({"data": {"type": "posts", "id": "1"}}));
        assert_eq!(doc.resource().unwrap().resource_type(), Some("posts"));
    }

    #[test]
    fn test_data_errors() {
        assert!(matches!(
            document(json!({"meta": {}})).data(),
            Err(DocumentError::MissingData)
        ));
        assert!(matches!(
            document(json!({"data": []})).data(),
            Err(DocumentError::DataNotObject)
        ));
        assert!(matches!(
            document(json!({"data": null})).data(),
            Err(DocumentError::DataNotObject)
        ));
    }

    #[test]
    fn test_relationship_view() {
        let doc = document(json!({"data": [{"type": "tags", "id": "1"}]}));
        assert!(doc.relationship().is_has_many());
    }
}
