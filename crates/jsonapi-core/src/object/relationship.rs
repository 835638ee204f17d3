//! Relationship objects and the `relationships` member.

use serde_json::Value;

use super::{DocumentError, ResourceIdentifier, ResourceIdentifierCollection, StandardObject};
use crate::keyword;

/// The decoded `data` member of a relationship.
#[derive(Debug, Clone, PartialEq)]
pub enum RelationshipData {
    /// A has-one relationship; `None` is an explicit `null`.
    HasOne(Option<ResourceIdentifier>),
    HasMany(ResourceIdentifierCollection),
}

/// A relationship object (`{data, meta, links}`).
///
/// Cardinality is read from the shape of `data`, never declared: an object
/// or `null` is has-one, an array is has-many, and a missing `data` member
/// is neither.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationship {
    object: StandardObject,
}

impl Relationship {
    pub fn new(object: StandardObject) -> Self {
        Self { object }
    }

    /// View a decoded value as a relationship. Non-objects read as empty.
    pub fn from_value(value: &Value) -> Self {
        Self::new(StandardObject::from_value_ref(value).unwrap_or_default())
    }

    pub fn as_object(&self) -> &StandardObject {
        &self.object
    }

    pub fn has_data(&self) -> bool {
        self.object.has(keyword::DATA)
    }

    pub fn is_has_one(&self) -> bool {
        matches!(self.object.get(keyword::DATA), Some(Value::Null | Value::Object(_)))
    }

    pub fn is_has_many(&self) -> bool {
        self.object.is_array(keyword::DATA)
    }

    /// The has-one identifier, `None` when `data` is `null`.
    pub fn identifier(&self) -> Result<Option<ResourceIdentifier>, DocumentError> {
        match self.object.get(keyword::DATA) {
            Some(Value::Null) => Ok(None),
            Some(Value::Object(_)) => {
                let data = self.object.object(keyword::DATA).unwrap_or_default();
                Ok(Some(ResourceIdentifier::from_object(&data)))
            }
            _ => Err(DocumentError::NotHasOne),
        }
    }

    pub fn identifiers(&self) -> Result<ResourceIdentifierCollection, DocumentError> {
        match self.object.get(keyword::DATA) {
            Some(Value::Array(values)) => Ok(ResourceIdentifierCollection::from_values(values)?),
            _ => Err(DocumentError::NotHasMany),
        }
    }

    pub fn data(&self) -> Result<RelationshipData, DocumentError> {
        if self.is_has_one() {
            self.identifier().map(RelationshipData::HasOne)
        } else if self.is_has_many() {
            self.identifiers().map(RelationshipData::HasMany)
        } else {
            Err(DocumentError::InvalidRelationship)
        }
    }

    pub fn meta(&self) -> StandardObject {
        self.object.object(keyword::META).unwrap_or_default()
    }

    pub fn has_meta(&self) -> bool {
        self.object.has(keyword::META)
    }
}

/// The `relationships` member of a resource object.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Relationships {
    object: StandardObject,
}

impl Relationships {
    pub fn new(object: StandardObject) -> Self {
        Self { object }
    }

    /// The named relationship. An absent key reads as an empty relationship.
    pub fn get(&self, key: &str) -> Relationship {
        self.object
            .get(key)
            .map(Relationship::from_value)
            .unwrap_or_default()
    }

    pub fn has(&self, key: &str) -> bool {
        self.object.has(key)
    }

    pub fn keys(&self) -> Vec<String> {
        self.object.keys()
    }

    /// All relationships in document order.
    pub fn iter(&self) -> Vec<(String, Relationship)> {
        self.object
            .as_map()
            .iter()
            .map(|(key, value)| (key.clone(), Relationship::from_value(value)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn relationship(value: Value) -> Relationship {
        Relationship::from_value(&value)
    }

    #[test]
    fn test_has_one() {
        let rel = relationship(json!({"data": {"type": "users", "id": "1"}}));
        assert!(rel.is_has_one());
        assert!(!rel.is_has_many());
        assert_eq!(
            rel.identifier().unwrap(),
            Some(ResourceIdentifier::new("users", "1"))
        );
    }

    #[test]
    fn test_null_is_has_one() {
        let rel = relationship(json!({"data": null}));
        assert!(rel.is_has_one());
        assert_eq!(rel.data().unwrap(), RelationshipData::HasOne(None));
    }

    #[test]
    fn test_has_many() {
        let rel = relationship(json!({"data": [{"type": "tags", "id": "1"}]}));
        assert!(rel.is_has_many());
        assert_eq!(rel.identifiers().unwrap().len(), 1);
        assert!(matches!(rel.identifier(), Err(DocumentError::NotHasOne)));
    }

    #[test]
    fn test_missing_data_is_neither() {
        let rel = relationship(json!({"meta": {"count": 1}}));
        assert!(!rel.is_has_one());
        assert!(!rel.is_has_many());
        assert!(matches!(rel.data(), Err(DocumentError::InvalidRelationship)));
        assert!(rel.has_meta());
    }

    #[test]
    fn test_relationships_iterate_in_order() {
        let rels = Relationships::new(
            StandardObject::from_value(json!({
                "author": {"data": null},
                "tags": {"data": []}
            }))
            .unwrap(),
        );
        let keys: Vec<String> = rels.iter().into_iter().map(|(k, _)| k).collect();
        assert_eq!(keys, vec!["author".to_string(), "tags".to_string()]);
        assert!(rels.get("tags").is_has_many());
        assert!(!rels.get("missing").has_data());
    }
}
