//! Property-bag view over a decoded JSON object.
//!
//! `StandardObject` is the building block of the document model: every
//! document, resource, relationship and meta member is read through one.
//! Presence testing distinguishes a missing key from a key whose value is
//! `null`, and key order is preserved as decoded.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A JSON object with key-based accessors.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandardObject {
    members: Map<String, Value>,
}

impl StandardObject {
    /// Create an empty object.
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a decoded value. Non-object values produce `None`.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(members) => Some(Self { members }),
            _ => None,
        }
    }

    /// Wrap a borrowed value by cloning it. Non-object values produce `None`.
    pub fn from_value_ref(value: &Value) -> Option<Self> {
        value.as_object().map(|members| Self {
            members: members.clone(),
        })
    }

    /// Get a member, or `None` when the key is absent.
    ///
    /// A key present with a `null` value returns `Some(&Value::Null)`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.members.get(key)
    }

    /// Get a member, falling back to `default` when the key is absent.
    pub fn get_or(&self, key: &str, default: Value) -> Value {
        self.members.get(key).cloned().unwrap_or(default)
    }

    /// Get a member as a string slice.
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.members.get(key).and_then(Value::as_str)
    }

    /// Materialize an object member as its own `StandardObject`.
    ///
    /// Returns `None` when the member is absent or is not an object.
    pub fn object(&self, key: &str) -> Option<StandardObject> {
        self.members.get(key).and_then(Self::from_value_ref)
    }

    /// Set a member, replacing any existing value in place.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.members.insert(key.into(), value.into());
        self
    }

    /// Set several members at once.
    pub fn set_properties<I, K, V>(&mut self, values: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<Value>,
    {
        for (key, value) in values {
            self.set(key, value);
        }
        self
    }

    /// Get several members, substituting `default` for each absent key.
    ///
    /// The result follows the order of `keys`.
    pub fn get_properties(&self, keys: &[&str], default: Value) -> Map<String, Value> {
        keys.iter()
            .map(|key| (key.to_string(), self.get_or(key, default.clone())))
            .collect()
    }

    /// Whether the key is present, including when its value is `null`.
    pub fn has(&self, key: &str) -> bool {
        self.members.contains_key(key)
    }

    /// Whether every key is present.
    pub fn has_all(&self, keys: &[&str]) -> bool {
        keys.iter().all(|key| self.has(key))
    }

    /// Whether at least one key is present.
    pub fn has_any(&self, keys: &[&str]) -> bool {
        keys.iter().any(|key| self.has(key))
    }

    /// Remove a member. Removing an absent key is a no-op.
    pub fn remove(&mut self, key: &str) -> &mut Self {
        self.members.shift_remove(key);
        self
    }

    /// Remove several members.
    pub fn remove_properties(&mut self, keys: &[&str]) -> &mut Self {
        for key in keys {
            self.remove(key);
        }
        self
    }

    /// Keep only the listed keys. Remaining members keep their order.
    pub fn reduce(&mut self, keys: &[&str]) -> &mut Self {
        self.members.retain(|key, _| keys.contains(&key.as_str()));
        self
    }

    /// Member names in document order.
    pub fn keys(&self) -> Vec<String> {
        self.members.keys().cloned().collect()
    }

    /// Whether the named member is present and an object.
    pub fn is_object(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Object(_)))
    }

    /// Whether the named member is present and an array.
    pub fn is_array(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Array(_)))
    }

    /// Whether the named member is present with a `null` value.
    pub fn is_null(&self, key: &str) -> bool {
        matches!(self.get(key), Some(Value::Null))
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    /// Borrow the underlying map.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.members
    }

    /// Clone into a JSON value.
    pub fn to_value(&self) -> Value {
        Value::Object(self.members.clone())
    }

    /// Consume into a JSON value.
    pub fn into_value(self) -> Value {
        Value::Object(self.members)
    }
}

impl From<Map<String, Value>> for StandardObject {
    fn from(members: Map<String, Value>) -> Self {
        Self { members }
    }
}

impl From<StandardObject> for Value {
    fn from(object: StandardObject) -> Self {
        object.into_value()
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for StandardObject {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut object = Self::new();
        object.set_properties(iter);
        object
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> StandardObject {
        StandardObject::from_value(json!({"foo": "foobar", "bar": "bazbat"})).unwrap()
    }

    #[test]
    fn test_get_with_default() {
        let object = sample();
        assert_eq!(object.get("foo"), Some(&json!("foobar")));
        assert_eq!(object.get("baz"), None);
        assert_eq!(object.get_or("baz", json!(false)), json!(false));
    }

    #[test]
    fn test_has_distinguishes_null_from_absent() {
        let mut object = StandardObject::new();
        assert!(!object.has("foo"));

        object.set("foo", Value::Null);
        assert!(object.has("foo"));
        assert!(object.is_null("foo"));
    }

    #[test]
    fn test_has_all_and_any() {
        let object = sample();
        assert!(object.has_all(&["foo", "bar"]));
        assert!(!object.has_all(&["foo", "bar", "baz"]));
        assert!(object.has_any(&["foo", "baz"]));
        assert!(!object.has_any(&["baz"]));
    }

    #[test]
    fn test_remove() {
        let mut object = sample();
        object.remove("foo").remove("baz");
        assert!(!object.has("foo"));
        assert_eq!(object.keys(), vec!["bar".to_string()]);
    }

    #[test]
    fn test_reduce_preserves_order() {
        let mut object =
            StandardObject::from_value(json!({"a": 1, "b": 2, "c": 3, "d": 4})).unwrap();
        object.reduce(&["d", "b", "x"]);
        assert_eq!(object.keys(), vec!["b".to_string(), "d".to_string()]);
    }

    #[test]
    fn test_get_properties() {
        let object = sample();
        let props = object.get_properties(&["foo", "baz"], Value::Null);
        assert_eq!(Value::Object(props), json!({"foo": "foobar", "baz": null}));
    }

    #[test]
    fn test_set_properties_round_trips_to_value() {
        let mut object = StandardObject::new();
        object.set_properties([("foo", "foobar"), ("bar", "bazbat")]);
        assert_eq!(object.to_value(), json!({"foo": "foobar", "bar": "bazbat"}));
    }

    #[test]
    fn test_object_materialization() {
        let object =
            StandardObject::from_value(json!({"meta": {"a": 1}, "scalar": 2})).unwrap();
        assert_eq!(object.object("meta").map(|m| m.len()), Some(1));
        assert!(object.object("scalar").is_none());
        assert!(object.object("missing").is_none());
    }

    #[test]
    fn test_non_object_values_are_rejected() {
        assert!(StandardObject::from_value(json!([1, 2])).is_none());
        assert!(StandardObject::from_value(Value::Null).is_none());
    }
}
