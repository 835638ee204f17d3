//! Ordered error collections with pointer rewriting.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::ErrorObject;
use crate::keyword;

/// An ordered collection of error objects.
///
/// Merging is append-only: errors keep the order in which they were raised.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ErrorCollection {
    errors: Vec<ErrorObject>,
}

/// Join a pointer onto a prefix. The root pointer `""` collapses onto the
/// prefix itself; `"/"` names the member with the empty key and is joined
/// like any other pointer.
pub fn prefix_pointer(prefix: &str, pointer: &str) -> String {
    if pointer.is_empty() {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, pointer)
    }
}

/// Escape a member name for use as a JSON pointer reference token.
pub fn pointer_token(key: &str) -> String {
    key.replace('~', "~0").replace('/', "~1")
}

impl ErrorCollection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_error(error: ErrorObject) -> Self {
        Self {
            errors: vec![error],
        }
    }

    pub fn push(&mut self, error: ErrorObject) {
        self.errors.push(error);
    }

    /// Append an error and return it for further changes.
    pub fn push_mut(&mut self, error: ErrorObject) -> &mut ErrorObject {
        let index = self.errors.len();
        self.errors.push(error);
        &mut self.errors[index]
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn get(&self, index: usize) -> Option<&ErrorObject> {
        self.errors.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ErrorObject> {
        self.errors.iter()
    }

    pub fn first(&self) -> Option<&ErrorObject> {
        self.errors.first()
    }

    /// Append every error from `other`.
    pub fn merge(&mut self, other: ErrorCollection) {
        self.errors.extend(other.errors);
    }

    /// Append every error from `other`, rewriting each error's pointer.
    ///
    /// The rewriter receives the existing pointer, or `""` when the error
    /// has none. Errors sourced from a query parameter are left as they are.
    pub fn merge_with<F>(&mut self, other: ErrorCollection, rewriter: F)
    where
        F: Fn(&str) -> String,
    {
        self.merge(other.map_pointers(rewriter));
    }

    /// Rewrite the pointer of every error not sourced from a query parameter.
    pub fn map_pointers<F>(mut self, rewriter: F) -> Self
    where
        F: Fn(&str) -> String,
    {
        for error in &mut self.errors {
            if error.parameter().is_some() && error.pointer().is_none() {
                continue;
            }
            let pointer = rewriter(error.pointer().unwrap_or(""));
            error.set_pointer(pointer);
        }
        self
    }

    /// Prefix all pointers with the given member path.
    pub fn with_pointer_prefix(self, prefix: &str) -> Self {
        self.map_pointers(|pointer| prefix_pointer(prefix, pointer))
    }

    /// Pointers in order, `None` for errors without one.
    pub fn pointers(&self) -> Vec<Option<&str>> {
        self.errors.iter().map(ErrorObject::pointer).collect()
    }

    pub fn codes(&self) -> Vec<Option<&str>> {
        self.errors.iter().map(ErrorObject::code).collect()
    }

    /// The aggregate HTTP status for the collection.
    ///
    /// Precedence is 5xx, then 400, 409, 404, any other 4xx, and 422 last.
    /// The first error wins between equal ranks. Errors without a numeric
    /// status are ignored; `None` when no error carries one.
    pub fn status(&self) -> Option<u16> {
        let mut best: Option<(u8, u16)> = None;

        for status in self.errors.iter().filter_map(ErrorObject::http_status) {
            let rank = status_rank(status);
            if best.map_or(true, |(r, _)| rank < r) {
                best = Some((rank, status));
            }
        }

        best.map(|(_, status)| status)
    }

    /// Render as a top-level `{"errors": [...]}` document.
    pub fn to_document(&self) -> Value {
        let errors = self.errors.iter().map(ErrorObject::to_value).collect();
        let mut document = Map::new();
        document.insert(keyword::ERRORS.to_string(), Value::Array(errors));
        Value::Object(document)
    }

    pub fn into_vec(self) -> Vec<ErrorObject> {
        self.errors
    }
}

fn status_rank(status: u16) -> u8 {
    match status {
        500..=599 => 0,
        400 => 1,
        409 => 2,
        404 => 3,
        422 => 5,
        _ => 4,
    }
}

impl fmt::Display for ErrorCollection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.errors.is_empty() {
            write!(f, "No errors")
        } else if self.errors.len() == 1 {
            write!(f, "Error: {}", self.errors[0])
        } else {
            writeln!(f, "{} errors:", self.errors.len())?;
            for (i, error) in self.errors.iter().enumerate() {
                writeln!(f, "  {}. {}", i + 1, error)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for ErrorCollection {}

impl From<ErrorObject> for ErrorCollection {
    fn from(error: ErrorObject) -> Self {
        Self::from_error(error)
    }
}

impl FromIterator<ErrorObject> for ErrorCollection {
    fn from_iter<I: IntoIterator<Item = ErrorObject>>(iter: I) -> Self {
        Self {
            errors: iter.into_iter().collect(),
        }
    }
}

impl Extend<ErrorObject> for ErrorCollection {
    fn extend<I: IntoIterator<Item = ErrorObject>>(&mut self, iter: I) {
        self.errors.extend(iter);
    }
}

impl IntoIterator for ErrorCollection {
    type Item = ErrorObject;
    type IntoIter = std::vec::IntoIter<ErrorObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl<'a> IntoIterator for &'a ErrorCollection {
    type Item = &'a ErrorObject;
    type IntoIter = std::slice::Iter<'a, ErrorObject>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.iter()
    }
}
