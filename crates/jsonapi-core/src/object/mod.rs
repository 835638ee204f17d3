//! Generic document object model.
//!
//! Decoded request bodies are kept as untyped JSON and read through thin
//! views (`Document`, `ResourceObject`, `Relationship`) layered over
//! [`StandardObject`].

mod collection;
mod document;
mod identifier;
mod relationship;
mod resource;
mod standard;

use thiserror::Error;

pub use collection::ResourceIdentifierCollection;
pub use document::Document;
pub use identifier::ResourceIdentifier;
pub use relationship::{Relationship, RelationshipData, Relationships};
pub use resource::ResourceObject;
pub use standard::StandardObject;

/// Failures reading values into the object model.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ObjectError {
    #[error("Expecting {0} to be an object")]
    ObjectExpected(&'static str),

    #[error("No type alias for resource type '{0}'")]
    UnmappedType(String),
}

/// Failures reading a document member as a particular shape.
///
/// These indicate a caller reading a document that has not been validated
/// for that shape.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DocumentError {
    #[error("Data member is not present")]
    MissingData,

    #[error("Data member is not an object")]
    DataNotObject,

    #[error("No data member or data member is not a valid has-one relationship")]
    NotHasOne,

    #[error("No data member or data member is not a valid has-many relationship")]
    NotHasMany,

    #[error("No data member or data member is not a valid relationship")]
    InvalidRelationship,

    #[error(transparent)]
    Object(#[from] ObjectError),
}
