//! Core document model for JSON:API servers.
//!
//! This crate holds the untyped document object model that inbound request
//! bodies are decoded into, resource identifiers and their collections, and
//! the error model that validators report through.

pub mod decoder;
pub mod error;
pub mod keyword;
pub mod object;

pub use decoder::{DecodeError, DocumentDecoder};
pub use error::{
    ErrorCode, ErrorCollection, ErrorObject, ErrorRepository, ErrorScope, ErrorTemplate,
    SourceObject, TemplateOverride,
};
pub use object::{
    Document, DocumentError, ObjectError, Relationship, RelationshipData, Relationships,
    ResourceIdentifier, ResourceIdentifierCollection, ResourceObject, StandardObject,
};
