//! Layered validation of inbound JSON:API documents.
//!
//! Validators walk a decoded document from the top down:
//!
//! - **Document validators** check the top-level shape and pick the
//!   resource or relationship validator for the endpoint
//! - **Resource object validators** check `type`, `id`, `attributes` and
//!   `relationships`, delegating each member
//! - **Relationship validators** resolve identifiers through a
//!   [`Store`](jsonapi_store::Store) and ask acceptance callbacks
//!
//! Once a document is valid, a [`Hydrator`] copies its attributes and
//! relationships onto a domain record.
//!
//! Every validator reports all problems it finds as an
//! [`ErrorCollection`](jsonapi_core::ErrorCollection) with pointers relative
//! to the document root.
//!
//! # Example
//!
//! ```rust,ignore
//! use jsonapi_validation::{ProviderRegistry, SchemaFile, ValidatorFactory, RequestIntent};
//!
//! let schema = SchemaFile::from_file("schema.toml")?;
//! let factory = ValidatorFactory::new(Arc::new(schema.repository()?), store);
//! let providers = ProviderRegistry::from_schema(&schema, &factory)?;
//!
//! let validator = providers.get("posts")?.create_resource()?;
//! let errors = validator.validate(&document, &ValidationContext::new())?;
//! ```

pub mod acceptance;
pub mod document;
pub mod error;
pub mod factory;
pub mod hydrator;
pub mod intent;
pub mod leaf;
pub mod provider;
pub mod query;
pub mod relationship;
pub mod resource;
pub mod schema;
pub mod validator;

pub use acceptance::{AcceptMany, AcceptOne, AcceptValue, Acceptance};
pub use document::{RelationshipDocumentValidator, ResourceDocumentValidator};
pub use error::{ConfigError, ValidatorError};
pub use factory::ValidatorFactory;
pub use hydrator::{Hydrator, HydratorError, RelationshipHook};
pub use intent::RequestIntent;
pub use leaf::{
    AttributesValidator, CallbackValidator, ResourceIdValidator, ResourceTypeValidator, ValueKind, ValueValidator,
};
pub use provider::{DocumentValidator, ProviderRegistry, SchemaProvider, ValidatorProvider};
pub use query::{EncodingParameters, QueryChecker, QuerySettings, SortParameter};
pub use relationship::{HasManyValidator, HasOneValidator, RelationshipsValidator};
pub use resource::ResourceObjectValidator;
pub use schema::{AttributeSchema, RelationshipKind, RelationshipSchema, ResourceSchema, SchemaFile};
pub use validator::{validate, Validation, ValidationContext, Validator};
