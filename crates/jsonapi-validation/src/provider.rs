//! Per-resource-type sources of validators.

use std::collections::HashMap;
use std::sync::Arc;

use indexmap::IndexMap;
use jsonapi_core::{Document, ErrorRepository, ResourceIdentifier, ResourceIdentifierCollection};
use jsonapi_store::Record;

use crate::acceptance::{AcceptMany, AcceptOne, Acceptance};
use crate::error::{ConfigError, ValidatorError};
use crate::factory::ValidatorFactory;
use crate::intent::RequestIntent;
use crate::leaf::AttributesValidator;
use crate::query::{QueryChecker, QuerySettings};
use crate::schema::{RelationshipKind, RelationshipSchema, ResourceSchema, SchemaFile};
use crate::validator::{ValidationContext, Validator};

/// A boxed validator for a whole request document.
pub type DocumentValidator = Box<dyn Validator<Document>>;

/// Supplies the validators for one resource type.
pub trait ValidatorProvider: Send + Sync {
    fn resource_type(&self) -> &str;

    /// Validator for a create-resource document.
    fn create_resource(&self) -> Result<DocumentValidator, ValidatorError>;

    /// Validator for an update-resource document for `record`.
    fn update_resource(&self, id: &str, record: &Record) -> Result<DocumentValidator, ValidatorError>;

    /// Validator for a document replacing, adding to or removing from the
    /// relationship `key` of `record`.
    fn modify_relationship(&self, id: &str, key: &str, record: &Record) -> Result<DocumentValidator, ValidatorError>;

    fn search_query_checker(&self) -> QueryChecker;

    fn resource_query_checker(&self) -> QueryChecker;

    fn related_query_checker(&self) -> QueryChecker;

    fn relationship_query_checker(&self) -> QueryChecker;

    /// The resource type on the other side of `key`, when known.
    fn related_type(&self, _key: &str) -> Option<&str> {
        None
    }

    /// The query checker for a request with `intent`.
    fn query_checker(&self, intent: RequestIntent) -> QueryChecker {
        match intent {
            RequestIntent::Index => self.search_query_checker(),
            RequestIntent::ReadRelated => self.related_query_checker(),
            intent if intent.is_relationship() => self.relationship_query_checker(),
            _ => self.resource_query_checker(),
        }
    }

    /// The document validator for a request with `intent`, if the request
    /// carries a document.
    fn document_validator(
        &self,
        intent: RequestIntent,
        id: Option<&str>,
        relationship: Option<&str>,
        record: Option<&Record>,
    ) -> Result<Option<DocumentValidator>, ValidatorError> {
        let missing = |what: &str| {
            ValidatorError::Configuration(format!("A {} request needs a {}", intent, what))
        };

        match intent {
            RequestIntent::Create => self.create_resource().map(Some),
            RequestIntent::Update => {
                let id = id.ok_or_else(|| missing("resource id"))?;
                let record = record.ok_or_else(|| missing("record"))?;
                self.update_resource(id, record).map(Some)
            }
            intent if intent.modifies_relationship() => {
                let id = id.ok_or_else(|| missing("resource id"))?;
                let key = relationship.ok_or_else(|| missing("relationship"))?;
                let record = record.ok_or_else(|| missing("record"))?;
                self.modify_relationship(id, key, record).map(Some)
            }
            _ => Ok(None),
        }
    }
}

/// A [`ValidatorProvider`] built from a declarative [`ResourceSchema`].
///
/// Required attributes and relationships are only enforced on create;
/// updates may send any subset of members. Acceptance callbacks cannot be
/// declared in a schema and are attached with [`accept_one`] and
/// [`accept_many`].
///
/// [`accept_one`]: SchemaProvider::accept_one
/// [`accept_many`]: SchemaProvider::accept_many
#[derive(Clone)]
pub struct SchemaProvider {
    resource_type: String,
    schema: ResourceSchema,
    factory: ValidatorFactory,
    attributes: IndexMap<String, Arc<dyn Validator>>,
    accept_one: HashMap<String, AcceptOne>,
    accept_many: HashMap<String, AcceptMany>,
}

impl SchemaProvider {
    pub fn new(
        resource_type: impl Into<String>,
        schema: ResourceSchema,
        factory: ValidatorFactory,
    ) -> Result<Self, ConfigError> {
        let resource_type = resource_type.into();
        let mut attributes: IndexMap<String, Arc<dyn Validator>> = IndexMap::new();

        for (key, attr) in &schema.attributes {
            let mut validator = factory.value(attr.kind).nullable(attr.nullable);
            if let Some(min) = attr.min_length {
                validator = validator.min_length(min);
            }
            if let Some(max) = attr.max_length {
                validator = validator.max_length(max);
            }
            if let Some(pattern) = attr.regex(key)? {
                validator = validator.pattern(pattern);
            }
            if let Some(min) = attr.minimum {
                validator = validator.minimum(min);
            }
            if let Some(max) = attr.maximum {
                validator = validator.maximum(max);
            }
            if let Some(allowed) = &attr.allowed {
                validator = validator.allowed(allowed.iter().cloned());
            }
            attributes.insert(key.clone(), Arc::new(validator));
        }

        tracing::debug!(
            "Built validator provider for '{}' with {} attribute(s) and {} relationship(s)",
            resource_type,
            attributes.len(),
            schema.relationships.len()
        );

        Ok(Self {
            resource_type,
            schema,
            factory,
            attributes,
            accept_one: HashMap::new(),
            accept_many: HashMap::new(),
        })
    }

    /// Decide whether the related resource of has-one `key` may be used.
    pub fn accept_one<F, A>(mut self, key: &str, callback: F) -> Result<Self, ValidatorError>
    where
        F: Fn(&ResourceIdentifier, &ValidationContext<'_>) -> A + Send + Sync + 'static,
        A: Into<Acceptance>,
    {
        self.expect_relationship(key, RelationshipKind::HasOne)?;
        self.accept_one.insert(
            key.to_string(),
            Arc::new(move |identifier: &ResourceIdentifier, ctx: &ValidationContext<'_>| {
                callback(identifier, ctx).into()
            }),
        );
        Ok(self)
    }

    /// Decide whether the related resources of has-many `key` may be used.
    pub fn accept_many<F, A>(mut self, key: &str, callback: F) -> Result<Self, ValidatorError>
    where
        F: Fn(&ResourceIdentifierCollection, &ValidationContext<'_>) -> A + Send + Sync + 'static,
        A: Into<Acceptance>,
    {
        self.expect_relationship(key, RelationshipKind::HasMany)?;
        self.accept_many.insert(
            key.to_string(),
            Arc::new(move |identifiers: &ResourceIdentifierCollection, ctx: &ValidationContext<'_>| {
                callback(identifiers, ctx).into()
            }),
        );
        Ok(self)
    }

    pub fn schema(&self) -> &ResourceSchema {
        &self.schema
    }

    pub fn factory(&self) -> &ValidatorFactory {
        &self.factory
    }

    fn relationship_schema(&self, key: &str) -> Result<&RelationshipSchema, ValidatorError> {
        self.schema
            .relationships
            .get(key)
            .ok_or_else(|| ValidatorError::UnknownRelationship {
                resource_type: self.resource_type.clone(),
                key: key.to_string(),
            })
    }

    fn expect_relationship(&self, key: &str, kind: RelationshipKind) -> Result<(), ValidatorError> {
        let schema = self.relationship_schema(key)?;
        if schema.kind != kind {
            return Err(ValidatorError::Configuration(format!(
                "Relationship '{}' of '{}' is {}, not {}",
                key,
                self.resource_type,
                schema.kind.as_str(),
                kind.as_str()
            )));
        }
        Ok(())
    }

    /// The validator for one relationship object.
    pub fn relationship(&self, key: &str, create: bool) -> Result<Arc<dyn Validator>, ValidatorError> {
        let schema = self.relationship_schema(key)?;
        let factory = &self.factory;
        let types = schema.types.iter().cloned();
        let required = create && schema.required;

        let validator: Arc<dyn Validator> = match schema.kind {
            RelationshipKind::HasOne => {
                let mut validator = if schema.exists {
                    factory.has_one(types)
                } else {
                    crate::relationship::HasOneValidator::new(factory.repository().clone(), types)
                };
                if let Some(accept) = self.accept_one.get(key).cloned() {
                    validator = validator.accept(move |id: &ResourceIdentifier, ctx: &ValidationContext<'_>| accept(id, ctx));
                }
                Arc::new(validator.allow_empty(schema.allow_empty).required(required))
            }
            RelationshipKind::HasMany => {
                let mut validator = if schema.exists {
                    factory.has_many(types)
                } else {
                    crate::relationship::HasManyValidator::new(factory.repository().clone(), types)
                };
                if let Some(accept) = self.accept_many.get(key).cloned() {
                    validator = validator.accept(
                        move |ids: &ResourceIdentifierCollection, ctx: &ValidationContext<'_>| accept(ids, ctx),
                    );
                }
                Arc::new(validator.allow_empty(schema.allow_empty).required(required))
            }
        };

        Ok(validator)
    }

    fn attributes_validator(&self, create: bool) -> Option<AttributesValidator> {
        if self.attributes.is_empty() && self.schema.strict_attributes {
            return None;
        }

        let mut validator = self.factory.attributes().strict(self.schema.strict_attributes);
        for (key, attribute) in &self.attributes {
            validator = validator.attribute(key.clone(), attribute.clone());
        }
        if create {
            for (key, _) in self.schema.attributes.iter().filter(|(_, attr)| attr.required) {
                validator = validator.require(key.clone());
            }
            let any_required = self.schema.attributes.values().any(|attr| attr.required);
            validator = validator.required(any_required);
        }
        Some(validator)
    }

    fn relationships_validator(&self, create: bool) -> Result<Option<Arc<dyn Validator>>, ValidatorError> {
        if self.schema.relationships.is_empty() {
            return Ok(None);
        }

        let mut validator = self.factory.relationships();
        for key in self.schema.relationships.keys() {
            validator = validator.relationship(key.clone(), self.relationship(key, create)?);
        }
        let any_required = create && self.schema.relationships.values().any(|r| r.required);
        Ok(Some(Arc::new(validator.required(any_required))))
    }

    fn resource_document(&self, id: Option<&str>, create: bool) -> Result<DocumentValidator, ValidatorError> {
        let mut resource = self.factory.resource(&self.resource_type);
        if let Some(id) = id {
            resource = resource.id(Arc::new(self.factory.resource_id(Some(id))));
        }
        if let Some(attributes) = self.attributes_validator(create) {
            resource = resource.attributes(Arc::new(attributes));
        }
        if let Some(relationships) = self.relationships_validator(create)? {
            resource = resource.relationships(relationships);
        }
        Ok(Box::new(self.factory.resource_document(resource)))
    }

    fn checker(&self, settings: QuerySettings) -> QueryChecker {
        self.factory.query_checker(settings)
    }

    /// Settings for endpoints returning a single resource: no sorting,
    /// paging or filtering.
    fn single_resource_settings(&self) -> QuerySettings {
        QuerySettings {
            sort: Some(Vec::new()),
            page: Some(Vec::new()),
            filter: Some(Vec::new()),
            ..self.schema.query.clone()
        }
    }
}

impl std::fmt::Debug for SchemaProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaProvider")
            .field("resource_type", &self.resource_type)
            .field("schema", &self.schema)
            .finish_non_exhaustive()
    }
}

impl ValidatorProvider for SchemaProvider {
    fn resource_type(&self) -> &str {
        &self.resource_type
    }

    fn create_resource(&self) -> Result<DocumentValidator, ValidatorError> {
        self.resource_document(None, true)
    }

    fn update_resource(&self, id: &str, _record: &Record) -> Result<DocumentValidator, ValidatorError> {
        self.resource_document(Some(id), false)
    }

    fn modify_relationship(&self, _id: &str, key: &str, _record: &Record) -> Result<DocumentValidator, ValidatorError> {
        let relationship = self.relationship(key, false)?;
        Ok(Box::new(self.factory.relationship_document(relationship).key(key)))
    }

    fn search_query_checker(&self) -> QueryChecker {
        self.checker(self.schema.query.clone())
    }

    fn resource_query_checker(&self) -> QueryChecker {
        self.checker(self.single_resource_settings())
    }

    fn related_query_checker(&self) -> QueryChecker {
        self.checker(self.schema.query.clone())
    }

    fn relationship_query_checker(&self) -> QueryChecker {
        self.checker(self.single_resource_settings())
    }

    fn related_type(&self, key: &str) -> Option<&str> {
        self.schema.related_type(key)
    }
}

/// Validator providers by resource type, with the error repository that
/// request-level errors are built from.
#[derive(Clone, Default)]
pub struct ProviderRegistry {
    providers: HashMap<String, Arc<dyn ValidatorProvider>>,
    repository: Arc<ErrorRepository>,
}

impl ProviderRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// One [`SchemaProvider`] per resource declared in `schema`, sharing the
    /// factory's error repository.
    pub fn from_schema(schema: &SchemaFile, factory: &ValidatorFactory) -> Result<Self, ConfigError> {
        let mut registry = Self::new().with_repository(factory.repository().clone());
        for (resource_type, resource) in &schema.resources {
            let provider = SchemaProvider::new(resource_type.clone(), resource.clone(), factory.clone())?;
            registry.register(Arc::new(provider));
        }
        Ok(registry)
    }

    pub fn register(&mut self, provider: Arc<dyn ValidatorProvider>) -> &mut Self {
        let resource_type = provider.resource_type().to_string();
        if self.providers.insert(resource_type.clone(), provider).is_some() {
            tracing::warn!("Replacing validator provider for '{}'", resource_type);
        }
        self
    }

    pub fn with(mut self, provider: Arc<dyn ValidatorProvider>) -> Self {
        self.register(provider);
        self
    }

    pub fn with_repository(mut self, repository: Arc<ErrorRepository>) -> Self {
        self.repository = repository;
        self
    }

    pub fn repository(&self) -> &Arc<ErrorRepository> {
        &self.repository
    }

    pub fn get(&self, resource_type: &str) -> Result<&Arc<dyn ValidatorProvider>, ValidatorError> {
        self.providers
            .get(resource_type)
            .ok_or_else(|| ValidatorError::UnknownResourceType(resource_type.to_string()))
    }

    /// The provider for the resources on the other side of `key`.
    pub fn related(&self, resource_type: &str, key: &str) -> Result<Option<&Arc<dyn ValidatorProvider>>, ValidatorError> {
        let provider = self.get(resource_type)?;
        Ok(provider.related_type(key).and_then(|related| self.providers.get(related)))
    }

    pub fn types(&self) -> Vec<&str> {
        let mut types: Vec<_> = self.providers.keys().map(String::as_str).collect();
        types.sort_unstable();
        types
    }
}

impl std::fmt::Debug for ProviderRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderRegistry").field("types", &self.types()).finish()
    }
}
