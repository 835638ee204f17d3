//! Construction of validators sharing one error repository and store.

use std::sync::Arc;

use jsonapi_core::ErrorRepository;
use jsonapi_store::Store;

use crate::acceptance::Acceptance;
use crate::document::{RelationshipDocumentValidator, ResourceDocumentValidator};
use crate::leaf::{
    AttributesValidator, CallbackValidator, ResourceIdValidator, ResourceTypeValidator, ValueKind, ValueValidator,
};
use crate::query::{QueryChecker, QuerySettings};
use crate::relationship::{HasManyValidator, HasOneValidator, RelationshipsValidator};
use crate::resource::ResourceObjectValidator;
use crate::validator::{ValidationContext, Validator};

/// Builds validators wired to a shared [`ErrorRepository`] and, when
/// present, the resource store used for existence checks.
#[derive(Clone)]
pub struct ValidatorFactory {
    repository: Arc<ErrorRepository>,
    store: Option<Arc<dyn Store>>,
}

impl ValidatorFactory {
    pub fn new(repository: Arc<ErrorRepository>, store: Arc<dyn Store>) -> Self {
        Self {
            repository,
            store: Some(store),
        }
    }

    /// A factory whose relationship validators never consult a store.
    pub fn without_store(repository: Arc<ErrorRepository>) -> Self {
        Self { repository, store: None }
    }

    pub fn repository(&self) -> &Arc<ErrorRepository> {
        &self.repository
    }

    pub fn store(&self) -> Option<&Arc<dyn Store>> {
        self.store.as_ref()
    }

    pub fn resource_type<I, S>(&self, types: I) -> ResourceTypeValidator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ResourceTypeValidator::new(self.repository.clone(), types)
    }

    /// An id validator; with `expected` the id must match it.
    pub fn resource_id(&self, expected: Option<&str>) -> ResourceIdValidator {
        let validator = ResourceIdValidator::new(self.repository.clone());
        match expected {
            Some(id) => validator.expect(id),
            None => validator.required(true),
        }
    }

    pub fn value(&self, kind: ValueKind) -> ValueValidator {
        ValueValidator::new(self.repository.clone(), kind)
    }

    pub fn callback<F, A>(&self, callback: F) -> CallbackValidator
    where
        F: Fn(&serde_json::Value, &ValidationContext<'_>) -> A + Send + Sync + 'static,
        A: Into<Acceptance>,
    {
        CallbackValidator::new(self.repository.clone(), callback)
    }

    pub fn attributes(&self) -> AttributesValidator {
        AttributesValidator::new(self.repository.clone())
    }

    /// A has-one validator that checks existence through the store.
    pub fn has_one<I, S>(&self, types: I) -> HasOneValidator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let validator = HasOneValidator::new(self.repository.clone(), types);
        match &self.store {
            Some(store) => validator.exists_in(store.clone()),
            None => validator,
        }
    }

    /// A has-many validator that checks existence through the store.
    pub fn has_many<I, S>(&self, types: I) -> HasManyValidator
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let validator = HasManyValidator::new(self.repository.clone(), types);
        match &self.store {
            Some(store) => validator.exists_in(store.clone()),
            None => validator,
        }
    }

    pub fn relationships(&self) -> RelationshipsValidator {
        RelationshipsValidator::new(self.repository.clone())
    }

    /// A resource object validator expecting `resource_type`.
    pub fn resource(&self, resource_type: &str) -> ResourceObjectValidator {
        ResourceObjectValidator::new(
            self.repository.clone(),
            Arc::new(self.resource_type([resource_type])),
        )
    }

    pub fn resource_document(&self, resource: impl Validator + 'static) -> ResourceDocumentValidator {
        ResourceDocumentValidator::new(self.repository.clone(), Arc::new(resource))
    }

    pub fn relationship_document(&self, relationship: Arc<dyn Validator>) -> RelationshipDocumentValidator {
        RelationshipDocumentValidator::new(relationship)
    }

    pub fn query_checker(&self, settings: QuerySettings) -> QueryChecker {
        QueryChecker::new(self.repository.clone(), settings)
    }
}

impl std::fmt::Debug for ValidatorFactory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ValidatorFactory")
            .field("store", &self.store.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_core::DocumentDecoder;
    use jsonapi_store::{AdapterContainer, MemoryAdapter, ResourceStore};
    use pretty_assertions::assert_eq;

    fn factory() -> ValidatorFactory {
        let users = MemoryAdapter::new("users");
        users.insert("1", ());
        let store = ResourceStore::new(AdapterContainer::new().with("users", Arc::new(users)));
        ValidatorFactory::new(Arc::new(ErrorRepository::new()), Arc::new(store))
    }

    #[test]
    fn test_relationship_validators_use_store() {
        let factory = factory();
        let document = DocumentDecoder::new()
            .decode(r#"{"data": {"type": "users", "id": "9"}}"#)
            .unwrap();

        let validator = factory.relationship_document(Arc::new(factory.has_one(["users"])));
        let errors = validator.validate(&document, &ValidationContext::new()).unwrap();
        assert_eq!(errors.codes(), vec![Some("not-found")]);
        assert_eq!(errors.pointers(), vec![Some("/data")]);
    }

    #[test]
    fn test_resource_id_expectation() {
        let factory = factory();
        assert_eq!(factory.resource_id(Some("1")).expected(), Some("1"));
        assert!(factory.resource_id(None).is_required());
    }

    #[test]
    fn test_resource_document() {
        let factory = factory();
        let validator = factory.resource_document(
            factory
                .resource("posts")
                .relationships(Arc::new(factory.relationships().relationship(
                    "author",
                    Arc::new(factory.has_one(["users"])),
                ))),
        );
        let document = DocumentDecoder::new()
            .decode(
                r#"{"data": {"type": "posts", "relationships": {"author": {"data": {"type": "users", "id": "2"}}}}}"#,
            )
            .unwrap();

        let errors = validator.validate(&document, &ValidationContext::new()).unwrap();
        assert_eq!(errors.pointers(), vec![Some("/data/relationships/author/data")]);
        assert_eq!(errors.status(), Some(404));
    }
}
