//! Validation of a single resource object.

use std::sync::Arc;

use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository, ResourceObject};
use serde_json::{Map, Value};

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates the members of a resource object.
///
/// The type, id, attributes and relationships members are checked in that
/// order and every check always runs. Member errors are reported at the
/// member (`/type`, `/id`, `/attributes/...`, `/relationships/...`);
/// missing members are reported at the object itself (the empty pointer).
///
/// A member without a validator is forbidden: on create there is no id
/// validator, so a client-supplied id is `unexpected-id`.
#[derive(Clone)]
pub struct ResourceObjectValidator {
    repository: Arc<ErrorRepository>,
    resource_type: Arc<dyn Validator>,
    id: Option<Arc<dyn Validator>>,
    attributes: Option<Arc<dyn Validator>>,
    relationships: Option<Arc<dyn Validator>>,
}

impl ResourceObjectValidator {
    pub fn new(repository: Arc<ErrorRepository>, resource_type: Arc<dyn Validator>) -> Self {
        Self {
            repository,
            resource_type,
            id: None,
            attributes: None,
            relationships: None,
        }
    }

    pub fn id(mut self, validator: Arc<dyn Validator>) -> Self {
        self.id = Some(validator);
        self
    }

    pub fn attributes(mut self, validator: Arc<dyn Validator>) -> Self {
        self.attributes = Some(validator);
        self
    }

    pub fn relationships(mut self, validator: Arc<dyn Validator>) -> Self {
        self.relationships = Some(validator);
        self
    }

    pub fn has_id(&self) -> bool {
        self.id.is_some()
    }

    pub fn has_attributes(&self) -> bool {
        self.attributes.is_some()
    }

    pub fn has_relationships(&self) -> bool {
        self.relationships.is_some()
    }

    /// Validate one optional member. `missing` and `unexpected` are raised
    /// at the object and at the member respectively.
    #[allow(clippy::too_many_arguments)]
    fn member(
        &self,
        errors: &mut ErrorCollection,
        resource: &Map<String, Value>,
        key: &str,
        validator: Option<&Arc<dyn Validator>>,
        missing: ErrorCode,
        unexpected: ErrorCode,
        ctx: &ValidationContext<'_>,
    ) -> Result<(), ValidatorError> {
        let pointer = format!("/{}", key);
        let mut scope = self.repository.scope();

        match (validator, resource.get(key)) {
            (Some(validator), Some(value)) => {
                let nested = validator.validate(value, ctx)?;
                scope.merge_prefixed(nested, &pointer);
            }
            (Some(validator), None) => {
                if validator.is_required() {
                    scope.error(missing, "");
                }
            }
            (None, Some(_)) => {
                scope.error(unexpected, &pointer);
            }
            (None, None) => {}
        }

        errors.merge(scope.finish());
        Ok(())
    }
}

impl std::fmt::Debug for ResourceObjectValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceObjectValidator")
            .field("id", &self.id.is_some())
            .field("attributes", &self.attributes.is_some())
            .field("relationships", &self.relationships.is_some())
            .finish()
    }
}

impl Validator for ResourceObjectValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let Some(object) = value.as_object() else {
            let mut scope = self.repository.scope();
            scope
                .error(ErrorCode::InvalidValue, "")
                .set_detail("Expecting a resource object.");
            return Ok(scope.finish());
        };

        let resource = ResourceObject::from_value(value);
        let ctx = match &resource {
            Some(resource) => ctx.with_resource(resource),
            None => *ctx,
        };

        let mut errors = ErrorCollection::new();

        {
            let mut scope = self.repository.scope();
            match object.get(keyword::TYPE) {
                Some(resource_type) => {
                    let nested = self.resource_type.validate(resource_type, &ctx)?;
                    scope.merge_prefixed(nested, &format!("/{}", keyword::TYPE));
                }
                None => {
                    scope.error(ErrorCode::MissingType, "");
                }
            }
            errors.merge(scope.finish());
        }

        self.member(
            &mut errors,
            object,
            keyword::ID,
            self.id.as_ref(),
            ErrorCode::MissingId,
            ErrorCode::UnexpectedId,
            &ctx,
        )?;
        self.member(
            &mut errors,
            object,
            keyword::ATTRIBUTES,
            self.attributes.as_ref(),
            ErrorCode::MissingAttributes,
            ErrorCode::UnexpectedAttributes,
            &ctx,
        )?;
        self.member(
            &mut errors,
            object,
            keyword::RELATIONSHIPS,
            self.relationships.as_ref(),
            ErrorCode::MissingRelationships,
            ErrorCode::UnexpectedRelationships,
            &ctx,
        )?;

        Ok(errors)
    }
}
