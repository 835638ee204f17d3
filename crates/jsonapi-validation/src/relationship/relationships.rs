use std::sync::Arc;

use indexmap::IndexMap;
use jsonapi_core::error::pointer_token;
use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates the `relationships` member of a resource object.
///
/// Keys in the document without a configured validator are
/// `not-recognised` at `/{key}`. Each recognised relationship is validated
/// with the relationship key in context and its errors prefixed `/{key}`.
/// Missing required relationships are reported at the member itself.
#[derive(Clone)]
pub struct RelationshipsValidator {
    repository: Arc<ErrorRepository>,
    validators: IndexMap<String, Arc<dyn Validator>>,
    required: bool,
}

impl RelationshipsValidator {
    pub fn new(repository: Arc<ErrorRepository>) -> Self {
        Self {
            repository,
            validators: IndexMap::new(),
            required: false,
        }
    }

    pub fn relationship(mut self, key: impl Into<String>, validator: Arc<dyn Validator>) -> Self {
        self.validators.insert(key.into(), validator);
        self
    }

    /// Require the `relationships` member itself.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// The validator for one relationship.
    pub fn get(&self, key: &str) -> Option<&Arc<dyn Validator>> {
        self.validators.get(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }
}

impl std::fmt::Debug for RelationshipsValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipsValidator")
            .field("keys", &self.validators.keys().collect::<Vec<_>>())
            .field("required", &self.required)
            .finish()
    }
}

impl Validator for RelationshipsValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        let Some(relationships) = value.as_object() else {
            scope
                .error(ErrorCode::MemberObjectExpected, "")
                .interpolate(&[keyword::RELATIONSHIPS]);
            return Ok(scope.finish());
        };

        for (key, relationship) in relationships {
            let pointer = format!("/{}", pointer_token(key));
            match self.validators.get(key) {
                Some(validator) => {
                    let errors = validator.validate(relationship, &ctx.with_relationship(key))?;
                    scope.merge_prefixed(errors, &pointer);
                }
                None => {
                    scope.error(ErrorCode::NotRecognised, &pointer).interpolate(&[key]);
                }
            }
        }

        for (key, validator) in &self.validators {
            if validator.is_required() && !relationships.contains_key(key) {
                scope.error(ErrorCode::Required, "").interpolate(&[key]);
            }
        }

        Ok(scope.finish())
    }

    fn is_required(&self) -> bool {
        self.required
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::relationship::{HasManyValidator, HasOneValidator};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validator() -> RelationshipsValidator {
        let repository = Arc::new(ErrorRepository::new());
        RelationshipsValidator::new(repository.clone())
            .relationship(
                "author",
                Arc::new(HasOneValidator::new(repository.clone(), ["users"]).required(true)),
            )
            .relationship("tags", Arc::new(HasManyValidator::new(repository, ["tags"])))
    }

    fn errors(value: Value) -> ErrorCollection {
        validator().validate(&value, &ValidationContext::new()).unwrap()
    }

    #[test]
    fn test_valid() {
        let errors = errors(json!({
            "author": {"data": {"type": "users", "id": "1"}},
            "tags": {"data": []}
        }));
        assert!(errors.is_empty());
    }

    #[test]
    fn test_nested_pointers() {
        let errors = errors(json!({
            "author": {"data": {"type": "users", "id": "1"}},
            "tags": {"data": [{"type": "posts", "id": "1"}]}
        }));
        assert_eq!(errors.pointers(), vec![Some("/tags/data/0/type")]);
    }

    #[test]
    fn test_unrecognised_and_required() {
        let errors = errors(json!({"editor": {"data": null}}));
        assert_eq!(errors.codes(), vec![Some("not-recognised"), Some("required")]);
        assert_eq!(errors.pointers(), vec![Some("/editor"), Some("")]);
        assert_eq!(
            errors.get(1).and_then(|e| e.detail()),
            Some("The relationship 'author' is required.")
        );
    }

    #[test]
    fn test_missing_data_points_at_relationship() {
        let errors = errors(json!({"author": {}}));
        assert_eq!(errors.codes(), vec![Some("member-required")]);
        assert_eq!(errors.pointers(), vec![Some("/author")]);
    }
}
