use std::sync::Arc;

use indexmap::IndexMap;
use jsonapi_core::error::pointer_token;
use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates the `attributes` member of a resource object.
///
/// Each configured key has its own validator, whose errors are prefixed
/// with `/{key}`. Missing required keys are reported at the member itself.
/// In strict mode keys without a validator are `unrecognised-attribute`
/// errors; otherwise they are ignored.
#[derive(Clone)]
pub struct AttributesValidator {
    repository: Arc<ErrorRepository>,
    validators: IndexMap<String, Arc<dyn Validator>>,
    required_keys: Vec<String>,
    strict: bool,
    required: bool,
}

impl AttributesValidator {
    pub fn new(repository: Arc<ErrorRepository>) -> Self {
        Self {
            repository,
            validators: IndexMap::new(),
            required_keys: Vec::new(),
            strict: false,
            required: false,
        }
    }

    /// Validate the value at `key` with `validator`.
    pub fn attribute(mut self, key: impl Into<String>, validator: Arc<dyn Validator>) -> Self {
        self.validators.insert(key.into(), validator);
        self
    }

    /// Require `key` to be present.
    pub fn require(mut self, key: impl Into<String>) -> Self {
        let key = key.into();
        if !self.required_keys.contains(&key) {
            self.required_keys.push(key);
        }
        self
    }

    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Require the `attributes` member itself.
    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.validators.keys().map(String::as_str)
    }

    pub fn required_keys(&self) -> &[String] {
        &self.required_keys
    }
}

impl std::fmt::Debug for AttributesValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AttributesValidator")
            .field("keys", &self.validators.keys().collect::<Vec<_>>())
            .field("required_keys", &self.required_keys)
            .field("strict", &self.strict)
            .field("required", &self.required)
            .finish()
    }
}

impl Validator for AttributesValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        let Some(attributes) = value.as_object() else {
            scope
                .error(ErrorCode::MemberObjectExpected, "")
                .interpolate(&[keyword::ATTRIBUTES]);
            return Ok(scope.finish());
        };

        for key in &self.required_keys {
            if !attributes.contains_key(key) {
                scope.error(ErrorCode::RequiredAttribute, "").interpolate(&[key]);
            }
        }

        for (key, value) in attributes {
            let pointer = format!("/{}", pointer_token(key));
            match self.validators.get(key) {
                Some(validator) => {
                    let errors = validator.validate(value, ctx)?;
                    scope.merge_prefixed(errors, &pointer);
                }
                None if self.strict => {
                    scope
                        .error(ErrorCode::UnrecognisedAttribute, &pointer)
                        .interpolate(&[key]);
                }
                None => {}
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
    use crate::leaf::{ValueKind, ValueValidator};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn validator(strict: bool) -> AttributesValidator {
        let repository = Arc::new(ErrorRepository::new());
        AttributesValidator::new(repository.clone())
            .attribute("title", Arc::new(ValueValidator::new(repository.clone(), ValueKind::String)))
            .attribute("rank", Arc::new(ValueValidator::new(repository, ValueKind::Integer)))
            .require("title")
            .strict(strict)
    }

    fn errors(validator: &AttributesValidator, value: Value) -> ErrorCollection {
        validator.validate(&value, &ValidationContext::new()).unwrap()
    }

    #[test]
    fn test_valid() {
        assert!(errors(&validator(true), json!({"title": "Hello", "rank": 1})).is_empty());
    }

    #[test]
    fn test_nested_errors_are_prefixed_with_key() {
        let errors = errors(&validator(false), json!({"title": 1}));
        assert_eq!(errors.pointers(), vec![Some("/title")]);
    }

    #[test]
    fn test_required_key() {
        let errors = errors(&validator(false), json!({"rank": 1}));
        assert_eq!(errors.codes(), vec![Some("required-attribute")]);
        assert_eq!(errors.pointers(), vec![Some("")]);
        assert_eq!(
            errors.first().and_then(|e| e.detail()),
            Some("The attribute 'title' is required.")
        );
    }

    #[test]
    fn test_strict_rejects_unknown_keys() {
        let value = json!({"title": "Hello", "colour": "red"});
        assert!(errors(&validator(false), value.clone()).is_empty());

        let errors = errors(&validator(true), value);
        assert_eq!(errors.codes(), vec![Some("unrecognised-attribute")]);
        assert_eq!(errors.pointers(), vec![Some("/colour")]);
    }

    #[test]
    fn test_not_an_object() {
        let errors = errors(&validator(false), json!([]));
        assert_eq!(errors.codes(), vec![Some("member-object-expected")]);
    }

    #[test]
    fn test_collects_every_error() {
        let errors = errors(&validator(true), json!({"rank": "first", "extra": 1}));
        assert_eq!(
            errors.codes(),
            vec![
                Some("required-attribute"),
                Some("invalid-value"),
                Some("unrecognised-attribute")
            ]
        );
    }
}
