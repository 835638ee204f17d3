use std::fmt;
use std::sync::Arc;

use jsonapi_core::{ErrorCode, ErrorCollection, ErrorRepository};
use serde_json::Value;

use crate::acceptance::{AcceptValue, Acceptance};
use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates a value with an application predicate.
///
/// A rejection is a `rejected-value` error at the value; `RejectedAt`
/// points at the rejected array elements, and `RejectedWith` reports the
/// caller's own error.
#[derive(Clone)]
pub struct CallbackValidator {
    repository: Arc<ErrorRepository>,
    callback: AcceptValue,
    required: bool,
}

impl CallbackValidator {
    pub fn new<F, A>(repository: Arc<ErrorRepository>, callback: F) -> Self
    where
        F: Fn(&Value, &ValidationContext<'_>) -> A + Send + Sync + 'static,
        A: Into<Acceptance>,
    {
        Self {
            repository,
            callback: Arc::new(move |value: &Value, ctx: &ValidationContext<'_>| callback(value, ctx).into()),
            required: false,
        }
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }
}

impl fmt::Debug for CallbackValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallbackValidator")
            .field("required", &self.required)
            .finish_non_exhaustive()
    }
}

impl Validator for CallbackValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        match (self.callback)(value, ctx) {
            Acceptance::Accepted => {}
            Acceptance::Rejected => {
                scope.error(ErrorCode::RejectedValue, "");
            }
            Acceptance::RejectedAt(indexes) => {
                for index in indexes {
                    scope.error(ErrorCode::RejectedValue, &format!("/{}", index));
                }
            }
            Acceptance::RejectedWith(error) => {
                let error = if error.pointer().is_some() { error } else { error.with_pointer("") };
                scope.push(error);
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
    use jsonapi_core::ErrorObject;
    use serde_json::json;

    fn repository() -> Arc<ErrorRepository> {
        Arc::new(ErrorRepository::new())
    }

    #[test]
    fn test_boolean_predicate() {
        let validator = CallbackValidator::new(repository(), |v: &Value, _: &ValidationContext<'_>| {
            v.as_i64().is_some_and(|n| n % 2 == 0)
        });
        let ctx = ValidationContext::new();

        assert!(validator.is_valid(&json!(4), &ctx).unwrap());

        let errors = validator.validate(&json!(3), &ctx).unwrap();
        assert_eq!(errors.codes(), vec![Some("rejected-value")]);
        assert_eq!(errors.status(), Some(422));
    }

    #[test]
    fn test_rejected_elements() {
        let validator = CallbackValidator::new(repository(), |v: &Value, _: &ValidationContext<'_>| {
            v.as_array()
                .map(|items| {
                    items
                        .iter()
                        .enumerate()
                        .filter(|(_, item)| !item.is_string())
                        .map(|(i, _)| i)
                        .collect::<Vec<_>>()
                })
                .unwrap_or_default()
        });

        let errors = validator
            .validate(&json!(["a", 1, "b", null]), &ValidationContext::new())
            .unwrap();
        assert_eq!(errors.pointers(), vec![Some("/1"), Some("/3")]);
    }

    #[test]
    fn test_custom_error() {
        let validator = CallbackValidator::new(repository(), |_: &Value, _: &ValidationContext<'_>| {
            ErrorObject::new().with_status(403).with_code("forbidden-value")
        });

        let errors = validator.validate(&json!("x"), &ValidationContext::new()).unwrap();
        assert_eq!(errors.codes(), vec![Some("forbidden-value")]);
        assert_eq!(errors.pointers(), vec![Some("")]);
    }
}
