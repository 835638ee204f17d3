use std::fmt;
use std::sync::Arc;

use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository, ResourceIdentifier};
use jsonapi_store::Store;
use serde_json::Value;

use super::identifier::Target;
use crate::acceptance::{AcceptOne, Acceptance};
use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates a has-one ("belongs-to") relationship object.
///
/// `data` must be an identifier object or `null`. Type and id errors land
/// at `/data/type` and `/data/id`; everything else at `/data`.
#[derive(Clone)]
pub struct HasOneValidator {
    repository: Arc<ErrorRepository>,
    target: Target,
    allow_empty: bool,
    required: bool,
    accept: Option<AcceptOne>,
}

impl HasOneValidator {
    pub fn new<I, S>(repository: Arc<ErrorRepository>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repository,
            target: Target {
                types: types.into_iter().map(Into::into).collect(),
                store: None,
            },
            allow_empty: true,
            required: false,
            accept: None,
        }
    }

    /// Whether `null` is an acceptable value.
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Check that the related resource exists in `store`.
    pub fn exists_in(mut self, store: Arc<dyn Store>) -> Self {
        self.target.store = Some(store);
        self
    }

    /// Ask `callback` whether the related resource may be used.
    pub fn accept<F, A>(mut self, callback: F) -> Self
    where
        F: Fn(&ResourceIdentifier, &ValidationContext<'_>) -> A + Send + Sync + 'static,
        A: Into<Acceptance>,
    {
        self.accept = Some(Arc::new(
            move |identifier: &ResourceIdentifier, ctx: &ValidationContext<'_>| callback(identifier, ctx).into(),
        ));
        self
    }

    pub fn types(&self) -> &[String] {
        &self.target.types
    }
}

impl fmt::Debug for HasOneValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasOneValidator")
            .field("target", &self.target)
            .field("allow_empty", &self.allow_empty)
            .field("required", &self.required)
            .field("accept", &self.accept.is_some())
            .finish()
    }
}

impl Validator for HasOneValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();
        let data_pointer = format!("/{}", keyword::DATA);

        let Some(relationship) = value.as_object() else {
            scope
                .error(ErrorCode::InvalidValue, "")
                .set_detail("Expecting a relationship object.");
            return Ok(scope.finish());
        };

        let data = match relationship.get(keyword::DATA) {
            None => {
                scope.error(ErrorCode::MemberRequired, "").interpolate(&[keyword::DATA]);
                return Ok(scope.finish());
            }
            Some(Value::Null) => {
                if !self.allow_empty {
                    scope.error(ErrorCode::EmptyNotAllowed, &data_pointer);
                }
                return Ok(scope.finish());
            }
            Some(data @ Value::Object(_)) => data,
            Some(_) => {
                scope.error(ErrorCode::HasOneExpected, &data_pointer);
                return Ok(scope.finish());
            }
        };

        let Some(identifier) = self.target.check(&mut scope, data, &data_pointer) else {
            return Ok(scope.finish());
        };

        if !self.target.exists(&identifier)? {
            tracing::debug!("Related resource {} not found", identifier);
            scope.error(ErrorCode::NotFound, &data_pointer);
            return Ok(scope.finish());
        }

        if let Some(accept) = &self.accept {
            match accept(&identifier, ctx) {
                Acceptance::Accepted => {}
                Acceptance::Rejected => {
                    scope.error(ErrorCode::NotAcceptable, &data_pointer);
                }
                Acceptance::RejectedAt(_) => {
                    scope.error(ErrorCode::NotFound, &data_pointer);
                }
                Acceptance::RejectedWith(error) => {
                    let error = if error.pointer().is_some() {
                        error
                    } else {
                        error.with_pointer(data_pointer.as_str())
                    };
                    scope.push(error);
                }
            }
        }

        Ok(scope.finish())
    }

    fn is_required(&self) -> bool {
        self.required
    }
}
