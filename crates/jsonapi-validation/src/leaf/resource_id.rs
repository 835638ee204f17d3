use std::sync::Arc;

use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates the `id` member of a resource object.
///
/// The value must be a non-empty string. When an expected id is set (the
/// id of the resource being updated) it must match exactly.
#[derive(Debug, Clone)]
pub struct ResourceIdValidator {
    repository: Arc<ErrorRepository>,
    expected: Option<String>,
    required: bool,
}

impl ResourceIdValidator {
    pub fn new(repository: Arc<ErrorRepository>) -> Self {
        Self {
            repository,
            expected: None,
            required: false,
        }
    }

    /// Require the id to equal `id`. Implies the member is required.
    pub fn expect(mut self, id: impl Into<String>) -> Self {
        self.expected = Some(id.into());
        self.required = true;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    pub fn expected(&self) -> Option<&str> {
        self.expected.as_deref()
    }
}

impl Validator for ResourceIdValidator {
    fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        match (value.as_str(), self.expected.as_deref()) {
            (None, _) => {
                scope.error(ErrorCode::MemberStringExpected, "").interpolate(&[keyword::ID]);
            }
            (Some(""), _) => {
                scope.error(ErrorCode::MemberEmptyNotAllowed, "").interpolate(&[keyword::ID]);
            }
            (Some(id), Some(expected)) if id != expected => {
                scope.error(ErrorCode::UnsupportedId, "").interpolate(&[expected]);
            }
            _ => {}
        }

        Ok(scope.finish())
    }

    fn is_required(&self) -> bool {
        self.required
    }
}
