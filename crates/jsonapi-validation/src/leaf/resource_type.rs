use std::sync::Arc;

use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates the `type` member of a resource object.
///
/// The value must be a non-empty string naming one of the expected types.
#[derive(Debug, Clone)]
pub struct ResourceTypeValidator {
    repository: Arc<ErrorRepository>,
    types: Vec<String>,
}

impl ResourceTypeValidator {
    pub fn new<I, S>(repository: Arc<ErrorRepository>, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            repository,
            types: types.into_iter().map(Into::into).collect(),
        }
    }

    pub fn types(&self) -> &[String] {
        &self.types
    }

    pub fn accepts(&self, resource_type: &str) -> bool {
        self.types.iter().any(|t| t == resource_type)
    }
}

impl Validator for ResourceTypeValidator {
    fn validate(&self, value: &Value, _ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        match value.as_str() {
            None => {
                scope.error(ErrorCode::MemberStringExpected, "").interpolate(&[keyword::TYPE]);
            }
            Some("") => {
                scope.error(ErrorCode::MemberEmptyNotAllowed, "").interpolate(&[keyword::TYPE]);
            }
            Some(resource_type) if !self.accepts(resource_type) => {
                scope
                    .error(ErrorCode::UnsupportedType, "")
                    .interpolate(&[self.types.join("', '")]);
            }
            Some(_) => {}
        }

        Ok(scope.finish())
    }

    fn is_required(&self) -> bool {
        true
    }
}
