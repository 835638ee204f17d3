//! Validators for whole request documents.

use std::sync::Arc;

use jsonapi_core::{keyword, Document, ErrorCode, ErrorCollection, ErrorRepository};
use serde_json::Value;

use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates a document whose primary data is a single resource object,
/// as sent to create and update endpoints.
#[derive(Clone)]
pub struct ResourceDocumentValidator {
    repository: Arc<ErrorRepository>,
    resource: Arc<dyn Validator>,
}

impl ResourceDocumentValidator {
    pub fn new(repository: Arc<ErrorRepository>, resource: Arc<dyn Validator>) -> Self {
        Self { repository, resource }
    }
}

impl std::fmt::Debug for ResourceDocumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceDocumentValidator").finish_non_exhaustive()
    }
}

impl Validator<Document> for ResourceDocumentValidator {
    fn validate(&self, document: &Document, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();

        match document.data_value() {
            None => {
                scope.error(ErrorCode::MemberRequired, "/").interpolate(&[keyword::DATA]);
            }
            Some(data @ Value::Object(_)) => {
                let errors = self.resource.validate(data, ctx)?;
                scope.merge_prefixed(errors, &format!("/{}", keyword::DATA));
            }
            Some(_) => {
                scope
                    .error(ErrorCode::MemberObjectExpected, "/")
                    .interpolate(&[keyword::DATA]);
            }
        }

        Ok(scope.finish())
    }

    fn is_required(&self) -> bool {
        true
    }
}

/// Validates a relationship document, as sent to a relationship endpoint.
///
/// The whole document is the relationship object, so pointers from the
/// relationship validator are already document-relative; only the root
/// pointer is rewritten to `/`.
#[derive(Clone)]
pub struct RelationshipDocumentValidator {
    relationship: Arc<dyn Validator>,
    key: Option<String>,
}

impl RelationshipDocumentValidator {
    pub fn new(relationship: Arc<dyn Validator>) -> Self {
        Self {
            relationship,
            key: None,
        }
    }

    /// The relationship key, made available to acceptance callbacks.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }
}

impl std::fmt::Debug for RelationshipDocumentValidator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RelationshipDocumentValidator")
            .field("key", &self.key)
            .finish_non_exhaustive()
    }
}

impl Validator<Document> for RelationshipDocumentValidator {
    fn validate(&self, document: &Document, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let ctx = match self.key.as_deref() {
            Some(key) => ctx.with_relationship(key),
            None => *ctx,
        };

        let errors = self.relationship.validate(&document.to_value(), &ctx)?;
        Ok(errors.map_pointers(|pointer| {
            if pointer.is_empty() {
                "/".to_string()
            } else {
                pointer.to_string()
            }
        }))
    }

    fn is_required(&self) -> bool {
        true
    }
}
