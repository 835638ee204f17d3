use std::fmt;
use std::sync::Arc;

use jsonapi_core::{keyword, ErrorCode, ErrorCollection, ErrorRepository, ResourceIdentifierCollection};
use jsonapi_store::Store;
use serde_json::Value;

use super::identifier::Target;
use crate::acceptance::{AcceptMany, Acceptance};
use crate::error::ValidatorError;
use crate::validator::{ValidationContext, Validator};

/// Validates a has-many relationship object.
///
/// Pointers are relative to the relationship object: element errors land
/// at `/data/{i}`, `/data/{i}/type` and `/data/{i}/id`; errors about the
/// set as a whole land at `/data`.
#[derive(Clone)]
pub struct HasManyValidator {
    repository: Arc<ErrorRepository>,
    target: Target,
    allow_empty: bool,
    required: bool,
    accept: Option<AcceptMany>,
}

impl HasManyValidator {
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

    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    pub fn required(mut self, required: bool) -> Self {
        self.required = required;
        self
    }

    /// Check that every related resource exists in `store`.
    pub fn exists_in(mut self, store: Arc<dyn Store>) -> Self {
        self.target.store = Some(store);
        self
    }

    /// Ask `callback` whether the related resources may be used.
    pub fn accept<F, A>(mut self, callback: F) -> Self
    where
        F: Fn(&ResourceIdentifierCollection, &ValidationContext<'_>) -> A + Send + Sync + 'static,
        A: Into<Acceptance>,
    {
        self.accept = Some(Arc::new(
            move |identifiers: &ResourceIdentifierCollection, ctx: &ValidationContext<'_>| {
                callback(identifiers, ctx).into()
            },
        ));
        self
    }

    pub fn types(&self) -> &[String] {
        &self.target.types
    }
}

impl fmt::Debug for HasManyValidator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HasManyValidator")
            .field("target", &self.target)
            .field("allow_empty", &self.allow_empty)
            .field("required", &self.required)
            .field("accept", &self.accept.is_some())
            .finish()
    }
}

impl Validator for HasManyValidator {
    fn validate(&self, value: &Value, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        let mut scope = self.repository.scope();
        let data_pointer = format!("/{}", keyword::DATA);

        let Some(relationship) = value.as_object() else {
            scope
                .error(ErrorCode::InvalidValue, "")
                .set_detail("Expecting a relationship object.");
            return Ok(scope.finish());
        };

        let Some(data) = relationship.get(keyword::DATA) else {
            scope.error(ErrorCode::MemberRequired, "").interpolate(&[keyword::DATA]);
            return Ok(scope.finish());
        };

        let Some(elements) = data.as_array() else {
            scope.error(ErrorCode::HasManyExpected, &data_pointer);
            return Ok(scope.finish());
        };

        if elements.is_empty() && !self.allow_empty {
            scope.error(ErrorCode::EmptyNotAllowed, &data_pointer);
        }

        let mut identifiers = Vec::with_capacity(elements.len());
        for (index, element) in elements.iter().enumerate() {
            let pointer = format!("{}/{}", data_pointer, index);
            identifiers.push(self.target.check(&mut scope, element, &pointer));
        }

        if !scope.is_empty() {
            return Ok(scope.finish());
        }

        let identifiers: Vec<_> = identifiers.into_iter().flatten().collect();

        for (index, identifier) in identifiers.iter().enumerate() {
            if !self.target.exists(identifier)? {
                tracing::debug!("Related resource {} not found", identifier);
                scope.error(ErrorCode::NotFound, &format!("{}/{}", data_pointer, index));
            }
        }

        if !scope.is_empty() {
            return Ok(scope.finish());
        }

        if let Some(accept) = &self.accept {
            let collection: ResourceIdentifierCollection = identifiers.iter().cloned().collect();
            match accept(&collection, ctx) {
                Acceptance::Accepted => {}
                Acceptance::Rejected => {
                    scope.error(ErrorCode::NotAcceptable, &data_pointer);
                }
                Acceptance::RejectedAt(mut indexes) => {
                    indexes.sort_unstable();
                    indexes.dedup();

                    // Collection indexes skip duplicates; point at the first matching element.
                    let elements: Vec<usize> = indexes
                        .into_iter()
                        .filter_map(|index| collection.get(index))
                        .filter_map(|rejected| identifiers.iter().position(|id| id == rejected))
                        .collect();

                    if elements.is_empty() {
                        scope.error(ErrorCode::NotAcceptable, &data_pointer);
                    }
                    for element in elements {
                        scope.error(ErrorCode::NotFound, &format!("{}/{}", data_pointer, element));
                    }
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
