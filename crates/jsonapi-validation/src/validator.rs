//! The validator capability and the context validators run in.

use std::sync::Arc;

use jsonapi_core::{ErrorCollection, ResourceObject};
use jsonapi_store::Record;
use serde_json::Value;

use crate::error::ValidatorError;

/// Validates one kind of input and reports every problem found.
///
/// A call never mutates the validator: each returns a fresh
/// [`ErrorCollection`], so one validator tree can be shared across threads.
/// Problems with the input are reported in the `Ok` collection; `Err` is
/// reserved for configuration and store failures.
pub trait Validator<T: ?Sized = Value>: Send + Sync {
    fn validate(&self, value: &T, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError>;

    fn is_valid(&self, value: &T, ctx: &ValidationContext<'_>) -> Result<bool, ValidatorError> {
        Ok(self.validate(value, ctx)?.is_empty())
    }

    /// Whether the containing member must be present.
    fn is_required(&self) -> bool {
        false
    }
}

impl<T: ?Sized, V: Validator<T> + ?Sized> Validator<T> for Arc<V> {
    fn validate(&self, value: &T, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        (**self).validate(value, ctx)
    }

    fn is_required(&self) -> bool {
        (**self).is_required()
    }
}

impl<T: ?Sized, V: Validator<T> + ?Sized> Validator<T> for Box<V> {
    fn validate(&self, value: &T, ctx: &ValidationContext<'_>) -> Result<ErrorCollection, ValidatorError> {
        (**self).validate(value, ctx)
    }

    fn is_required(&self) -> bool {
        (**self).is_required()
    }
}

/// What is known about the request while validating.
///
/// `record` is the domain record being updated (absent on create),
/// `resource` the resource object containing the value, and `relationship`
/// the relationship key being validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidationContext<'a> {
    record: Option<&'a Record>,
    resource: Option<&'a ResourceObject>,
    relationship: Option<&'a str>,
}

impl<'a> ValidationContext<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_record(record: Option<&'a Record>) -> Self {
        Self {
            record,
            ..Self::default()
        }
    }

    pub fn with_record(mut self, record: &'a Record) -> Self {
        self.record = Some(record);
        self
    }

    pub fn with_resource(mut self, resource: &'a ResourceObject) -> Self {
        self.resource = Some(resource);
        self
    }

    pub fn with_relationship(mut self, key: &'a str) -> Self {
        self.relationship = Some(key);
        self
    }

    pub fn record(&self) -> Option<&'a Record> {
        self.record
    }

    pub fn resource(&self) -> Option<&'a ResourceObject> {
        self.resource
    }

    pub fn relationship(&self) -> Option<&'a str> {
        self.relationship
    }
}

/// The outcome of validating a request document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Validation {
    errors: ErrorCollection,
}

impl Validation {
    pub fn new(errors: ErrorCollection) -> Self {
        Self { errors }
    }

    pub fn valid() -> Self {
        Self::default()
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn errors(&self) -> &ErrorCollection {
        &self.errors
    }

    pub fn into_errors(self) -> ErrorCollection {
        self.errors
    }

    /// The transport status for a failed validation.
    pub fn status(&self) -> Option<u16> {
        self.errors.status()
    }

    /// `Ok(())` when valid, otherwise the errors.
    pub fn into_result(self) -> Result<(), ErrorCollection> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

impl From<ErrorCollection> for Validation {
    fn from(errors: ErrorCollection) -> Self {
        Self::new(errors)
    }
}

/// Run `validator` and wrap the outcome.
pub fn validate<T: ?Sized>(
    validator: &dyn Validator<T>,
    value: &T,
    ctx: &ValidationContext<'_>,
) -> Result<Validation, ValidatorError> {
    let validation = validator.validate(value, ctx).map(Validation::new)?;
    tracing::debug!(
        "Validation finished with {} error(s), status {:?}",
        validation.errors().len(),
        validation.status()
    );
    Ok(validation)
}
