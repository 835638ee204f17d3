//! Error codes, templates and the repository that instantiates them.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{prefix_pointer, ErrorCollection, ErrorObject};

/// Application error codes raised by the validation pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum ErrorCode {
    InvalidJson,
    MemberRequired,
    MemberObjectExpected,
    MemberStringExpected,
    MemberEmptyNotAllowed,
    MissingType,
    MissingId,
    UnexpectedId,
    MissingAttributes,
    UnexpectedAttributes,
    MissingRelationships,
    UnexpectedRelationships,
    UnsupportedType,
    UnsupportedId,
    UnrecognisedAttribute,
    RequiredAttribute,
    InvalidValue,
    RejectedValue,
    NotRecognised,
    Required,
    HasOneExpected,
    HasManyExpected,
    EmptyNotAllowed,
    InvalidType,
    InvalidId,
    NotFound,
    NotAcceptable,
    InvalidQueryParameter,
}

impl ErrorCode {
    pub const ALL: [ErrorCode; 28] = [
        ErrorCode::InvalidJson,
        ErrorCode::MemberRequired,
        ErrorCode::MemberObjectExpected,
        ErrorCode::MemberStringExpected,
        ErrorCode::MemberEmptyNotAllowed,
        ErrorCode::MissingType,
        ErrorCode::MissingId,
        ErrorCode::UnexpectedId,
        ErrorCode::MissingAttributes,
        ErrorCode::UnexpectedAttributes,
        ErrorCode::MissingRelationships,
        ErrorCode::UnexpectedRelationships,
        ErrorCode::UnsupportedType,
        ErrorCode::UnsupportedId,
        ErrorCode::UnrecognisedAttribute,
        ErrorCode::RequiredAttribute,
        ErrorCode::InvalidValue,
        ErrorCode::RejectedValue,
        ErrorCode::NotRecognised,
        ErrorCode::Required,
        ErrorCode::HasOneExpected,
        ErrorCode::HasManyExpected,
        ErrorCode::EmptyNotAllowed,
        ErrorCode::InvalidType,
        ErrorCode::InvalidId,
        ErrorCode::NotFound,
        ErrorCode::NotAcceptable,
        ErrorCode::InvalidQueryParameter,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InvalidJson => "invalid-json",
            ErrorCode::MemberRequired => "member-required",
            ErrorCode::MemberObjectExpected => "member-object-expected",
            ErrorCode::MemberStringExpected => "member-string-expected",
            ErrorCode::MemberEmptyNotAllowed => "member-empty-not-allowed",
            ErrorCode::MissingType => "missing-type",
            ErrorCode::MissingId => "missing-id",
            ErrorCode::UnexpectedId => "unexpected-id",
            ErrorCode::MissingAttributes => "missing-attributes",
            ErrorCode::UnexpectedAttributes => "unexpected-attributes",
            ErrorCode::MissingRelationships => "missing-relationships",
            ErrorCode::UnexpectedRelationships => "unexpected-relationships",
            ErrorCode::UnsupportedType => "unsupported-type",
            ErrorCode::UnsupportedId => "unsupported-id",
            ErrorCode::UnrecognisedAttribute => "unrecognised-attribute",
            ErrorCode::RequiredAttribute => "required-attribute",
            ErrorCode::InvalidValue => "invalid-value",
            ErrorCode::RejectedValue => "rejected-value",
            ErrorCode::NotRecognised => "not-recognised",
            ErrorCode::Required => "required",
            ErrorCode::HasOneExpected => "has-one-expected",
            ErrorCode::HasManyExpected => "has-many-expected",
            ErrorCode::EmptyNotAllowed => "empty-not-allowed",
            ErrorCode::InvalidType => "invalid-type",
            ErrorCode::InvalidId => "invalid-id",
            ErrorCode::NotFound => "not-found",
            ErrorCode::NotAcceptable => "not-acceptable",
            ErrorCode::InvalidQueryParameter => "invalid-query-parameter",
        }
    }

    /// The built-in template for this code.
    pub fn template(&self) -> ErrorTemplate {
        let (status, title, detail) = match self {
            ErrorCode::InvalidJson => (400, "Invalid JSON", "Request body content could not be parsed as JSON: %s"),
            ErrorCode::MemberRequired => (400, "Required Member", "The member '%s' is required."),
            ErrorCode::MemberObjectExpected => (400, "Object Expected", "The member '%s' must be an object."),
            ErrorCode::MemberStringExpected => (400, "String Expected", "The member '%s' must be a string."),
            ErrorCode::MemberEmptyNotAllowed => (400, "Empty Member", "The member '%s' cannot be empty."),
            ErrorCode::MissingType => (400, "Missing Type", "The resource object must have a type member."),
            ErrorCode::MissingId => (400, "Missing Id", "The resource object must have an id member."),
            ErrorCode::UnexpectedId => (400, "Unexpected Id", "The resource object must not have an id member."),
            ErrorCode::MissingAttributes => (400, "Missing Attributes", "The resource object must have an attributes member."),
            ErrorCode::UnexpectedAttributes => (400, "Unexpected Attributes", "The resource object must not have an attributes member."),
            ErrorCode::MissingRelationships => (400, "Missing Relationships", "The resource object must have a relationships member."),
            ErrorCode::UnexpectedRelationships => (400, "Unexpected Relationships", "The resource object must not have a relationships member."),
            ErrorCode::UnsupportedType => (409, "Unsupported Type", "Expecting resource type '%s'."),
            ErrorCode::UnsupportedId => (409, "Unsupported Id", "Expecting resource id '%s'."),
            ErrorCode::UnrecognisedAttribute => (400, "Unrecognised Attribute", "The attribute '%s' is not recognised."),
            ErrorCode::RequiredAttribute => (400, "Required Attribute", "The attribute '%s' is required."),
            ErrorCode::InvalidValue => (400, "Invalid Value", "The value is not valid."),
            ErrorCode::RejectedValue => (422, "Invalid Value", "The value provided is not acceptable."),
            ErrorCode::NotRecognised => (400, "Not Recognised", "The relationship '%s' is not recognised."),
            ErrorCode::Required => (400, "Required", "The relationship '%s' is required."),
            ErrorCode::HasOneExpected => (400, "Invalid Relationship", "The provided relationship must be a has-one relationship."),
            ErrorCode::HasManyExpected => (400, "Invalid Relationship", "The provided relationship must be a has-many relationship."),
            ErrorCode::EmptyNotAllowed => (422, "Invalid Relationship", "The provided relationship cannot be empty."),
            ErrorCode::InvalidType => (400, "Invalid Relationship", "The related resource type is not valid."),
            ErrorCode::InvalidId => (400, "Invalid Relationship", "The related resource id is not valid."),
            ErrorCode::NotFound => (404, "Invalid Relationship", "The related resource does not exist."),
            ErrorCode::NotAcceptable => (422, "Invalid Relationship", "The related resource is not acceptable."),
            ErrorCode::InvalidQueryParameter => (400, "Invalid Query Parameter", "%s"),
        };

        ErrorTemplate {
            code: self.as_str().to_string(),
            status,
            title: title.to_string(),
            detail: detail.to_string(),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An unknown error code string.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Unknown error code '{0}'")]
pub struct UnknownErrorCode(pub String);

impl FromStr for ErrorCode {
    type Err = UnknownErrorCode;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .iter()
            .copied()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| UnknownErrorCode(s.to_string()))
    }
}

/// The static part of an error: everything except where it occurred.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorTemplate {
    pub code: String,
    pub status: u16,
    pub title: String,
    pub detail: String,
}

impl ErrorTemplate {
    pub fn to_error(&self) -> ErrorObject {
        ErrorObject::new()
            .with_code(self.code.clone())
            .with_status(self.status)
            .with_title(self.title.clone())
            .with_detail(self.detail.clone())
    }

    fn apply(&mut self, over: &TemplateOverride) {
        if let Some(status) = over.status {
            self.status = status;
        }
        if let Some(title) = &over.title {
            self.title = title.clone();
        }
        if let Some(detail) = &over.detail {
            self.detail = detail.clone();
        }
    }
}

/// Per-code replacement of template members, usually read from configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TemplateOverride {
    pub status: Option<u16>,
    pub title: Option<String>,
    pub detail: Option<String>,
}

/// Source of error objects for every code, with optional overrides.
#[derive(Debug, Clone, Default)]
pub struct ErrorRepository {
    overrides: HashMap<ErrorCode, TemplateOverride>,
}

impl ErrorRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a repository from overrides keyed by code string.
    pub fn from_overrides<'a, I>(overrides: I) -> Result<Self, UnknownErrorCode>
    where
        I: IntoIterator<Item = (&'a String, &'a TemplateOverride)>,
    {
        let mut repository = Self::new();
        for (code, over) in overrides {
            repository.set_override(code.parse()?, over.clone());
        }
        Ok(repository)
    }

    pub fn set_override(&mut self, code: ErrorCode, over: TemplateOverride) -> &mut Self {
        tracing::debug!("Overriding error template for '{}'", code);
        self.overrides.insert(code, over);
        self
    }

    pub fn template(&self, code: ErrorCode) -> ErrorTemplate {
        let mut template = code.template();
        if let Some(over) = self.overrides.get(&code) {
            template.apply(over);
        }
        template
    }

    pub fn error(&self, code: ErrorCode) -> ErrorObject {
        self.template(code).to_error()
    }

    /// Start a scope that accumulates errors built from this repository.
    pub fn scope(&self) -> ErrorScope<'_> {
        ErrorScope::new(self)
    }
}

/// Accumulates the errors of a single validation call.
pub struct ErrorScope<'r> {
    repository: &'r ErrorRepository,
    errors: ErrorCollection,
}

impl<'r> ErrorScope<'r> {
    pub fn new(repository: &'r ErrorRepository) -> Self {
        Self {
            repository,
            errors: ErrorCollection::new(),
        }
    }

    /// Raise `code` at `pointer` and return it for further specialisation.
    pub fn error(&mut self, code: ErrorCode, pointer: &str) -> &mut ErrorObject {
        let error = self.repository.error(code).with_pointer(pointer);
        self.push(error)
    }

    /// Raise `code` against a query parameter.
    pub fn parameter_error(&mut self, code: ErrorCode, parameter: &str) -> &mut ErrorObject {
        let mut error = self.repository.error(code);
        error.set_parameter(parameter);
        self.push(error)
    }

    pub fn push(&mut self, error: ErrorObject) -> &mut ErrorObject {
        self.errors.push_mut(error)
    }

    pub fn merge(&mut self, errors: ErrorCollection) {
        self.errors.merge(errors);
    }

    /// Merge, rewriting each incoming pointer.
    pub fn merge_with<F>(&mut self, errors: ErrorCollection, rewriter: F)
    where
        F: Fn(&str) -> String,
    {
        self.errors.merge_with(errors, rewriter);
    }

    /// Merge with every incoming pointer prefixed by `prefix`.
    pub fn merge_prefixed(&mut self, errors: ErrorCollection, prefix: &str) {
        self.merge_with(errors, |pointer| prefix_pointer(prefix, pointer));
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn repository(&self) -> &'r ErrorRepository {
        self.repository
    }

    pub fn finish(self) -> ErrorCollection {
        self.errors
    }
}
