//! Request failures and their JSON:API error responses.

use axum::http::header::CONTENT_TYPE;
use axum::http::{Method, StatusCode};
use axum::response::{IntoResponse, Response};
use jsonapi_core::{keyword, ErrorCollection, ErrorObject, ResourceIdentifier};
use jsonapi_store::StoreError;
use jsonapi_validation::ValidatorError;
use thiserror::Error;
use tracing::error;

/// Why a request was refused before reaching the application.
///
/// Every variant renders as a JSON:API error document. Only
/// [`Configuration`](RequestError::Configuration) is a server fault.
#[derive(Error, Debug)]
pub enum RequestError {
    /// The query string or document failed validation.
    #[error("Request failed validation with {} error(s)", .0.len())]
    Invalid(ErrorCollection),

    /// The body is not a JSON:API document.
    #[error("Request body could not be decoded")]
    Decode(ErrorCollection),

    /// The addressed resource does not exist.
    #[error("Resource {}:{} not found", .0.resource_type(), .0.id().unwrap_or_default())]
    NotFound(ResourceIdentifier),

    /// No validators are registered for the resource type.
    #[error("Resource type '{0}' is not served")]
    UnknownResourceType(String),

    #[error("No route matches '{0}'")]
    UnknownRoute(String),

    #[error("Method {0} is not allowed here")]
    MethodNotAllowed(Method),

    #[error("The request is not authorized")]
    Forbidden,

    #[error("Server misconfigured: {0}")]
    Configuration(String),
}

impl RequestError {
    pub fn status(&self) -> StatusCode {
        match self {
            RequestError::Invalid(errors) => errors
                .status()
                .and_then(|status| StatusCode::from_u16(status).ok())
                .unwrap_or(StatusCode::BAD_REQUEST),
            RequestError::Decode(_) => StatusCode::BAD_REQUEST,
            RequestError::NotFound(_) | RequestError::UnknownResourceType(_) | RequestError::UnknownRoute(_) => {
                StatusCode::NOT_FOUND
            }
            RequestError::MethodNotAllowed(_) => StatusCode::METHOD_NOT_ALLOWED,
            RequestError::Forbidden => StatusCode::FORBIDDEN,
            RequestError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// The errors to send to the client.
    pub fn errors(&self) -> ErrorCollection {
        match self {
            RequestError::Invalid(errors) | RequestError::Decode(errors) => errors.clone(),
            RequestError::Configuration(_) => self.single("Internal Server Error", None),
            RequestError::Forbidden => self.single("Forbidden", None),
            RequestError::NotFound(_) => self.single("Not Found", Some(self.to_string())),
            RequestError::UnknownResourceType(_) | RequestError::UnknownRoute(_) => {
                self.single("Not Found", Some(self.to_string()))
            }
            RequestError::MethodNotAllowed(_) => self.single("Method Not Allowed", Some(self.to_string())),
        }
    }

    fn single(&self, title: &str, detail: Option<String>) -> ErrorCollection {
        let mut error = ErrorObject::new()
            .with_status(self.status().as_u16())
            .with_title(title);
        if let Some(detail) = detail {
            error.set_detail(detail);
        }
        ErrorCollection::from_error(error)
    }
}

impl From<ValidatorError> for RequestError {
    fn from(err: ValidatorError) -> Self {
        match err {
            ValidatorError::Store(StoreError::NotFound { resource_type, id }) => {
                RequestError::NotFound(ResourceIdentifier::new(resource_type, id))
            }
            ValidatorError::UnknownResourceType(resource_type) => RequestError::UnknownResourceType(resource_type),
            other => RequestError::Configuration(other.to_string()),
        }
    }
}

impl From<StoreError> for RequestError {
    fn from(err: StoreError) -> Self {
        ValidatorError::from(err).into()
    }
}

impl IntoResponse for RequestError {
    fn into_response(self) -> Response {
        if let RequestError::Configuration(message) = &self {
            error!("Request handling failed: {}", message);
        }

        let status = self.status();
        let body = self.errors().to_document().to_string();
        (status, [(CONTENT_TYPE, keyword::MEDIA_TYPE)], body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jsonapi_core::{ErrorCode, ErrorRepository};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_status_mapping() {
        let repository = ErrorRepository::new();
        let mut scope = repository.scope();
        scope.error(ErrorCode::NotFound, "/data");
        scope.error(ErrorCode::EmptyNotAllowed, "/data/relationships/author");

        assert_eq!(RequestError::Invalid(scope.finish()).status(), StatusCode::NOT_FOUND);
        assert_eq!(RequestError::Invalid(ErrorCollection::new()).status(), StatusCode::BAD_REQUEST);
        assert_eq!(RequestError::Forbidden.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            RequestError::MethodNotAllowed(Method::PUT).status(),
            StatusCode::METHOD_NOT_ALLOWED
        );
        assert_eq!(
            RequestError::Configuration("x".into()).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_store_not_found_becomes_not_found() {
        let err: RequestError = ValidatorError::Store(StoreError::not_found("posts", "9")).into();
        match &err {
            RequestError::NotFound(identifier) => {
                assert_eq!(identifier, &ResourceIdentifier::new("posts", "9"));
            }
            other => panic!("expected not found, got {:?}", other),
        }
        assert_eq!(err.errors().status(), Some(404));
        assert_eq!(
            err.errors().first().and_then(|e| e.detail()),
            Some("Resource posts:9 not found")
        );

        let err: RequestError = StoreError::UnknownType("widgets".into()).into();
        assert!(matches!(err, RequestError::Configuration(_)));
    }

    #[test]
    fn test_configuration_details_are_not_leaked() {
        let errors = RequestError::Configuration("secret path".into()).errors();
        assert_eq!(errors.first().and_then(|e| e.detail()), None);
        assert_eq!(errors.status(), Some(500));
    }
}
