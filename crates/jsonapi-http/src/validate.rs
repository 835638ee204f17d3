//! The request validation entry point.

use jsonapi_core::{ErrorCode, ErrorCollection, ErrorRepository};
use jsonapi_store::{Record, Store};
use jsonapi_validation::{validate, ProviderRegistry, ValidationContext};
use tracing::debug;

use crate::authorizer::{authorize, Authorizer};
use crate::error::RequestError;
use crate::request::InboundRequest;

/// Check a request before it reaches the application.
///
/// In order: the query parameters are checked, the addressed record is
/// loaded, the authorizer (if any) is consulted, and the request document is
/// validated for intents that carry one. The first failing step ends the
/// request. Returns the addressed record, if the request names one.
///
/// Query parameters of relationship requests are checked by the provider of
/// the related resource type when the registry knows it.
pub fn validate_request(
    request: &InboundRequest,
    store: &dyn Store,
    providers: &ProviderRegistry,
    authorizer: Option<&dyn Authorizer>,
) -> Result<Option<Record>, RequestError> {
    let intent = request.intent()?;
    let provider = providers.get(request.resource_type())?;
    debug!("Validating {} request for '{}'", intent, request.resource_type());

    let query_provider = match request.relationship() {
        Some(key) => providers.related(request.resource_type(), key)?.unwrap_or(provider),
        None => provider,
    };
    query_provider
        .query_checker(intent)
        .check(request.parameters())
        .map_err(RequestError::Invalid)?;

    let record = match request.resource_identifier() {
        Some(identifier) => Some(store.find_or_fail(&identifier)?),
        None => None,
    };

    if let Some(authorizer) = authorizer {
        authorize(authorizer, intent, request, record.as_ref())?;
    }

    let validator = provider.document_validator(intent, request.id(), request.relationship(), record.as_ref())?;
    if let Some(validator) = validator {
        let document = request
            .document()
            .ok_or_else(|| missing_document(providers.repository()))?;
        let validation = validate(validator.as_ref(), document, &ValidationContext::for_record(record.as_ref()))?;
        validation.into_result().map_err(RequestError::Invalid)?;
    }

    Ok(record)
}

fn missing_document(repository: &ErrorRepository) -> RequestError {
    let mut error = repository.error(ErrorCode::InvalidJson);
    error.interpolate(&["expecting a request document."]);
    RequestError::Decode(ErrorCollection::from_error(error))
}
