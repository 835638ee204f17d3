//! Access control hooks run before documents are validated.

use jsonapi_store::Record;
use jsonapi_validation::{EncodingParameters, RequestIntent};
use tracing::debug;

use crate::error::RequestError;
use crate::request::InboundRequest;

/// Decides whether a request may proceed.
///
/// Only the resource-level methods are required. Relationship requests
/// default to the resource-level answer: reading a relationship is allowed
/// when reading the related resource is, which is allowed when reading the
/// record is, and modifying a relationship is allowed when updating the
/// record is.
pub trait Authorizer: Send + Sync {
    fn can_index(&self, resource_type: &str, parameters: &EncodingParameters) -> bool;

    fn can_create(&self, resource_type: &str, parameters: &EncodingParameters) -> bool;

    fn can_read(&self, record: &Record, parameters: &EncodingParameters) -> bool;

    fn can_update(&self, record: &Record, parameters: &EncodingParameters) -> bool;

    fn can_delete(&self, record: &Record, parameters: &EncodingParameters) -> bool;

    fn can_read_related(&self, _key: &str, record: &Record, parameters: &EncodingParameters) -> bool {
        self.can_read(record, parameters)
    }

    fn can_read_relationship(&self, key: &str, record: &Record, parameters: &EncodingParameters) -> bool {
        self.can_read_related(key, record, parameters)
    }

    fn can_replace_relationship(&self, _key: &str, record: &Record, parameters: &EncodingParameters) -> bool {
        self.can_update(record, parameters)
    }

    fn can_add_to_relationship(&self, _key: &str, record: &Record, parameters: &EncodingParameters) -> bool {
        self.can_update(record, parameters)
    }

    fn can_remove_from_relationship(&self, _key: &str, record: &Record, parameters: &EncodingParameters) -> bool {
        self.can_update(record, parameters)
    }
}

/// Allows everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct AllowAll;

impl Authorizer for AllowAll {
    fn can_index(&self, _resource_type: &str, _parameters: &EncodingParameters) -> bool {
        true
    }

    fn can_create(&self, _resource_type: &str, _parameters: &EncodingParameters) -> bool {
        true
    }

    fn can_read(&self, _record: &Record, _parameters: &EncodingParameters) -> bool {
        true
    }

    fn can_update(&self, _record: &Record, _parameters: &EncodingParameters) -> bool {
        true
    }

    fn can_delete(&self, _record: &Record, _parameters: &EncodingParameters) -> bool {
        true
    }
}

/// Ask `authorizer` about `request`.
///
/// Intents that address a record need `record`; without one the request is
/// refused.
pub fn authorize(
    authorizer: &dyn Authorizer,
    intent: RequestIntent,
    request: &InboundRequest,
    record: Option<&Record>,
) -> Result<(), RequestError> {
    let parameters = request.parameters();
    let key = request.relationship().unwrap_or_default();

    let allowed = match (intent, record) {
        (RequestIntent::Index, _) => authorizer.can_index(request.resource_type(), parameters),
        (RequestIntent::Create, _) => authorizer.can_create(request.resource_type(), parameters),
        (RequestIntent::Read, Some(record)) => authorizer.can_read(record, parameters),
        (RequestIntent::Update, Some(record)) => authorizer.can_update(record, parameters),
        (RequestIntent::Delete, Some(record)) => authorizer.can_delete(record, parameters),
        (RequestIntent::ReadRelated, Some(record)) => authorizer.can_read_related(key, record, parameters),
        (RequestIntent::ReadRelationship, Some(record)) => authorizer.can_read_relationship(key, record, parameters),
        (RequestIntent::ReplaceRelationship, Some(record)) => {
            authorizer.can_replace_relationship(key, record, parameters)
        }
        (RequestIntent::AddToRelationship, Some(record)) => {
            authorizer.can_add_to_relationship(key, record, parameters)
        }
        (RequestIntent::RemoveFromRelationship, Some(record)) => {
            authorizer.can_remove_from_relationship(key, record, parameters)
        }
        (_, None) => false,
    };

    if allowed {
        Ok(())
    } else {
        debug!("Refused {} request for '{}'", intent, request.resource_type());
        Err(RequestError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Method;
    use jsonapi_core::ResourceIdentifier;

    /// Read-only access.
    struct ReadOnly;

    impl Authorizer for ReadOnly {
        fn can_index(&self, _resource_type: &str, _parameters: &EncodingParameters) -> bool {
            true
        }

        fn can_create(&self, _resource_type: &str, _parameters: &EncodingParameters) -> bool {
            false
        }

        fn can_read(&self, _record: &Record, _parameters: &EncodingParameters) -> bool {
            true
        }

        fn can_update(&self, _record: &Record, _parameters: &EncodingParameters) -> bool {
            false
        }

        fn can_delete(&self, _record: &Record, _parameters: &EncodingParameters) -> bool {
            false
        }
    }

    fn record() -> Record {
        Record::new(ResourceIdentifier::new("posts", "1"), ())
    }

    #[test]
    fn test_relationship_methods_delegate() {
        let request = InboundRequest::new(Method::GET, "posts")
            .with_id("1")
            .with_relationship("tags");
        let record = record();

        assert!(authorize(&ReadOnly, RequestIntent::ReadRelationship, &request, Some(&record)).is_ok());
        assert!(authorize(&ReadOnly, RequestIntent::ReadRelated, &request, Some(&record)).is_ok());
        for intent in [
            RequestIntent::ReplaceRelationship,
            RequestIntent::AddToRelationship,
            RequestIntent::RemoveFromRelationship,
        ] {
            assert!(matches!(
                authorize(&ReadOnly, intent, &request, Some(&record)),
                Err(RequestError::Forbidden)
            ));
        }
    }

    #[test]
    fn test_record_intents_need_a_record() {
        let request = InboundRequest::new(Method::GET, "posts").with_id("1");
        assert!(matches!(
            authorize(&AllowAll, RequestIntent::Read, &request, None),
            Err(RequestError::Forbidden)
        ));
        assert!(authorize(&AllowAll, RequestIntent::Read, &request, Some(&record())).is_ok());
        assert!(authorize(&AllowAll, RequestIntent::Index, &InboundRequest::new(Method::GET, "posts"), None).is_ok());
    }
}
