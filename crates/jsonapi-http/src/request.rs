//! The inbound request model.

use axum::http::Method;
use jsonapi_core::{Document, DocumentDecoder, ErrorRepository, ResourceIdentifier};
use jsonapi_validation::{EncodingParameters, RequestIntent};

use crate::error::RequestError;
use crate::query::parse_query;

const RELATIONSHIPS_SEGMENT: &str = "relationships";

/// A JSON:API request, reduced to what validation needs.
#[derive(Debug, Clone, PartialEq)]
pub struct InboundRequest {
    method: Method,
    resource_type: String,
    id: Option<String>,
    relationship: Option<String>,
    /// `/{type}/{id}/{key}` rather than `/{type}/{id}/relationships/{key}`.
    related: bool,
    parameters: EncodingParameters,
    document: Option<Document>,
}

impl InboundRequest {
    pub fn new(method: Method, resource_type: impl Into<String>) -> Self {
        Self {
            method,
            resource_type: resource_type.into(),
            id: None,
            relationship: None,
            related: false,
            parameters: EncodingParameters::default(),
            document: None,
        }
    }

    /// Build a request from its path, query string and body.
    ///
    /// Paths are `/{type}`, `/{type}/{id}`, `/{type}/{id}/{key}` and
    /// `/{type}/{id}/relationships/{key}`, relative to the API root. An
    /// empty body means no document.
    pub fn parse(
        repository: &ErrorRepository,
        method: Method,
        path: &str,
        query: Option<&str>,
        body: &[u8],
    ) -> Result<Self, RequestError> {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();

        let mut request = match segments.as_slice() {
            [resource_type] => Self::new(method, *resource_type),
            [resource_type, id] => Self::new(method, *resource_type).with_id(*id),
            [_, _, RELATIONSHIPS_SEGMENT] => return Err(RequestError::UnknownRoute(path.to_string())),
            [resource_type, id, key] => Self::new(method, *resource_type).with_id(*id).with_related(*key),
            [resource_type, id, RELATIONSHIPS_SEGMENT, key] => Self::new(method, *resource_type)
                .with_id(*id)
                .with_relationship(*key),
            _ => return Err(RequestError::UnknownRoute(path.to_string())),
        };

        if let Some(query) = query {
            request.parameters = parse_query(repository, query).map_err(RequestError::Invalid)?;
        }

        if !body.iter().all(u8::is_ascii_whitespace) {
            let document = DocumentDecoder::new()
                .decode_slice(body)
                .map_err(|e| RequestError::Decode(e.to_errors(repository)))?;
            request.document = Some(document);
        }

        Ok(request)
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    /// Address the relationship endpoint of `key`.
    pub fn with_relationship(mut self, key: impl Into<String>) -> Self {
        self.relationship = Some(key.into());
        self.related = false;
        self
    }

    /// Address the related resource endpoint of `key`.
    pub fn with_related(mut self, key: impl Into<String>) -> Self {
        self.relationship = Some(key.into());
        self.related = true;
        self
    }

    pub fn with_parameters(mut self, parameters: EncodingParameters) -> Self {
        self.parameters = parameters;
        self
    }

    pub fn with_document(mut self, document: Document) -> Self {
        self.document = Some(document);
        self
    }

    pub fn method(&self) -> &Method {
        &self.method
    }

    pub fn resource_type(&self) -> &str {
        &self.resource_type
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn relationship(&self) -> Option<&str> {
        self.relationship.as_deref()
    }

    pub fn parameters(&self) -> &EncodingParameters {
        &self.parameters
    }

    pub fn document(&self) -> Option<&Document> {
        self.document.as_ref()
    }

    /// The identifier of the resource the request addresses.
    pub fn resource_identifier(&self) -> Option<ResourceIdentifier> {
        self.id
            .as_deref()
            .map(|id| ResourceIdentifier::new(self.resource_type.clone(), id))
    }

    /// What the request is trying to do.
    pub fn intent(&self) -> Result<RequestIntent, RequestError> {
        let method = &self.method;
        let intent = match (self.id.is_some(), self.relationship.is_some(), self.related) {
            (false, _, _) if method == Method::GET => RequestIntent::Index,
            (false, _, _) if method == Method::POST => RequestIntent::Create,
            (true, false, _) if method == Method::GET => RequestIntent::Read,
            (true, false, _) if method == Method::PATCH => RequestIntent::Update,
            (true, false, _) if method == Method::DELETE => RequestIntent::Delete,
            (true, true, true) if method == Method::GET => RequestIntent::ReadRelated,
            (true, true, false) if method == Method::GET => RequestIntent::ReadRelationship,
            (true, true, false) if method == Method::PATCH => RequestIntent::ReplaceRelationship,
            (true, true, false) if method == Method::POST => RequestIntent::AddToRelationship,
            (true, true, false) if method == Method::DELETE => RequestIntent::RemoveFromRelationship,
            _ => return Err(RequestError::MethodNotAllowed(method.clone())),
        };
        Ok(intent)
    }
}
