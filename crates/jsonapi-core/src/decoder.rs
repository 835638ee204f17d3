//! Decoding request bodies into documents.

use serde_json::Value;
use thiserror::Error;

use crate::error::{ErrorCode, ErrorCollection, ErrorRepository};
use crate::object::{Document, StandardObject};

/// Failures decoding a request body.
#[derive(Error, Debug)]
pub enum DecodeError {
    #[error("Request body content could not be parsed as JSON: {0}")]
    InvalidJson(#[from] serde_json::Error),

    #[error("Request body content must be a JSON object")]
    NotObject,
}

impl DecodeError {
    /// The client-facing errors for this failure.
    pub fn to_errors(&self, repository: &ErrorRepository) -> ErrorCollection {
        let mut error = repository.error(ErrorCode::InvalidJson);
        match self {
            DecodeError::InvalidJson(source) => {
                error.interpolate(&[source.to_string()]);
            }
            DecodeError::NotObject => {
                error.interpolate(&["expecting a JSON object"]);
            }
        }
        ErrorCollection::from_error(error)
    }
}

/// Decodes raw request bodies into [`Document`]s.
#[derive(Debug, Clone, Copy, Default)]
pub struct DocumentDecoder;

impl DocumentDecoder {
    pub fn new() -> Self {
        Self
    }

    pub fn decode(&self, content: &str) -> Result<Document, DecodeError> {
        let value: Value = serde_json::from_str(content)?;
        self.decode_value(value)
    }

    pub fn decode_slice(&self, content: &[u8]) -> Result<Document, DecodeError> {
        let value: Value = serde_json::from_slice(content)?;
        self.decode_value(value)
    }

    pub fn decode_value(&self, value: Value) -> Result<Document, DecodeError> {
        StandardObject::from_value(value)
            .map(Document::new)
            .ok_or(DecodeError::NotObject)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_decode_document() {
        let document = DocumentDecoder::new()
            .decode(r#"{"data": {"type": "posts"}}"#)
            .unwrap();
        assert_eq!(document.resource().unwrap().resource_type(), Some("posts"));
    }

    #[test]
    fn test_invalid_json() {
        let error = DocumentDecoder::new().decode("{data").unwrap_err();
        assert!(matches!(error, DecodeError::InvalidJson(_)));

        let errors = error.to_errors(&ErrorRepository::new());
        assert_eq!(errors.len(), 1);
        assert_eq!(errors.status(), Some(400));
        assert_eq!(errors.codes(), vec![Some("invalid-json")]);
        assert!(errors
            .first()
            .and_then(|e| e.detail())
            .unwrap()
            .starts_with("Request body content could not be parsed as JSON: "));
    }

    #[test]
    fn test_non_object_is_invalid_json() {
        let error = DocumentDecoder::new().decode("[1, 2]").unwrap_err();
        assert!(matches!(error, DecodeError::NotObject));
        assert_eq!(
            error.to_errors(&ErrorRepository::new()).codes(),
            vec![Some("invalid-json")]
        );
    }
}
