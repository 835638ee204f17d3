//! Rendering error collections as JSON:API error documents.

use insta::assert_json_snapshot;
use jsonapi_core::{ErrorCode, ErrorRepository};

#[test]
fn test_error_document_snapshot() {
    let repository = ErrorRepository::new();
    let mut scope = repository.scope();
    scope.error(ErrorCode::MissingType, "/data");
    scope
        .error(ErrorCode::NotFound, "/data/relationships/tags/data/0")
        .set_id("1");
    scope.parameter_error(ErrorCode::InvalidQueryParameter, "include")
        .interpolate(&["Include path 'foo' is not allowed."]);

    let errors = scope.finish();
    assert_eq!(errors.status(), Some(400));

    assert_json_snapshot!(errors.to_document(), @r#"
    {
      "errors": [
        {
          "status": "400",
          "code": "missing-type",
          "title": "Missing Type",
          "detail": "The resource object must have a type member.",
          "source": {
            "pointer": "/data"
          }
        },
        {
          "id": "1",
          "status": "404",
          "code": "not-found",
          "title": "Invalid Relationship",
          "detail": "The related resource does not exist.",
          "source": {
            "pointer": "/data/relationships/tags/data/0"
          }
        },
        {
          "status": "400",
          "code": "invalid-query-parameter",
          "title": "Invalid Query Parameter",
          "detail": "Include path 'foo' is not allowed.",
          "source": {
            "parameter": "include"
          }
        }
      ]
    }
    "#);
}

#[test]
fn test_absent_pointer_is_rewritten_from_root() {
    let repository = ErrorRepository::new();
    let mut nested = repository.scope();
    nested.push(repository.error(ErrorCode::InvalidValue));

    let mut scope = repository.scope();
    scope.merge_with(nested.finish(), |pointer| format!("/attributes/title{}", pointer));

    let errors = scope.finish();
    assert_eq!(errors.pointers(), vec![Some("/attributes/title")]);
}
