//! End-to-end validation of request documents against the blog schema.

use std::sync::Arc;

use insta::assert_json_snapshot;
use jsonapi_core::{Relationship, ResourceIdentifier, StandardObject};
use jsonapi_store::{Record, Store};
use jsonapi_test_fixtures::{blog_store, decode, documents, BLOG_SCHEMA};
use jsonapi_validation::{
    Hydrator, HydratorError, ProviderRegistry, RelationshipHook, RequestIntent, SchemaFile, ValidationContext,
    Validator, ValidatorFactory, ValidatorProvider,
};
use pretty_assertions::assert_eq;
use serde_json::{json, Value};

fn registry() -> ProviderRegistry {
    let schema = SchemaFile::parse(BLOG_SCHEMA).unwrap();
    let factory = ValidatorFactory::new(Arc::new(schema.repository().unwrap()), blog_store());
    ProviderRegistry::from_schema(&schema, &factory).unwrap()
}

fn post(id: &str) -> Record {
    blog_store()
        .find_or_fail(&ResourceIdentifier::new("posts", id))
        .unwrap()
}

fn summary(errors: &jsonapi_core::ErrorCollection) -> Value {
    errors
        .iter()
        .map(|e| json!({"code": e.code(), "status": e.status(), "pointer": e.pointer()}))
        .collect()
}

#[test]
fn test_valid_create() {
    let validator = registry().get("posts").unwrap().create_resource().unwrap();
    let document = decode(documents::create_post());
    assert!(validator.is_valid(&document, &ValidationContext::new()).unwrap());
}

#[test]
fn test_every_error_is_reported() {
    let validator = registry().get("posts").unwrap().create_resource().unwrap();
    let errors = validator
        .validate(&decode(documents::invalid_create_post()), &ValidationContext::new())
        .unwrap();

    assert_eq!(errors.status(), Some(400));
    assert_json_snapshot!(summary(&errors), @r#"
    [
      {
        "code": "unsupported-type",
        "status": "409",
        "pointer": "/data/type"
      },
      {
        "code": "unexpected-id",
        "status": "400",
        "pointer": "/data/id"
      },
      {
        "code": "required-attribute",
        "status": "400",
        "pointer": "/data/attributes"
      },
      {
        "code": "invalid-value",
        "status": "400",
        "pointer": "/data/attributes/rank"
      },
      {
        "code": "unrecognised-attribute",
        "status": "400",
        "pointer": "/data/attributes/colour"
      },
      {
        "code": "empty-not-allowed",
        "status": "422",
        "pointer": "/data/relationships/author/data"
      },
      {
        "code": "invalid-type",
        "status": "400",
        "pointer": "/data/relationships/tags/data/1/type"
      }
    ]
    "#);
}

#[test]
fn test_missing_related_resources_are_not_found() {
    let validator = registry().get("posts").unwrap().create_resource().unwrap();
    let errors = validator
        .validate(&decode(documents::create_post_missing_related()), &ValidationContext::new())
        .unwrap();

    assert_eq!(errors.codes(), vec![Some("not-found"), Some("not-found")]);
    assert_eq!(
        errors.pointers(),
        vec![
            Some("/data/relationships/author/data"),
            Some("/data/relationships/tags/data/0"),
        ]
    );
    assert_eq!(errors.status(), Some(404));
}

#[test]
fn test_type_mismatch_is_a_conflict() {
    let validator = registry().get("posts").unwrap().create_resource().unwrap();
    let mut document = documents::create_post();
    document["data"]["type"] = json!("comments");

    let errors = validator.validate(&decode(document), &ValidationContext::new()).unwrap();
    assert_eq!(errors.codes(), vec![Some("unsupported-type")]);
    assert_eq!(errors.status(), Some(409));
    assert_eq!(
        errors.first().and_then(|e| e.detail()),
        Some("Expecting resource type 'posts'.")
    );
}

#[test]
fn test_update() {
    let registry = registry();
    let provider = registry.get("posts").unwrap();
    let record = post("1");
    let ctx = ValidationContext::for_record(Some(&record));

    let validator = provider.update_resource("1", &record).unwrap();
    assert!(validator.is_valid(&decode(documents::update_post("1")), &ctx).unwrap());

    let errors = validator.validate(&decode(documents::update_post("2")), &ctx).unwrap();
    assert_eq!(errors.codes(), vec![Some("unsupported-id")]);
    assert_eq!(errors.status(), Some(409));

    let mut missing_id = documents::update_post("1");
    missing_id["data"].as_object_mut().unwrap().remove("id");
    let errors = validator.validate(&decode(missing_id), &ctx).unwrap();
    assert_eq!(errors.codes(), vec![Some("missing-id")]);
    assert_eq!(errors.pointers(), vec![Some("/data")]);
}

#[test]
fn test_bad_request_outranks_unprocessable() {
    let validator = registry().get("posts").unwrap().create_resource().unwrap();
    let mut document = documents::create_post();
    document["data"]["attributes"]["title"] = json!(7);
    document["data"]["relationships"]["author"]["data"] = Value::Null;

    let errors = validator.validate(&decode(document), &ValidationContext::new()).unwrap();
    assert_eq!(errors.codes(), vec![Some("invalid-value"), Some("empty-not-allowed")]);
    assert_eq!(errors.status(), Some(400));
}

#[test]
fn test_relationship_documents() {
    let registry = registry();
    let provider = registry.get("posts").unwrap();
    let record = post("1");
    let ctx = ValidationContext::for_record(Some(&record));

    let tags = provider
        .document_validator(RequestIntent::ReplaceRelationship, Some("1"), Some("tags"), Some(&record))
        .unwrap()
        .unwrap();
    assert!(tags.is_valid(&decode(documents::replace_tags(&[])), &ctx).unwrap());
    assert!(tags.is_valid(&decode(documents::replace_tags(&["1", "3"])), &ctx).unwrap());

    let errors = tags.validate(&decode(documents::replace_tags(&["9"])), &ctx).unwrap();
    assert_eq!(errors.codes(), vec![Some("not-found")]);
    assert_eq!(errors.pointers(), vec![Some("/data/0")]);
    assert_eq!(errors.status(), Some(404));

    let author = provider.modify_relationship("1", "author", &record).unwrap();
    let errors = author.validate(&decode(documents::replace_author(None)), &ctx).unwrap();
    assert_eq!(errors.codes(), vec![Some("empty-not-allowed")]);
    assert_eq!(errors.pointers(), vec![Some("/data")]);

    let errors = author.validate(&decode(json!({"data": []})), &ctx).unwrap();
    assert_eq!(errors.codes(), vec![Some("has-one-expected")]);
}

#[test]
fn test_acceptance_sees_record() {
    let schema = SchemaFile::parse(BLOG_SCHEMA).unwrap();
    let factory = ValidatorFactory::new(Arc::new(schema.repository().unwrap()), blog_store());
    let provider = jsonapi_validation::SchemaProvider::new("posts", schema.resources["posts"].clone(), factory)
        .unwrap()
        .accept_one("author", |author: &ResourceIdentifier, ctx: &ValidationContext<'_>| {
            let owner = ctx
                .record()
                .and_then(|record| record.downcast_ref::<Value>())
                .and_then(|post| post["author"].as_str());
            owner == author.id()
        })
        .unwrap();

    let record = post("1");
    let ctx = ValidationContext::for_record(Some(&record));
    let validator = provider.modify_relationship("1", "author", &record).unwrap();

    assert!(validator.is_valid(&decode(documents::replace_author(Some("1"))), &ctx).unwrap());

    let errors = validator.validate(&decode(documents::replace_author(Some("2"))), &ctx).unwrap();
    assert_eq!(errors.codes(), vec![Some("not-acceptable")]);
    assert_eq!(errors.first().and_then(|e| e.title()), Some("Not Acceptable"));
    assert_eq!(errors.status(), Some(422));
}

#[test]
fn test_validators_are_shared_across_threads() {
    let validator: Arc<dyn Validator<jsonapi_core::Document>> =
        Arc::from(registry().get("posts").unwrap().create_resource().unwrap());

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let validator = validator.clone();
            std::thread::spawn(move || {
                let document = if i % 2 == 0 {
                    documents::create_post()
                } else {
                    documents::invalid_create_post()
                };
                validator
                    .validate(&decode(document), &ValidationContext::new())
                    .unwrap()
                    .len()
            })
        })
        .collect();

    let counts: Vec<usize> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(counts, vec![0, 7, 0, 7]);
}

#[derive(Debug, Default)]
struct Post {
    title: String,
    rank: Option<i64>,
    tag_ids: Vec<String>,
}

struct PostHydrator;

impl PostHydrator {
    fn hydrate_tags(&self, relationship: &Relationship, post: &mut Post) -> Result<(), HydratorError> {
        post.tag_ids = relationship
            .identifiers()
            .map_err(|e| HydratorError::invalid_relationship("tags", e))?
            .ids();
        Ok(())
    }
}

impl Hydrator<Post> for PostHydrator {
    fn hydrate_attributes(&self, attributes: &StandardObject, post: &mut Post) -> Result<(), HydratorError> {
        post.title = attributes.get_str("title").unwrap_or_default().to_string();
        post.rank = attributes.get("rank").and_then(Value::as_i64);
        Ok(())
    }

    fn relationship_hook(&self, key: &str) -> Option<RelationshipHook<Self, Post>> {
        match key {
            "tags" => Some(Self::hydrate_tags as RelationshipHook<Self, Post>),
            _ => None,
        }
    }
}

#[test]
fn test_valid_document_hydrates_a_record() {
    let validator = registry().get("posts").unwrap().create_resource().unwrap();
    let document = decode(documents::create_post());
    assert!(validator.is_valid(&document, &ValidationContext::new()).unwrap());

    let resource = document.resource().unwrap();
    let post = PostHydrator.create(&resource).unwrap();

    assert_eq!(post.title, "Hello World");
    assert_eq!(post.rank, Some(1));
    assert_eq!(post.tag_ids, vec!["1".to_string(), "2".to_string()]);
}
