//! The `validate` command against fixture files on disk.

use jsonapi_cli::{run_validation, ValidateOptions};
use jsonapi_test_fixtures::{documents, FixtureType, TestFixtures};
use jsonapi_validation::RequestIntent;
use pretty_assertions::assert_eq;
use serde_json::json;
use std::path::Path;

fn options(dir: &Path) -> ValidateOptions {
    let mut options = ValidateOptions::new(dir.join("schema.toml"), dir.join("document.json"));
    options.records = Some(dir.join("records.json"));
    options
}

#[test]
fn test_valid_create() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::ValidCreate);

    let report = run_validation(&options(&dir)).unwrap();
    assert!(report.valid);
    assert_eq!(report.status, None);
    assert_eq!(report.errors, json!([]));
}

#[test]
fn test_invalid_create() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::InvalidCreate);

    // The document says "articles"; validate it as a post.
    let mut options = options(&dir);
    options.resource_type = Some("posts".to_string());

    let report = run_validation(&options).unwrap();
    assert!(!report.valid);
    assert_eq!(report.status, Some(400));
    assert_eq!(report.errors.as_array().map(Vec::len), Some(7));
}

#[test]
fn test_malformed_document() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::MalformedDocument);

    let mut options = options(&dir);
    options.resource_type = Some("posts".to_string());

    let report = run_validation(&options).unwrap();
    assert_eq!(report.status, Some(400));
    assert_eq!(report.errors[0]["code"], json!("invalid-json"));
}

#[test]
fn test_relationship_intent() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::ValidCreate);
    std::fs::write(
        dir.join("document.json"),
        documents::replace_tags(&["1", "404"]).to_string(),
    )
    .unwrap();

    let mut options = options(&dir);
    options.intent = RequestIntent::ReplaceRelationship;
    options.resource_type = Some("posts".to_string());
    options.id = Some("1".to_string());
    options.relationship = Some("tags".to_string());

    let report = run_validation(&options).unwrap();
    assert_eq!(report.status, Some(404));
    assert_eq!(report.errors[0]["source"]["pointer"], json!("/data/1"));
}

#[test]
fn test_missing_record() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::ValidCreate);
    std::fs::write(dir.join("document.json"), documents::update_post("7").to_string()).unwrap();

    let mut options = options(&dir);
    options.intent = RequestIntent::Update;
    options.id = Some("7".to_string());

    let report = run_validation(&options).unwrap();
    assert_eq!(report.status, Some(404));
}

#[test]
fn test_query_is_checked() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::ValidCreate);

    let mut options = options(&dir);
    options.query = Some("sort=title".to_string());

    let report = run_validation(&options).unwrap();
    assert_eq!(report.status, Some(400));
    assert_eq!(report.errors[0]["source"]["parameter"], json!("sort"));
}

#[test]
fn test_option_mistakes_are_errors() {
    let mut fixtures = TestFixtures::new();
    let dir = fixtures.setup(FixtureType::ValidCreate);

    let mut options = options(&dir);
    options.intent = RequestIntent::Update;
    assert!(run_validation(&options).is_err());

    let mut options = self::options(&dir);
    options.intent = RequestIntent::Read;
    assert!(run_validation(&options).is_err());

    let mut options = self::options(&dir);
    options.schema = dir.join("missing.toml");
    assert!(run_validation(&options).is_err());
}
