//! Loading validation schemas from disk.

use std::io::Write;
use std::sync::Arc;

use jsonapi_core::ErrorRepository;
use jsonapi_test_fixtures::BLOG_SCHEMA;
use jsonapi_validation::{ConfigError, ProviderRegistry, RelationshipKind, SchemaFile, ValidatorFactory};
use pretty_assertions::assert_eq;

#[test]
fn test_load_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(BLOG_SCHEMA.as_bytes()).unwrap();

    let schema = SchemaFile::from_file(file.path()).unwrap();
    assert_eq!(
        schema.resource_types().collect::<Vec<_>>(),
        vec!["posts", "users", "tags", "comments"]
    );
    assert_eq!(schema.validate().unwrap(), Vec::<String>::new());

    let posts = schema.resource("posts").unwrap();
    assert_eq!(posts.relationships["tags"].kind, RelationshipKind::HasMany);
    assert_eq!(
        posts.query.fields.as_ref().map(|fields| fields.keys().cloned().collect::<Vec<_>>()),
        Some(vec!["posts".to_string(), "users".to_string()])
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let result = SchemaFile::from_file(dir.path().join("missing.toml"));
    assert!(matches!(result, Err(ConfigError::Io { .. })));
}

#[test]
fn test_invalid_pattern_fails_provider_construction() {
    let schema = SchemaFile::parse(
        r#"
[resources.users.attributes.email]
kind = "string"
pattern = "(unclosed"
"#,
    )
    .unwrap();
    let factory = ValidatorFactory::without_store(Arc::new(ErrorRepository::new()));

    let error = ProviderRegistry::from_schema(&schema, &factory).unwrap_err();
    assert!(matches!(error, ConfigError::InvalidPattern { ref attribute, .. } if attribute == "email"));
}
