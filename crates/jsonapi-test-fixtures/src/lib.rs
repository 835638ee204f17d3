//! Test fixtures for JSON:API validation
//!
//! Provides a small blog domain (posts, users, tags, comments): a schema,
//! seed records, and request documents both valid and invalid.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use jsonapi_core::{Document, DocumentDecoder};
use jsonapi_store::{adapters_from_json, ResourceStore};
use serde_json::{json, Value};

/// Schema for the blog domain.
pub const BLOG_SCHEMA: &str = r#"
[errors.not-acceptable]
title = "Not Acceptable"

[resources.posts]
strict_attributes = true

[resources.posts.attributes.title]
kind = "string"
required = true
min_length = 1
max_length = 120

[resources.posts.attributes.body]
kind = "string"
nullable = true

[resources.posts.attributes.rank]
kind = "integer"
minimum = 0

[resources.posts.attributes.status]
kind = "string"
allowed = ["draft", "published"]

[resources.posts.relationships.author]
kind = "has-one"
types = ["users"]
required = true
allow_empty = false

[resources.posts.relationships.tags]
kind = "has-many"
types = ["tags"]

[resources.posts.query]
include = ["author", "tags", "comments"]
sort = ["title", "created"]
page = ["number", "size"]
filter = ["title"]

[resources.posts.query.fields]
posts = ["title", "body", "author"]
users = ["name"]

[resources.users]
[resources.users.attributes.name]
kind = "string"
required = true

[resources.users.attributes.email]
kind = "string"
pattern = "^[^@]+@[^@]+$"

[resources.tags]
[resources.tags.attributes.label]
kind = "string"
required = true

[resources.comments]
[resources.comments.attributes.body]
kind = "string"
required = true

[resources.comments.relationships.post]
kind = "has-one"
types = ["posts"]
required = true
"#;

/// Seed records for [`blog_store`].
pub fn blog_records() -> Value {
    json!({
        "posts": [
            {"id": "1", "title": "Hello World", "author": "1"}
        ],
        "users": [
            {"id": "1", "name": "Ada"},
            {"id": "2", "name": "Grace"}
        ],
        "tags": [
            {"id": "1", "label": "rust"},
            {"id": "2", "label": "json"},
            {"id": "3", "label": "api"}
        ],
        "comments": []
    })
}

/// A store over [`blog_records`].
pub fn blog_store() -> Arc<ResourceStore> {
    let adapters = adapters_from_json(&blog_records()).expect("blog records are well formed");
    Arc::new(ResourceStore::new(adapters))
}

pub fn decode(value: Value) -> Document {
    DocumentDecoder::new()
        .decode_value(value)
        .expect("fixture documents are objects")
}

/// Request documents for the blog domain.
pub mod documents {
    use serde_json::{json, Value};

    /// A valid create-post document.
    pub fn create_post() -> Value {
        json!({
            "data": {
                "type": "posts",
                "attributes": {
                    "title": "Hello World",
                    "body": null,
                    "rank": 1,
                    "status": "draft"
                },
                "relationships": {
                    "author": {"data": {"type": "users", "id": "1"}},
                    "tags": {"data": [{"type": "tags", "id": "1"}, {"type": "tags", "id": "2"}]}
                }
            }
        })
    }

    /// A create-post document with one problem in every member.
    pub fn invalid_create_post() -> Value {
        json!({
            "data": {
                "type": "articles",
                "id": "99",
                "attributes": {
                    "rank": -1,
                    "colour": "red"
                },
                "relationships": {
                    "author": {"data": null},
                    "tags": {"data": [{"type": "tags", "id": "1"}, {"type": "users", "id": "1"}]}
                }
            }
        })
    }

    /// A create-post document referencing resources that do not exist.
    pub fn create_post_missing_related() -> Value {
        json!({
            "data": {
                "type": "posts",
                "attributes": {"title": "Hello World"},
                "relationships": {
                    "author": {"data": {"type": "users", "id": "404"}},
                    "tags": {"data": [{"type": "tags", "id": "404"}]}
                }
            }
        })
    }

    /// An update-post document for post `id`.
    pub fn update_post(id: &str) -> Value {
        json!({
            "data": {
                "type": "posts",
                "id": id,
                "attributes": {"title": "Hello Again"}
            }
        })
    }

    /// A document replacing the tags of a post.
    pub fn replace_tags(ids: &[&str]) -> Value {
        let data: Vec<Value> = ids.iter().map(|id| json!({"type": "tags", "id": id})).collect();
        json!({ "data": data })
    }

    /// A document replacing the author of a post.
    pub fn replace_author(id: Option<&str>) -> Value {
        match id {
            Some(id) => json!({"data": {"type": "users", "id": id}}),
            None => json!({ "data": null }),
        }
    }
}

/// Fixture file sets written to a temporary directory.
pub enum FixtureType {
    /// `schema.toml`, `records.json` and a valid `document.json`.
    ValidCreate,
    /// As `ValidCreate` with an invalid `document.json`.
    InvalidCreate,
    /// A `document.json` that is not valid JSON.
    MalformedDocument,
}

/// Writes fixture files to a temporary directory kept alive with this value.
pub struct TestFixtures {
    temp_dir: Option<tempfile::TempDir>,
}

impl Default for TestFixtures {
    fn default() -> Self {
        Self::new()
    }
}

impl TestFixtures {
    pub fn new() -> Self {
        Self { temp_dir: None }
    }

    /// Create a temporary directory holding the fixture files.
    pub fn setup(&mut self, fixture_type: FixtureType) -> PathBuf {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().to_path_buf();

        self.write(&path, "schema.toml", BLOG_SCHEMA);
        self.write(&path, "records.json", &blog_records().to_string());

        match fixture_type {
            FixtureType::ValidCreate => {
                self.write(&path, "document.json", &documents::create_post().to_string());
            }
            FixtureType::InvalidCreate => {
                self.write(&path, "document.json", &documents::invalid_create_post().to_string());
            }
            FixtureType::MalformedDocument => {
                self.write(&path, "document.json", "{\"data\": ");
            }
        }

        self.temp_dir = Some(dir);
        path
    }

    fn write(&self, base: &Path, name: &str, content: &str) {
        fs::write(base.join(name), content).unwrap();
    }
}
