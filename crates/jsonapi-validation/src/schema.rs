//! Declarative validation schemas, usually loaded from TOML.
//!
//! ```toml
//! [errors.not-found]
//! title = "Missing Resource"
//!
//! [resources.posts]
//! strict_attributes = true
//!
//! [resources.posts.attributes.title]
//! kind = "string"
//! required = true
//! max_length = 120
//!
//! [resources.posts.relationships.author]
//! kind = "has-one"
//! types = ["users"]
//! required = true
//!
//! [resources.posts.query]
//! include = ["author"]
//! ```

use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use jsonapi_core::{ErrorRepository, TemplateOverride};
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::leaf::ValueKind;
use crate::query::QuerySettings;

fn default_true() -> bool {
    true
}

/// A schema file: error template overrides plus one schema per resource type.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SchemaFile {
    #[serde(default)]
    pub errors: IndexMap<String, TemplateOverride>,
    #[serde(default)]
    pub resources: IndexMap<String, ResourceSchema>,
}

/// How the documents of one resource type are validated.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResourceSchema {
    /// Reject attributes that have no schema.
    #[serde(default)]
    pub strict_attributes: bool,
    #[serde(default)]
    pub attributes: IndexMap<String, AttributeSchema>,
    #[serde(default)]
    pub relationships: IndexMap<String, RelationshipSchema>,
    #[serde(default)]
    pub query: QuerySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AttributeSchema {
    #[serde(default)]
    pub kind: ValueKind,
    /// Required when creating a resource.
    #[serde(default)]
    pub required: bool,
    #[serde(default)]
    pub nullable: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub pattern: Option<String>,
    pub minimum: Option<f64>,
    pub maximum: Option<f64>,
    pub allowed: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RelationshipKind {
    #[default]
    HasOne,
    HasMany,
}

impl RelationshipKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RelationshipKind::HasOne => "has-one",
            RelationshipKind::HasMany => "has-many",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelationshipSchema {
    #[serde(default)]
    pub kind: RelationshipKind,
    /// Acceptable related types; empty accepts any known type.
    #[serde(default)]
    pub types: Vec<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "default_true")]
    pub allow_empty: bool,
    /// Check related resources exist in the store.
    #[serde(default = "default_true")]
    pub exists: bool,
}

impl Default for RelationshipSchema {
    fn default() -> Self {
        Self {
            kind: RelationshipKind::default(),
            types: Vec::new(),
            required: false,
            allow_empty: true,
            exists: true,
        }
    }
}

impl AttributeSchema {
    /// The compiled `pattern`, if any.
    pub fn regex(&self, attribute: &str) -> Result<Option<Regex>, ConfigError> {
        self.pattern
            .as_deref()
            .map(|pattern| {
                Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern {
                    attribute: attribute.to_string(),
                    source,
                })
            })
            .transpose()
    }
}

impl ResourceSchema {
    /// The single related type of a relationship, when it names exactly one.
    pub fn related_type(&self, key: &str) -> Option<&str> {
        match self.relationships.get(key).map(|r| r.types.as_slice()) {
            Some([resource_type]) => Some(resource_type.as_str()),
            _ => None,
        }
    }
}

impl SchemaFile {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }

    pub fn resource(&self, resource_type: &str) -> Option<&ResourceSchema> {
        self.resources.get(resource_type)
    }

    pub fn resource_types(&self) -> impl Iterator<Item = &str> {
        self.resources.keys().map(String::as_str)
    }

    /// The error repository with this file's template overrides applied.
    pub fn repository(&self) -> Result<ErrorRepository, ConfigError> {
        Ok(ErrorRepository::from_overrides(&self.errors)?)
    }

    /// Add the resources and overrides of `other`. A resource type declared
    /// in both files is an error.
    pub fn merge(&mut self, other: SchemaFile) -> Result<(), ConfigError> {
        for (resource_type, schema) in other.resources {
            if self.resources.contains_key(&resource_type) {
                return Err(ConfigError::DuplicateResource(resource_type));
            }
            self.resources.insert(resource_type, schema);
        }
        self.errors.extend(other.errors);
        Ok(())
    }

    /// Check the schema for errors that would fail when building
    /// validators. Returns warnings for suspicious but usable settings.
    pub fn validate(&self) -> Result<Vec<String>, ConfigError> {
        let mut warnings = Vec::new();

        self.repository()?;

        for (resource_type, schema) in &self.resources {
            for (attribute, attr) in &schema.attributes {
                attr.regex(attribute)?;

                if attr.pattern.is_some() && attr.kind != ValueKind::String && attr.kind != ValueKind::Any {
                    warnings.push(format!(
                        "Attribute {}.{} has a pattern but is of kind {}",
                        resource_type, attribute, attr.kind
                    ));
                }
                if let (Some(min), Some(max)) = (attr.min_length, attr.max_length) {
                    if min > max {
                        warnings.push(format!(
                            "Attribute {}.{} has min_length greater than max_length",
                            resource_type, attribute
                        ));
                    }
                }
            }

            for (key, relationship) in &schema.relationships {
                if relationship.types.iter().any(String::is_empty) {
                    return Err(ConfigError::InvalidRelationship {
                        resource_type: resource_type.clone(),
                        key: key.clone(),
                        reason: "lists an empty resource type".to_string(),
                    });
                }

                for related in &relationship.types {
                    if !self.resources.contains_key(related) {
                        warnings.push(format!(
                            "Relationship {}.{} references undeclared resource type: {}",
                            resource_type, key, related
                        ));
                    }
                }
            }
        }

        Ok(warnings)
    }
}

impl FromStr for SchemaFile {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}
