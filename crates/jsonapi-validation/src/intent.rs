//! What a request is trying to do.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// The action a request performs on a resource type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum RequestIntent {
    Index,
    Create,
    Read,
    Update,
    Delete,
    ReadRelated,
    ReadRelationship,
    ReplaceRelationship,
    AddToRelationship,
    RemoveFromRelationship,
}

impl RequestIntent {
    pub const ALL: [RequestIntent; 10] = [
        RequestIntent::Index,
        RequestIntent::Create,
        RequestIntent::Read,
        RequestIntent::Update,
        RequestIntent::Delete,
        RequestIntent::ReadRelated,
        RequestIntent::ReadRelationship,
        RequestIntent::ReplaceRelationship,
        RequestIntent::AddToRelationship,
        RequestIntent::RemoveFromRelationship,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RequestIntent::Index => "index",
            RequestIntent::Create => "create",
            RequestIntent::Read => "read",
            RequestIntent::Update => "update",
            RequestIntent::Delete => "delete",
            RequestIntent::ReadRelated => "read-related",
            RequestIntent::ReadRelationship => "read-relationship",
            RequestIntent::ReplaceRelationship => "replace-relationship",
            RequestIntent::AddToRelationship => "add-to-relationship",
            RequestIntent::RemoveFromRelationship => "remove-from-relationship",
        }
    }

    /// Whether the request carries a document to validate.
    pub fn has_document(&self) -> bool {
        matches!(
            self,
            RequestIntent::Create
                | RequestIntent::Update
                | RequestIntent::ReplaceRelationship
                | RequestIntent::AddToRelationship
                | RequestIntent::RemoveFromRelationship
        )
    }

    /// Whether the request changes server state.
    pub fn is_mutation(&self) -> bool {
        self.has_document() || *self == RequestIntent::Delete
    }

    /// Whether the request addresses an existing resource by id.
    pub fn needs_record(&self) -> bool {
        !matches!(self, RequestIntent::Index | RequestIntent::Create)
    }

    /// Whether the request addresses a relationship of a resource.
    pub fn is_relationship(&self) -> bool {
        matches!(
            self,
            RequestIntent::ReadRelated
                | RequestIntent::ReadRelationship
                | RequestIntent::ReplaceRelationship
                | RequestIntent::AddToRelationship
                | RequestIntent::RemoveFromRelationship
        )
    }

    pub fn modifies_relationship(&self) -> bool {
        self.is_relationship() && self.has_document()
    }
}

impl fmt::Display for RequestIntent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RequestIntent {
    type Err = String;

    /// Accepts the canonical names plus the short forms `replace`, `add`
    /// and `remove` for relationship modifications.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "replace" => Ok(RequestIntent::ReplaceRelationship),
            "add" => Ok(RequestIntent::AddToRelationship),
            "remove" => Ok(RequestIntent::RemoveFromRelationship),
            _ => RequestIntent::ALL
                .into_iter()
                .find(|intent| intent.as_str() == s)
                .ok_or_else(|| format!("Unknown request intent: {}", s)),
        }
    }
}
