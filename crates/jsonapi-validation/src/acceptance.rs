//! Application-level acceptance of otherwise valid input.

use std::sync::Arc;

use jsonapi_core::{ErrorObject, ResourceIdentifier, ResourceIdentifierCollection};
use serde_json::Value;

use crate::validator::ValidationContext;

/// The verdict of an acceptance callback.
#[derive(Debug, Clone, PartialEq)]
pub enum Acceptance {
    Accepted,
    /// Rejected as a whole.
    Rejected,
    /// Rejected at the given element indexes.
    RejectedAt(Vec<usize>),
    /// Rejected with a caller-built error.
    RejectedWith(ErrorObject),
}

impl Acceptance {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Acceptance::Accepted)
    }
}

impl From<bool> for Acceptance {
    fn from(accepted: bool) -> Self {
        if accepted {
            Acceptance::Accepted
        } else {
            Acceptance::Rejected
        }
    }
}

/// An empty list of rejected indexes accepts.
impl From<Vec<usize>> for Acceptance {
    fn from(indexes: Vec<usize>) -> Self {
        if indexes.is_empty() {
            Acceptance::Accepted
        } else {
            Acceptance::RejectedAt(indexes)
        }
    }
}

impl From<ErrorObject> for Acceptance {
    fn from(error: ErrorObject) -> Self {
        Acceptance::RejectedWith(error)
    }
}

/// Decides whether a related resource may be used.
pub type AcceptOne = Arc<dyn Fn(&ResourceIdentifier, &ValidationContext<'_>) -> Acceptance + Send + Sync>;

/// Decides whether a set of related resources may be used.
pub type AcceptMany =
    Arc<dyn Fn(&ResourceIdentifierCollection, &ValidationContext<'_>) -> Acceptance + Send + Sync>;

/// Decides whether a value may be used.
pub type AcceptValue = Arc<dyn Fn(&Value, &ValidationContext<'_>) -> Acceptance + Send + Sync>;
