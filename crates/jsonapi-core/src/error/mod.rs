//! JSON:API error objects and their accumulation.
//!
//! Validators raise errors through an [`ErrorScope`] built from an
//! [`ErrorRepository`], and hand back an [`ErrorCollection`] whose pointers
//! are prefixed as it bubbles up through containing members.

mod code;
mod collection;
mod object;

pub use code::{ErrorCode, ErrorRepository, ErrorScope, ErrorTemplate, TemplateOverride, UnknownErrorCode};
pub use collection::{pointer_token, prefix_pointer, ErrorCollection};
pub use object::{ErrorObject, SourceObject};
