//! Request handling for JSON:API servers
//!
//! Turns an HTTP request into an [`InboundRequest`], works out what it is
//! trying to do, and runs it through query checking, record lookup,
//! authorization and document validation with [`validate_request`].
//! Failures are [`RequestError`]s, which render as JSON:API error responses.

pub mod authorizer;
pub mod error;
pub mod query;
pub mod request;
pub mod validate;

pub use authorizer::{authorize, AllowAll, Authorizer};
pub use error::RequestError;
pub use query::parse_query;
pub use request::InboundRequest;
pub use validate::validate_request;

pub use axum::http::Method;
