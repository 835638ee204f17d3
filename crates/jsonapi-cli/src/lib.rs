//! Library interface for the jsonapi CLI

pub mod summary;
pub mod validate;

pub use summary::summarize;
pub use validate::{load_schema, run_validation, Report, ValidateOptions};
