//! Member names defined by the JSON:API document structure.

pub const DATA: &str = "data";
pub const INCLUDED: &str = "included";
pub const ERRORS: &str = "errors";
pub const META: &str = "meta";
pub const LINKS: &str = "links";

pub const TYPE: &str = "type";
pub const ID: &str = "id";
pub const ATTRIBUTES: &str = "attributes";
pub const RELATIONSHIPS: &str = "relationships";

pub const STATUS: &str = "status";
pub const CODE: &str = "code";
pub const TITLE: &str = "title";
pub const DETAIL: &str = "detail";
pub const SOURCE: &str = "source";
pub const POINTER: &str = "pointer";
pub const PARAMETER: &str = "parameter";

/// Media type for JSON:API request and response bodies.
pub const MEDIA_TYPE: &str = "application/vnd.api+json";
