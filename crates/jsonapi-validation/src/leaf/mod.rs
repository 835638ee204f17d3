//! Validators for single members and values.

mod attributes;
mod callback;
mod resource_id;
mod resource_type;
mod value;

pub use attributes::AttributesValidator;
pub use callback::CallbackValidator;
pub use resource_id::ResourceIdValidator;
pub use resource_type::ResourceTypeValidator;
pub use value::{ValueKind, ValueValidator};
