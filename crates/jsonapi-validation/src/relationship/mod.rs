//! Validators for relationship objects and the `relationships` member.

mod has_many;
mod has_one;
mod identifier;
mod relationships;

pub use has_many::HasManyValidator;
pub use has_one::HasOneValidator;
pub use relationships::RelationshipsValidator;
