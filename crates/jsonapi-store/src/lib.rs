//! Resource store boundary.
//!
//! Validators resolve relationship identifiers through a [`Store`], and
//! request handlers load the record a request targets through it. The
//! [`ResourceStore`] dispatches each lookup to the [`Adapter`] registered
//! for the identifier's type.

mod adapter;
mod error;
mod memory;
mod record;
mod store;

pub use adapter::{Adapter, AdapterContainer};
pub use error::{Result, StoreError};
pub use memory::{adapters_from_json, MemoryAdapter};
pub use record::Record;
pub use store::{ResourceStore, Store};
