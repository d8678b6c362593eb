//! Products catalog module.
//!
//! The canonical product schema exchanged with the REST service, the form
//! rules for create/update, and the in-memory list the catalog views render
//! from (no IO, no HTTP).

pub mod catalog;
pub mod product;

pub use catalog::Catalog;
pub use product::{Product, ProductDraft, SCHEMA_VERSION};
