//! `vitrine-core`: shared building blocks for the catalog shell.
//!
//! This crate contains **pure** primitives (no IO, no HTTP, no storage):
//! identifiers, the error model, and form validation rules.

pub mod error;
pub mod id;
pub mod validation;

pub use error::{DomainError, DomainResult};
pub use id::{ProductId, UserId};
pub use validation::{FieldErrors, Validator};
