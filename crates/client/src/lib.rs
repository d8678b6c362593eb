//! `vitrine-client`: typed REST clients for the catalog and auth service.
//!
//! Every call is fire-once: no retries, no caching, no de-duplication.
//! Callers decide what to do with a [`ClientError`]; only
//! [`ClientError::is_retryable`] errors are worth another attempt.

pub mod auth;
pub mod config;
pub mod error;
pub mod products;
pub mod rest;

pub use auth::AuthClient;
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use products::ProductClient;
pub use rest::RestClient;

#[cfg(feature = "testing")]
pub mod testing;
