//! `vitrine-auth`: client-side session and permission model.
//!
//! This crate is intentionally decoupled from HTTP: it owns the persisted
//! session, the capability/policy model, and the key-value storage seam.

pub mod capability;
pub mod policy;
pub mod session;
pub mod storage;
pub mod user;

pub use capability::Capability;
pub use policy::{authorize, has_permission, AccessPredicate, AuthzError, Policy};
pub use session::{AccessToken, Session, SessionStore};
pub use storage::{FileStorage, KeyValueStorage, MemoryStorage, StorageError};
pub use user::{Credentials, LoginResponse, UserRecord};
