//! Persisted session (access token + user record).
//!
//! The session is written as one versioned record under a single key, so the
//! token and the user can never be observed out of step. Older layouts kept
//! them under two independent keys (`token`, `user`); those are still read
//! and are removed on `clear`.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::storage::{KeyValueStorage, MemoryStorage, StorageError};
use crate::UserRecord;

pub const SESSION_KEY: &str = "session";
pub const LEGACY_TOKEN_KEY: &str = "token";
pub const LEGACY_USER_KEY: &str = "user";

const RECORD_VERSION: u32 = 1;

/// Bearer token issued by the auth service.
///
/// `Debug` never prints the token itself.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }

    /// A blank token authenticates nothing and counts as absent.
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl core::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str("AccessToken(***)")
    }
}

/// Client-held authentication state.
///
/// A loaded session always has both fields set or neither.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Session {
    pub token: Option<AccessToken>,
    pub user: Option<UserRecord>,
}

impl Session {
    pub fn anonymous() -> Self {
        Self::default()
    }

    pub fn authenticated(token: AccessToken, user: UserRecord) -> Self {
        Self {
            token: Some(token),
            user: Some(user),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }

    pub fn user(&self) -> Option<&UserRecord> {
        self.user.as_ref()
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredSession {
    version: u32,
    token: AccessToken,
    user: UserRecord,
    saved_at: DateTime<Utc>,
}

/// The one place session state is read from or written to.
///
/// Cheap to clone; clones share the same storage.
#[derive(Clone)]
pub struct SessionStore {
    storage: Arc<dyn KeyValueStorage>,
}

impl core::fmt::Debug for SessionStore {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SessionStore").finish_non_exhaustive()
    }
}

impl SessionStore {
    pub fn new(storage: Arc<dyn KeyValueStorage>) -> Self {
        Self { storage }
    }

    pub fn in_memory() -> Self {
        Self::new(Arc::new(MemoryStorage::new()))
    }

    /// Persist `token` and `user` in one write.
    ///
    /// A blank token is refused, so a stored record always loads as logged in.
    pub fn save(&self, token: AccessToken, user: UserRecord) -> Result<(), StorageError> {
        if token.is_blank() {
            return Err(StorageError::BlankToken);
        }
        let record = StoredSession {
            version: RECORD_VERSION,
            token,
            user,
            saved_at: Utc::now(),
        };
        let encoded = serde_json::to_string(&record)?;
        self.storage.set(SESSION_KEY, &encoded)?;
        tracing::debug!(user_id = %record.user.id, "session saved");
        Ok(())
    }

    /// Read the current session.
    ///
    /// Never fails: unreadable, malformed, or partial state loads as
    /// [`Session::anonymous`].
    pub fn load(&self) -> Session {
        match self.read(SESSION_KEY) {
            Some(raw) => decode_record(&raw),
            None => self.load_legacy(),
        }
    }

    /// Remove every session key. Idempotent.
    pub fn clear(&self) -> Result<(), StorageError> {
        self.storage.remove(SESSION_KEY)?;
        self.storage.remove(LEGACY_TOKEN_KEY)?;
        self.storage.remove(LEGACY_USER_KEY)?;
        tracing::debug!("session cleared");
        Ok(())
    }

    /// Presence check only; the token is not validated.
    pub fn is_logged_in(&self) -> bool {
        self.load().is_authenticated()
    }

    fn read(&self, key: &str) -> Option<String> {
        match self.storage.get(key) {
            Ok(value) => value,
            Err(err) => {
                tracing::warn!(key, error = %err, "session storage read failed");
                None
            }
        }
    }

    fn load_legacy(&self) -> Session {
        let token = self
            .read(LEGACY_TOKEN_KEY)
            .map(AccessToken::new)
            .filter(|t| !t.is_blank());
        let user = self.read(LEGACY_USER_KEY).and_then(|raw| {
            serde_json::from_str::<UserRecord>(&raw)
                .map_err(|err| tracing::warn!(error = %err, "ignoring malformed stored user"))
                .ok()
        });

        match (token, user) {
            (Some(token), Some(user)) => Session::authenticated(token, user),
            (None, None) => Session::anonymous(),
            (token, user) => {
                tracing::warn!(
                    has_token = token.is_some(),
                    has_user = user.is_some(),
                    "partial session treated as logged out"
                );
                Session::anonymous()
            }
        }
    }
}

fn decode_record(raw: &str) -> Session {
    match serde_json::from_str::<StoredSession>(raw) {
        Ok(record) if record.version == RECORD_VERSION && !record.token.is_blank() => {
            Session::authenticated(record.token, record.user)
        }
        Ok(record) if record.token.is_blank() => {
            tracing::warn!("session record without token treated as logged out");
            Session::anonymous()
        }
        Ok(record) => {
            tracing::warn!(version = record.version, "unsupported session record version");
            Session::anonymous()
        }
        Err(err) => {
            tracing::warn!(error = %err, "ignoring malformed session record");
            Session::anonymous()
        }
    }
}
