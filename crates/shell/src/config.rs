//! Shell configuration, read from `VITRINE_*` environment variables.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

use vitrine_auth::{Capability, Policy};
use vitrine_client::config::{DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
use vitrine_core::UserId;
use vitrine_observability::LogFormat;

pub const API_URL_ENV: &str = "VITRINE_API_URL";
pub const ADMIN_ID_ENV: &str = "VITRINE_ADMIN_ID";
pub const ADMIN_CAPABILITY_ENV: &str = "VITRINE_ADMIN_CAPABILITY";
pub const DATA_DIR_ENV: &str = "VITRINE_DATA_DIR";
pub const TIMEOUT_ENV: &str = "VITRINE_TIMEOUT_SECS";
pub use vitrine_observability::tracing::FORMAT_ENV as LOG_FORMAT_ENV;

pub const DEFAULT_ADMIN_CAPABILITY: &str = "products.write";

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("{var}: {message}")]
    Invalid { var: &'static str, message: String },

    #[error("no data directory available; set VITRINE_DATA_DIR")]
    NoDataDir,
}

impl ConfigError {
    fn invalid(var: &'static str, message: impl core::fmt::Display) -> Self {
        Self::Invalid {
            var,
            message: message.to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ShellConfig {
    pub api_url: String,
    pub data_dir: PathBuf,
    pub admin_id: Option<UserId>,
    pub admin_capability: Capability,
    pub timeout: Duration,
    pub log_format: LogFormat,
}

impl ShellConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable source. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        let api_url = get(API_URL_ENV).unwrap_or_else(|| DEFAULT_BASE_URL.to_string());

        let data_dir = match get(DATA_DIR_ENV) {
            Some(dir) => PathBuf::from(dir),
            None => default_data_dir()?,
        };

        let admin_id = get(ADMIN_ID_ENV)
            .map(|raw| raw.parse::<UserId>())
            .transpose()
            .map_err(|e| ConfigError::invalid(ADMIN_ID_ENV, e))?;

        let admin_capability = Capability::new(
            get(ADMIN_CAPABILITY_ENV).unwrap_or_else(|| DEFAULT_ADMIN_CAPABILITY.to_string()),
        );

        let timeout = match get(TIMEOUT_ENV) {
            Some(raw) => {
                let secs: u64 = raw
                    .parse()
                    .map_err(|_| ConfigError::invalid(TIMEOUT_ENV, format!("'{raw}' is not a number of seconds")))?;
                if secs == 0 {
                    return Err(ConfigError::invalid(TIMEOUT_ENV, "must be at least 1"));
                }
                Duration::from_secs(secs)
            }
            None => DEFAULT_TIMEOUT,
        };

        let log_format = get(LOG_FORMAT_ENV)
            .map(|raw| raw.parse::<LogFormat>())
            .transpose()
            .map_err(|e| ConfigError::invalid(LOG_FORMAT_ENV, e))?
            .unwrap_or_default();

        Ok(Self {
            api_url,
            data_dir,
            admin_id,
            admin_capability,
            timeout,
            log_format,
        })
    }

    /// Where the file-backed session lives.
    pub fn session_dir(&self) -> PathBuf {
        self.data_dir.join("session")
    }

    /// Policy guarding catalog management and the user list.
    ///
    /// Holders of the admin capability always pass; the configured admin id,
    /// when set, passes as well.
    pub fn admin_policy(&self) -> Policy {
        let mut arms = vec![Policy::Capability(self.admin_capability.clone())];
        if let Some(id) = self.admin_id {
            arms.push(Policy::UserIs(id));
        }
        Policy::AnyOf(arms)
    }
}

fn default_data_dir() -> Result<PathBuf, ConfigError> {
    dirs::data_local_dir()
        .map(|d| d.join("vitrine"))
        .ok_or(ConfigError::NoDataDir)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn from(vars: &[(&str, &str)]) -> Result<ShellConfig, ConfigError> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        ShellConfig::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_unset() {
        let cfg = from(&[(DATA_DIR_ENV, "/tmp/vitrine")]).unwrap();
        assert_eq!(cfg.api_url, DEFAULT_BASE_URL);
        assert_eq!(cfg.data_dir, PathBuf::from("/tmp/vitrine"));
        assert_eq!(cfg.admin_id, None);
        assert_eq!(cfg.admin_capability, Capability::new(DEFAULT_ADMIN_CAPABILITY));
        assert_eq!(cfg.timeout, DEFAULT_TIMEOUT);
        assert_eq!(cfg.log_format, LogFormat::Json);
    }

    #[test]
    fn reads_every_variable() {
        let cfg = from(&[
            (API_URL_ENV, "https://shop.example.com/api"),
            (DATA_DIR_ENV, "/srv/vitrine"),
            (ADMIN_ID_ENV, " 2 "),
            (ADMIN_CAPABILITY_ENV, "catalog.admin"),
            (TIMEOUT_ENV, "5"),
            (LOG_FORMAT_ENV, "pretty"),
        ])
        .unwrap();
        assert_eq!(cfg.api_url, "https://shop.example.com/api");
        assert_eq!(cfg.admin_id, Some(UserId::new(2)));
        assert_eq!(cfg.timeout, Duration::from_secs(5));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
        assert_eq!(cfg.session_dir(), PathBuf::from("/srv/vitrine/session"));
    }

    #[test]
    fn empty_values_count_as_unset() {
        let cfg = from(&[(DATA_DIR_ENV, "/tmp/v"), (ADMIN_ID_ENV, ""), (API_URL_ENV, "  ")]).unwrap();
        assert_eq!(cfg.admin_id, None);
        assert_eq!(cfg.api_url, DEFAULT_BASE_URL);
    }

    #[test]
    fn rejects_bad_values() {
        let err = from(&[(DATA_DIR_ENV, "/tmp/v"), (ADMIN_ID_ENV, "root")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: ADMIN_ID_ENV, .. }));

        let err = from(&[(DATA_DIR_ENV, "/tmp/v"), (TIMEOUT_ENV, "0")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: TIMEOUT_ENV, .. }));

        let err = from(&[(DATA_DIR_ENV, "/tmp/v"), (LOG_FORMAT_ENV, "xml")]).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { var: LOG_FORMAT_ENV, .. }));
    }

    #[test]
    fn admin_policy_includes_user_arm_only_when_configured() {
        let cfg = from(&[(DATA_DIR_ENV, "/tmp/v")]).unwrap();
        assert_eq!(
            cfg.admin_policy(),
            Policy::AnyOf(vec![Policy::capability(DEFAULT_ADMIN_CAPABILITY)])
        );

        let cfg = from(&[(DATA_DIR_ENV, "/tmp/v"), (ADMIN_ID_ENV, "2")]).unwrap();
        assert_eq!(
            cfg.admin_policy(),
            Policy::AnyOf(vec![
                Policy::capability(DEFAULT_ADMIN_CAPABILITY),
                Policy::UserIs(UserId::new(2)),
            ])
        );
    }
}
