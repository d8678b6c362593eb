use thiserror::Error;

use vitrine_core::DomainError;

pub type ClientResult<T> = Result<T, ClientError>;

/// Failure of a client call, by recovery strategy.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ClientError {
    /// Form input rejected before anything was sent.
    #[error("validation failed: {0}")]
    Validation(String),

    /// Transport failure or timeout. The only retryable kind.
    #[error("network error: {0}")]
    Network(String),

    /// The server refused the credentials or the token (401/403).
    #[error("unauthorized ({status}): {message}")]
    Unauthorized { status: u16, message: String },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Api { status: u16, message: String },

    /// The response body did not match the expected schema.
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid client configuration: {0}")]
    Config(String),
}

impl ClientError {
    pub(crate) fn from_status(status: u16, message: String) -> Self {
        match status {
            401 | 403 => Self::Unauthorized { status, message },
            _ => Self::Api { status, message },
        }
    }

    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Network(_))
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Unauthorized { status, .. } | Self::Api { status, .. } => Some(*status),
            _ => None,
        }
    }
}

impl From<DomainError> for ClientError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) | DomainError::InvalidId(msg) => Self::Validation(msg),
            DomainError::Schema(msg) => Self::Parse(msg),
        }
    }
}
