//! Transient user notifications ("toasts").

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Level {
    Success,
    Error,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Success => "success",
            Level::Error => "error",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Notification {
    pub level: Level,
    pub message: String,
    pub at: DateTime<Utc>,
}

/// Pending notifications, oldest first, until the renderer drains them.
#[derive(Debug, Default)]
pub struct Notifications {
    pending: Vec<Notification>,
}

impl Notifications {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn success(&mut self, message: impl Into<String>) {
        self.push(Level::Success, message.into());
    }

    pub fn error(&mut self, message: impl Into<String>) {
        self.push(Level::Error, message.into());
    }

    pub fn pending(&self) -> &[Notification] {
        &self.pending
    }

    pub fn has_errors(&self) -> bool {
        self.pending.iter().any(|n| n.level == Level::Error)
    }

    pub fn drain(&mut self) -> Vec<Notification> {
        std::mem::take(&mut self.pending)
    }

    fn push(&mut self, level: Level, message: String) {
        tracing::debug!(level = level.as_str(), %message, "notification");
        self.pending.push(Notification {
            level,
            message,
            at: Utc::now(),
        });
    }
}
