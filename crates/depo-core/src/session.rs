//! Session-level domain types shared by the application layer and the presentation layer.

use serde::{Deserialize, Serialize};
use strum::Display;

use crate::error::DepoError;

/// The kind of operation a session failure originated from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum OperationKind {
    Init,
    Refresh,
    Search,
    Add,
    Delete,
    Update,
    SetConstraint,
    ClearConstraint,
    Build,
    Install,
}

/// The most recent failure of a session.
///
/// Overwritten by every new failure; read by the presentation layer for
/// display or alerting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionError {
    /// Operation that failed
    pub operation: OperationKind,
    /// Human-readable message
    pub message: String,
    /// RFC 3339 timestamp of when the failure was recorded
    pub occurred_at: String,
}

impl SessionError {
    /// Creates a new session error stamped with the current time.
    pub fn new(operation: OperationKind, message: impl Into<String>) -> Self {
        Self {
            operation,
            message: message.into(),
            occurred_at: chrono::Utc::now().to_rfc3339(),
        }
    }

    /// Creates a session error from a failed operation.
    pub fn from_error(operation: OperationKind, err: &DepoError) -> Self {
        Self::new(operation, err.message())
    }
}

impl std::fmt::Display for SessionError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} failed: {}", self.operation, self.message)
    }
}
