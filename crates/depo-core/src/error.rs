//! Error types for depo.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::session::OperationKind;

/// Coarse classification of a [`DepoError`].
///
/// Intent handlers use this to decide what happens after a failure:
/// precondition failures never reach the backend, gateway failures and
/// invariant violations are recorded for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Rejected locally before any remote call was issued.
    PreconditionNotMet,
    /// The remote call itself failed, whatever the underlying cause.
    GatewayFailure,
    /// Client-side state was found in a shape that should be impossible.
    StateInvariantViolation,
    /// Configuration, IO or serialization failure outside the intent protocol.
    Environment,
}

/// A shared error type for the entire depo workspace.
#[derive(Error, Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DepoError {
    /// An operation other than project selection was issued with no project open
    #[error("No project is open")]
    NoProject,

    /// A search was requested with a blank query
    #[error("Search query is empty")]
    EmptyQuery,

    /// Add was confirmed without a candidate selected from a search
    #[error("No dependency selected")]
    DependencyNotSelected,

    /// A constraint change was requested with a blank constraint
    #[error("Version constraint is empty")]
    EmptyConstraint,

    /// Selection was attempted while the search result is empty
    #[error("No search results to select from")]
    NoSearchResults,

    /// Selection named a candidate that is not in the search result
    #[error("No candidate named '{0}' in search results")]
    CandidateNotFound(String),

    /// A backend command failed at the transport or backend level
    #[error("Backend command '{command}' failed: {message}")]
    Gateway { command: String, message: String },

    /// A mutating intent was rejected by the backend
    #[error("Backend mutation '{operation}' failed: {message}")]
    BackendMutationFailed {
        operation: OperationKind,
        message: String,
    },

    /// A registry search failed
    #[error("Search failed: {0}")]
    SearchFailed(String),

    /// Querying the full dependency snapshot failed
    #[error("Refresh failed: {0}")]
    RefreshFailed(String),

    /// Internal state was inconsistent (should not happen in normal operation)
    #[error("State invariant violated: {0}")]
    InvariantViolation(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error (file system operations)
    #[error("IO error: {message}")]
    Io { message: String },

    /// Serialization/deserialization error
    #[error("Serialization error: {format} - {message}")]
    Serialization { format: String, message: String },
}

impl DepoError {
    // ============================================================================
    // Constructor helpers
    // ============================================================================

    /// Creates a Gateway error
    pub fn gateway(command: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Gateway {
            command: command.into(),
            message: message.into(),
        }
    }

    /// Creates a BackendMutationFailed error
    pub fn mutation_failed(operation: OperationKind, message: impl Into<String>) -> Self {
        Self::BackendMutationFailed {
            operation,
            message: message.into(),
        }
    }

    /// Creates an InvariantViolation error
    pub fn invariant(message: impl Into<String>) -> Self {
        Self::InvariantViolation(message.into())
    }

    /// Creates a Config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an IO error
    pub fn io(message: impl Into<String>) -> Self {
        Self::Io {
            message: message.into(),
        }
    }

    // ============================================================================
    // Classification
    // ============================================================================

    /// Returns the taxonomy bucket this error belongs to.
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::NoProject
            | Self::EmptyQuery
            | Self::DependencyNotSelected
            | Self::EmptyConstraint
            | Self::NoSearchResults
            | Self::CandidateNotFound(_) => ErrorKind::PreconditionNotMet,
            Self::Gateway { .. }
            | Self::BackendMutationFailed { .. }
            | Self::SearchFailed(_)
            | Self::RefreshFailed(_) => ErrorKind::GatewayFailure,
            Self::InvariantViolation(_) => ErrorKind::StateInvariantViolation,
            Self::Config(_) | Self::Io { .. } | Self::Serialization { .. } => {
                ErrorKind::Environment
            }
        }
    }

    /// Check if this error was raised before any remote call
    pub fn is_precondition(&self) -> bool {
        self.kind() == ErrorKind::PreconditionNotMet
    }

    /// Check if this error came from the backend boundary
    pub fn is_gateway_failure(&self) -> bool {
        self.kind() == ErrorKind::GatewayFailure
    }

    /// Returns the human-readable backend message without the wrapper prefix.
    ///
    /// Falls back to the full display string for variants that carry no
    /// separate message.
    pub fn message(&self) -> String {
        match self {
            Self::Gateway { message, .. }
            | Self::BackendMutationFailed { message, .. }
            | Self::Io { message }
            | Self::Serialization { message, .. } => message.clone(),
            Self::SearchFailed(message)
            | Self::RefreshFailed(message)
            | Self::InvariantViolation(message)
            | Self::Config(message) => message.clone(),
            other => other.to_string(),
        }
    }
}

// ============================================================================
// From implementations for automatic conversion
// ============================================================================

impl From<std::io::Error> for DepoError {
    fn from(err: std::io::Error) -> Self {
        Self::Io {
            message: format!("{} (kind: {:?})", err, err.kind()),
        }
    }
}

impl From<serde_json::Error> for DepoError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization {
            format: "JSON".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::de::Error> for DepoError {
    fn from(err: toml::de::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

impl From<toml::ser::Error> for DepoError {
    fn from(err: toml::ser::Error) -> Self {
        Self::Serialization {
            format: "TOML".to_string(),
            message: err.to_string(),
        }
    }
}

/// A type alias for `Result<T, DepoError>`.
pub type Result<T> = std::result::Result<T, DepoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_precondition_kinds() {
        for err in [
            DepoError::NoProject,
            DepoError::EmptyQuery,
            DepoError::DependencyNotSelected,
            DepoError::EmptyConstraint,
            DepoError::NoSearchResults,
            DepoError::CandidateNotFound("fmt".to_string()),
        ] {
            assert!(err.is_precondition(), "{err} should be a precondition");
            assert!(!err.is_gateway_failure());
        }
    }

    #[test]
    fn test_gateway_kinds() {
        let err = DepoError::mutation_failed(OperationKind::Delete, "locked");
        assert_eq!(err.kind(), ErrorKind::GatewayFailure);
        assert_eq!(err.message(), "locked");
        assert_eq!(err.to_string(), "Backend mutation 'delete' failed: locked");

        let err = DepoError::gateway("get_project_deps", "connection refused");
        assert!(err.is_gateway_failure());
        assert_eq!(err.message(), "connection refused");
    }

    #[test]
    fn test_invariant_kind() {
        let err = DepoError::invariant("duplicate name 'fmt'");
        assert_eq!(err.kind(), ErrorKind::StateInvariantViolation);
        assert_eq!(err.message(), "duplicate name 'fmt'");
    }

    #[test]
    fn test_io_conversion() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "missing");
        let err: DepoError = io.into();
        assert_eq!(err.kind(), ErrorKind::Environment);
        assert!(err.message().contains("missing"));
    }
}
