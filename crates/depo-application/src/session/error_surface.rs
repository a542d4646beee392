use depo_core::error::DepoError;
use depo_core::session::{OperationKind, SessionError};
use std::sync::{PoisonError, RwLock};

/// Single-slot holder of the most recent session failure.
///
/// Created empty, overwritten by every recorded failure, readable at any time.
/// Nothing here retries.
pub struct ErrorSurface {
    last: RwLock<Option<SessionError>>,
}

impl ErrorSurface {
    pub fn new() -> Self {
        Self {
            last: RwLock::new(None),
        }
    }

    /// Records a failure, replacing whatever was there.
    pub fn record(&self, operation: OperationKind, err: &DepoError) -> SessionError {
        let session_error = SessionError::from_error(operation, err);
        tracing::error!(
            "[ErrorSurface] {} failed: {}",
            operation,
            session_error.message
        );
        *self.last.write().unwrap_or_else(PoisonError::into_inner) = Some(session_error.clone());
        session_error
    }

    pub fn get(&self) -> Option<SessionError> {
        self.last
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Clears the slot.
    pub fn dismiss(&self) {
        *self.last.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl Default for ErrorSurface {
    fn default() -> Self {
        Self::new()
    }
}
