//! Command transport trait definition.

use async_trait::async_trait;
use depo_core::error::Result;
use serde_json::Value;

/// Carries one named command with JSON arguments to the backend.
///
/// Implementations return the backend's JSON result, or a
/// `DepoError::Gateway` carrying the backend's message.
#[async_trait]
pub trait CommandTransport: Send + Sync {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value>;
}
