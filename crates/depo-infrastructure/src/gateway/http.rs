//! HTTP command transport.

use async_trait::async_trait;
use depo_core::config::BackendConfig;
use depo_core::error::{DepoError, Result};
use serde_json::Value;

use super::transport::CommandTransport;

/// Sends each command as `POST {url}/{invoke_path}/{command}` with the
/// arguments as the JSON body.
///
/// A 2xx body is the command's JSON result (an empty body reads as `null`).
/// Any other status is a failure whose message is the response body.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
    invoke_path: String,
}

impl HttpTransport {
    pub fn new(base_url: impl Into<String>, invoke_path: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            invoke_path: invoke_path.into(),
        }
    }

    pub fn from_config(config: &BackendConfig) -> Self {
        Self::new(&config.url, &config.invoke_path)
    }

    /// Full URL for `command`.
    pub fn endpoint(&self, command: &str) -> String {
        let base = self.base_url.trim_end_matches('/');
        let invoke_path = self.invoke_path.trim_matches('/');
        if invoke_path.is_empty() {
            format!("{}/{}", base, command)
        } else {
            format!("{}/{}/{}", base, invoke_path, command)
        }
    }
}

#[async_trait]
impl CommandTransport for HttpTransport {
    async fn invoke(&self, command: &str, args: Value) -> Result<Value> {
        let url = self.endpoint(command);
        tracing::debug!("[HttpTransport] POST {}", url);

        let response = self
            .client
            .post(&url)
            .json(&args)
            .send()
            .await
            .map_err(|e| DepoError::gateway(command, e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| DepoError::gateway(command, e.to_string()))?;

        if status.is_success() {
            decode_success(command, &body)
        } else {
            tracing::debug!("[HttpTransport] {} returned {}", command, status);
            Err(DepoError::gateway(
                command,
                failure_message(status.as_u16(), &body),
            ))
        }
    }
}

fn decode_success(command: &str, body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_json::from_str(body)
        .map_err(|e| DepoError::gateway(command, format!("invalid JSON response: {}", e)))
}

/// Extracts a human-readable message from a failed response body.
///
/// Backends typically answer with a bare JSON string; objects with a
/// `message` or `error` field and plain text are accepted too.
fn failure_message(status: u16, body: &str) -> String {
    let trimmed = body.trim();
    if trimmed.is_empty() {
        return format!("HTTP {}", status);
    }

    match serde_json::from_str::<Value>(trimmed) {
        Ok(Value::String(message)) => message,
        Ok(Value::Object(fields)) => ["message", "error"]
            .iter()
            .find_map(|key| fields.get(*key).and_then(Value::as_str))
            .map(str::to_string)
            .unwrap_or_else(|| trimmed.to_string()),
        _ => trimmed.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_endpoint_joins_segments() {
        let transport = HttpTransport::new("http://127.0.0.1:7878/", "/invoke/");
        assert_eq!(
            transport.endpoint("get_project_deps"),
            "http://127.0.0.1:7878/invoke/get_project_deps"
        );

        let transport = HttpTransport::new("http://backend", "");
        assert_eq!(transport.endpoint("init"), "http://backend/init");
    }

    #[test]
    fn test_from_config() {
        let transport = HttpTransport::from_config(&BackendConfig::default());
        assert_eq!(transport.endpoint("init"), "http://127.0.0.1:7878/invoke/init");
    }

    #[test]
    fn test_decode_success() {
        assert_eq!(decode_success("init", "").unwrap(), Value::Null);
        assert_eq!(
            decode_success("get_project_deps", r#"[{"name":"fmt"}]"#).unwrap(),
            json!([{"name": "fmt"}])
        );
        assert!(decode_success("init", "<html>").unwrap_err().is_gateway_failure());
    }

    #[test]
    fn test_failure_message_variants() {
        assert_eq!(
            failure_message(500, r#""Package file not found at path: /proj""#),
            "Package file not found at path: /proj"
        );
        assert_eq!(
            failure_message(400, r#"{"message": "Invalid version constraint: ^^1"}"#),
            "Invalid version constraint: ^^1"
        );
        assert_eq!(failure_message(502, r#"{"error": "bad gateway"}"#), "bad gateway");
        assert_eq!(failure_message(500, "  plain text  "), "plain text");
        assert_eq!(failure_message(404, ""), "HTTP 404");
    }
}
