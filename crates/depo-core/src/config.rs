use serde::{Deserialize, Serialize};

pub const DEFAULT_BACKEND_URL: &str = "http://127.0.0.1:7878";
pub const DEFAULT_INVOKE_PATH: &str = "invoke";
pub const DEFAULT_LOG_LEVEL: &str = "info";

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq, Default)]
pub struct RootConfig {
    #[serde(default)]
    pub backend: BackendConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Where the manifest/build backend listens for commands.
#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct BackendConfig {
    #[serde(default = "default_backend_url")]
    pub url: String,
    #[serde(default = "default_invoke_path")]
    pub invoke_path: String,
}

impl Default for BackendConfig {
    fn default() -> Self {
        Self {
            url: default_backend_url(),
            invoke_path: default_invoke_path(),
        }
    }
}

#[derive(Deserialize, Serialize, Debug, Clone, PartialEq)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    /// Overrides the default log directory
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub directory: Option<String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            directory: None,
        }
    }
}

fn default_backend_url() -> String {
    DEFAULT_BACKEND_URL.to_string()
}

fn default_invoke_path() -> String {
    DEFAULT_INVOKE_PATH.to_string()
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: RootConfig = toml::from_str("").unwrap();
        assert_eq!(config, RootConfig::default());
        assert_eq!(config.backend.url, DEFAULT_BACKEND_URL);
        assert_eq!(config.logging.level, "info");
    }

    #[test]
    fn test_partial_backend_section() {
        let config: RootConfig = toml::from_str(
            r#"
            [backend]
            url = "http://10.0.0.5:9000"
            "#,
        )
        .unwrap();
        assert_eq!(config.backend.url, "http://10.0.0.5:9000");
        assert_eq!(config.backend.invoke_path, DEFAULT_INVOKE_PATH);
        assert!(config.logging.directory.is_none());
    }
}
