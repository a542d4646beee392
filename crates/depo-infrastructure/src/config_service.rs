//! Configuration service implementation.
//!
//! This module provides a ConfigService that loads the root configuration
//! from the configuration file (~/.config/depo/config.toml).

use crate::paths::DepoPaths;
use depo_core::config::RootConfig;
use depo_core::error::{DepoError, Result};
use std::path::{Path, PathBuf};
use std::sync::{Arc, PoisonError, RwLock};

/// Environment variable that overrides `[backend] url`.
pub const BACKEND_URL_ENV: &str = "DEPO_BACKEND_URL";

/// Configuration service that loads and caches the root configuration.
///
/// The file is created with default values the first time it is loaded.
#[derive(Debug, Clone)]
pub struct ConfigService {
    path: PathBuf,
    /// Cached configuration loaded from file.
    config: Arc<RwLock<Option<RootConfig>>>,
}

impl ConfigService {
    /// Creates a service for the default config file location.
    pub fn new() -> Result<Self> {
        let path = DepoPaths::config_file().map_err(|e| DepoError::config(e.to_string()))?;
        Ok(Self::with_path(path))
    }

    /// Creates a service reading the given file.
    pub fn with_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            config: Arc::new(RwLock::new(None)),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets the root configuration, loading from file if not cached.
    ///
    /// Environment overrides are applied on top of the file contents.
    pub fn get_config(&self) -> Result<RootConfig> {
        {
            let cached = self.config.read().unwrap_or_else(PoisonError::into_inner);
            if let Some(ref config) = *cached {
                return Ok(config.clone());
            }
        }

        let mut loaded = Self::load_or_create(&self.path)?;
        apply_env_overrides(&mut loaded, |key| std::env::var(key).ok());

        *self.config.write().unwrap_or_else(PoisonError::into_inner) = Some(loaded.clone());
        Ok(loaded)
    }

    /// Invalidates the cache, forcing a reload on next access.
    pub fn invalidate_cache(&self) {
        *self.config.write().unwrap_or_else(PoisonError::into_inner) = None;
    }

    fn load_or_create(path: &Path) -> Result<RootConfig> {
        if !path.exists() {
            tracing::info!("[ConfigService] Creating default config at {}", path.display());
            let config = RootConfig::default();
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::write(path, toml::to_string_pretty(&config)?)?;
            return Ok(config);
        }

        tracing::debug!("[ConfigService] Loading config from {}", path.display());
        let content = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }
}

/// Applies environment overrides to `config`.
pub fn apply_env_overrides<F>(config: &mut RootConfig, lookup: F)
where
    F: Fn(&str) -> Option<String>,
{
    if let Some(url) = lookup(BACKEND_URL_ENV).filter(|url| !url.trim().is_empty()) {
        tracing::debug!("[ConfigService] {} overrides backend url", BACKEND_URL_ENV);
        config.backend.url = url.trim().to_string();
    }
}
