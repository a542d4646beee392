//! Unified path management for depo configuration files.
//!
//! # Directory Structure
//!
//! ```text
//! ~/.config/depo/              # Config directory (or $DEPO_CONFIG_DIR)
//! ├── config.toml              # Application configuration
//! └── logs/                    # Application logs
//!     └── depo.log.YYYY-MM-DD
//! ```

use std::path::PathBuf;

/// Environment variable that replaces the platform config directory.
pub const CONFIG_DIR_ENV: &str = "DEPO_CONFIG_DIR";

/// Errors that can occur during path resolution.
#[derive(Debug)]
pub enum PathError {
    /// Home directory could not be determined.
    HomeDirNotFound,
}

impl std::fmt::Display for PathError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PathError::HomeDirNotFound => write!(f, "Cannot find home directory"),
        }
    }
}

impl std::error::Error for PathError {}

/// Unified path management for depo.
pub struct DepoPaths;

impl DepoPaths {
    /// Returns the depo configuration directory.
    ///
    /// `$DEPO_CONFIG_DIR` wins when set and non-empty; otherwise the platform
    /// config directory (e.g. `~/.config/depo/`).
    pub fn config_dir() -> Result<PathBuf, PathError> {
        if let Some(dir) = std::env::var_os(CONFIG_DIR_ENV).filter(|d| !d.is_empty()) {
            return Ok(PathBuf::from(dir));
        }
        dirs::config_dir()
            .map(|dir| dir.join("depo"))
            .ok_or(PathError::HomeDirNotFound)
    }

    /// Returns the path to the main configuration file.
    pub fn config_file() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("config.toml"))
    }

    /// Returns the default log directory.
    pub fn log_dir() -> Result<PathBuf, PathError> {
        Ok(Self::config_dir()?.join("logs"))
    }
}
