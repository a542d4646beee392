//! Project identity.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Opaque path-like identifier of the project being edited.
///
/// The client never interprets the value; it is handed back to the backend
/// verbatim on every command.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProjectPath(String);

impl ProjectPath {
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }
}

impl std::fmt::Display for ProjectPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for ProjectPath {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ProjectPath {
    fn from(path: &str) -> Self {
        Self::new(path)
    }
}

impl From<String> for ProjectPath {
    fn from(path: String) -> Self {
        Self(path)
    }
}

impl From<PathBuf> for ProjectPath {
    fn from(path: PathBuf) -> Self {
        Self(path.to_string_lossy().into_owned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serializes_as_plain_string() {
        let path = ProjectPath::from("/proj");
        assert_eq!(serde_json::to_string(&path).unwrap(), "\"/proj\"");
    }

    #[test]
    fn test_from_path_buf() {
        let path = ProjectPath::from(PathBuf::from("/home/me/proj"));
        assert_eq!(path.as_str(), "/home/me/proj");
        assert_eq!(path.as_path(), Path::new("/home/me/proj"));
    }
}
