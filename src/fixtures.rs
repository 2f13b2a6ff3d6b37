//! Fixture bodies for canned responses.
//!
//! Scenarios refer to response bodies by a path relative to the fixtures
//! directory, e.g. `users/list.json`.

use std::fs;
use std::io::ErrorKind;
use std::path::{Component, Path, PathBuf};

use crate::error::{BridgeError, Result};

/// Loads fixture files from one directory.
#[derive(Debug, Clone)]
pub struct FixtureLoader {
    root: PathBuf,
}

impl FixtureLoader {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        FixtureLoader { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolve a fixture name inside the fixtures directory.
    ///
    /// Absolute names and `..` components are rejected.
    pub fn resolve(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let escapes = relative.components().any(|c| {
            matches!(
                c,
                Component::ParentDir | Component::RootDir | Component::Prefix(_)
            )
        });
        if name.is_empty() || escapes {
            return Err(BridgeError::FixtureOutsideRoot(name.to_string()));
        }
        Ok(self.root.join(relative))
    }

    /// Read a fixture as text.
    pub fn load(&self, name: &str) -> Result<String> {
        let path = self.resolve(name)?;
        tracing::debug!(path = %path.display(), "loading fixture");

        fs::read_to_string(&path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => BridgeError::FixtureNotFound { path },
            ErrorKind::InvalidData => BridgeError::InvalidFixture {
                name: name.to_string(),
                message: "not valid UTF-8".to_string(),
            },
            _ => BridgeError::Io(e),
        })
    }

    /// Read a fixture and parse it as JSON.
    pub fn load_json(&self, name: &str) -> Result<serde_json::Value> {
        let body = self.load(name)?;
        serde_json::from_str(&body).map_err(|e| BridgeError::InvalidFixture {
            name: name.to_string(),
            message: e.to_string(),
        })
    }
}
