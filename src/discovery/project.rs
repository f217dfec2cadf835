//! Discovered project record

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// A directory containing a project manifest
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Project {
    /// Canonical project directory
    pub path: PathBuf,

    /// Manifest file inside `path`
    pub manifest_path: PathBuf,

    /// `package.name` from the manifest, when it has one
    pub declared_name: Option<String>,
}

impl Project {
    pub fn new(path: PathBuf, manifest_path: PathBuf, declared_name: Option<String>) -> Self {
        Self {
            path,
            manifest_path,
            declared_name,
        }
    }

    /// Declared name, falling back to the directory name
    pub fn display_name(&self) -> String {
        self.declared_name.clone().unwrap_or_else(|| {
            self.path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| self.path.display().to_string())
        })
    }

    /// Lockfile sitting next to the manifest
    pub fn lockfile_path(&self) -> PathBuf {
        self.path.join("Cargo.lock")
    }
}
