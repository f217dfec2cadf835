//! Cargo.lock parsing
//!
//! Reduces a lockfile to `package name -> where it came from and at which
//! revision`. Git sources look like
//! `git+https://github.com/owner/repo?branch=main#<revision>`.

use crate::error::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::path::Path;

/// Where a locked package was fetched from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceKind {
    /// A git repository
    Git,
    /// crates.io or another registry
    Registry,
    /// Workspace member or path dependency (no `source` line)
    Path,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Git => "git",
            Self::Registry => "registry",
            Self::Path => "path",
        };
        write!(f, "{}", name)
    }
}

/// One locked package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockedDependency {
    pub source: SourceKind,
    pub version: String,

    /// Resolved revision (git sources only)
    pub revision: Option<String>,

    /// Repository URL without query or fragment (git sources only)
    pub url: Option<String>,

    /// `branch` or `tag` recorded in the source query
    pub git_ref: Option<String>,

    /// `rev` recorded in the source query
    pub pinned_rev: Option<String>,
}

#[derive(Deserialize)]
struct RawLockfile {
    #[serde(default)]
    package: Vec<RawPackage>,
}

#[derive(Deserialize)]
struct RawPackage {
    name: String,
    version: String,
    source: Option<String>,
}

/// Parsed lockfile
#[derive(Debug, Clone, Default)]
pub struct Lockfile {
    pub dependencies: HashMap<String, LockedDependency>,
}

impl Lockfile {
    /// Parse a lockfile from disk
    pub async fn from_file(path: &Path) -> ScoutResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScoutError::LockfileNotFound(path.to_path_buf())
            } else {
                ScoutError::io(format!("reading lockfile {}", path.display()), e)
            }
        })?;
        Self::parse(&content).map_err(|e| ScoutError::LockfileInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse a lockfile from a TOML string.
    ///
    /// When a name is locked more than once, the git-sourced entry wins.
    pub fn parse(content: &str) -> ScoutResult<Self> {
        let raw: RawLockfile = toml::from_str(content)?;

        let mut dependencies: HashMap<String, LockedDependency> = HashMap::new();
        for package in raw.package {
            let locked = locked_dependency(package.version, package.source.as_deref());
            match dependencies.get(&package.name) {
                Some(existing) if existing.source == SourceKind::Git => {}
                _ => {
                    dependencies.insert(package.name, locked);
                }
            }
        }

        Ok(Self { dependencies })
    }
}

fn locked_dependency(version: String, source: Option<&str>) -> LockedDependency {
    let Some(source) = source else {
        return LockedDependency {
            source: SourceKind::Path,
            version,
            revision: None,
            url: None,
            git_ref: None,
            pinned_rev: None,
        };
    };

    let Some(git) = source.strip_prefix("git+") else {
        return LockedDependency {
            source: SourceKind::Registry,
            version,
            revision: None,
            url: None,
            git_ref: None,
            pinned_rev: None,
        };
    };

    let (location, revision) = match git.split_once('#') {
        Some((location, revision)) => (location, Some(revision.to_string())),
        None => (git, None),
    };
    let (url, query) = match location.split_once('?') {
        Some((url, query)) => (url, Some(query)),
        None => (location, None),
    };
    let query_value = |wanted: &[&str]| {
        query?.split('&').find_map(|pair| {
            let (key, value) = pair.split_once('=')?;
            wanted.contains(&key).then(|| value.to_string())
        })
    };

    LockedDependency {
        source: SourceKind::Git,
        version,
        revision,
        url: Some(url.to_string()),
        git_ref: query_value(&["branch", "tag"]),
        pinned_rev: query_value(&["rev"]),
    }
}
