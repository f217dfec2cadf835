//! Cargo manifest parsing
//!
//! Only two things are read: `package.name` and dependencies pulled from git.
//! Everything else in the manifest is ignored.

use crate::error::{ScoutError, ScoutResult};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use toml::{Table, Value};

/// Dependency tables that may hold git dependencies
const DEPENDENCY_TABLES: &[&str] = &["dependencies", "dev-dependencies", "build-dependencies"];

/// A git dependency as written in the manifest
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeclaredDependency {
    /// Repository URL from `git = "..."`
    pub url: String,

    /// `branch` or `tag`, if one was given
    pub git_ref: Option<String>,

    /// `rev`, if the dependency is pinned to a revision
    pub pinned_rev: Option<String>,
}

/// The parts of a Cargo manifest revscout cares about
#[derive(Debug, Clone, Default)]
pub struct Manifest {
    /// `package.name` (absent for virtual workspace manifests)
    pub name: Option<String>,

    /// Git dependencies keyed by package name
    pub git_dependencies: HashMap<String, DeclaredDependency>,
}

impl Manifest {
    /// Parse a manifest from a file on disk
    pub async fn from_file(path: &Path) -> ScoutResult<Self> {
        let content = tokio::fs::read_to_string(path).await.map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                ScoutError::ManifestNotFound(path.to_path_buf())
            } else {
                ScoutError::io(format!("reading manifest {}", path.display()), e)
            }
        })?;
        Self::parse(&content).map_err(|e| ScoutError::ManifestInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Parse a manifest from a TOML string
    pub fn parse(content: &str) -> ScoutResult<Self> {
        let table: Table = toml::from_str(content)?;

        let name = table
            .get("package")
            .and_then(|p| p.get("name"))
            .and_then(Value::as_str)
            .map(str::to_string);

        let mut git_dependencies = HashMap::new();
        for deps in dependency_tables(&table) {
            for (key, detail) in deps {
                if let Some((name, dep)) = git_dependency(key, detail) {
                    git_dependencies.entry(name).or_insert(dep);
                }
            }
        }

        Ok(Self {
            name,
            git_dependencies,
        })
    }
}

/// Every dependency table: top-level, `[workspace.dependencies]`, and
/// `[target.'cfg(..)'.dependencies]` variants
fn dependency_tables(root: &Table) -> Vec<&Table> {
    let mut tables: Vec<&Table> = DEPENDENCY_TABLES
        .iter()
        .filter_map(|name| root.get(*name).and_then(Value::as_table))
        .collect();

    if let Some(deps) = root
        .get("workspace")
        .and_then(|w| w.get("dependencies"))
        .and_then(Value::as_table)
    {
        tables.push(deps);
    }

    if let Some(targets) = root.get("target").and_then(Value::as_table) {
        for target in targets.values().filter_map(Value::as_table) {
            tables.extend(
                DEPENDENCY_TABLES
                    .iter()
                    .filter_map(|name| target.get(*name).and_then(Value::as_table)),
            );
        }
    }

    tables
}

/// `name = { git = "...", branch = "..." }`, honouring `package = "..."` renames
fn git_dependency(key: &str, detail: &Value) -> Option<(String, DeclaredDependency)> {
    let detail = detail.as_table()?;
    let url = detail.get("git")?.as_str()?.to_string();
    let field = |name: &str| detail.get(name).and_then(Value::as_str).map(str::to_string);

    let name = field("package").unwrap_or_else(|| key.to_string());
    let dep = DeclaredDependency {
        url,
        git_ref: field("branch").or_else(|| field("tag")),
        pinned_rev: field("rev"),
    };
    Some((name, dep))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MANIFEST: &str = r#"
[package]
name = "acme-api"
version = "0.1.0"

[dependencies]
serde = "1.0"
tokio = { git = "https://github.com/tokio-rs/tokio", branch = "master" }
tracing = { git = "https://github.com/tokio-rs/tracing", tag = "tracing-0.1.41" }
local = { path = "../local" }

[dev-dependencies]
insta = { git = "https://github.com/mitsuhiko/insta", rev = "0c5e5e0" }

[target.'cfg(unix)'.dependencies]
nix-fork = { git = "https://github.com/acme/nix", package = "nix" }
"#;

    #[test]
    fn parses_name_and_git_deps() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert_eq!(manifest.name.as_deref(), Some("acme-api"));
        assert_eq!(manifest.git_dependencies.len(), 4);

        let tokio = &manifest.git_dependencies["tokio"];
        assert_eq!(tokio.url, "https://github.com/tokio-rs/tokio");
        assert_eq!(tokio.git_ref.as_deref(), Some("master"));

        let tracing = &manifest.git_dependencies["tracing"];
        assert_eq!(tracing.git_ref.as_deref(), Some("tracing-0.1.41"));

        let insta = &manifest.git_dependencies["insta"];
        assert_eq!(insta.git_ref, None);
        assert_eq!(insta.pinned_rev.as_deref(), Some("0c5e5e0"));
    }

    #[test]
    fn renamed_dependency_keyed_by_package() {
        let manifest = Manifest::parse(MANIFEST).unwrap();
        assert!(manifest.git_dependencies.contains_key("nix"));
        assert!(!manifest.git_dependencies.contains_key("nix-fork"));
    }

    #[test]
    fn virtual_workspace_has_no_name() {
        let manifest = Manifest::parse(
            r#"
[workspace]
members = ["crates/*"]

[workspace.dependencies]
axum = { git = "https://github.com/tokio-rs/axum" }
"#,
        )
        .unwrap();
        assert!(manifest.name.is_none());
        assert_eq!(manifest.git_dependencies["axum"].git_ref, None);
    }

    #[test]
    fn invalid_toml_errors() {
        assert!(Manifest::parse("[package\nname = ").is_err());
    }
}
