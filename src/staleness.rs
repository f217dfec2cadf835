//! Locked git dependencies vs. their live upstream revisions
//!
//! A git dependency is stale when the revision recorded in `Cargo.lock` no
//! longer matches what its declared branch/tag points at upstream. Revisions
//! are compared on their 7-character abbreviation.

use crate::cache::RemoteRefCache;
use crate::discovery::Project;
use crate::error::ScoutResult;
use crate::manifest::{DeclaredDependency, LockedDependency, Lockfile, Manifest, SourceKind};
use crate::remote::DEFAULT_REF;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Length of an abbreviated revision
const SHORT_REV_LEN: usize = 7;

/// Staleness verdict for one git dependency
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaleInfo {
    pub package_name: String,
    pub current_ref: String,
    pub current_sha: String,
    pub upstream_sha: String,
    pub is_stale: bool,
    pub checked_at: DateTime<Utc>,
}

/// First seven characters of a revision (or all of it, if shorter)
pub fn short_revision(revision: &str) -> &str {
    match revision.char_indices().nth(SHORT_REV_LEN) {
        Some((end, _)) => &revision[..end],
        None => revision,
    }
}

/// Compares locked revisions against upstream through the ref cache
pub struct StalenessReconciler {
    refs: Arc<RemoteRefCache>,
}

impl StalenessReconciler {
    pub fn new(refs: Arc<RemoteRefCache>) -> Self {
        Self { refs }
    }

    /// Check every git-sourced locked dependency.
    ///
    /// A dependency whose upstream cannot be resolved is logged and left out;
    /// the rest of the batch still runs. Output is ordered by package name.
    pub async fn reconcile(
        &self,
        locked: &HashMap<String, LockedDependency>,
        declared: &HashMap<String, DeclaredDependency>,
    ) -> Vec<StaleInfo> {
        let git_locked: BTreeMap<&String, &LockedDependency> = locked
            .iter()
            .filter(|(_, dep)| dep.source == SourceKind::Git)
            .collect();

        let mut results = Vec::with_capacity(git_locked.len());
        for (name, lock) in git_locked {
            let decl = declared.get(name);

            let pin = decl
                .and_then(|d| d.pinned_rev.as_deref())
                .or(lock.pinned_rev.as_deref());
            if let Some(rev) = pin {
                debug!(package = %name, rev, "Pinned to a revision, skipping");
                continue;
            }

            let Some(url) = decl.map(|d| d.url.as_str()).or(lock.url.as_deref()) else {
                warn!(package = %name, "No repository URL for git dependency, skipping");
                continue;
            };
            let Some(current_sha) = lock.revision.as_deref() else {
                warn!(package = %name, "Lockfile has no resolved revision, skipping");
                continue;
            };
            let git_ref = decl
                .and_then(|d| d.git_ref.as_deref())
                .or(lock.git_ref.as_deref())
                .unwrap_or(DEFAULT_REF);

            let upstream_sha = match self.refs.resolve(url, git_ref).await {
                Ok(sha) => sha,
                Err(e) => {
                    warn!(
                        package = %name,
                        url,
                        git_ref,
                        kind = ?e.kind(),
                        error = %e,
                        "Could not resolve upstream ref"
                    );
                    continue;
                }
            };

            let is_stale = short_revision(&upstream_sha) != short_revision(current_sha);
            if is_stale {
                info!(
                    package = %name,
                    locked = short_revision(current_sha),
                    upstream = short_revision(&upstream_sha),
                    "Dependency is behind upstream"
                );
            }

            results.push(StaleInfo {
                package_name: name.clone(),
                current_ref: git_ref.to_string(),
                current_sha: current_sha.to_string(),
                upstream_sha,
                is_stale,
                checked_at: Utc::now(),
            });
        }
        results
    }

    /// Read a project's manifest and lockfile, then [`reconcile`](Self::reconcile).
    ///
    /// A missing lockfile is an error: there is nothing to compare against.
    pub async fn reconcile_project(&self, project: &Project) -> ScoutResult<Vec<StaleInfo>> {
        let lockfile = Lockfile::from_file(&project.lockfile_path()).await?;
        let manifest = Manifest::from_file(&project.manifest_path).await?;
        Ok(self
            .reconcile(&lockfile.dependencies, &manifest.git_dependencies)
            .await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::ManualClock;
    use crate::error::ScoutError;
    use crate::remote::RefResolver;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Upstream table keyed by (url, ref); unknown keys fail
    struct FakeUpstream {
        refs: HashMap<(String, String), String>,
        asked: Mutex<Vec<(String, String)>>,
    }

    impl FakeUpstream {
        fn with(entries: &[(&str, &str, &str)]) -> Arc<Self> {
            Arc::new(Self {
                refs: entries
                    .iter()
                    .map(|(url, r, sha)| ((url.to_string(), r.to_string()), sha.to_string()))
                    .collect(),
                asked: Mutex::new(Vec::new()),
            })
        }
    }

    #[async_trait]
    impl RefResolver for FakeUpstream {
        async fn resolve(&self, endpoint: &str, git_ref: &str) -> ScoutResult<String> {
            let key = (endpoint.to_string(), git_ref.to_string());
            self.asked.lock().unwrap().push(key.clone());
            self.refs.get(&key).cloned().ok_or_else(|| ScoutError::RefNotFound {
                endpoint: endpoint.to_string(),
                git_ref: git_ref.to_string(),
            })
        }
    }

    fn reconciler(upstream: Arc<FakeUpstream>) -> StalenessReconciler {
        let refs = RemoteRefCache::with_clock(
            upstream,
            Duration::from_secs(300),
            Arc::new(ManualClock::new()),
        );
        StalenessReconciler::new(Arc::new(refs))
    }

    fn git_lock(url: &str, revision: &str) -> LockedDependency {
        LockedDependency {
            source: SourceKind::Git,
            version: "0.1.0".to_string(),
            revision: Some(revision.to_string()),
            url: Some(url.to_string()),
            git_ref: None,
            pinned_rev: None,
        }
    }

    fn declared(url: &str, git_ref: Option<&str>) -> DeclaredDependency {
        DeclaredDependency {
            url: url.to_string(),
            git_ref: git_ref.map(str::to_string),
            pinned_rev: None,
        }
    }

    const URL: &str = "https://github.com/acme/widgets";

    #[test]
    fn short_revision_truncates() {
        assert_eq!(short_revision("abc1234ff00"), "abc1234");
        assert_eq!(short_revision("abc"), "abc");
        assert_eq!(short_revision(""), "");
    }

    #[tokio::test]
    async fn matching_prefix_is_fresh() {
        let upstream =
            FakeUpstream::with(&[(URL, "main", "abc1234ff0011223344556677889900aabbccdd")]);
        let locked = HashMap::from([("widgets".to_string(), git_lock(URL, "abc1234"))]);
        let decl = HashMap::from([("widgets".to_string(), declared(URL, Some("main")))]);

        let results = reconciler(upstream).reconcile(&locked, &decl).await;
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_stale);
        assert_eq!(results[0].current_ref, "main");
    }

    #[tokio::test]
    async fn differing_prefix_is_stale() {
        let upstream = FakeUpstream::with(&[(URL, "main", "def5678aa00")]);
        let locked = HashMap::from([("widgets".to_string(), git_lock(URL, "abc1234"))]);
        let decl = HashMap::from([("widgets".to_string(), declared(URL, Some("main")))]);

        let results = reconciler(upstream).reconcile(&locked, &decl).await;
        assert!(results[0].is_stale);
        assert_eq!(results[0].upstream_sha, "def5678aa00");
    }

    #[tokio::test]
    async fn missing_ref_defaults_to_head() {
        let upstream = FakeUpstream::with(&[(URL, "HEAD", "abc1234")]);
        let locked = HashMap::from([("widgets".to_string(), git_lock(URL, "abc1234"))]);
        let decl = HashMap::from([("widgets".to_string(), declared(URL, None))]);

        let results = reconciler(upstream).reconcile(&locked, &decl).await;
        assert_eq!(results[0].current_ref, "HEAD");
    }

    #[tokio::test]
    async fn failing_dependency_is_skipped() {
        let other = "https://github.com/acme/gears";
        let upstream = FakeUpstream::with(&[(other, "HEAD", "1234567")]);
        let locked = HashMap::from([
            ("widgets".to_string(), git_lock(URL, "abc1234")),
            ("gears".to_string(), git_lock(other, "7654321")),
        ]);

        let results = reconciler(upstream).reconcile(&locked, &HashMap::new()).await;
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].package_name, "gears");
        assert!(results[0].is_stale);
    }

    #[tokio::test]
    async fn non_git_and_pinned_are_ignored() {
        let upstream = FakeUpstream::with(&[]);
        let registry = LockedDependency {
            source: SourceKind::Registry,
            version: "1.0.0".to_string(),
            revision: None,
            url: None,
            git_ref: None,
            pinned_rev: None,
        };
        let locked = HashMap::from([
            ("serde".to_string(), registry),
            ("widgets".to_string(), git_lock(URL, "abc1234")),
        ]);
        let mut pinned = declared(URL, None);
        pinned.pinned_rev = Some("abc1234".to_string());
        let decl = HashMap::from([("widgets".to_string(), pinned)]);

        let results = reconciler(upstream.clone()).reconcile(&locked, &decl).await;
        assert!(results.is_empty());
        assert!(upstream.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lock_only_rev_pin_is_skipped() {
        let upstream = FakeUpstream::with(&[(URL, "HEAD", "def5678aa00")]);
        let locked = Lockfile::parse(&format!(
            r#"[[package]]
name = "widgets"
version = "0.1.0"
source = "git+{URL}?rev=abc1234#abc1234000"
"#
        ))
        .unwrap()
        .dependencies;

        let results = reconciler(upstream.clone())
            .reconcile(&locked, &HashMap::new())
            .await;
        assert!(results.is_empty());
        assert!(upstream.asked.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn lock_query_ref_used_without_declaration() {
        let upstream = FakeUpstream::with(&[(URL, "release", "abc1234")]);
        let mut lock = git_lock(URL, "abc1234");
        lock.git_ref = Some("release".to_string());
        let locked = HashMap::from([("widgets".to_string(), lock)]);

        let results = reconciler(upstream).reconcile(&locked, &HashMap::new()).await;
        assert_eq!(results[0].current_ref, "release");
        assert!(!results[0].is_stale);
    }

    #[tokio::test]
    async fn project_without_lockfile_errors() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(temp.path().join("Cargo.toml"), "[package]\nname = \"x\"\n").unwrap();
        let project = Project::new(
            temp.path().to_path_buf(),
            temp.path().join("Cargo.toml"),
            Some("x".to_string()),
        );

        let err = reconciler(FakeUpstream::with(&[]))
            .reconcile_project(&project)
            .await
            .unwrap_err();
        let lockfile = temp.path().join("Cargo.lock");
        assert!(matches!(err, ScoutError::LockfileNotFound(p) if p == lockfile));
    }

    #[tokio::test]
    async fn project_reconciles_from_files() {
        let temp = tempfile::TempDir::new().unwrap();
        std::fs::write(
            temp.path().join("Cargo.toml"),
            format!(
                r#"[package]
name = "app"

[dependencies]
widgets = {{ git = "{URL}", branch = "main" }}
"#
            ),
        )
        .unwrap();
        std::fs::write(
            temp.path().join("Cargo.lock"),
            format!(
                r#"[[package]]
name = "widgets"
version = "0.1.0"
source = "git+{URL}?branch=main#abc1234000"
"#
            ),
        )
        .unwrap();
        let project = Project::new(
            temp.path().to_path_buf(),
            temp.path().join("Cargo.toml"),
            Some("app".to_string()),
        );

        let upstream = FakeUpstream::with(&[(URL, "main", "abc1234999")]);
        let results = reconciler(upstream)
            .reconcile_project(&project)
            .await
            .unwrap();
        assert_eq!(results.len(), 1);
        assert!(!results[0].is_stale);
    }
}
