//! Explicit wiring of caches, remotes and services from a [`Config`]
//!
//! Every cache is constructed once here and shared through `Arc`, so the
//! warmer and the commands see the same state.

use crate::cache::{DiscoveryCache, RemoteRefCache, RepositoryListCache};
use crate::config::Config;
use crate::discovery::{DirectoryScanner, Project, ScanOutcome, ScanSettings};
use crate::remote::{GitCli, GithubCli, RefResolver, RepositoryLister};
use crate::staleness::StalenessReconciler;
use crate::warmer::{CacheWarmer, WarmerSettings};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub struct App {
    pub refs: Arc<RemoteRefCache>,
    pub repos: Arc<RepositoryListCache>,
    pub projects: Arc<DiscoveryCache>,
    pub scanner: DirectoryScanner,
    pub reconciler: StalenessReconciler,
    config: Config,
}

impl App {
    /// Wire against the real `git` and `gh` binaries
    pub fn from_config(config: &Config) -> Self {
        Self::with_remotes(
            config,
            Arc::new(GitCli::new()),
            Arc::new(GithubCli::new(&config.github)),
        )
    }

    pub fn with_remotes(
        config: &Config,
        resolver: Arc<dyn RefResolver>,
        lister: Arc<dyn RepositoryLister>,
    ) -> Self {
        let refs = Arc::new(RemoteRefCache::new(
            resolver,
            Duration::from_secs(config.cache.ref_ttl_secs),
        ));
        let repos = Arc::new(RepositoryListCache::new(
            lister,
            Duration::from_secs(config.cache.repo_list_ttl_secs),
        ));
        let projects = Arc::new(DiscoveryCache::new(Duration::from_secs(
            config.cache.discovery_ttl_secs,
        )));

        Self {
            reconciler: StalenessReconciler::new(refs.clone()),
            scanner: DirectoryScanner::new(ScanSettings::from(&config.scan)),
            refs,
            repos,
            projects,
            config: config.clone(),
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// A warmer over this app's caches
    pub fn warmer(&self) -> CacheWarmer {
        CacheWarmer::new(
            self.refs.clone(),
            self.repos.clone(),
            self.projects.clone(),
            self.scanner.clone(),
            WarmerSettings::from_config(&self.config),
        )
    }

    /// Projects under `roots`, from the discovery cache when fresh.
    ///
    /// Only complete scans are cached.
    pub async fn discover(&self, roots: &[PathBuf], cancel: &CancellationToken) -> ScanOutcome {
        if let Some(projects) = self.projects.get(roots) {
            debug!(projects = projects.len(), "Discovery cache hit");
            return ScanOutcome {
                projects,
                interrupted: None,
            };
        }

        let outcome = self
            .scanner
            .scan_with_timeout(
                roots,
                self.config.scan.max_depth,
                self.config.scan.timeout(),
                cancel,
            )
            .await;
        if outcome.is_complete() {
            self.projects.set(roots.to_vec(), outcome.projects.clone());
        }
        outcome
    }

    /// Locate the project rooted exactly at `dir`
    pub async fn project_at(&self, dir: &std::path::Path) -> Option<Project> {
        let outcome = self
            .scanner
            .scan(&[dir.to_path_buf()], 0, &CancellationToken::new())
            .await;
        outcome.projects.into_iter().next()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutResult;
    use crate::remote::RepoCandidate;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct NoRemote;

    #[async_trait]
    impl RefResolver for NoRemote {
        async fn resolve(&self, endpoint: &str, git_ref: &str) -> ScoutResult<String> {
            Err(crate::error::ScoutError::RefNotFound {
                endpoint: endpoint.to_string(),
                git_ref: git_ref.to_string(),
            })
        }
    }

    #[async_trait]
    impl RepositoryLister for NoRemote {
        async fn list(&self) -> ScoutResult<Vec<RepoCandidate>> {
            Ok(Vec::new())
        }
    }

    fn app() -> App {
        App::with_remotes(&Config::default(), Arc::new(NoRemote), Arc::new(NoRemote))
    }

    fn tree() -> TempDir {
        let temp = TempDir::new().unwrap();
        let proj = temp.path().join("alpha");
        std::fs::create_dir_all(&proj).unwrap();
        std::fs::write(proj.join("Cargo.toml"), "[package]\nname = \"alpha\"\n").unwrap();
        temp
    }

    #[tokio::test]
    async fn discover_fills_cache() {
        let temp = tree();
        let app = app();
        let roots = vec![temp.path().to_path_buf()];

        let outcome = app.discover(&roots, &CancellationToken::new()).await;
        assert!(outcome.is_complete());
        assert_eq!(outcome.projects.len(), 1);
        assert!(app.projects.is_warm(&roots));

        // Served from cache even after the tree changes.
        std::fs::remove_dir_all(temp.path().join("alpha")).unwrap();
        let again = app.discover(&roots, &CancellationToken::new()).await;
        assert_eq!(again.projects.len(), 1);
    }

    #[tokio::test]
    async fn cancelled_discover_is_not_cached() {
        let temp = tree();
        let app = app();
        let roots = vec![temp.path().to_path_buf()];
        let cancel = CancellationToken::new();
        cancel.cancel();

        let outcome = app.discover(&roots, &cancel).await;
        assert!(!outcome.is_complete());
        assert!(!app.projects.is_warm(&roots));
    }

    #[tokio::test]
    async fn project_at_finds_manifest_dir() {
        let temp = tree();
        let app = app();

        let project = app.project_at(&temp.path().join("alpha")).await.unwrap();
        assert_eq!(project.display_name(), "alpha");
        assert!(app.project_at(temp.path()).await.is_none());
    }

    #[test]
    fn warmer_shares_caches() {
        let app = app();
        let warmer = app.warmer();
        assert!(!warmer.is_running());
        assert_eq!(Arc::strong_count(&app.refs), 3);
    }
}
