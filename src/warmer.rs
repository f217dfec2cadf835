//! Background cache warming
//!
//! A supervisor task runs one warm pass immediately, then one per interval,
//! until stopped. A pass runs three independent sub-tasks, each under its own
//! deadline:
//!
//! - repository list: `gh repo list` into [`RepositoryListCache`]
//! - seed refs: configured repositories' refs into [`RemoteRefCache`],
//!   throttled between lookups
//! - discovery: configured scan roots into [`DiscoveryCache`]
//!
//! A sub-task whose cache is already warm, or that has nothing configured,
//! does no live work. Failures are logged and never end the pass or the
//! supervisor.

use crate::cache::{DiscoveryCache, RemoteRefCache, RepositoryListCache};
use crate::config::{Config, SeedRepo};
use crate::discovery::DirectoryScanner;
use crate::error::{ScoutError, ScoutResult};
use std::fmt;
use std::path::PathBuf;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::{JoinHandle, JoinSet};
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Shortest period the supervisor accepts
const MIN_INTERVAL: Duration = Duration::from_millis(10);

/// Warmer timing and targets
#[derive(Debug, Clone)]
pub struct WarmerSettings {
    pub interval: Duration,
    pub subtask_timeout: Duration,
    pub throttle: Duration,
    pub seed_repos: Vec<SeedRepo>,
    pub scan_roots: Vec<PathBuf>,
    pub max_depth: usize,
}

impl WarmerSettings {
    pub fn from_config(config: &Config) -> Self {
        Self {
            interval: Duration::from_secs(config.warmer.interval_secs),
            subtask_timeout: Duration::from_secs(config.warmer.subtask_timeout_secs),
            throttle: Duration::from_millis(config.warmer.throttle_ms),
            seed_repos: config.warmer.seed_repos.clone(),
            scan_roots: config.scan.roots.clone(),
            max_depth: config.scan.max_depth,
        }
    }
}

/// The sub-tasks of a warm pass
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WarmTask {
    RepositoryList,
    SeedRefs,
    Discovery,
}

impl WarmTask {
    const ALL: [Self; 3] = [Self::RepositoryList, Self::SeedRefs, Self::Discovery];
}

impl fmt::Display for WarmTask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::RepositoryList => "repository-list",
            Self::SeedRefs => "seed-refs",
            Self::Discovery => "discovery",
        };
        write!(f, "{}", name)
    }
}

/// How a sub-task ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WarmOutcome {
    /// Live work done, cache populated
    Warmed,
    /// Cache already warm
    Skipped,
    /// No seed refs or scan roots to warm
    NotConfigured,
    /// Stopped by the warmer's cancellation
    Cancelled,
    /// Hit its deadline
    TimedOut,
    /// Live work failed
    Failed(String),
}

/// Per-sub-task results of one pass, in completion order
#[derive(Debug, Default)]
pub struct WarmReport {
    pub outcomes: Vec<(WarmTask, WarmOutcome)>,
}

impl WarmReport {
    pub fn outcome(&self, task: WarmTask) -> Option<&WarmOutcome> {
        self.outcomes
            .iter()
            .find(|(t, _)| *t == task)
            .map(|(_, outcome)| outcome)
    }
}

struct WarmerInner {
    refs: Arc<RemoteRefCache>,
    repos: Arc<RepositoryListCache>,
    projects: Arc<DiscoveryCache>,
    scanner: DirectoryScanner,
    settings: WarmerSettings,
}

struct Running {
    token: CancellationToken,
    handle: JoinHandle<()>,
}

/// Proactively fills the caches in the background
pub struct CacheWarmer {
    inner: Arc<WarmerInner>,
    state: Mutex<Option<Running>>,
}

impl CacheWarmer {
    pub fn new(
        refs: Arc<RemoteRefCache>,
        repos: Arc<RepositoryListCache>,
        projects: Arc<DiscoveryCache>,
        scanner: DirectoryScanner,
        settings: WarmerSettings,
    ) -> Self {
        Self {
            inner: Arc::new(WarmerInner {
                refs,
                repos,
                projects,
                scanner,
                settings,
            }),
            state: Mutex::new(None),
        }
    }

    /// Spawn the supervisor. Returns `false` if already running.
    ///
    /// Must be called from within a tokio runtime.
    pub fn start(&self) -> bool {
        let mut state = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if state.is_some() {
            debug!("Cache warmer already running");
            return false;
        }

        let token = CancellationToken::new();
        let handle = tokio::spawn(supervise(self.inner.clone(), token.clone()));
        *state = Some(Running { token, handle });
        true
    }

    /// Signal the supervisor to exit without waiting for it.
    /// Returns `false` if it was not running.
    ///
    /// In-flight sub-tasks observe the same signal and end on their own.
    pub fn stop(&self) -> bool {
        let running = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        match running {
            Some(running) => {
                running.token.cancel();
                info!("Cache warmer stop requested");
                true
            }
            None => false,
        }
    }

    /// Stop and wait until the supervisor and its sub-tasks have exited
    pub async fn shutdown(&self) {
        let running = self
            .state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(running) = running {
            running.token.cancel();
            if let Err(e) = running.handle.await {
                warn!(error = %e, "Cache warmer supervisor ended abnormally");
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.state
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Run a single pass in the caller's task
    pub async fn warm_once(&self) -> WarmReport {
        self.inner.warm_pass(&CancellationToken::new()).await
    }
}

impl Drop for CacheWarmer {
    fn drop(&mut self) {
        if let Some(running) = self
            .state
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            running.token.cancel();
        }
    }
}

async fn supervise(inner: Arc<WarmerInner>, token: CancellationToken) {
    let period = inner.settings.interval.max(MIN_INTERVAL);
    info!(interval_secs = period.as_secs(), "Cache warmer started");

    // The first tick completes immediately, giving the initial pass.
    let mut interval = tokio::time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = token.cancelled() => break,
            _ = interval.tick() => {}
        }
        let report = inner.warm_pass(&token).await;
        debug!(outcomes = ?report.outcomes, "Warm pass finished");
    }

    info!("Cache warmer stopped");
}

impl WarmerInner {
    async fn warm_pass(self: &Arc<Self>, cancel: &CancellationToken) -> WarmReport {
        self.refs.purge_expired();

        let mut tasks = JoinSet::new();
        for task in WarmTask::ALL {
            let inner = self.clone();
            let cancel = cancel.child_token();
            tasks.spawn(async move {
                let deadline = inner.settings.subtask_timeout;
                let outcome = match tokio::time::timeout(deadline, inner.run(task, &cancel)).await {
                    Ok(Ok(outcome)) => outcome,
                    Ok(Err(e)) => {
                        warn!(task = %task, kind = ?e.kind(), error = %e, "Warm task failed");
                        WarmOutcome::Failed(e.to_string())
                    }
                    Err(_) => {
                        cancel.cancel();
                        warn!(
                            task = %task,
                            timeout_secs = deadline.as_secs(),
                            "Warm task timed out"
                        );
                        WarmOutcome::TimedOut
                    }
                };
                (task, outcome)
            });
        }

        let mut report = WarmReport::default();
        while let Some(joined) = tasks.join_next().await {
            match joined {
                Ok(result) => report.outcomes.push(result),
                Err(e) => warn!(error = %e, "Warm task aborted"),
            }
        }
        report
    }

    async fn run(&self, task: WarmTask, cancel: &CancellationToken) -> ScoutResult<WarmOutcome> {
        match task {
            WarmTask::RepositoryList => self.warm_repositories(cancel).await,
            WarmTask::SeedRefs => self.warm_seed_refs(cancel).await,
            WarmTask::Discovery => self.warm_discovery(cancel).await,
        }
    }

    async fn warm_repositories(&self, cancel: &CancellationToken) -> ScoutResult<WarmOutcome> {
        if self.repos.is_warm() {
            debug!("Repository list already warm");
            return Ok(WarmOutcome::Skipped);
        }

        let listed = tokio::select! {
            _ = cancel.cancelled() => return Ok(WarmOutcome::Cancelled),
            listed = self.repos.fetch() => listed?,
        };
        info!(count = listed.len(), "Warmed repository list");
        Ok(WarmOutcome::Warmed)
    }

    async fn warm_seed_refs(&self, cancel: &CancellationToken) -> ScoutResult<WarmOutcome> {
        let seeds: Vec<(&str, &str)> = self
            .settings
            .seed_repos
            .iter()
            .flat_map(|seed| seed.refs.iter().map(move |r| (seed.url.as_str(), r.as_str())))
            .collect();
        if seeds.is_empty() {
            return Ok(WarmOutcome::NotConfigured);
        }

        let pending: Vec<(&str, &str)> = seeds
            .into_iter()
            .filter(|(url, r)| !self.refs.contains_fresh(url, r))
            .collect();
        if pending.is_empty() {
            debug!("Seed refs already warm");
            return Ok(WarmOutcome::Skipped);
        }

        let mut resolved = 0usize;
        let mut last_error: Option<ScoutError> = None;
        for (i, (url, git_ref)) in pending.iter().enumerate() {
            if i > 0 {
                tokio::select! {
                    _ = cancel.cancelled() => return Ok(WarmOutcome::Cancelled),
                    _ = tokio::time::sleep(self.settings.throttle) => {}
                }
            }

            let mut result = tokio::select! {
                _ = cancel.cancelled() => return Ok(WarmOutcome::Cancelled),
                result = self.refs.resolve(url, git_ref) => result,
            };
            // One retry for transient failures, after the usual pause.
            if matches!(&result, Err(e) if e.is_retryable()) {
                debug!(url, git_ref, "Retrying seed ref");
                result = tokio::select! {
                    _ = cancel.cancelled() => return Ok(WarmOutcome::Cancelled),
                    result = async {
                        tokio::time::sleep(self.settings.throttle).await;
                        self.refs.resolve(url, git_ref).await
                    } => result,
                };
            }
            match result {
                Ok(_) => resolved += 1,
                Err(e) => {
                    warn!(url, git_ref, error = %e, "Could not warm seed ref");
                    last_error = Some(e);
                }
            }
        }

        info!(resolved, pending = pending.len(), "Warmed seed refs");
        match last_error {
            Some(e) if resolved == 0 => Err(e),
            _ => Ok(WarmOutcome::Warmed),
        }
    }

    async fn warm_discovery(&self, cancel: &CancellationToken) -> ScoutResult<WarmOutcome> {
        let roots = &self.settings.scan_roots;
        if roots.is_empty() {
            return Ok(WarmOutcome::NotConfigured);
        }
        if self.projects.is_warm(roots) {
            debug!("Discovery already warm");
            return Ok(WarmOutcome::Skipped);
        }

        let outcome = self
            .scanner
            .scan_with_timeout(
                roots,
                self.settings.max_depth,
                self.settings.subtask_timeout,
                cancel,
            )
            .await;

        match outcome.interrupted {
            None => {
                info!(projects = outcome.projects.len(), "Warmed discovery cache");
                self.projects.set(roots.clone(), outcome.projects);
                Ok(WarmOutcome::Warmed)
            }
            // Partial results are not cached.
            Some(_) if cancel.is_cancelled() => Ok(WarmOutcome::Cancelled),
            Some(e) => Err(e),
        }
    }
}
