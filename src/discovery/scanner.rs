//! Bounded-concurrency project discovery
//!
//! Roots are fed through a bounded queue to a small pool of tokio workers.
//! Each worker walks its root depth-first; a directory holding a manifest is
//! recorded and not descended into. Wide directories fan out to a nested pool
//! built the same way.
//!
//! Every filesystem call is preceded by a cancellation check, and every queue
//! send/receive races the cancellation token, so a cancelled scan drains
//! without leaving anything blocked on a queue nobody reads.

use crate::config::schema::ScanConfig;
use crate::discovery::Project;
use crate::error::{ScoutError, ScoutResult};
use crate::manifest::Manifest;
use futures_util::future::{BoxFuture, FutureExt};
use std::collections::HashSet;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, Mutex};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Subdirectory count above which a directory is scanned concurrently
const FAN_OUT_THRESHOLD: usize = 4;

/// Directory names that never contain projects worth reporting
const SKIPPED_DIRS: &[&str] = &[
    "target",
    "node_modules",
    "vendor",
    "dist",
    "build",
    "out",
    "__pycache__",
    ".git",
    ".hg",
    ".svn",
    ".venv",
    ".idea",
    ".vscode",
    ".cargo",
];

/// Worker count for a directory's children: `1` means walk them sequentially
pub fn fan_out_workers(subdir_count: usize, remaining_depth: usize) -> usize {
    if subdir_count > FAN_OUT_THRESHOLD && remaining_depth > 1 {
        subdir_count
    } else {
        1
    }
}

/// Hidden directories and known build/VCS/dependency/editor directories
pub fn is_skipped_dir(name: &str) -> bool {
    name.starts_with('.') || SKIPPED_DIRS.contains(&name)
}

/// What counts as a project and what to ignore
#[derive(Debug, Clone)]
pub struct ScanSettings {
    /// File names marking a project directory
    pub manifest_names: Vec<String>,

    /// Directory names skipped in addition to the built-in list
    pub skip_dirs: Vec<String>,
}

impl Default for ScanSettings {
    fn default() -> Self {
        Self {
            manifest_names: vec!["Cargo.toml".to_string()],
            skip_dirs: vec![],
        }
    }
}

impl From<&ScanConfig> for ScanSettings {
    fn from(config: &ScanConfig) -> Self {
        Self {
            manifest_names: config.manifest_names.clone(),
            skip_dirs: config.skip_dirs.clone(),
        }
    }
}

/// Result of a scan: whatever was found, plus why it stopped early (if it did)
#[derive(Debug)]
pub struct ScanOutcome {
    pub projects: Vec<Project>,
    pub interrupted: Option<ScoutError>,
}

impl ScanOutcome {
    /// Whether the scan ran to completion
    pub fn is_complete(&self) -> bool {
        self.interrupted.is_none()
    }

    /// Discard partial results if the scan was interrupted
    pub fn into_result(self) -> ScoutResult<Vec<Project>> {
        match self.interrupted {
            Some(err) => Err(err),
            None => Ok(self.projects),
        }
    }
}

struct ScanContext {
    manifest_names: Vec<String>,
    skip_dirs: HashSet<String>,
}

impl ScanContext {
    fn is_skipped(&self, name: &str) -> bool {
        is_skipped_dir(name) || self.skip_dirs.contains(name)
    }

    /// The project rooted at `dir`, if it directly holds a manifest
    async fn detect_project(&self, dir: &Path, cancel: &CancellationToken) -> Option<Project> {
        for name in &self.manifest_names {
            if cancel.is_cancelled() {
                return None;
            }
            let manifest_path = dir.join(name);
            match tokio::fs::metadata(&manifest_path).await {
                Ok(meta) if meta.is_file() => {}
                _ => continue,
            }
            if cancel.is_cancelled() {
                return None;
            }
            let declared_name = declared_name(&manifest_path).await;
            return Some(Project::new(
                dir.to_path_buf(),
                manifest_path,
                declared_name,
            ));
        }
        None
    }

    /// Child directories worth visiting, sorted for stable traversal.
    /// Symlinked directories are not followed.
    async fn list_subdirs(
        &self,
        dir: &Path,
        cancel: &CancellationToken,
    ) -> std::io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut subdirs = Vec::new();

        while !cancel.is_cancelled() {
            let Some(entry) = entries.next_entry().await? else {
                break;
            };
            let Ok(file_type) = entry.file_type().await else {
                continue;
            };
            if !file_type.is_dir() {
                continue;
            }
            if self.is_skipped(&entry.file_name().to_string_lossy()) {
                continue;
            }
            subdirs.push(entry.path());
        }

        subdirs.sort();
        Ok(subdirs)
    }
}

async fn declared_name(manifest_path: &Path) -> Option<String> {
    let bytes = match tokio::fs::read(manifest_path).await {
        Ok(bytes) => bytes,
        Err(e) => {
            debug!(path = %manifest_path.display(), error = %e, "Could not read manifest");
            return None;
        }
    };
    match Manifest::parse(&String::from_utf8_lossy(&bytes)) {
        Ok(manifest) => manifest.name,
        Err(e) => {
            debug!(path = %manifest_path.display(), error = %e, "Could not parse manifest");
            None
        }
    }
}

/// Recursive project finder
#[derive(Clone)]
pub struct DirectoryScanner {
    ctx: Arc<ScanContext>,
}

impl DirectoryScanner {
    pub fn new(settings: ScanSettings) -> Self {
        Self {
            ctx: Arc::new(ScanContext {
                manifest_names: settings.manifest_names,
                skip_dirs: settings.skip_dirs.into_iter().collect(),
            }),
        }
    }

    /// Discover projects under `roots`, at most `max_depth` levels down.
    ///
    /// Missing roots and unreadable directories contribute nothing. The
    /// outcome is interrupted only if `cancel` fired.
    pub async fn scan(
        &self,
        roots: &[PathBuf],
        max_depth: usize,
        cancel: &CancellationToken,
    ) -> ScanOutcome {
        let workers = std::thread::available_parallelism()
            .map(NonZeroUsize::get)
            .unwrap_or(1)
            .min(roots.len());
        debug!(roots = roots.len(), workers, max_depth, "Starting project scan");

        let ctx = self.ctx.clone();
        let root_cancel = cancel.clone();
        let found = run_pool(roots.to_vec(), workers, cancel.clone(), move |root| {
            scan_root(ctx.clone(), root, max_depth, root_cancel.clone())
        })
        .await;

        let mut seen = HashSet::new();
        let mut projects: Vec<Project> = found
            .into_iter()
            .filter(|project| seen.insert(project.path.clone()))
            .collect();
        projects.sort_by(|a, b| a.path.cmp(&b.path));

        let interrupted = cancel
            .is_cancelled()
            .then(|| ScoutError::Cancelled("project scan".to_string()));
        info!(
            projects = projects.len(),
            complete = interrupted.is_none(),
            "Project scan finished"
        );

        ScanOutcome {
            projects,
            interrupted,
        }
    }

    /// Like [`scan`](Self::scan), but gives up after `timeout` and returns
    /// what was found so far. A zero timeout cancels immediately.
    pub async fn scan_with_timeout(
        &self,
        roots: &[PathBuf],
        max_depth: usize,
        timeout: Duration,
        cancel: &CancellationToken,
    ) -> ScanOutcome {
        let token = cancel.child_token();
        if timeout.is_zero() {
            token.cancel();
        }
        let deadline = {
            let token = token.clone();
            tokio::spawn(async move {
                tokio::time::sleep(timeout).await;
                token.cancel();
            })
        };

        let mut outcome = self.scan(roots, max_depth, &token).await;
        deadline.abort();

        if outcome.interrupted.is_some() && !cancel.is_cancelled() {
            outcome.interrupted = Some(ScoutError::TimedOut {
                operation: "project scan".to_string(),
                secs: timeout.as_secs(),
            });
        }
        outcome
    }
}

fn scan_root(
    ctx: Arc<ScanContext>,
    root: PathBuf,
    max_depth: usize,
    cancel: CancellationToken,
) -> BoxFuture<'static, Vec<Project>> {
    async move {
        if cancel.is_cancelled() {
            return Vec::new();
        }
        match tokio::fs::canonicalize(&root).await {
            Ok(resolved) => scan_dir(ctx, resolved, max_depth, cancel).await,
            Err(e) => {
                debug!(root = %root.display(), error = %e, "Scan root unavailable, skipping");
                Vec::new()
            }
        }
    }
    .boxed()
}

fn scan_dir(
    ctx: Arc<ScanContext>,
    dir: PathBuf,
    remaining_depth: usize,
    cancel: CancellationToken,
) -> BoxFuture<'static, Vec<Project>> {
    async move {
        if cancel.is_cancelled() {
            return Vec::new();
        }
        if let Some(project) = ctx.detect_project(&dir, &cancel).await {
            debug!(path = %project.path.display(), "Found project");
            return vec![project];
        }
        if remaining_depth == 0 || cancel.is_cancelled() {
            return Vec::new();
        }

        let subdirs = match ctx.list_subdirs(&dir, &cancel).await {
            Ok(subdirs) => subdirs,
            Err(e) => {
                debug!(path = %dir.display(), error = %e, "Skipping unreadable directory");
                return Vec::new();
            }
        };

        let child_depth = remaining_depth - 1;
        let workers = fan_out_workers(subdirs.len(), remaining_depth);
        if workers > 1 {
            let child_ctx = ctx.clone();
            let child_cancel = cancel.clone();
            return run_pool(subdirs, workers, cancel, move |sub| {
                scan_dir(child_ctx.clone(), sub, child_depth, child_cancel.clone())
            })
            .await;
        }

        let mut projects = Vec::new();
        for sub in subdirs {
            if cancel.is_cancelled() {
                break;
            }
            projects.extend(scan_dir(ctx.clone(), sub, child_depth, cancel.clone()).await);
        }
        projects
    }
    .boxed()
}

/// Run `visit` over `items` with `workers` tasks pulling from a bounded queue
async fn run_pool<F>(
    items: Vec<PathBuf>,
    workers: usize,
    cancel: CancellationToken,
    visit: F,
) -> Vec<Project>
where
    F: Fn(PathBuf) -> BoxFuture<'static, Vec<Project>> + Send + Sync + 'static,
{
    if items.is_empty() || cancel.is_cancelled() {
        return Vec::new();
    }
    let workers = workers.clamp(1, items.len());

    let (work_tx, work_rx) = mpsc::channel::<PathBuf>(workers);
    let work_rx = Arc::new(Mutex::new(work_rx));
    let (result_tx, mut result_rx) = mpsc::channel::<Vec<Project>>(workers);
    let visit = Arc::new(visit);
    let mut tasks = JoinSet::new();

    let feeder_cancel = cancel.clone();
    tasks.spawn(async move {
        for item in items {
            tokio::select! {
                _ = feeder_cancel.cancelled() => break,
                sent = work_tx.send(item) => {
                    if sent.is_err() {
                        break;
                    }
                }
            }
        }
    });

    for _ in 0..workers {
        let work_rx = work_rx.clone();
        let result_tx = result_tx.clone();
        let cancel = cancel.clone();
        let visit = visit.clone();

        tasks.spawn(async move {
            loop {
                let next = {
                    let mut rx = tokio::select! {
                        _ = cancel.cancelled() => break,
                        rx = work_rx.lock() => rx,
                    };
                    tokio::select! {
                        _ = cancel.cancelled() => None,
                        item = rx.recv() => item,
                    }
                };
                let Some(path) = next else {
                    break;
                };

                let found = visit(path).await;
                if found.is_empty() {
                    continue;
                }
                // Prefer delivering what was found; never wait once cancelled.
                tokio::select! {
                    biased;
                    sent = result_tx.send(found) => {
                        if sent.is_err() {
                            break;
                        }
                    }
                    _ = cancel.cancelled() => break,
                }
            }
        });
    }
    drop(result_tx);

    let mut projects = Vec::new();
    while let Some(found) = result_rx.recv().await {
        projects.extend(found);
    }
    while tasks.join_next().await.is_some() {}
    projects
}
