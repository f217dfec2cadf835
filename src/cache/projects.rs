//! Last discovery result, kept warm by the background warmer

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::slot::TtlSlot;
use crate::discovery::Project;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

#[derive(Debug, Clone)]
struct DiscoverySnapshot {
    roots: Vec<PathBuf>,
    projects: Vec<Project>,
}

/// Single-slot TTL cache of discovered projects, keyed by the root set
pub struct DiscoveryCache {
    slot: TtlSlot<DiscoverySnapshot>,
}

impl DiscoveryCache {
    pub fn new(ttl: Duration) -> Self {
        Self::with_clock(ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            slot: TtlSlot::new(ttl, clock),
        }
    }

    /// Projects from the last scan of exactly these roots, if fresh
    pub fn get(&self, roots: &[PathBuf]) -> Option<Vec<Project>> {
        self.slot
            .get_if(|snapshot| snapshot.roots == roots)
            .map(|snapshot| snapshot.projects)
    }

    pub fn set(&self, roots: Vec<PathBuf>, projects: Vec<Project>) {
        self.slot.set(DiscoverySnapshot { roots, projects });
    }

    pub fn invalidate(&self) {
        self.slot.clear();
    }

    /// Whether a fresh result for these roots is held
    pub fn is_warm(&self, roots: &[PathBuf]) -> bool {
        self.slot
            .with_live(|stamped| stamped.value.roots == roots)
            .unwrap_or(false)
    }
}
