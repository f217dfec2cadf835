//! Hosted repository list cache
//!
//! Holds the most recent candidate list as a single snapshot. `set` replaces
//! the snapshot wholesale; lists are never merged.

use crate::cache::clock::{Clock, SystemClock};
use crate::cache::slot::TtlSlot;
use crate::error::ScoutResult;
use crate::remote::{RepoCandidate, RepositoryLister};
use sha2::{Digest, Sha256};
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

#[derive(Debug, Clone)]
struct RepositoryListSnapshot {
    candidates: Vec<RepoCandidate>,
    fingerprint: String,
}

/// TTL cache of the caller's hosted repositories
pub struct RepositoryListCache {
    slot: TtlSlot<RepositoryListSnapshot>,
    lister: Arc<dyn RepositoryLister>,
}

impl RepositoryListCache {
    pub fn new(lister: Arc<dyn RepositoryLister>, ttl: Duration) -> Self {
        Self::with_clock(lister, ttl, Arc::new(SystemClock))
    }

    pub fn with_clock(
        lister: Arc<dyn RepositoryLister>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            slot: TtlSlot::new(ttl, clock),
            lister,
        }
    }

    /// Cached list, if non-empty and not expired
    pub fn get(&self) -> Option<Vec<RepoCandidate>> {
        self.slot
            .get_if(|snapshot| !snapshot.candidates.is_empty())
            .map(|snapshot| snapshot.candidates)
    }

    /// Replace the cached list and restart its TTL
    pub fn set(&self, candidates: Vec<RepoCandidate>) {
        let fingerprint = fingerprint(&candidates);
        let count = candidates.len();
        let expires_at = self.slot.set(RepositoryListSnapshot {
            candidates,
            fingerprint,
        });
        debug!(count, %expires_at, "Cached repository list");
    }

    /// Force the next `get` to miss
    pub fn invalidate(&self) {
        self.slot.clear();
        debug!("Invalidated repository list cache");
    }

    /// Cached list, or a live listing that is then cached.
    ///
    /// Lister errors (unauthenticated, CLI missing) surface unchanged.
    pub async fn fetch(&self) -> ScoutResult<Vec<RepoCandidate>> {
        if let Some(candidates) = self.get() {
            debug!("Repository list cache hit");
            return Ok(candidates);
        }

        debug!("Repository list cache miss, listing live");
        let candidates = self.lister.list().await?;
        self.set(candidates.clone());
        Ok(candidates)
    }

    /// Whether `get` would currently hit
    pub fn is_warm(&self) -> bool {
        self.slot
            .with_live(|stamped| !stamped.value.candidates.is_empty())
            .unwrap_or(false)
    }

    /// Content fingerprint of the live snapshot
    pub fn fingerprint(&self) -> Option<String> {
        self.slot
            .with_live(|stamped| stamped.value.fingerprint.clone())
    }
}

/// SHA256 over every candidate's url and name, first 16 hex chars
fn fingerprint(candidates: &[RepoCandidate]) -> String {
    let mut hasher = Sha256::new();
    for candidate in candidates {
        hasher.update(candidate.url.as_bytes());
        hasher.update([0]);
        hasher.update(candidate.name.as_bytes());
        hasher.update([0]);
    }
    let result = hasher.finalize();
    hex::encode(&result[..8])
}
