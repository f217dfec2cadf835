//! Remote ref -> revision cache
//!
//! Each entry carries its own expiry instant, checked lazily on read and
//! swept by [`RemoteRefCache::purge_expired`]. A key therefore has exactly one
//! expiry at any time, and a later `set` always supersedes an earlier one.

use crate::cache::clock::{expiry_after, Clock, SystemClock};
use crate::error::ScoutResult;
use crate::remote::RefResolver;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;
use tracing::debug;

/// Cache key: where the repository lives and which ref was asked for
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefKey {
    pub endpoint: String,
    pub git_ref: String,
}

impl RefKey {
    pub fn new(endpoint: &str, git_ref: &str) -> Self {
        Self {
            endpoint: endpoint.to_string(),
            git_ref: git_ref.to_string(),
        }
    }
}

#[derive(Debug, Clone)]
struct RefEntry {
    revision: String,
    expires_at: DateTime<Utc>,
}

/// TTL cache of resolved refs, backed by a live [`RefResolver`] on miss
pub struct RemoteRefCache {
    entries: RwLock<HashMap<RefKey, RefEntry>>,
    resolver: Arc<dyn RefResolver>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl RemoteRefCache {
    /// Create a cache using the wall clock
    pub fn new(resolver: Arc<dyn RefResolver>, ttl: Duration) -> Self {
        Self::with_clock(resolver, ttl, Arc::new(SystemClock))
    }

    /// Create a cache with an explicit time source
    pub fn with_clock(
        resolver: Arc<dyn RefResolver>,
        ttl: Duration,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            resolver,
            ttl,
            clock,
        }
    }

    /// Cached revision for `(endpoint, git_ref)`, if still fresh
    pub fn get(&self, endpoint: &str, git_ref: &str) -> Option<String> {
        let key = RefKey::new(endpoint, git_ref);
        let now = self.clock.now();

        let expired_at = {
            let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
            match entries.get(&key) {
                None => return None,
                Some(entry) if now < entry.expires_at => return Some(entry.revision.clone()),
                Some(entry) => entry.expires_at,
            }
        };

        // Compare-and-delete: a set() may have landed between the two locks.
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        if entries
            .get(&key)
            .is_some_and(|entry| entry.expires_at == expired_at)
        {
            entries.remove(&key);
            debug!(endpoint, git_ref, "Dropped expired ref entry");
        }
        None
    }

    /// Store a revision, replacing any previous value and its expiry
    pub fn set(&self, endpoint: &str, git_ref: &str, revision: impl Into<String>) {
        let expires_at = expiry_after(self.clock.as_ref(), self.ttl);
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            RefKey::new(endpoint, git_ref),
            RefEntry {
                revision: revision.into(),
                expires_at,
            },
        );
    }

    /// Cached revision, or a live lookup that is then cached.
    ///
    /// Resolver errors are returned as-is and nothing is stored for them.
    pub async fn resolve(&self, endpoint: &str, git_ref: &str) -> ScoutResult<String> {
        if let Some(revision) = self.get(endpoint, git_ref) {
            debug!(endpoint, git_ref, "Ref cache hit");
            return Ok(revision);
        }

        debug!(endpoint, git_ref, "Ref cache miss, resolving live");
        let revision = self.resolver.resolve(endpoint, git_ref).await?;
        self.set(endpoint, git_ref, revision.clone());
        Ok(revision)
    }

    /// Whether a fresh entry exists, without side effects
    pub fn contains_fresh(&self, endpoint: &str, git_ref: &str) -> bool {
        let now = self.clock.now();
        let entries = self.entries.read().unwrap_or_else(PoisonError::into_inner);
        entries
            .get(&RefKey::new(endpoint, git_ref))
            .is_some_and(|entry| now < entry.expires_at)
    }

    /// Drop one entry
    pub fn invalidate(&self, endpoint: &str, git_ref: &str) {
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        entries.remove(&RefKey::new(endpoint, git_ref));
    }

    /// Remove every expired entry, returning how many went
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| now < entry.expires_at);
        let purged = before - entries.len();
        if purged > 0 {
            debug!(purged, "Purged expired ref entries");
        }
        purged
    }

    /// Number of stored entries, expired ones included until swept
    pub fn len(&self) -> usize {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
