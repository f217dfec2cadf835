//! Single-slot TTL holder shared by the list caches

use crate::cache::clock::{expiry_after, Clock};
use chrono::{DateTime, Utc};
use std::sync::{Arc, PoisonError, RwLock};
use std::time::Duration;

/// A stored value together with the instant it stops being served
#[derive(Debug, Clone)]
pub(crate) struct Stamped<T> {
    pub value: T,
    pub expires_at: DateTime<Utc>,
}

/// One value, replaced wholesale, served until its expiry
pub(crate) struct TtlSlot<T> {
    inner: RwLock<Option<Stamped<T>>>,
    ttl: Duration,
    clock: Arc<dyn Clock>,
}

impl<T: Clone> TtlSlot<T> {
    pub fn new(ttl: Duration, clock: Arc<dyn Clock>) -> Self {
        Self {
            inner: RwLock::new(None),
            ttl,
            clock,
        }
    }

    /// Read the slot if it has not expired and `accept` agrees
    pub fn get_if(&self, accept: impl FnOnce(&T) -> bool) -> Option<T> {
        let now = self.clock.now();
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        match guard.as_ref() {
            Some(stamped) if now < stamped.expires_at && accept(&stamped.value) => {
                Some(stamped.value.clone())
            }
            _ => None,
        }
    }

    /// Inspect the live slot without cloning the value
    pub fn with_live<R>(&self, f: impl FnOnce(&Stamped<T>) -> R) -> Option<R> {
        let now = self.clock.now();
        let guard = self.inner.read().unwrap_or_else(PoisonError::into_inner);
        guard
            .as_ref()
            .filter(|stamped| now < stamped.expires_at)
            .map(f)
    }

    /// Replace the slot, restarting the TTL
    pub fn set(&self, value: T) -> DateTime<Utc> {
        let expires_at = expiry_after(self.clock.as_ref(), self.ttl);
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = Some(Stamped { value, expires_at });
        expires_at
    }

    pub fn clear(&self) {
        let mut guard = self.inner.write().unwrap_or_else(PoisonError::into_inner);
        *guard = None;
    }
}
