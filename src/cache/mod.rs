//! Short-lived in-memory caches
//!
//! Keeps interactive lookups off the network on the common path.
//!
//! | Cache | Shape | Filled by |
//! |-------|-------|-----------|
//! | [`RemoteRefCache`] | (endpoint, ref) -> revision | `git ls-remote` on miss |
//! | [`RepositoryListCache`] | one candidate list | `gh repo list` on miss |
//! | [`DiscoveryCache`] | one project list per root set | directory scanner |
//!
//! Every cache owns its lock; other subsystems only use the public
//! get/set/invalidate surface. Nothing is persisted across processes.

pub mod clock;
pub mod projects;
pub mod refs;
pub mod repos;
mod slot;

pub use clock::{Clock, ManualClock, SystemClock};
pub use projects::DiscoveryCache;
pub use refs::{RefKey, RemoteRefCache};
pub use repos::RepositoryListCache;
