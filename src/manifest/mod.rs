//! Cargo manifest and lockfile readers
//!
//! Thin adapters: the scanner only needs a declared name, and the staleness
//! check needs declared git dependencies plus their locked revisions.

pub mod lockfile;
#[allow(clippy::module_inception)]
pub mod manifest;

pub use lockfile::{LockedDependency, Lockfile, SourceKind};
pub use manifest::{DeclaredDependency, Manifest};
