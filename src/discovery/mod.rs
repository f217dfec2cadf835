//! Local project discovery
//!
//! Walks a set of root directories looking for project manifests.
//!
//! - A directory that directly contains a manifest is a project and a leaf:
//!   nothing below it is examined.
//! - Hidden directories and build/VCS/dependency/editor directories are
//!   never entered.
//! - A failing subtree contributes nothing; it never fails the scan.

pub mod project;
pub mod scanner;

pub use project::Project;
pub use scanner::{
    fan_out_workers, is_skipped_dir, DirectoryScanner, ScanOutcome, ScanSettings,
};
