//! Revscout - local project discovery and git dependency freshness
//!
//! Finds Cargo projects under a set of roots, caches hosted repository
//! listings and remote ref resolutions, keeps those caches warm in the
//! background, and reports git dependencies whose locked revision is behind
//! upstream.

pub mod app;
pub mod cache;
pub mod cli;
pub mod config;
pub mod discovery;
pub mod error;
pub mod manifest;
pub mod remote;
pub mod staleness;
pub mod ui;
pub mod warmer;

pub use error::{ScoutError, ScoutResult};
