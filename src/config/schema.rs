//! Configuration schema for revscout
//!
//! Configuration is stored at `~/.config/revscout/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// Project discovery settings
    pub scan: ScanConfig,

    /// Cache lifetimes
    pub cache: CacheConfig,

    /// Background warmer settings
    pub warmer: WarmerConfig,

    /// GitHub settings
    pub github: GithubConfig,
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// Project discovery configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ScanConfig {
    /// Directories to search when no roots are given
    pub roots: Vec<PathBuf>,

    /// Maximum recursion depth below each root
    pub max_depth: usize,

    /// Give up after this many seconds and return what was found
    pub timeout_secs: u64,

    /// File names that mark a directory as a project
    pub manifest_names: Vec<String>,

    /// Extra directory names never descended into
    pub skip_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            roots: vec![],
            max_depth: 4,
            timeout_secs: 30,
            manifest_names: vec!["Cargo.toml".to_string()],
            skip_dirs: vec![],
        }
    }
}

impl ScanConfig {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

/// Cache lifetimes in seconds
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Remote ref -> revision resolutions
    pub ref_ttl_secs: u64,

    /// Hosted repository candidate list
    pub repo_list_ttl_secs: u64,

    /// Last discovery result
    pub discovery_ttl_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ref_ttl_secs: 300,
            repo_list_ttl_secs: 300,
            discovery_ttl_secs: 300,
        }
    }
}

/// Background warmer configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WarmerConfig {
    /// Seconds between warm passes
    pub interval_secs: u64,

    /// Deadline for each warm sub-task
    pub subtask_timeout_secs: u64,

    /// Delay between successive seed ref lookups
    pub throttle_ms: u64,

    /// Repositories whose refs are kept warm
    pub seed_repos: Vec<SeedRepo>,
}

impl Default for WarmerConfig {
    fn default() -> Self {
        Self {
            interval_secs: 300,
            subtask_timeout_secs: 30,
            throttle_ms: 250,
            seed_repos: vec![],
        }
    }
}

/// A repository whose refs the warmer resolves ahead of time
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SeedRepo {
    /// Clone URL
    pub url: String,

    /// Refs to resolve (branches or tags)
    #[serde(default = "default_seed_refs")]
    pub refs: Vec<String>,
}

fn default_seed_refs() -> Vec<String> {
    vec!["HEAD".to_string()]
}

/// GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// GitHub host (for GitHub Enterprise)
    pub host: String,

    /// Maximum repositories to list
    pub limit: u32,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            host: "github.com".to_string(),
            limit: 200,
        }
    }
}
