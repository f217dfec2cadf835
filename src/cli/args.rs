//! CLI argument definitions using clap derive

use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// Revscout - find local Cargo projects and check their git dependencies
///
/// Discovers projects under a set of roots, lists hosted repositories,
/// resolves remote refs and reports git dependencies whose locked revision
/// is behind upstream.
#[derive(Parser, Debug)]
#[command(name = "revscout")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Increase verbosity (-v info, -vv debug)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Configuration file path
    #[arg(short, long, global = true, env = "REVSCOUT_CONFIG")]
    pub config: Option<PathBuf>,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Discover projects under one or more roots
    Scan(ScanArgs),

    /// List hosted repositories visible to the GitHub CLI
    Repos(ReposArgs),

    /// Resolve a remote ref to its current revision
    Resolve(ResolveArgs),

    /// Report git dependencies whose locked revision is behind upstream
    Stale(StaleArgs),

    /// Run the background cache warmer for a while
    Warm(WarmArgs),

    /// Show or initialize configuration
    Config(ConfigArgs),
}

/// Arguments for the scan command
#[derive(Parser, Debug)]
pub struct ScanArgs {
    /// Root directories (defaults to configured roots, then the current directory)
    pub roots: Vec<PathBuf>,

    /// Maximum depth below each root
    #[arg(short, long)]
    pub depth: Option<usize>,

    /// Give up after this many seconds and print what was found
    #[arg(short, long)]
    pub timeout: Option<u64>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the repos command
#[derive(Parser, Debug)]
pub struct ReposArgs {
    /// Skip the cache and list live
    #[arg(long)]
    pub refresh: bool,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the resolve command
#[derive(Parser, Debug)]
pub struct ResolveArgs {
    /// Repository URL or path
    pub url: String,

    /// Branch, tag or other ref
    #[arg(default_value = "HEAD")]
    pub git_ref: String,
}

/// Arguments for the stale command
#[derive(Parser, Debug)]
pub struct StaleArgs {
    /// Project directory (defaults to current directory)
    pub project: Option<PathBuf>,

    /// Output format
    #[arg(short, long, default_value = "table")]
    pub format: OutputFormat,
}

/// Arguments for the warm command
#[derive(Parser, Debug)]
pub struct WarmArgs {
    /// Seconds to keep warming before exiting (0 = single pass)
    #[arg(short, long, default_value = "0")]
    pub duration: u64,
}

/// Arguments for the config command
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Subcommand for config
    #[command(subcommand)]
    pub action: Option<ConfigAction>,
}

/// Config subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Show current configuration
    Show,

    /// Show configuration file path
    Path,

    /// Write a default configuration file
    Init {
        /// Overwrite existing configuration
        #[arg(short, long)]
        force: bool,
    },
}

/// Output format for listing commands
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table
    Table,
    /// JSON output
    Json,
    /// Simple text (one per line)
    Plain,
}
