//! Revscout - project discovery and git dependency freshness
//!
//! CLI entry point that dispatches to subcommands.

use clap::Parser;
use console::style;
use revscout::cli::{commands, Cli, Commands};
use revscout::config::ConfigManager;
use revscout::error::ScoutResult;
use std::process::ExitCode;
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", style("Error:").red().bold(), e);
            if let Some(hint) = e.hint() {
                eprintln!("{} {}", style("Hint:").yellow(), hint);
            }
            ExitCode::FAILURE
        }
    }
}

async fn run() -> ScoutResult<()> {
    let cli = Cli::parse();

    let config_manager = match cli.config {
        Some(ref path) => ConfigManager::with_path(path.clone()),
        None => ConfigManager::new(),
    };
    let config = config_manager.load().await?;

    init_logging(cli.verbose, &config.general.log_format);
    revscout::ui::init_theme();
    debug!(path = %config_manager.path().display(), "Configuration loaded");

    match cli.command {
        Commands::Scan(args) => commands::scan(args, &config).await,
        Commands::Repos(args) => commands::repos(args, &config).await,
        Commands::Resolve(args) => commands::resolve(args, &config).await,
        Commands::Stale(args) => commands::stale(args, &config).await,
        Commands::Warm(args) => commands::warm(args, &config).await,
        Commands::Config(args) => commands::config(args, &config, &config_manager).await,
    }
}

/// 0 = warn, 1 = info, 2+ = debug. `RUST_LOG` overrides.
fn init_logging(verbose: u8, log_format: &str) {
    let default = match verbose {
        0 => "revscout=warn",
        1 => "revscout=info",
        _ => "revscout=debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false);

    if log_format == "json" {
        builder.json().init();
    } else {
        builder.without_time().init();
    }
}
