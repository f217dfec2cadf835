//! Scan command - discover projects under roots

use super::{cancel_on_ctrl_c, current_dir};
use crate::app::App;
use crate::cli::args::{OutputFormat, ScanArgs};
use crate::config::Config;
use crate::discovery::Project;
use crate::error::ScoutResult;
use crate::ui::{self, Level, TaskSpinner, UiContext};
use console::style;
use std::path::PathBuf;

/// Execute the scan command
pub async fn execute(args: ScanArgs, config: &Config) -> ScoutResult<()> {
    let mut config = config.clone();
    if let Some(depth) = args.depth {
        config.scan.max_depth = depth;
    }
    if let Some(secs) = args.timeout {
        config.scan.timeout_secs = secs;
    }
    let roots = scan_roots(args.roots, &config)?;

    let app = App::from_config(&config);
    let cancel = cancel_on_ctrl_c();
    let ctx = UiContext::detect();

    let mut spinner = TaskSpinner::new(&ctx);
    if args.format == OutputFormat::Table {
        spinner.start(&format!("Scanning {} root(s)...", roots.len()));
    }
    let outcome = app.discover(&roots, &cancel).await;
    if args.format == OutputFormat::Table {
        spinner.stop(&format!("Found {} project(s)", outcome.projects.len()));
    }

    match args.format {
        OutputFormat::Table => print_table(&ctx, &outcome.projects),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&outcome.projects)?),
        OutputFormat::Plain => {
            for project in &outcome.projects {
                println!("{}", project.path.display());
            }
        }
    }

    if let Some(reason) = outcome.interrupted {
        eprintln!(
            "{} Scan incomplete, results are partial: {}",
            style("Warning:").yellow(),
            reason
        );
    }
    Ok(())
}

/// Explicit roots, else configured roots, else the current directory
fn scan_roots(explicit: Vec<PathBuf>, config: &Config) -> ScoutResult<Vec<PathBuf>> {
    if !explicit.is_empty() {
        return Ok(explicit);
    }
    if !config.scan.roots.is_empty() {
        return Ok(config.scan.roots.clone());
    }
    Ok(vec![current_dir()?])
}

fn print_table(ctx: &UiContext, projects: &[Project]) {
    if projects.is_empty() {
        ui::step(ctx, Level::Info, "No projects found");
        return;
    }

    println!("{:<30} {}", style("NAME").bold(), style("PATH").bold());
    println!("{}", "-".repeat(72));
    for project in projects {
        println!("{:<30} {}", project.display_name(), project.path.display());
    }
    println!();
    println!("{} project(s)", projects.len());
}
