//! Stale command - compare locked git revisions against upstream

use super::current_dir;
use crate::app::App;
use crate::cli::args::{OutputFormat, StaleArgs};
use crate::config::Config;
use crate::error::{ScoutError, ScoutResult};
use crate::staleness::{short_revision, StaleInfo};
use crate::ui::{self, Level, TaskSpinner, UiContext};
use console::style;

/// Execute the stale command
pub async fn execute(args: StaleArgs, config: &Config) -> ScoutResult<()> {
    let dir = match args.project {
        Some(dir) => dir,
        None => current_dir()?,
    };
    if !dir.is_dir() {
        return Err(ScoutError::PathNotFound(dir));
    }

    let app = App::from_config(config);
    let project = app
        .project_at(&dir)
        .await
        .ok_or_else(|| ScoutError::ManifestNotFound(dir.join("Cargo.toml")))?;

    let ctx = UiContext::detect();
    let table = args.format == OutputFormat::Table;
    let mut spinner = TaskSpinner::new(&ctx);
    if table {
        spinner.start(&format!("Checking {}...", project.display_name()));
    }
    let results = app.reconciler.reconcile_project(&project).await;
    if table {
        match &results {
            Ok(results) => spinner.stop(&format!("Checked {} git dependencies", results.len())),
            Err(_) => spinner.stop_error("Check failed"),
        }
    }
    let results = results?;

    match args.format {
        OutputFormat::Table => print_table(&ctx, &results),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&results)?),
        OutputFormat::Plain => {
            for info in results.iter().filter(|info| info.is_stale) {
                println!("{}", info.package_name);
            }
        }
    }
    Ok(())
}

fn print_table(ctx: &UiContext, results: &[StaleInfo]) {
    if results.is_empty() {
        ui::step(ctx, Level::Info, "No git dependencies to check");
        return;
    }

    println!(
        "{:<28} {:<16} {:<9} {:<9} {}",
        style("PACKAGE").bold(),
        style("REF").bold(),
        style("LOCKED").bold(),
        style("UPSTREAM").bold(),
        style("STATUS").bold()
    );
    println!("{}", "-".repeat(76));

    for info in results {
        let status = if info.is_stale {
            style("stale").yellow()
        } else {
            style("current").green()
        };
        println!(
            "{:<28} {:<16} {:<9} {:<9} {}",
            info.package_name,
            info.current_ref,
            short_revision(&info.current_sha),
            short_revision(&info.upstream_sha),
            status
        );
    }

    let stale = results.iter().filter(|info| info.is_stale).count();
    println!();
    if stale == 0 {
        ui::step(ctx, Level::Ok, "All git dependencies are current");
    } else {
        ui::step_detail(
            ctx,
            Level::Warn,
            &format!("{} of {} behind upstream", stale, results.len()),
            "run cargo update -p <package>",
        );
    }
}
