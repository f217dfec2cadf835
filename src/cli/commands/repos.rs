//! Repos command - list hosted repositories

use crate::app::App;
use crate::cli::args::{OutputFormat, ReposArgs};
use crate::config::Config;
use crate::error::ScoutResult;
use crate::remote::{Privacy, RepoCandidate};
use crate::ui::{self, Level, TaskSpinner, UiContext};
use console::style;

/// Longest description shown in the table
const DESCRIPTION_WIDTH: usize = 48;

/// Execute the repos command
pub async fn execute(args: ReposArgs, config: &Config) -> ScoutResult<()> {
    let app = App::from_config(config);
    if args.refresh {
        app.repos.invalidate();
    }

    let ctx = UiContext::detect();
    let mut spinner = TaskSpinner::new(&ctx);
    let table = args.format == OutputFormat::Table;
    if table {
        spinner.start("Listing repositories...");
    }

    let candidates = match app.repos.fetch().await {
        Ok(candidates) => candidates,
        Err(e) => {
            if table {
                spinner.stop_error("Could not list repositories");
            }
            return Err(e);
        }
    };
    if table {
        spinner.stop(&format!("{} repositories", candidates.len()));
    }

    match args.format {
        OutputFormat::Table => print_table(&ctx, &candidates, app.repos.fingerprint()),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&candidates)?),
        OutputFormat::Plain => {
            for candidate in &candidates {
                println!("{}", candidate.url);
            }
        }
    }
    Ok(())
}

fn print_table(ctx: &UiContext, candidates: &[RepoCandidate], fingerprint: Option<String>) {
    if candidates.is_empty() {
        ui::step(ctx, Level::Info, "No repositories visible");
        return;
    }

    println!(
        "{:<40} {:<10} {}",
        style("REPOSITORY").bold(),
        style("VISIBILITY").bold(),
        style("DESCRIPTION").bold()
    );
    println!("{}", "-".repeat(98));
    for candidate in candidates {
        let visibility = match candidate.privacy {
            Privacy::Public => style(candidate.privacy.to_string()).green(),
            _ => style(candidate.privacy.to_string()).yellow(),
        };
        println!(
            "{:<40} {:<10} {}",
            candidate.full_name(),
            visibility,
            truncate(&candidate.description, DESCRIPTION_WIDTH)
        );
    }

    println!();
    if let Some(fingerprint) = fingerprint {
        ui::key_value(ctx, "fingerprint", &fingerprint);
    }
}

fn truncate(text: &str, width: usize) -> String {
    if text.chars().count() <= width {
        return text.to_string();
    }
    let cut: String = text.chars().take(width.saturating_sub(3)).collect();
    format!("{}...", cut)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("short", 10), "short");
    }

    #[test]
    fn truncate_long_text() {
        assert_eq!(truncate("abcdefghijkl", 8), "abcde...");
    }

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate("ééééé", 5), "ééééé");
    }
}
