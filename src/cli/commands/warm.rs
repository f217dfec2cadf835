//! Warm command - fill caches in the foreground or for a fixed period

use super::cancel_on_ctrl_c;
use crate::app::App;
use crate::cli::args::WarmArgs;
use crate::config::Config;
use crate::error::ScoutResult;
use crate::ui::{self, Level, UiContext, WarmProgress};
use crate::warmer::{WarmOutcome, WarmReport};
use std::time::{Duration, Instant};

/// Execute the warm command
pub async fn execute(args: WarmArgs, config: &Config) -> ScoutResult<()> {
    let app = App::from_config(config);
    let warmer = app.warmer();
    let ctx = UiContext::detect();

    if args.duration == 0 {
        ui::intro(&ctx, "Warm pass");
        let report = warmer.warm_once().await;
        print_report(&ctx, &report);
    } else {
        let total = Duration::from_secs(args.duration);
        let cancel = cancel_on_ctrl_c();
        let progress = WarmProgress::new(&ctx, total);
        let started = Instant::now();

        warmer.start();
        let mut ticker = tokio::time::interval(Duration::from_secs(1));
        loop {
            tokio::select! {
                _ = cancel.cancelled() => break,
                _ = ticker.tick() => {}
            }
            let elapsed = started.elapsed();
            progress.update(elapsed, &format!("{} ref(s) cached", app.refs.len()));
            if elapsed >= total {
                break;
            }
        }
        warmer.shutdown().await;
        progress.finish();
        ui::outro(&ctx, "Warmer stopped");
    }

    print_summary(&ctx, &app);
    Ok(())
}

fn print_report(ctx: &UiContext, report: &WarmReport) {
    for (task, outcome) in &report.outcomes {
        let name = task.to_string();
        match describe(outcome) {
            (level, Some(detail)) => ui::step_detail(ctx, level, &name, detail),
            (level, None) => ui::step(ctx, level, &name),
        }
    }
}

fn describe(outcome: &WarmOutcome) -> (Level, Option<&str>) {
    match outcome {
        WarmOutcome::Warmed => (Level::Ok, None),
        WarmOutcome::Skipped => (Level::Info, Some("already warm")),
        WarmOutcome::NotConfigured => (Level::Info, Some("nothing configured")),
        WarmOutcome::Cancelled => (Level::Warn, Some("cancelled")),
        WarmOutcome::TimedOut => (Level::Warn, Some("timed out")),
        WarmOutcome::Failed(reason) => (Level::Fail, Some(reason.as_str())),
    }
}

fn print_summary(ctx: &UiContext, app: &App) {
    let warmth = |warm: bool| if warm { "warm" } else { "cold" };

    println!();
    ui::key_value(ctx, "repository list", warmth(app.repos.is_warm()));
    ui::key_value(ctx, "cached refs", &app.refs.len().to_string());
    let roots = &app.config().scan.roots;
    if !roots.is_empty() {
        ui::key_value(ctx, "discovery", warmth(app.projects.is_warm(roots)));
    }
}
