//! Progress indicators with CI fallback
//!
//! Plain-mode progress goes to stderr so stdout stays clean for `--format json`.

use super::context::UiContext;
use console::style;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

const WARM_TEMPLATE: &str =
    "  {spinner:.cyan} Warming caches  {bar:20.cyan/dim} {pos}/{len}s {msg:.dim}";

/// A task spinner with CI fallback
pub struct TaskSpinner {
    spinner: Option<cliclack::ProgressBar>,
    interactive: bool,
}

impl TaskSpinner {
    pub fn new(ctx: &UiContext) -> Self {
        Self {
            spinner: None,
            interactive: ctx.use_fancy_output(),
        }
    }

    pub fn start(&mut self, message: &str) {
        if self.interactive {
            let spinner = cliclack::spinner();
            spinner.start(message);
            self.spinner = Some(spinner);
        } else {
            eprintln!("{} {}", style("...").dim(), message);
        }
    }

    pub fn stop(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.stop(message),
            None => eprintln!("{} {}", style("[OK]").green(), message),
        }
    }

    pub fn stop_error(&mut self, message: &str) {
        match self.spinner.take() {
            Some(spinner) => spinner.error(message),
            None => eprintln!("{} {}", style("[FAIL]").red(), message),
        }
    }
}

/// Countdown bar for a time-boxed warmer run
pub struct WarmProgress {
    bar: Option<ProgressBar>,
}

impl WarmProgress {
    pub fn new(ctx: &UiContext, total: Duration) -> Self {
        let bar = if ctx.use_fancy_output() {
            let bar = ProgressBar::new(total.as_secs().max(1));
            let template = ProgressStyle::default_bar()
                .template(WARM_TEMPLATE)
                .unwrap_or_else(|_| ProgressStyle::default_bar())
                .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ ")
                .progress_chars("━╸─");
            bar.set_style(template);
            bar.enable_steady_tick(Duration::from_millis(120));
            Some(bar)
        } else {
            eprintln!("Warming caches for {}s...", total.as_secs());
            None
        };
        Self { bar }
    }

    /// Record elapsed time and a one-line status
    pub fn update(&self, elapsed: Duration, status: &str) {
        if let Some(ref bar) = self.bar {
            bar.set_position(elapsed.as_secs());
            bar.set_message(status.to_string());
        }
    }

    pub fn finish(&self) {
        if let Some(ref bar) = self.bar {
            bar.disable_steady_tick();
            bar.finish_and_clear();
        }
    }
}
