//! Status lines and headers

use super::context::UiContext;
use console::style;

/// Severity of a status line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Ok,
    Info,
    Warn,
    Fail,
}

impl Level {
    fn tag(self) -> console::StyledObject<&'static str> {
        match self {
            Self::Ok => style("[OK]").green(),
            Self::Info => style("[INFO]").cyan(),
            Self::Warn => style("[WARN]").yellow(),
            Self::Fail => style("[FAIL]").red(),
        }
    }
}

/// Title line before a block of output
pub fn intro(ctx: &UiContext, title: &str) {
    if ctx.use_fancy_output() {
        cliclack::intro(style(title).cyan().bold()).ok();
    } else {
        println!("{}", style(title).cyan().bold());
        println!();
    }
}

/// Closing line after a block of output
pub fn outro(ctx: &UiContext, message: &str) {
    if ctx.use_fancy_output() {
        cliclack::outro(style(message).green().bold()).ok();
    } else {
        println!();
        println!("{} {}", Level::Ok.tag(), message);
    }
}

/// One status line
pub fn step(ctx: &UiContext, level: Level, message: &str) {
    if ctx.use_fancy_output() {
        let shown = match level {
            Level::Ok => cliclack::log::success(message),
            Level::Info => cliclack::log::info(message),
            Level::Warn => cliclack::log::warning(message),
            Level::Fail => cliclack::log::error(message),
        };
        shown.ok();
    } else {
        println!("  {} {}", level.tag(), message);
    }
}

/// A status line followed by a dimmed detail
pub fn step_detail(ctx: &UiContext, level: Level, message: &str, detail: &str) {
    step(ctx, level, &format!("{} ({})", message, style(detail).dim()));
}

/// Aligned `key: value` line
pub fn key_value(ctx: &UiContext, key: &str, value: &str) {
    if ctx.use_fancy_output() {
        println!("  {}: {}", style(key).dim(), value);
    } else {
        println!("  {}: {}", key, value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_output_does_not_panic() {
        let ctx = UiContext::plain();
        intro(&ctx, "Scan");
        step(&ctx, Level::Ok, "done");
        step_detail(&ctx, Level::Warn, "slow", "12s");
        key_value(&ctx, "projects", "3");
        outro(&ctx, "finished");
    }
}
