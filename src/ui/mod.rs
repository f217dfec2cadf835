//! Terminal output
//!
//! Decorated output through `cliclack` and `indicatif` on an interactive
//! terminal, tagged plain lines everywhere else.

mod context;
mod output;
mod progress;
mod theme;

pub use context::UiContext;
pub use output::{intro, key_value, outro, step, step_detail, Level};
pub use progress::{TaskSpinner, WarmProgress};
pub use theme::{init_theme, ScoutTheme};
