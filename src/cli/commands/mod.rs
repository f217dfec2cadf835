//! CLI command implementations

pub mod config;
pub mod repos;
pub mod resolve;
pub mod scan;
pub mod stale;
pub mod warm;

pub use config::execute as config;
pub use repos::execute as repos;
pub use resolve::execute as resolve;
pub use scan::execute as scan;
pub use stale::execute as stale;
pub use warm::execute as warm;

use crate::error::{ScoutError, ScoutResult};
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing::debug;

/// A token cancelled on Ctrl-C
pub(crate) fn cancel_on_ctrl_c() -> CancellationToken {
    let token = CancellationToken::new();
    let trigger = token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            debug!("Interrupt received");
            trigger.cancel();
        }
    });
    token
}

pub(crate) fn current_dir() -> ScoutResult<PathBuf> {
    std::env::current_dir().map_err(|e| ScoutError::io("getting current directory", e))
}
