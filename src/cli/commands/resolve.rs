//! Resolve command - print the revision a remote ref points at

use crate::app::App;
use crate::cli::args::ResolveArgs;
use crate::config::Config;
use crate::error::ScoutResult;

/// Execute the resolve command
pub async fn execute(args: ResolveArgs, config: &Config) -> ScoutResult<()> {
    let app = App::from_config(config);
    let revision = app.refs.resolve(&args.url, &args.git_ref).await?;
    println!("{}", revision);
    Ok(())
}
