use anyhow::Context;
use s1s2_config::S1s2Config;
use s1s2_core::Dataset;

use crate::cli::root_commands::ServeArgs;
use crate::server;

/// Handle `s1s2 serve`.
///
/// The accept loop blocks, so it runs on the blocking pool until the process
/// is stopped.
pub async fn handle(args: &ServeArgs, config: S1s2Config) -> anyhow::Result<()> {
    let open_browser = args.open;
    tokio::task::spawn_blocking(move || server::run(&config, Dataset::default(), open_browser))
        .await
        .context("dashboard server task failed")?
}
