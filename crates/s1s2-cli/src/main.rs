#![allow(clippy::nursery)]
#![allow(clippy::pedantic)]

use clap::Parser;

mod bootstrap;
mod cli;
mod commands;
mod output;
mod server;
mod session;
mod view;

#[tokio::main]
async fn main() {
    if let Err(error) = run().await {
        eprintln!("s1s2 error: {error:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let cli = cli::Cli::parse();
    let flags = cli.global_flags();
    let config = bootstrap::load_config(&cli.command)?;

    init_tracing(flags.quiet, flags.verbose || config.server.debug)?;
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        cli::Commands::Serve(args) => commands::serve::handle(&args, config).await,
        cli::Commands::Render(args) => commands::render::handle(&args, &config, &flags),
    }
}

fn init_tracing(quiet: bool, verbose: bool) -> anyhow::Result<()> {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "info"
    };

    let filter = tracing_subscriber::EnvFilter::try_from_env("S1S2_LOG")
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|error| anyhow::anyhow!("failed to initialize tracing subscriber: {error}"))?;

    Ok(())
}
