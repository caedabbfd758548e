use std::path::PathBuf;

use clap::{Args, Subcommand};

/// Top-level command tree.
#[derive(Clone, Debug, Subcommand)]
pub enum Commands {
    /// Start the local dashboard server.
    Serve(ServeArgs),
    /// Ingest a spreadsheet offline and print its table and matrix figure.
    Render(RenderArgs),
}

#[derive(Clone, Debug, Args)]
pub struct ServeArgs {
    /// Interface to bind (overrides `server.host`).
    #[arg(long)]
    pub host: Option<String>,

    /// Port to bind (overrides `server.port`).
    #[arg(long)]
    pub port: Option<u16>,

    /// Debug mode: debug logging, no client caching, figure JSON on the page.
    #[arg(long)]
    pub debug: bool,

    /// Open the dashboard in the default browser once listening.
    #[arg(long)]
    pub open: bool,
}

#[derive(Clone, Debug, Args)]
pub struct RenderArgs {
    /// CSV or Excel file to ingest. Uses the sample dataset when omitted.
    pub file: Option<PathBuf>,

    /// Table page to print (0-based).
    #[arg(long, default_value_t = 0)]
    pub page: usize,

    /// Also write the matrix as an SVG file.
    #[arg(long)]
    pub svg: Option<PathBuf>,

    /// Reject labels outside the impact mapping.
    #[arg(long)]
    pub strict_labels: bool,
}
