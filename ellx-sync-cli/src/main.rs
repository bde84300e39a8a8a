//! ellx-sync — publish a repository to the Ellx sync service.
//!
//! # Usage
//!
//! ```text
//! ellx-sync sync [--ellx-url <url>] [--github-token <token>] [--repo owner/name]
//!                [--ref refs/heads/<branch>] [--sha <sha>] [--root <dir>] [--dry-run]
//! ellx-sync scan [--root <dir>] [--json]
//! ```
//!
//! Inside a workflow every `sync` option falls back to the environment the
//! runner provides (`INPUT_ELLX-URL`, `INPUT_GITHUB-TOKEN`, `GITHUB_REPOSITORY`,
//! `GITHUB_REF`, `GITHUB_SHA`, `GITHUB_API_URL`).

mod actions;
mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{scan::ScanArgs, sync::SyncArgs};

// ---------------------------------------------------------------------------
// CLI entry point
// ---------------------------------------------------------------------------

#[derive(Parser, Debug)]
#[command(
    name = "ellx-sync",
    version,
    about = "Synchronize a repository with the Ellx sync service",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Fingerprint the tree, negotiate the upload plan and upload changed files.
    Sync(SyncArgs),

    /// Print the fingerprint of every file that would be synced.
    Scan(ScanArgs),
}

// ---------------------------------------------------------------------------
// Main
// ---------------------------------------------------------------------------

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Sync(args) => args.run().await,
        Commands::Scan(args) => args.run(),
    };
    if let Err(err) = &result {
        actions::set_failed(err);
    }
    result
}

fn init_tracing() {
    use tracing_subscriber::{fmt, EnvFilter};

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
