//! `ellx-sync sync` — fingerprint, negotiate and upload.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use colored::{ColoredString, Colorize};

use ellx_core::{RefName, RepoSlug};
use ellx_sync::github::DEFAULT_API_URL;
use ellx_sync::{SyncOptions, SyncReport};

/// Arguments for `ellx-sync sync`.
#[derive(Args, Debug)]
pub struct SyncArgs {
    /// Base URL of the Ellx sync service.
    #[arg(long, env = "INPUT_ELLX-URL")]
    pub ellx_url: String,

    /// Token for the source-control API; also forwarded to the sync service.
    #[arg(long, env = "INPUT_GITHUB-TOKEN", hide_env_values = true)]
    pub github_token: String,

    /// Repository to sync, as `owner/name`.
    #[arg(long, env = "GITHUB_REPOSITORY")]
    pub repo: RepoSlug,

    /// Ref being synced, e.g. `refs/heads/release/2.1`.
    #[arg(long = "ref", env = "GITHUB_REF")]
    pub git_ref: RefName,

    /// Commit being synced. Defaults to the current head of `--ref`.
    #[arg(long, env = "GITHUB_SHA")]
    pub sha: Option<String>,

    /// Base URL of the source-control REST API.
    #[arg(long, env = "GITHUB_API_URL", default_value = DEFAULT_API_URL)]
    pub github_api_url: String,

    /// Working tree to sync.
    #[arg(long, default_value = ".")]
    pub root: PathBuf,

    /// Negotiate the upload plan and print it without uploading anything.
    #[arg(long)]
    pub dry_run: bool,
}

impl SyncArgs {
    pub async fn run(self) -> Result<()> {
        let opts = SyncOptions {
            repo: self.repo,
            token: self.github_token,
            git_ref: self.git_ref,
            sha: self.sha.filter(|s| !s.is_empty()),
            ellx_url: self.ellx_url,
            github_api_url: self.github_api_url,
            root: self.root,
            dry_run: self.dry_run,
        };

        let report = ellx_sync::run(&opts)
            .await
            .with_context(|| format!("sync failed for '{}'", opts.repo))?;
        print_report(&report);
        Ok(())
    }
}

fn print_report(report: &SyncReport) {
    if report.dry_run {
        let planned = report.planned_paths();
        println!(
            "[dry-run] {} '{}' → {}: {} of {} file(s) would be uploaded",
            check_mark(),
            report.repo,
            report.tag_name,
            planned.len(),
            report.scanned
        );
        for path in planned {
            println!("  ~  {path}");
        }
        return;
    }

    if report.uploaded.is_empty() {
        println!(
            "{} '{}' is up to date ({} file(s) checked)",
            check_mark(),
            report.repo,
            report.scanned
        );
        return;
    }

    println!(
        "{} Synced following files successfully ({} of {} in {} ms):",
        check_mark(),
        report.uploaded.len(),
        report.scanned,
        report.duration_ms
    );
    for path in &report.uploaded {
        println!("  ✎  {path}");
    }
}

fn check_mark() -> ColoredString {
    "✓".green().bold()
}
