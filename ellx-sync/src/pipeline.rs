//! Sync pipeline entrypoint: scan → negotiate → upload → report.
//!
//! Any error ends the run. The three source-control lookups run concurrently
//! and all of them settle before a failure among them is acted on.

use std::fmt;
use std::path::PathBuf;
use std::time::Instant;

use ellx_core::{
    derive_tag_and_suffix, display_path, RefKind, RefName, RepoSlug, SyncRequest, UploadTarget,
};

use crate::ellx::EllxClient;
use crate::github::GitHubClient;
use crate::http::build_client;
use crate::upload::{summarize, Uploader};
use crate::{scanner, SyncError};

/// Everything a run needs, supplied by the invoking environment.
#[derive(Clone)]
pub struct SyncOptions {
    pub repo: RepoSlug,
    pub token: String,
    pub git_ref: RefName,
    /// Commit being synced; falls back to the ref's head when absent.
    pub sha: Option<String>,
    pub ellx_url: String,
    pub github_api_url: String,
    pub root: PathBuf,
    /// Negotiate but skip the upload phase.
    pub dry_run: bool,
}

impl fmt::Debug for SyncOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncOptions")
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .field("git_ref", &self.git_ref)
            .field("sha", &self.sha)
            .field("ellx_url", &self.ellx_url)
            .field("github_api_url", &self.github_api_url)
            .field("root", &self.root)
            .field("dry_run", &self.dry_run)
            .finish()
    }
}

/// Run phases, logged on entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Scanning,
    Negotiating,
    Uploading,
    Reporting,
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Phase::Scanning => "scanning",
            Phase::Negotiating => "negotiating",
            Phase::Uploading => "uploading",
            Phase::Reporting => "reporting",
        };
        f.write_str(name)
    }
}

/// Outcome of a successful run.
#[derive(Debug, Clone)]
pub struct SyncReport {
    pub repo: RepoSlug,
    pub tag_name: String,
    /// Number of files fingerprinted.
    pub scanned: usize,
    /// Plan returned by the sync service.
    pub plan: Vec<UploadTarget>,
    /// Uploaded paths without their leading `/`, in plan order. Empty in
    /// dry-run mode.
    pub uploaded: Vec<String>,
    pub dry_run: bool,
    pub duration_ms: u128,
}

impl SyncReport {
    /// Paths the plan asked for, without their leading `/`.
    pub fn planned_paths(&self) -> Vec<&str> {
        self.plan.iter().map(|t| display_path(&t.path)).collect()
    }
}

fn enter(phase: Phase) {
    tracing::info!(%phase, "entering phase");
}

/// Run one full synchronization.
pub async fn run(opts: &SyncOptions) -> Result<SyncReport, SyncError> {
    let started = Instant::now();

    enter(Phase::Scanning);
    let files = scanner::scan(&opts.root)?;
    tracing::info!("fingerprinted {} file(s) under {}", files.len(), opts.root.display());
    let scanned = files.len();

    enter(Phase::Negotiating);
    let naming = derive_tag_and_suffix(&opts.git_ref);
    let client = build_client()?;
    let github = GitHubClient::new(client.clone(), &opts.github_api_url, &opts.token)?;
    let sync_tag = RefName {
        kind: RefKind::Tags,
        short: naming.tag_name.clone(),
    };
    let (meta, head, tag) = tokio::join!(
        github.repo_meta(&opts.repo),
        github.matching_ref(&opts.repo, &opts.git_ref),
        github.matching_ref(&opts.repo, &sync_tag),
    );
    let (meta, head, tag) = (meta?, head?, tag?);
    tracing::info!(
        acl = %meta.visibility,
        head = head.commit_sha.as_deref().unwrap_or("-"),
        current = tag.commit_sha.as_deref().unwrap_or("-"),
        "resolved {} and {}",
        head.ref_name,
        tag.ref_name
    );

    let request = SyncRequest {
        repo: opts.repo.clone(),
        token: opts.token.clone(),
        acl: meta.visibility,
        description: meta.description,
        target_sha: opts.sha.clone().or(head.commit_sha),
        tag_name: naming.tag_name.clone(),
        current_sha: tag.commit_sha,
        files,
    };
    let ellx = EllxClient::new(client.clone(), &opts.ellx_url);
    let plan = ellx
        .negotiate(&request, naming.url_suffix.as_deref())
        .await?;
    tracing::info!("sync service requested {} upload(s)", plan.len());

    let results = if opts.dry_run {
        tracing::info!("[dry-run] skipping {} upload(s)", plan.len());
        Vec::new()
    } else {
        enter(Phase::Uploading);
        let uploader = Uploader::new(client, &opts.root);
        uploader.upload(&plan, &request.files).await
    };

    enter(Phase::Reporting);
    let uploaded = summarize(&results)?;

    Ok(SyncReport {
        repo: opts.repo.clone(),
        tag_name: naming.tag_name,
        scanned,
        plan,
        uploaded,
        dry_run: opts.dry_run,
        duration_ms: started.elapsed().as_millis(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn options_debug_redacts_token() {
        let opts = SyncOptions {
            repo: "o/r".parse().unwrap(),
            token: "ghs_secret".into(),
            git_ref: "refs/heads/main".parse().unwrap(),
            sha: None,
            ellx_url: "https://sync.example".into(),
            github_api_url: "https://api.example".into(),
            root: PathBuf::from("."),
            dry_run: false,
        };
        let rendered = format!("{opts:?}");
        assert!(!rendered.contains("ghs_secret"));
    }

    #[test]
    fn phases_display_lowercase() {
        assert_eq!(Phase::Negotiating.to_string(), "negotiating");
        assert_eq!(Phase::Reporting.to_string(), "reporting");
    }
}
