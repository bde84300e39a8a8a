//! Domain types for repository synchronization.
//!
//! Wire structs serialize with the camelCase field names the sync service
//! expects; optional commit pointers are omitted rather than sent empty.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Newtypes
// ---------------------------------------------------------------------------

/// A repository identity of the form `owner/name`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RepoSlug(String);

impl FromStr for RepoSlug {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        match trimmed.split_once('/') {
            Some((owner, name))
                if !owner.is_empty() && !name.is_empty() && !name.contains('/') =>
            {
                Ok(Self(trimmed.to_owned()))
            }
            _ => Err(CoreError::InvalidRepo(s.to_owned())),
        }
    }
}

impl fmt::Display for RepoSlug {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

// ---------------------------------------------------------------------------
// Fingerprints
// ---------------------------------------------------------------------------

/// One tracked file: its server path (leading `/`, forward slashes) and
/// content digest.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FileRecord {
    pub path: String,
    pub hash: String,
}

// ---------------------------------------------------------------------------
// Source-control state
// ---------------------------------------------------------------------------

/// Access classification mirrored into the sync request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Acl {
    Public,
    Private,
}

impl Acl {
    pub fn from_private(private: bool) -> Self {
        if private {
            Acl::Private
        } else {
            Acl::Public
        }
    }
}

impl fmt::Display for Acl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Acl::Public => write!(f, "public"),
            Acl::Private => write!(f, "private"),
        }
    }
}

/// Snapshot of repository metadata, fetched once per run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoMeta {
    pub visibility: Acl,
    pub description: Option<String>,
}

/// Namespace of a git ref.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RefKind {
    Heads,
    Tags,
}

impl RefKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            RefKind::Heads => "heads",
            RefKind::Tags => "tags",
        }
    }
}

impl fmt::Display for RefKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A git ref split into its namespace and short name.
///
/// `refs/heads/main` → (`Heads`, `main`); `refs/tags/v1` → (`Tags`, `v1`).
/// A name without a `refs/` prefix is taken to be a branch.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RefName {
    pub kind: RefKind,
    pub short: String,
}

impl RefName {
    /// Fully-qualified form, e.g. `refs/heads/main`.
    pub fn full(&self) -> String {
        format!("refs/{}/{}", self.kind, self.short)
    }
}

impl FromStr for RefName {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        let (kind, short) = if let Some(rest) = s.strip_prefix("refs/heads/") {
            (RefKind::Heads, rest)
        } else if let Some(rest) = s.strip_prefix("refs/tags/") {
            (RefKind::Tags, rest)
        } else {
            (RefKind::Heads, s)
        };
        if short.is_empty() {
            return Err(CoreError::EmptyRef);
        }
        Ok(Self {
            kind,
            short: short.to_owned(),
        })
    }
}

/// A named ref and the commit it points to, if the ref exists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RefPointer {
    pub ref_name: String,
    pub commit_sha: Option<String>,
}

// ---------------------------------------------------------------------------
// Negotiation wire format
// ---------------------------------------------------------------------------

/// Body of the negotiate call. Sent once per run.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncRequest {
    pub repo: RepoSlug,
    pub token: String,
    pub acl: Acl,
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_sha: Option<String>,
    pub tag_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub current_sha: Option<String>,
    pub files: Vec<FileRecord>,
}

impl fmt::Debug for SyncRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncRequest")
            .field("repo", &self.repo)
            .field("token", &"<redacted>")
            .field("acl", &self.acl)
            .field("description", &self.description)
            .field("target_sha", &self.target_sha)
            .field("tag_name", &self.tag_name)
            .field("current_sha", &self.current_sha)
            .field("files", &self.files.len())
            .finish()
    }
}

/// One entry of the upload plan returned by the sync service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadTarget {
    pub path: String,
    pub upload_url: String,
}

/// Outcome of uploading one plan entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadResult {
    pub path: String,
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_text: Option<String>,
}

impl UploadResult {
    pub fn ok(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: true,
            status_text: None,
        }
    }

    pub fn failed(path: impl Into<String>, status_text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            success: false,
            status_text: Some(status_text.into()),
        }
    }
}
