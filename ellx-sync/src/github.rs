//! Source-control client — repository metadata and ref lookups against the
//! GitHub REST API, authenticated with a bearer token.

use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION};
use reqwest::Client;
use serde::Deserialize;

use ellx_core::{Acl, RefName, RefPointer, RepoMeta, RepoSlug};

use crate::error::SyncError;
use crate::http::ApiClient;

pub const DEFAULT_API_URL: &str = "https://api.github.com";

#[derive(Debug, Deserialize)]
struct RepoResponse {
    #[serde(default)]
    private: bool,
    description: Option<String>,
}

#[derive(Debug, Deserialize)]
struct RefResponse {
    #[serde(rename = "ref")]
    ref_name: String,
    object: RefObject,
}

#[derive(Debug, Deserialize)]
struct RefObject {
    sha: String,
}

#[derive(Debug, Clone)]
pub struct GitHubClient {
    api: ApiClient,
}

impl GitHubClient {
    pub fn new(client: Client, api_url: &str, token: &str) -> Result<Self, SyncError> {
        let mut bearer = HeaderValue::from_str(&format!("Bearer {token}"))
            .map_err(|_| SyncError::Config("token contains invalid header characters".into()))?;
        bearer.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(ACCEPT, HeaderValue::from_static("application/vnd.github+json"));

        Ok(Self {
            api: ApiClient::new(client, api_url, headers),
        })
    }

    /// `GET /repos/{repo}`
    pub async fn repo_meta(&self, repo: &RepoSlug) -> Result<RepoMeta, SyncError> {
        let res: RepoResponse = self.api.get(&format!("/repos/{repo}")).await?;
        Ok(RepoMeta {
            visibility: Acl::from_private(res.private),
            description: res.description,
        })
    }

    /// `GET /repos/{repo}/git/matching-refs/{kind}/{short}`
    ///
    /// The endpoint matches by prefix, so `heads/main` also returns
    /// `heads/main-old`. Only the exact ref counts; no exact match means the
    /// ref does not exist.
    pub async fn matching_ref(
        &self,
        repo: &RepoSlug,
        git_ref: &RefName,
    ) -> Result<RefPointer, SyncError> {
        let refs: Vec<RefResponse> = self
            .api
            .get(&format!(
                "/repos/{repo}/git/matching-refs/{}/{}",
                git_ref.kind, git_ref.short
            ))
            .await?;
        let full = git_ref.full();
        let commit_sha = refs
            .into_iter()
            .find(|r| r.ref_name == full)
            .map(|r| r.object.sha);
        Ok(RefPointer {
            ref_name: full,
            commit_sha,
        })
    }
}
