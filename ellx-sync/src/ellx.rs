//! Sync client — the negotiate call against the sync service.
//!
//! No transport-level auth: the token and repo identity travel in the
//! [`SyncRequest`] body.

use reqwest::header::HeaderMap;
use reqwest::Client;

use ellx_core::{negotiate_path, SyncRequest, UploadTarget};

use crate::error::SyncError;
use crate::http::ApiClient;

#[derive(Debug, Clone)]
pub struct EllxClient {
    api: ApiClient,
}

impl EllxClient {
    pub fn new(client: Client, base_url: &str) -> Self {
        Self {
            api: ApiClient::new(client, base_url, HeaderMap::new()),
        }
    }

    /// `PUT /sync/{repo}[@{suffix}]` — exchange fingerprints for the upload
    /// plan. The service alone decides which files are stale.
    pub async fn negotiate(
        &self,
        request: &SyncRequest,
        url_suffix: Option<&str>,
    ) -> Result<Vec<UploadTarget>, SyncError> {
        let path = negotiate_path(&request.repo, url_suffix);
        tracing::info!(
            "negotiating {} file(s) with {}{}",
            request.files.len(),
            self.api.base_url(),
            path
        );
        self.api.put(&path, request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ellx_core::{Acl, FileRecord};
    use serde_json::json;
    use wiremock::matchers::{body_json, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn request() -> SyncRequest {
        SyncRequest {
            repo: "o/r".parse().unwrap(),
            token: "t".into(),
            acl: Acl::Public,
            description: Some("d".into()),
            target_sha: Some("abc".into()),
            tag_name: "ellx-sync/release/2.1".into(),
            current_sha: None,
            files: vec![FileRecord {
                path: "/a.js".into(),
                hash: "h1".into(),
            }],
        }
    }

    #[tokio::test]
    async fn negotiate_puts_request_to_release_path() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/sync/o/r@2.1"))
            .and(body_json(json!({
                "repo": "o/r",
                "token": "t",
                "acl": "public",
                "description": "d",
                "targetSha": "abc",
                "tagName": "ellx-sync/release/2.1",
                "files": [{"path": "/a.js", "hash": "h1"}],
            })))
            .respond_with(
                ResponseTemplate::new(200)
                    .set_body_json(json!([{"path": "/a.js", "uploadUrl": "https://u/1"}])),
            )
            .expect(1)
            .mount(&server)
            .await;

        let client = EllxClient::new(crate::http::build_client().unwrap(), &server.uri());
        let plan = client.negotiate(&request(), Some("2.1")).await.unwrap();
        assert_eq!(
            plan,
            vec![UploadTarget {
                path: "/a.js".into(),
                upload_url: "https://u/1".into(),
            }]
        );
    }

    #[tokio::test]
    async fn negotiate_failure_surfaces_error_body() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path("/sync/o/r"))
            .respond_with(
                ResponseTemplate::new(403).set_body_json(json!({"error": "token rejected"})),
            )
            .mount(&server)
            .await;

        let client = EllxClient::new(crate::http::build_client().unwrap(), &server.uri());
        let err = client.negotiate(&request(), None).await.unwrap_err();
        assert!(matches!(err, SyncError::Remote { status: 403, .. }));
        assert!(err.to_string().contains("token rejected"), "{err}");
    }
}
