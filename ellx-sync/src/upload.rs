//! Upload executor — PUTs every planned file to its upload URL concurrently.
//!
//! All uploads are launched at once and awaited together. A failing upload
//! never cancels its siblings; failures are collected per file and turned into
//! a single [`SyncError::Upload`] by [`summarize`].

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use futures::future::join_all;
use reqwest::header::{CACHE_CONTROL, CONTENT_TYPE};
use reqwest::Client;

use ellx_core::{content_type_for, display_path, FileRecord, UploadResult, UploadTarget};

use crate::error::SyncError;

/// Cache directive sent with every upload.
pub const CACHE_CONTROL_VALUE: &str = "max-age=31536000";

#[derive(Debug, Clone)]
pub struct Uploader {
    client: Client,
    root: PathBuf,
}

impl Uploader {
    pub fn new(client: Client, root: impl Into<PathBuf>) -> Self {
        Self {
            client,
            root: root.into(),
        }
    }

    /// Upload every plan entry, returning one result per entry in plan order.
    ///
    /// Entries whose path was not part of `scanned` are refused without
    /// touching the disk or the network.
    pub async fn upload(&self, plan: &[UploadTarget], scanned: &[FileRecord]) -> Vec<UploadResult> {
        let known: HashSet<&str> = scanned.iter().map(|r| r.path.as_str()).collect();
        let known = &known;
        let uploads = plan.iter().map(|target| async move {
            if known.contains(target.path.as_str()) {
                self.upload_one(target).await
            } else {
                tracing::warn!("refusing to upload {}: not in scanned file set", target.path);
                UploadResult::failed(&target.path, "not in scanned file set")
            }
        });
        join_all(uploads).await
    }

    async fn upload_one(&self, target: &UploadTarget) -> UploadResult {
        let local = local_path(&self.root, &target.path);
        let body = match tokio::fs::read(&local).await {
            Ok(bytes) => bytes,
            Err(e) => {
                return UploadResult::failed(
                    &target.path,
                    format!("failed to read {}: {e}", local.display()),
                )
            }
        };

        let response = self
            .client
            .put(&target.upload_url)
            .header(CONTENT_TYPE, content_type_for(&target.path))
            .header(CACHE_CONTROL, CACHE_CONTROL_VALUE)
            .body(body)
            .send()
            .await;

        match response {
            Ok(res) if res.status().is_success() => {
                tracing::debug!("uploaded: {}", target.path);
                UploadResult::ok(&target.path)
            }
            Ok(res) => {
                let status = res.status();
                tracing::warn!("upload of {} returned {status}", target.path);
                UploadResult::failed(
                    &target.path,
                    format!("{} {}", status.as_u16(), status.canonical_reason().unwrap_or("")),
                )
            }
            Err(e) => {
                tracing::warn!("upload of {} failed: {e}", target.path);
                UploadResult::failed(&target.path, e.to_string())
            }
        }
    }
}

/// Collapse per-file results: the uploaded paths (leading `/` stripped) when
/// every upload succeeded, otherwise an error naming the first failure.
pub fn summarize(results: &[UploadResult]) -> Result<Vec<String>, SyncError> {
    let failed: Vec<&UploadResult> = results.iter().filter(|r| !r.success).collect();
    if let Some(first) = failed.first() {
        return Err(SyncError::Upload {
            path: first.path.clone(),
            status_text: first.status_text.clone().unwrap_or_default(),
            failed: failed.len(),
            total: results.len(),
        });
    }
    Ok(results
        .iter()
        .map(|r| display_path(&r.path).to_owned())
        .collect())
}

fn local_path(root: &Path, server_path: &str) -> PathBuf {
    root.join(display_path(server_path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::build_client;
    use tempfile::TempDir;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn record(path: &str) -> FileRecord {
        FileRecord {
            path: path.into(),
            hash: "h".into(),
        }
    }

    #[tokio::test]
    async fn uploads_planned_files_and_refuses_unscanned_ones() {
        let server = MockServer::start().await;
        let work = TempDir::new().unwrap();
        std::fs::write(work.path().join("a.ellx"), "x = 1").unwrap();
        Mock::given(method("PUT"))
            .and(path("/u/a"))
            .and(header("content-type", "text/javascript"))
            .and(header("cache-control", CACHE_CONTROL_VALUE))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        let plan = vec![
            UploadTarget {
                path: "/a.ellx".into(),
                upload_url: format!("{}/u/a", server.uri()),
            },
            UploadTarget {
                path: "/../secret".into(),
                upload_url: format!("{}/u/b", server.uri()),
            },
        ];
        let uploader = Uploader::new(build_client().unwrap(), work.path());
        let results = uploader.upload(&plan, &[record("/a.ellx")]).await;

        assert_eq!(results[0], UploadResult::ok("/a.ellx"));
        assert_eq!(
            results[1],
            UploadResult::failed("/../secret", "not in scanned file set")
        );
    }

    #[test]
    fn summarize_lists_paths_in_plan_order() {
        let results = vec![UploadResult::ok("/b.md"), UploadResult::ok("/a/c.js")];
        assert_eq!(summarize(&results).unwrap(), vec!["b.md", "a/c.js"]);
    }

    #[test]
    fn summarize_empty_is_success() {
        assert!(summarize(&[]).unwrap().is_empty());
    }

    #[test]
    fn summarize_names_first_failure() {
        let results = vec![
            UploadResult::ok("/a.js"),
            UploadResult::failed("/b.js", "500 Internal Server Error"),
            UploadResult::failed("/c.js", "403 Forbidden"),
        ];
        match summarize(&results).unwrap_err() {
            SyncError::Upload {
                path,
                status_text,
                failed,
                total,
            } => {
                assert_eq!(path, "/b.js");
                assert_eq!(status_text, "500 Internal Server Error");
                assert_eq!(failed, 2);
                assert_eq!(total, 3);
            }
            other => panic!("expected upload error, got {other:?}"),
        }
    }

    #[test]
    fn local_path_is_relative_to_root() {
        let root = Path::new("/work/repo");
        assert_eq!(
            local_path(root, "/src/a.js"),
            PathBuf::from("/work/repo/src/a.js")
        );
    }
}
