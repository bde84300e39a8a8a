//! Error types for ellx-sync.

use std::path::PathBuf;

use thiserror::Error;

use ellx_core::CoreError;

/// All errors that can arise from a sync run.
#[derive(Debug, Error)]
pub enum SyncError {
    /// Local filesystem unreadable, with annotated path for context.
    #[error("I/O error at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A source-control or sync-service call returned a non-success status.
    #[error("{method} {url} failed: {status} {status_text}{}", payload_suffix(.payload))]
    Remote {
        method: String,
        url: String,
        status: u16,
        status_text: String,
        payload: Option<String>,
    },

    /// One or more planned uploads failed after a successful negotiation.
    #[error("upload failed for {path}: {status_text} ({failed} of {total} uploads failed)")]
    Upload {
        path: String,
        status_text: String,
        failed: usize,
        total: usize,
    },

    /// The request never produced a response (DNS, TLS, connection reset...).
    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// A response body was not the JSON shape expected.
    #[error("unexpected response from {url}: {source}")]
    Decode {
        url: String,
        #[source]
        source: serde_json::Error,
    },

    /// Invalid configuration value (header, base URL...).
    #[error("configuration error: {0}")]
    Config(String),

    #[error(transparent)]
    Core(#[from] CoreError),
}

fn payload_suffix(payload: &Option<String>) -> String {
    match payload {
        Some(body) => format!(": {body}"),
        None => String::new(),
    }
}

/// Convenience constructor for [`SyncError::Io`].
pub(crate) fn io_err(path: impl Into<PathBuf>, source: std::io::Error) -> SyncError {
    SyncError::Io {
        path: path.into(),
        source,
    }
}
