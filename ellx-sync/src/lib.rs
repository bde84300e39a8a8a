//! # ellx-sync
//!
//! Repository synchronization against the Ellx sync service.
//!
//! Call [`pipeline::run`] to fingerprint a working tree, negotiate the upload
//! plan and upload the stale files. The pieces are usable on their own:
//! [`scanner::scan`], [`github::GitHubClient`], [`ellx::EllxClient`] and
//! [`upload::Uploader`].

pub mod ellx;
pub mod error;
pub mod github;
pub mod http;
pub mod pipeline;
pub mod scanner;
pub mod upload;

pub use error::SyncError;
pub use pipeline::{run, Phase, SyncOptions, SyncReport};
