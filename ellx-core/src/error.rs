//! Error types for ellx-core.

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised while parsing domain values from configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// Repository identity was not of the form `owner/name`.
    #[error("invalid repository '{0}'; expected owner/name")]
    InvalidRepo(String),

    /// Git ref was empty.
    #[error("git ref must not be empty")]
    EmptyRef,

    /// A file name cannot be expressed as a server path.
    #[error("path is not valid UTF-8: {}", .0.display())]
    NonUtf8Path(PathBuf),
}
