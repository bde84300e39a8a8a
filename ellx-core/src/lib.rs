//! ellx-sync core library — domain types, naming rules, errors.
//!
//! Public API surface:
//! - [`types`] — newtypes and wire structs exchanged with the sync service
//! - [`naming`] — sync tag derivation, negotiate paths, content types
//! - [`error`] — [`CoreError`]

pub mod error;
pub mod naming;
pub mod types;

pub use error::CoreError;
pub use naming::{
    content_type_for, derive_tag_and_suffix, display_path, negotiate_path, server_path, TagNaming,
};
pub use types::{
    Acl, FileRecord, RefKind, RefName, RefPointer, RepoMeta, RepoSlug, SyncRequest, UploadResult,
    UploadTarget,
};
