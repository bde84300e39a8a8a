//! Fingerprint scanner — walks the sync root and hashes every regular file.
//!
//! The version-control metadata entry (`.git` directly under the root, file or
//! directory) is pruned. Everything else, dotfiles included, is fingerprinted.
//! Records come back sorted by server path so logs are reproducible.

use std::path::Path;

use sha2::{Digest, Sha256};
use walkdir::{DirEntry, WalkDir};

use ellx_core::{server_path, FileRecord};

use crate::error::{io_err, SyncError};

/// Name of the VCS metadata entry excluded from every scan.
pub const VCS_DIR: &str = ".git";

/// Scan `root` and return one [`FileRecord`] per regular file.
pub fn scan(root: &Path) -> Result<Vec<FileRecord>, SyncError> {
    let walker = WalkDir::new(root)
        .sort_by_file_name()
        .into_iter()
        .filter_entry(|entry| !is_vcs_entry(entry));

    let mut records = Vec::new();
    for entry in walker {
        let entry = entry.map_err(|err| {
            let path = err
                .path()
                .map(Path::to_path_buf)
                .unwrap_or_else(|| root.to_path_buf());
            io_err(path, err.into())
        })?;
        if !entry.file_type().is_file() {
            continue;
        }

        let relative = entry
            .path()
            .strip_prefix(root)
            .map_err(|_| io_err(entry.path(), std::io::Error::other("path escapes scan root")))?;
        let path = server_path(relative).map_err(|e| {
            io_err(
                entry.path(),
                std::io::Error::new(std::io::ErrorKind::InvalidData, e),
            )
        })?;
        let bytes = std::fs::read(entry.path()).map_err(|e| io_err(entry.path(), e))?;
        let record = FileRecord {
            path,
            hash: fingerprint(&bytes),
        };
        tracing::debug!("scanned: {} {}", record.path, record.hash);
        records.push(record);
    }

    records.sort_by(|a, b| a.path.cmp(&b.path));
    Ok(records)
}

/// Hex SHA-256 of raw file bytes.
pub fn fingerprint(bytes: &[u8]) -> String {
    let mut h = Sha256::new();
    h.update(bytes);
    hex::encode(h.finalize())
}

fn is_vcs_entry(entry: &DirEntry) -> bool {
    entry.depth() == 1 && entry.file_name() == VCS_DIR
}
