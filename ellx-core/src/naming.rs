//! Naming rules shared by the negotiator and the uploader.
//!
//! Every synced ref gets a marker tag `ellx-sync/<short name>`. Branches
//! named `release/<version>` additionally negotiate against the
//! `@<version>` sub-path of the sync endpoint.

use std::path::{Component, Path};

use crate::error::CoreError;
use crate::types::{RefName, RepoSlug};

/// Prefix of the marker tag recording the last synced commit of a ref.
pub const SYNC_TAG_PREFIX: &str = "ellx-sync/";

const RELEASE_PREFIX: &str = "release/";

/// Tag name and optional negotiate URL suffix derived from a ref.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagNaming {
    pub tag_name: String,
    pub url_suffix: Option<String>,
}

/// Derive the sync tag and release suffix for a ref.
///
/// | ref                      | tag                     | suffix |
/// |--------------------------|-------------------------|--------|
/// | `refs/heads/master`      | `ellx-sync/master`      | —      |
/// | `refs/heads/feature/x`   | `ellx-sync/feature/x`   | —      |
/// | `refs/heads/release/2.1` | `ellx-sync/release/2.1` | `2.1`  |
/// | `refs/tags/v1`           | `ellx-sync/v1`          | —      |
///
/// The release version must be a single non-empty path segment.
pub fn derive_tag_and_suffix(git_ref: &RefName) -> TagNaming {
    let url_suffix = git_ref
        .short
        .strip_prefix(RELEASE_PREFIX)
        .filter(|version| !version.is_empty() && !version.contains('/'))
        .map(str::to_owned);

    TagNaming {
        tag_name: format!("{SYNC_TAG_PREFIX}{}", git_ref.short),
        url_suffix,
    }
}

/// Path of the negotiate call: `/sync/{owner}/{name}[@{suffix}]`.
pub fn negotiate_path(repo: &RepoSlug, url_suffix: Option<&str>) -> String {
    match url_suffix {
        Some(suffix) => format!("/sync/{repo}@{suffix}"),
        None => format!("/sync/{repo}"),
    }
}

/// `Content-Type` for an uploaded file, chosen by suffix. A bare `/.js` counts
/// as script too.
pub fn content_type_for(path: &str) -> &'static str {
    if path.ends_with(".js") || path.ends_with(".ellx") {
        "text/javascript"
    } else {
        "text/plain"
    }
}

/// Server form of a path relative to the sync root: forward slashes and a
/// single leading `/`.
///
/// Names that are not valid UTF-8 are rejected; a lossy conversion would
/// collapse distinct files onto one server path.
pub fn server_path(relative: &Path) -> Result<String, CoreError> {
    let mut out = String::new();
    for component in relative.components() {
        if let Component::Normal(part) = component {
            let part = part
                .to_str()
                .ok_or_else(|| CoreError::NonUtf8Path(relative.to_path_buf()))?;
            out.push('/');
            out.push_str(part);
        }
    }
    if out.is_empty() {
        out.push('/');
    }
    Ok(out)
}

/// Server path without its leading `/`, as shown in reports.
pub fn display_path(server_path: &str) -> &str {
    server_path.strip_prefix('/').unwrap_or(server_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case("refs/heads/master", "ellx-sync/master", None)]
    #[case("refs/heads/feature/x", "ellx-sync/feature/x", None)]
    #[case("refs/heads/release/2.1", "ellx-sync/release/2.1", Some("2.1"))]
    #[case("refs/heads/release/", "ellx-sync/release/", None)]
    #[case("refs/heads/release/2.1/hotfix", "ellx-sync/release/2.1/hotfix", None)]
    #[case("refs/heads/releases/3", "ellx-sync/releases/3", None)]
    #[case("refs/tags/v1", "ellx-sync/v1", None)]
    #[case("main", "ellx-sync/main", None)]
    fn tag_and_suffix(#[case] git_ref: &str, #[case] tag: &str, #[case] suffix: Option<&str>) {
        let parsed: RefName = git_ref.parse().unwrap();
        let naming = derive_tag_and_suffix(&parsed);
        assert_eq!(naming.tag_name, tag);
        assert_eq!(naming.url_suffix.as_deref(), suffix);
    }

    #[test]
    fn negotiate_path_appends_release_suffix() {
        let repo: RepoSlug = "o/r".parse().unwrap();
        assert_eq!(negotiate_path(&repo, None), "/sync/o/r");
        assert_eq!(negotiate_path(&repo, Some("2.1")), "/sync/o/r@2.1");
    }

    #[rstest]
    #[case("a.js", "text/javascript")]
    #[case("/deep/dir/a.ellx", "text/javascript")]
    #[case("a.md", "text/plain")]
    #[case("a.png", "text/plain")]
    #[case("Makefile", "text/plain")]
    #[case("/.js", "text/javascript")]
    #[case("/.ellx", "text/javascript")]
    #[case("/.md", "text/plain")]
    #[case("/a.json", "text/plain")]
    fn content_types(#[case] path: &str, #[case] expected: &str) {
        assert_eq!(content_type_for(path), expected);
    }

    #[test]
    fn server_path_has_single_leading_slash() {
        assert_eq!(server_path(Path::new("a.js")).unwrap(), "/a.js");
        assert_eq!(
            server_path(Path::new("./src/lib/b.md")).unwrap(),
            "/src/lib/b.md"
        );
        assert_eq!(display_path("/src/lib/b.md"), "src/lib/b.md");
    }

    #[test]
    #[cfg(unix)]
    fn server_path_rejects_non_utf8_names() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let name = Path::new(OsStr::from_bytes(b"dir/a\xff.js"));
        assert_eq!(
            server_path(name),
            Err(CoreError::NonUtf8Path(name.to_path_buf()))
        );
    }
}
