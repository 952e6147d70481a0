//! Mapping from a test (and optionally a URL) to fixture paths on disk.

use std::path::{Path, PathBuf};

/// Directory created next to the tests to hold every fixture.
pub const FIXTURES_DIR: &str = "response_fixtures";

// https://docs.microsoft.com/en-us/windows/win32/fileio/naming-a-file#naming-conventions
const NOT_CROSSPLATFORM: &[char] = &['<', '>', ':', '"', '\\', '|', '?', '*'];

/// Strip characters that are not allowed in file names on every platform.
///
/// Characters are dropped rather than escaped, so two identities that only
/// differ by those characters share a fixture.
pub fn sanitize(value: &str) -> String {
    value.replace(NOT_CROSSPLATFORM, "")
}

/// Logical location of one fixture.
///
/// A path ending with `/` is a directory holding `content` and `metadata`;
/// any other path gets `.content` and `.metadata` siblings.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FixtureIdentity {
    path: String,
}

impl FixtureIdentity {
    pub fn new(path: impl Into<String>) -> Self {
        FixtureIdentity { path: path.into() }
    }

    /// Identity for a test, `test_name` being its full path such as
    /// `crate::views::tests::test_home`. Only the last two components are
    /// kept, joined by a dot.
    pub fn for_test(dir: impl AsRef<Path>, test_name: &str, url: Option<&str>) -> Self {
        let parts: Vec<&str> = test_name.split("::").filter(|p| !p.is_empty()).collect();
        let name = parts[parts.len().saturating_sub(2)..].join(".");

        let path = dir.as_ref().join(FIXTURES_DIR).join(name);
        let identity = FixtureIdentity::new(path.to_string_lossy());

        match url {
            Some(url) => identity.join_url(url),
            None => identity,
        }
    }

    /// Identity for `url` below this one, one path component per URL segment.
    pub fn join_url(&self, url: &str) -> Self {
        let mut path = self.path.trim_end_matches('/').to_string();
        for segment in url.split('/').filter(|s| !s.is_empty()) {
            path.push('/');
            path.push_str(segment);
        }
        if url.ends_with('/') {
            path.push('/');
        }
        FixtureIdentity { path }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn is_dir(&self) -> bool {
        self.path.ends_with('/')
    }

    pub fn content_path(&self) -> PathBuf {
        self.filesystem_path("content")
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.filesystem_path("metadata")
    }

    fn filesystem_path(&self, suffix: &str) -> PathBuf {
        let path = if self.is_dir() {
            format!("{}{}", self.path, suffix)
        } else {
            format!("{}.{}", self.path, suffix)
        };
        PathBuf::from(sanitize(&path))
    }
}
