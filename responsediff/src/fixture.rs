//! Fixture store: write a response to disk the first time it is seen, diff
//! it against what was written on every later run.
//!
//! ```no_run
//! use responsediff::{Fixture, Response};
//!
//! let response = Response::html("<h1>Home</h1>");
//! let fixture = Fixture::for_test("tests", "views::test_home", None);
//! fixture.assert_no_diff(&response, Some("h1")).unwrap();
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use log::{debug, warn};
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use serde_json::{Serializer, Value};

use crate::diff::diff;
use crate::error::{Error, Result};
use crate::identity::FixtureIdentity;
use crate::report::Comparison;
use crate::response::Response;
use crate::select::select_html;

/// Key-value data stored next to the content, sorted by key.
pub type Metadata = BTreeMap<String, Value>;

/// Suffix of the dump files handed to `diff`.
const DUMP_SUFFIX: &str = "_responsediff";

/// Serialize metadata the same way on every run: sorted keys, four spaces
/// of indentation, no trailing newline.
pub fn serialize_metadata(metadata: &Metadata) -> Result<Vec<u8>> {
    let mut buf = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
    metadata.serialize(&mut serializer)?;
    Ok(buf)
}

/// What the current run produced for one fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Capture {
    pub content: Vec<u8>,
    pub metadata: Metadata,
}

impl Capture {
    /// Capture `response`, adding its status code and redirect location to
    /// the caller's `metadata`.
    ///
    /// With a selector, an HTML body that was not streamed is reduced to the
    /// matching elements.
    pub fn new(response: &Response, mut metadata: Metadata, selector: Option<&str>) -> Result<Self> {
        metadata.insert("status_code".to_string(), Value::from(response.status));
        if let Some(location) = &response.location {
            metadata.insert("Location".to_string(), Value::from(location.as_str()));
        }

        let content = match selector {
            Some(selector) if response.is_html() && !response.is_streaming() => {
                let html = String::from_utf8_lossy(&response.content()).into_owned();
                select_html(&html, selector)?.into_bytes()
            }
            _ => response.content().into_owned(),
        };

        Ok(Capture { content, metadata })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fixture {
    identity: FixtureIdentity,
}

impl Fixture {
    pub fn new(identity: FixtureIdentity) -> Self {
        Fixture { identity }
    }

    /// See [`FixtureIdentity::for_test`].
    pub fn for_test(dir: impl AsRef<Path>, test_name: &str, url: Option<&str>) -> Self {
        Fixture::new(FixtureIdentity::for_test(dir, test_name, url))
    }

    pub fn identity(&self) -> &FixtureIdentity {
        &self.identity
    }

    pub fn content_path(&self) -> PathBuf {
        self.identity.content_path()
    }

    pub fn metadata_path(&self) -> PathBuf {
        self.identity.metadata_path()
    }

    pub fn compare(
        &self,
        response: &Response,
        metadata: Metadata,
        selector: Option<&str>,
    ) -> Result<Comparison> {
        let capture = Capture::new(response, metadata, selector)?;
        self.compare_capture(&capture)
    }

    /// Create missing artifacts, or diff existing ones against `capture`.
    ///
    /// Artifacts already on disk are never rewritten. Diffs only run when
    /// both artifacts existed before this call.
    pub fn compare_capture(&self, capture: &Capture) -> Result<Comparison> {
        let content_path = self.content_path();
        let metadata_path = self.metadata_path();
        if let Some(parent) = content_path.parent() {
            fs::create_dir_all(parent)?;
        }

        let metadata = serialize_metadata(&capture.metadata)?;
        let artifacts = [
            (content_path, capture.content.as_slice()),
            (metadata_path, metadata.as_slice()),
        ];

        let mut comparison = Comparison::default();
        for (path, value) in &artifacts {
            if !path.exists() {
                fs::write(path, value)?;
                warn!("Created fixture {}", path.display());
                comparison
                    .created
                    .insert(path.display().to_string(), value.to_vec());
            }
        }
        if !comparison.created.is_empty() {
            return Ok(comparison);
        }

        for (path, value) in &artifacts {
            let dump_path = dump(value)?;
            let (command, output) = diff(path, &dump_path)?;
            if output.is_empty() {
                debug!("No diff for {}", path.display());
            } else {
                warn!("Diff found for {}", path.display());
                comparison.diffs.insert(command, output);
            }
        }

        Ok(comparison)
    }

    /// Fail with every creation and diff at once.
    pub fn assert_no_diff(&self, response: &Response, selector: Option<&str>) -> Result<()> {
        self.compare(response, Metadata::new(), selector)?
            .into_result()
    }

    /// Fail with the first problem found: a created fixture, then a changed
    /// status code, then a diff.
    pub fn check(&self, response: &Response) -> Result<()> {
        let comparison = self.compare(response, Metadata::new(), None)?;
        if !comparison.created.is_empty() {
            return Err(Error::FixtureCreated {
                paths: comparison.created.into_keys().collect(),
            });
        }

        let stored: Metadata = serde_json::from_slice(&fs::read(self.metadata_path())?)?;
        if let Some(expected) = stored.get("status_code").and_then(Value::as_u64) {
            if expected != u64::from(response.status) {
                return Err(Error::UnexpectedStatusCode {
                    expected: expected as u16,
                    actual: response.status,
                });
            }
        }

        match comparison.diffs.into_iter().next() {
            Some((command, output)) => Err(Error::DiffFound { command, output }),
            None => Ok(()),
        }
    }
}

/// Write `value` to a fresh temporary file that is left behind for
/// inspection.
fn dump(value: &[u8]) -> Result<PathBuf> {
    let mut file = tempfile::Builder::new().suffix(DUMP_SUFFIX).tempfile()?;
    file.write_all(value)?;
    file.flush()?;
    let path = file.into_temp_path().keep().map_err(io::Error::from)?;
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_metadata_is_sorted_and_indented() {
        let mut metadata = Metadata::new();
        metadata.insert("status_code".to_string(), json!(200));
        metadata.insert("Location".to_string(), json!("/next/"));
        metadata.insert("query_count".to_string(), json!(3));

        let serialized = serialize_metadata(&metadata).unwrap();
        assert_eq!(
            String::from_utf8(serialized).unwrap(),
            "{\n    \"Location\": \"/next/\",\n    \"query_count\": 3,\n    \"status_code\": 200\n}"
        );
    }

    #[test]
    fn test_capture_adds_status_and_location() {
        let response = Response::redirect(302, "/login/");
        let capture = Capture::new(&response, Metadata::new(), None).unwrap();
        assert_eq!(capture.metadata["status_code"], json!(302));
        assert_eq!(capture.metadata["Location"], json!("/login/"));
        assert!(capture.content.is_empty());
    }

    #[test]
    fn test_capture_selector_only_applies_to_html() {
        let json = Response::new(200, "application/json", r#"{"h1": 1}"#);
        let capture = Capture::new(&json, Metadata::new(), Some("h1")).unwrap();
        assert_eq!(capture.content, br#"{"h1": 1}"#.to_vec());

        let page = Response::html("<div><h1>Title</h1></div>");
        let capture = Capture::new(&page, Metadata::new(), Some("h1")).unwrap();
        assert_eq!(capture.content, b"<h1>Title</h1>".to_vec());
    }

    #[test]
    fn test_capture_selector_skips_streaming() {
        let response = Response::streaming(
            200,
            "text/html",
            vec![b"<h1>a</h1>".to_vec(), b"<p>b</p>".to_vec()],
        );
        let capture = Capture::new(&response, Metadata::new(), Some("h1")).unwrap();
        assert_eq!(capture.content, b"<h1>a</h1>\n<p>b</p>".to_vec());
    }
}
