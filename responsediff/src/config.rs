use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Origin the test client uses when it renders absolute links.
pub const DEFAULT_TEST_HOST: &str = "http://testserver";

pub const DEFAULT_STATIC_URL: &str = "/static/";

/// A regular expression over response bodies and what to put instead.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redaction {
    pub pattern: String,
    pub replacement: String,
}

impl Redaction {
    pub fn new(pattern: &str, replacement: &str) -> Self {
        Redaction {
            pattern: pattern.to_string(),
            replacement: replacement.to_string(),
        }
    }
}

/// Redactions applied unless the configuration says otherwise.
pub fn default_redactions() -> Vec<Redaction> {
    vec![
        // Anti-forgery tokens in hidden inputs and meta tags
        Redaction::new(
            r#"(name=["'](?:csrfmiddlewaretoken|csrf[_-]?token|authenticity_token|_token)["']\s+(?:value|content)=["'])[^"']*"#,
            "${1}",
        ),
        // Anti-forgery cookie echoed into inline scripts
        Redaction::new(r#"(csrftoken=)[A-Za-z0-9]+"#, "${1}"),
        // Content hashes in bundled asset names: app.3f2a9c1d.js
        Redaction::new(r#"\.[0-9a-f]{8,20}(\.(?:js|css|map)\b)"#, "${1}"),
    ]
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CrawlConfig {
    /// Origin stripped from absolute links found in pages.
    pub test_host: String,
    /// Query parameters removed from every discovered link.
    pub strip_parameters: Vec<String>,
    /// Links under this prefix are not crawled.
    pub static_url: String,
    /// Pin fixtures of discovered pages to the elements matching this.
    pub selector: Option<String>,
    pub redactions: Vec<Redaction>,
    /// Stop with an error after this many pages.
    pub page_limit: Option<usize>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        CrawlConfig {
            test_host: DEFAULT_TEST_HOST.to_string(),
            strip_parameters: Vec::new(),
            static_url: DEFAULT_STATIC_URL.to_string(),
            selector: None,
            redactions: default_redactions(),
            page_limit: None,
        }
    }
}

impl CrawlConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let reader = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(reader)?)
    }
}
