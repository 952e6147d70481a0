use thiserror::Error;

use crate::report::Comparison;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    /// A fixture had to be written, so nothing was actually compared.
    #[error("Created fixture in {}", .paths.join(", "))]
    FixtureCreated { paths: Vec<String> },

    #[error("{}\n{}", .command, String::from_utf8_lossy(.output))]
    DiffFound { command: String, output: Vec<u8> },

    #[error("Expected status code {expected}, got {actual}")]
    UnexpectedStatusCode { expected: u16, actual: u16 },

    /// Every creation and diff collected by a comparison or a whole crawl.
    #[error("{0}")]
    DiffsFound(Comparison),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    #[error("{command} failed: {stderr}")]
    DiffTool { command: String, stderr: String },

    #[error("Crawl stopped after {0} pages")]
    PageLimit(usize),

    #[error("Fetch failed: {0}")]
    Fetch(String),

    #[error("Invalid redaction pattern: {0}")]
    Regex(#[from] regex::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Http(#[from] reqwest::Error),
}
