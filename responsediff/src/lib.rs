pub mod config;
pub mod crawl;
pub mod diff;
pub mod error;
pub mod fixture;
pub mod http;
pub mod identity;
pub mod redact;
pub mod report;
pub mod response;
pub mod select;
pub mod url;

// Scenario tests against fixture directories
#[cfg(test)]
pub mod tests;

// Re-export key types and functions for easier access
pub use crate::config::{CrawlConfig, Redaction};
pub use crate::crawl::{crawl, CrawlState, Crawler};
pub use crate::error::{Error, Result};
pub use crate::fixture::{Capture, Fixture, Metadata};
pub use crate::http::HttpFetcher;
pub use crate::identity::FixtureIdentity;
pub use crate::report::{Comparison, CrawlReport};
pub use crate::response::{Body, Fetch, Fetched, Response};
pub use crate::url::strip_parameters;
