use log::debug;
use reqwest::blocking::Client;
use reqwest::header::{HeaderName, CONTENT_TYPE, LOCATION};
use reqwest::redirect::Policy;

use crate::error::{Error, Result};
use crate::response::{Fetch, Fetched, Response};

/// Fetches site paths from a running server.
///
/// Redirects are not followed, so their `Location` ends up in the fixture.
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
    base_url: String,
}

impl HttpFetcher {
    pub fn new(base_url: &str) -> Result<Self> {
        let client = Client::builder().redirect(Policy::none()).build()?;
        Ok(HttpFetcher {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn url_for(&self, path: &str) -> String {
        if path.starts_with('/') {
            format!("{}{}", self.base_url, path)
        } else {
            format!("{}/{}", self.base_url, path)
        }
    }
}

impl Fetch for HttpFetcher {
    fn fetch(&mut self, path: &str) -> Result<Fetched> {
        let url = self.url_for(path);
        debug!("GET {}", url);

        let response = self.client.get(&url).send()?;
        let header = |name: HeaderName| {
            response
                .headers()
                .get(name)
                .and_then(|value| value.to_str().ok())
                .map(str::to_string)
        };
        let content_type = header(CONTENT_TYPE).unwrap_or_default();
        let location = header(LOCATION);
        let status = response.status().as_u16();

        let body = response
            .bytes()
            .map_err(|e| Error::Fetch(format!("{}: {}", url, e)))?;

        Ok(Response {
            location,
            ..Response::new(status, &content_type, body.to_vec())
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_url_for() {
        let fetcher = HttpFetcher::new("http://localhost:8000/").unwrap();
        assert_eq!(fetcher.base_url(), "http://localhost:8000");
        assert_eq!(fetcher.url_for("/a/?b=1"), "http://localhost:8000/a/?b=1");
        assert_eq!(fetcher.url_for("a"), "http://localhost:8000/a");
    }
}
