use std::collections::HashMap;
use std::fs;
use std::path::Path;

use crate::error::Result;
use crate::response::{Fetched, Response};

/// Load test HTML fixture by name
pub fn load_html_fixture(fixture_name: &str) -> String {
    let path = Path::new("src/tests/fixtures").join(format!("{}.html", fixture_name));
    fs::read_to_string(path)
        .unwrap_or_else(|_| panic!("Failed to load test fixture: {}", fixture_name))
}

/// A fake site serving `pages` as HTML, 404 for anything else.
pub fn site(pages: &[(&str, &str)]) -> impl FnMut(&str) -> Result<Fetched> {
    let pages: HashMap<String, String> = pages
        .iter()
        .map(|(url, body)| (url.to_string(), body.to_string()))
        .collect();

    move |url: &str| {
        let response = match pages.get(url) {
            Some(body) => Response::html(body.as_bytes()),
            None => Response::new(404, "text/html; charset=utf-8", "<h1>Not Found</h1>"),
        };
        Ok(response.into())
    }
}

/// Page body made of one `href` per line.
pub fn links_page(links: &[&str]) -> String {
    links
        .iter()
        .map(|link| format!("href=\"{}\"", link))
        .collect::<Vec<_>>()
        .join("\n")
}
