//! Helpers to turn `href` attributes into site paths worth crawling.

use regex::bytes::Regex;

use crate::error::Result;

/// Remove the query parameters named in `names`, dropping the `?` when no
/// parameter is left.
pub fn strip_parameters<S: AsRef<str>>(names: &[S], url: &str) -> String {
    let (path, query) = match url.split_once('?') {
        Some(parts) => parts,
        None => return url.to_string(),
    };

    let kept: Vec<&str> = query
        .split('&')
        .filter(|pair| !pair.is_empty())
        .filter(|pair| {
            let key = pair.split_once('=').map_or(*pair, |(key, _)| key);
            !names.iter().any(|name| name.as_ref() == key)
        })
        .collect();

    if kept.is_empty() {
        path.to_string()
    } else {
        format!("{}?{}", path, kept.join("&"))
    }
}

/// Turn an absolute URL on `host` into a site path, leave anything else.
pub fn strip_host<'a>(host: &str, url: &'a str) -> &'a str {
    if host.is_empty() {
        return url;
    }
    match url.strip_prefix(host) {
        Some("") => "/",
        Some(rest) if rest.starts_with('/') => rest,
        _ => url,
    }
}

pub fn is_static(static_url: &str, url: &str) -> bool {
    !static_url.is_empty() && url.starts_with(static_url)
}

/// Finds site paths in the `href` attributes of a page.
#[derive(Debug, Clone)]
pub struct LinkFinder {
    href: Regex,
    host: String,
}

impl LinkFinder {
    pub fn new(host: &str) -> Result<Self> {
        Ok(LinkFinder {
            href: Regex::new(r#"href\s*=\s*["']([^"']*)["']"#)?,
            host: host.trim_end_matches('/').to_string(),
        })
    }

    /// Site paths in document order. Fragments are dropped; external,
    /// protocol-relative and relative links are ignored.
    pub fn find(&self, content: &[u8]) -> Vec<String> {
        let mut links = Vec::new();
        for captures in self.href.captures_iter(content) {
            let raw = String::from_utf8_lossy(&captures[1]).replace("&amp;", "&");
            let link = strip_host(&self.host, &raw);
            let link = link.split('#').next().unwrap_or_default();

            if link.starts_with('/') && !link.starts_with("//") {
                links.push(link.to_string());
            }
        }
        links
    }
}
