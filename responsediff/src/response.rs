use std::borrow::Cow;

use crate::error::Result;
use crate::fixture::Metadata;

#[derive(Debug, Clone, PartialEq)]
pub enum Body {
    Bytes(Vec<u8>),
    /// Body produced chunk by chunk, which has no links worth following.
    Streaming(Vec<Vec<u8>>),
}

/// The parts of an HTTP response that end up in a fixture.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub status: u16,
    pub content_type: String,
    pub location: Option<String>,
    pub body: Body,
}

impl Response {
    pub fn new(status: u16, content_type: &str, body: impl Into<Vec<u8>>) -> Self {
        Response {
            status,
            content_type: content_type.to_string(),
            location: None,
            body: Body::Bytes(body.into()),
        }
    }

    /// A `200 OK` HTML page.
    pub fn html(body: impl Into<Vec<u8>>) -> Self {
        Response::new(200, "text/html; charset=utf-8", body)
    }

    pub fn redirect(status: u16, location: &str) -> Self {
        Response {
            location: Some(location.to_string()),
            ..Response::new(status, "text/html; charset=utf-8", Vec::new())
        }
    }

    pub fn streaming(status: u16, content_type: &str, chunks: Vec<Vec<u8>>) -> Self {
        Response {
            status,
            content_type: content_type.to_string(),
            location: None,
            body: Body::Streaming(chunks),
        }
    }

    pub fn is_html(&self) -> bool {
        self.content_type.starts_with("text/html")
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming(_))
    }

    /// Raw content; streamed chunks are joined with newlines.
    pub fn content(&self) -> Cow<'_, [u8]> {
        match &self.body {
            Body::Bytes(bytes) => Cow::Borrowed(bytes),
            Body::Streaming(chunks) => Cow::Owned(chunks.join(&b'\n')),
        }
    }
}

/// A response together with metadata the fetcher collected for it, such as
/// the number of database queries it took.
#[derive(Debug, Clone, PartialEq)]
pub struct Fetched {
    pub response: Response,
    pub metadata: Metadata,
}

impl From<Response> for Fetched {
    fn from(response: Response) -> Self {
        Fetched {
            response,
            metadata: Metadata::new(),
        }
    }
}

/// Something that turns a site path into a response.
pub trait Fetch {
    fn fetch(&mut self, url: &str) -> Result<Fetched>;
}

impl<F> Fetch for F
where
    F: FnMut(&str) -> Result<Fetched>,
{
    fn fetch(&mut self, url: &str) -> Result<Fetched> {
        self(url)
    }
}
