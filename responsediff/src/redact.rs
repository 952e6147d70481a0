use regex::bytes::Regex;

use crate::config::Redaction;
use crate::error::Result;
use crate::response::{Body, Response};

/// Rewrites parts of a body that change on every run.
#[derive(Debug, Clone)]
pub struct Redactor {
    rules: Vec<(Regex, String)>,
}

impl Redactor {
    pub fn new(redactions: &[Redaction]) -> Result<Self> {
        let rules = redactions
            .iter()
            .map(|r| -> Result<(Regex, String)> {
                Ok((Regex::new(&r.pattern)?, r.replacement.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(Redactor { rules })
    }

    pub fn redact(&self, content: &[u8]) -> Vec<u8> {
        let mut content = content.to_vec();
        for (regex, replacement) in &self.rules {
            content = regex
                .replace_all(&content, replacement.as_bytes())
                .into_owned();
        }
        content
    }

    pub fn apply(&self, response: &mut Response) {
        if self.rules.is_empty() {
            return;
        }
        match &mut response.body {
            Body::Bytes(bytes) => *bytes = self.redact(bytes),
            Body::Streaming(chunks) => {
                for chunk in chunks.iter_mut() {
                    *chunk = self.redact(chunk);
                }
            }
        }
    }
}
