use std::collections::BTreeMap;
use std::fmt;

use crate::error::{Error, Result};

/// Number of bytes of a created fixture shown in the report.
const PREVIEW_LEN: usize = 60;

/// Outcome of comparing captured responses against their fixtures.
///
/// `diffs` is keyed by the diff invocation that produced the output, so a
/// failure can be reproduced by hand. `created` is keyed by fixture path.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Comparison {
    pub diffs: BTreeMap<String, Vec<u8>>,
    pub created: BTreeMap<String, Vec<u8>>,
}

impl Comparison {
    /// True when a real comparison happened and found nothing.
    pub fn is_clean(&self) -> bool {
        self.diffs.is_empty() && self.created.is_empty()
    }

    pub fn merge(&mut self, other: Comparison) {
        self.diffs.extend(other.diffs);
        self.created.extend(other.created);
    }

    pub fn into_result(self) -> Result<()> {
        if self.is_clean() {
            Ok(())
        } else {
            Err(Error::DiffsFound(self))
        }
    }
}

impl fmt::Display for Comparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.created.is_empty() {
            writeln!(f, "Created fixtures:")?;
            for (path, content) in &self.created {
                let end = content.len().min(PREVIEW_LEN);
                writeln!(f, "{}", path)?;
                writeln!(f, "{}", String::from_utf8_lossy(&content[..end]))?;
            }
        }

        if !self.diffs.is_empty() {
            if !self.created.is_empty() {
                writeln!(f)?;
            }
            writeln!(f, "Diffs found:")?;
            for (command, output) in &self.diffs {
                writeln!(f, "{}", command)?;
                write!(f, "{}", String::from_utf8_lossy(output))?;
            }
        }

        Ok(())
    }
}

/// Everything a crawl visited, with the comparison merged across all pages.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CrawlReport {
    pub covered: Vec<String>,
    pub comparison: Comparison,
}

impl CrawlReport {
    /// Turn a dirty crawl into a single combined failure.
    pub fn into_result(self) -> Result<Vec<String>> {
        let CrawlReport {
            covered,
            comparison,
        } = self;
        comparison.into_result()?;
        Ok(covered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clean_comparison_passes() {
        assert!(Comparison::default().into_result().is_ok());
    }

    #[test]
    fn test_report_lists_created_and_diffs() {
        let mut comparison = Comparison::default();
        comparison
            .created
            .insert("fixtures/home/content".to_string(), vec![b'x'; 100]);
        comparison.diffs.insert(
            "diff -U 1 a b".to_string(),
            b"@@ -1 +1 @@\n-a\n+b\n".to_vec(),
        );

        let message = comparison.into_result().unwrap_err().to_string();
        assert!(message.starts_with("Created fixtures:\nfixtures/home/content\n"));
        assert!(message.contains(&format!("{}\n", "x".repeat(PREVIEW_LEN))));
        assert!(!message.contains(&"x".repeat(PREVIEW_LEN + 1)));
        assert!(message.ends_with("Diffs found:\ndiff -U 1 a b\n@@ -1 +1 @@\n-a\n+b\n"));
    }

    #[test]
    fn test_merge_accumulates() {
        let mut total = Comparison::default();
        let mut page = Comparison::default();
        page.created.insert("a.content".to_string(), b"a".to_vec());
        total.merge(page);
        let mut page = Comparison::default();
        page.created.insert("b.content".to_string(), b"b".to_vec());
        total.merge(page);
        assert_eq!(total.created.len(), 2);
    }
}
