use std::path::Path;
use std::process::{Command, Stdio};

use log::debug;

use crate::error::{Error, Result};

/// Lines of context around each hunk.
const CONTEXT_LINES: &str = "1";

pub fn create_diff_command(first: &Path, second: &Path) -> Command {
    let mut cmd = Command::new("diff");
    cmd.args(["-U", CONTEXT_LINES]);
    cmd.arg(first).arg(second);
    cmd.stdin(Stdio::null());
    cmd
}

/// Run `diff` between two files.
///
/// Returns the command line and its output minus the `---`/`+++` header
/// lines, which carry temporary file names and timestamps. The output is
/// empty when the files are identical.
pub fn diff(first: &Path, second: &Path) -> Result<(String, Vec<u8>)> {
    let command = format!(
        "diff -U {} {} {}",
        CONTEXT_LINES,
        first.display(),
        second.display()
    );
    debug!("Running {}", command);

    let output = create_diff_command(first, second).output()?;

    // 0: same, 1: different, anything else: trouble
    match output.status.code() {
        Some(0) | Some(1) => Ok((command, strip_header(&output.stdout).to_vec())),
        _ => Err(Error::DiffTool {
            command,
            stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
        }),
    }
}

fn strip_header(output: &[u8]) -> &[u8] {
    let mut rest = output;
    for _ in 0..2 {
        rest = match rest.iter().position(|&b| b == b'\n') {
            Some(newline) => &rest[newline + 1..],
            None => &[],
        };
    }
    rest
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_strip_header() {
        let output = b"--- a\t2024\n+++ b\t2024\n@@ -1 +1 @@\n-a\n+b\n";
        assert_eq!(strip_header(output), b"@@ -1 +1 @@\n-a\n+b\n");
        assert_eq!(strip_header(b""), b"");
        assert_eq!(strip_header(b"--- a\n"), b"");
    }

    #[test]
    fn test_identical_files_have_empty_diff() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        let second = dir.path().join("second");
        fs::write(&first, "same\n").unwrap();
        fs::write(&second, "same\n").unwrap();

        let (command, output) = diff(&first, &second).unwrap();
        assert!(command.starts_with("diff -U 1 "));
        assert!(output.is_empty());
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let first = dir.path().join("first");
        fs::write(&first, "a").unwrap();

        let result = diff(&first, &dir.path().join("missing"));
        assert!(matches!(result, Err(Error::DiffTool { .. })));
    }
}
