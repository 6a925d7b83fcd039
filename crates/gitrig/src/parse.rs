//! Decoders for the textual output of git subcommands.

use serde::Serialize;

use crate::error::{GitError, Result};

/// One line of `diff-index --name-status` output.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatusEntry {
    /// Status letter(s) as printed by git, e.g. `M`, `A`, `D`, `R100`.
    pub status: String,
    /// Repository-relative path. Everything after the first tab.
    pub path: String,
}

impl StatusEntry {
    /// Convenience constructor.
    pub fn new(status: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            status: status.into(),
            path: path.into(),
        }
    }
}

/// Parse `status<TAB>path` lines, keeping git's order.
///
/// Empty output yields an empty list.
pub fn parse_status(output: &str) -> Result<Vec<StatusEntry>> {
    if output.is_empty() {
        return Ok(Vec::new());
    }
    output
        .split('\n')
        .map(|line| {
            line.split_once('\t')
                .map(|(status, path)| StatusEntry::new(status, path))
                .ok_or_else(|| GitError::UnexpectedOutput {
                    command: "diff-index".to_string(),
                    output: line.to_string(),
                })
        })
        .collect()
}

/// Split newline-separated tokens (rev-list, ls-files, diff --name-only).
///
/// Empty output is an empty list, never a list holding one empty string.
pub fn parse_lines(output: &str) -> Vec<String> {
    if output.is_empty() {
        return Vec::new();
    }
    output.split('\n').map(str::to_string).collect()
}

/// Return the second space-separated token of the first line of `output`.
///
/// `name-rev` prints `<rev> <name>` and `show-ref` prints `<id> <refname>`,
/// one line per match; callers want the part after the first space.
pub fn second_token(command: &str, output: &str) -> Result<String> {
    output
        .lines()
        .next()
        .unwrap_or_default()
        .split(' ')
        .nth(1)
        .map(str::to_string)
        .ok_or_else(|| GitError::UnexpectedOutput {
            command: command.to_string(),
            output: output.to_string(),
        })
}

/// Extract the log message from a raw commit object.
///
/// The message is everything after the first blank line; the header lines
/// before it are dropped.
pub fn commit_message(raw: &str) -> Result<String> {
    raw.find("\n\n")
        .map(|idx| raw[idx + 2..].to_string())
        .ok_or_else(|| GitError::UnexpectedOutput {
            command: "cat-file".to_string(),
            output: raw.to_string(),
        })
}

/// Paths reported as `<path>: needs update` by `update-index --refresh`.
pub fn parse_needs_update(output: &str) -> Vec<String> {
    output
        .lines()
        .filter(|line| line.ends_with("needs update"))
        .map(|line| match line.rsplit_once(':') {
            Some((path, _)) => path.to_string(),
            None => line.to_string(),
        })
        .collect()
}
