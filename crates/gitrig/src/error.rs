//! Error types for repository operations.

use std::path::PathBuf;
use std::time::Duration;

use thiserror::Error;

/// Errors that can occur when resolving a repository or running git.
#[derive(Debug, Error)]
pub enum GitError {
    /// The git binary could not be found or spawned.
    #[error("failed to execute {program}: {source}")]
    Spawn {
        /// The program that was being started.
        program: String,
        /// The underlying spawn error.
        #[source]
        source: std::io::Error,
    },

    /// The git command exited with a non-zero status.
    #[error("git {command} failed (exit code {code:?}): {stderr}")]
    CommandFailed {
        /// The subcommand that failed (e.g. `rev-parse`).
        command: String,
        /// The exit code, or `None` if the process was killed by a signal.
        code: Option<i32>,
        /// The content of stderr.
        stderr: String,
    },

    /// The command did not finish within the configured timeout.
    #[error("git {command} timed out after {timeout:?}")]
    Timeout {
        /// The subcommand that was killed.
        command: String,
        /// The timeout that expired.
        timeout: Duration,
    },

    /// The path is neither a working tree with a `.git` directory nor a bare
    /// repository.
    #[error("not a git repository `{}'", path.display())]
    NotARepository {
        /// The canonicalized path that was checked.
        path: PathBuf,
    },

    /// A caller-supplied path does not resolve inside the repository root.
    #[error("path not in the git repository ({})", path.display())]
    PathOutsideRepository {
        /// The resolved path.
        path: PathBuf,
    },

    /// `list_changed_files` was given a revision count other than one or two.
    #[error("compared revisions must contain 1 or 2 elements, got {count}")]
    InvalidComparison {
        /// How many revisions were supplied.
        count: usize,
    },

    /// A ref name given to a direct ref-file operation would leave `refs/`.
    #[error("invalid ref name {name:?}")]
    InvalidRefName {
        /// The rejected name.
        name: String,
    },

    /// git succeeded but printed something we could not interpret.
    #[error("unexpected output from git {command}: {output:?}")]
    UnexpectedOutput {
        /// The subcommand whose output was malformed.
        command: String,
        /// The offending output.
        output: String,
    },

    /// A direct filesystem operation inside the control directory failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl GitError {
    /// Returns `true` for a non-zero exit of the tool itself.
    ///
    /// Queries that degrade to an absence value only swallow this kind;
    /// spawn failures and timeouts still propagate.
    pub fn is_command_failure(&self) -> bool {
        matches!(self, GitError::CommandFailed { .. })
    }

    /// The exit code of a failed command, if any.
    pub fn exit_code(&self) -> Option<i32> {
        match self {
            GitError::CommandFailed { code, .. } => *code,
            _ => None,
        }
    }
}

/// A specialized `Result` type for git operations.
pub type Result<T> = std::result::Result<T, GitError>;

/// Fold a [`GitError::CommandFailed`] into `Ok(None)`.
///
/// Used by the handful of queries whose contract is "absence on failure".
pub(crate) fn absent_on_failure<T>(result: Result<T>) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(err) if err.is_command_failure() => Ok(None),
        Err(err) => Err(err),
    }
}
