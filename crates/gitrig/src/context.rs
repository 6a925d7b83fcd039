//! Per-operation execution context.
//!
//! Every repository operation builds an [`ExecContext`] from its handle. The
//! context owns nothing global: the working directory and the `GIT_DIR`
//! variable are set on each spawned [`Command`] rather than on the current
//! process, so handles for different repositories can be used from several
//! threads at once and there is no state to restore afterwards.

use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::time::Duration;

use tracing::debug;

use crate::commands::Invocation;
use crate::error::Result;
use crate::paths::PathTranslator;

/// Environment variable git reads to locate the control directory.
pub const GIT_DIR_ENV: &str = "GIT_DIR";

/// How git is invoked: which binary, with what extra environment, and for
/// how long it may run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunnerSettings {
    /// The program to run. Defaults to `git` found on `PATH`.
    pub program: PathBuf,
    /// Kill the process and fail with [`GitError::Timeout`] after this long.
    ///
    /// [`GitError::Timeout`]: crate::GitError::Timeout
    pub timeout: Option<Duration>,
    /// Additional environment variables for every invocation.
    pub env: Vec<(String, String)>,
}

impl Default for RunnerSettings {
    fn default() -> Self {
        Self {
            program: PathBuf::from("git"),
            timeout: None,
            env: Vec::new(),
        }
    }
}

impl RunnerSettings {
    /// The program name as shown in error messages.
    pub fn program_name(&self) -> String {
        self.program.display().to_string()
    }
}

/// The context one repository operation runs in.
#[derive(Debug, Clone, Copy)]
pub struct ExecContext<'a> {
    work_dir: &'a Path,
    git_dir: &'a Path,
    settings: &'a RunnerSettings,
}

impl<'a> ExecContext<'a> {
    pub(crate) fn new(work_dir: &'a Path, git_dir: &'a Path, settings: &'a RunnerSettings) -> Self {
        Self {
            work_dir,
            git_dir,
            settings,
        }
    }

    /// The directory git is started in.
    pub fn work_dir(&self) -> &Path {
        self.work_dir
    }

    /// The value given to `GIT_DIR`.
    pub fn git_dir(&self) -> &Path {
        self.git_dir
    }

    /// The runner settings in effect.
    pub fn settings(&self) -> &RunnerSettings {
        self.settings
    }

    /// Translate the arguments of `invocation` into the argv git receives.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::PathOutsideRepository`] if a path argument falls
    /// outside the repository. Nothing has been spawned at that point.
    ///
    /// [`GitError::PathOutsideRepository`]: crate::GitError::PathOutsideRepository
    pub fn argv(&self, invocation: &Invocation) -> Result<Vec<OsString>> {
        let translator = PathTranslator::new(self.work_dir);
        let mut argv = Vec::with_capacity(invocation.args_slice().len() + 1);
        argv.push(OsString::from(invocation.subcommand()));
        for arg in invocation.args_slice() {
            argv.push(translator.render(arg)?);
        }
        Ok(argv)
    }

    /// Build the [`Command`] for `invocation` with working directory and
    /// environment applied.
    pub fn command(&self, invocation: &Invocation) -> Result<Command> {
        let argv = self.argv(invocation)?;
        debug!(
            program = %self.settings.program.display(),
            args = ?argv,
            cwd = %self.work_dir.display(),
            "running git"
        );

        let mut cmd = Command::new(&self.settings.program);
        cmd.args(argv)
            .current_dir(self.work_dir)
            .env(GIT_DIR_ENV, self.git_dir);
        for (key, value) in &self.settings.env {
            cmd.env(key, value);
        }
        Ok(cmd)
    }
}
