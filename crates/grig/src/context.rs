//! Runtime context for command execution.
//!
//! The [`RuntimeContext`] holds what a command handler needs: the resolved
//! configuration, the runner settings derived from it, and global flags.

use std::env;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use gitrig::{Repository, RunnerSettings};
use gitrig_config::{find_config, load_config, RigConfig};
use tracing::debug;

use crate::cli::GlobalArgs;

/// Runtime context passed to every command handler.
///
/// Constructed once in `main` after CLI parsing, before command dispatch.
#[derive(Debug)]
pub struct RuntimeContext {
    /// Repository path as given on the command line.
    pub repo_path: PathBuf,

    /// Configuration file that was loaded, if any.
    pub config_path: Option<PathBuf>,

    /// The effective configuration (file values plus CLI overrides).
    pub config: RigConfig,

    /// Whether to produce JSON output.
    pub json: bool,

    /// Verbose output.
    pub verbose: bool,

    /// Quiet mode: suppress non-essential output.
    pub quiet: bool,
}

impl RuntimeContext {
    /// Build a `RuntimeContext` from parsed global arguments.
    ///
    /// Configuration is taken from `--config`, else `$GITRIG_CONFIG`, else
    /// the nearest `.gitrig.yaml` above the repository path. `--git` and
    /// `--timeout` override the file.
    pub fn from_global_args(global: &GlobalArgs) -> Result<Self> {
        let config_path = match &global.config {
            Some(path) => Some(path.clone()),
            None => {
                let start = if global.repo.exists() {
                    global.repo.clone()
                } else {
                    env::current_dir().context("failed to get current directory")?
                };
                find_config(&start)
            }
        };

        let mut config = match &config_path {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config {}", path.display()))?,
            None => RigConfig::default(),
        };

        if let Some(git) = &global.git {
            config.git.program = git.clone();
        }
        if let Some(secs) = global.timeout {
            config.git.timeout_secs = Some(secs);
        }
        config.validate().context("invalid command-line override")?;

        Ok(Self {
            repo_path: global.repo.clone(),
            config_path,
            json: global.json || config.json,
            verbose: global.verbose,
            quiet: global.quiet,
            config,
        })
    }

    /// Runner settings for every repository this invocation touches.
    pub fn settings(&self) -> RunnerSettings {
        self.config.runner_settings()
    }

    /// Open the repository named by `--repo`.
    pub fn open_repo(&self) -> Result<Repository> {
        self.open_repo_at(&self.repo_path)
    }

    /// Open the repository at `path` with this context's settings.
    pub fn open_repo_at(&self, path: &Path) -> Result<Repository> {
        debug!(path = %path.display(), "opening repository");
        Repository::open_with(path, self.settings())
            .with_context(|| format!("cannot open repository at {}", path.display()))
    }

    /// The `tracing` filter to install.
    pub fn log_filter(&self) -> String {
        if self.verbose {
            "grig=debug,gitrig=debug".to_string()
        } else if self.quiet {
            "error".to_string()
        } else {
            self.config.log.filter.clone()
        }
    }
}
