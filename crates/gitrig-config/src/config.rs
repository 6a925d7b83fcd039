//! Configuration types and loading.
//!
//! The main entry point is [`RigConfig`], the contents of a `.gitrig.yaml`
//! file. Configuration is loaded with [`load_config`] and saved with
//! [`save_config`].

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gitrig::RunnerSettings;
use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Errors that can occur during configuration operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read or written.
    #[error("failed to access config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// The configuration file contained invalid YAML.
    #[error("failed to parse config file: {0}")]
    ParseError(#[from] serde_yaml::Error),

    /// A configuration value was invalid.
    #[error("invalid configuration value for key '{key}': {reason}")]
    InvalidValue {
        /// The configuration key that had an invalid value.
        key: String,
        /// A description of why the value is invalid.
        reason: String,
    },
}

/// A specialized `Result` type for configuration operations.
pub type Result<T> = std::result::Result<T, ConfigError>;

// ---------------------------------------------------------------------------
// Sections
// ---------------------------------------------------------------------------

/// How git is invoked.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GitSection {
    /// The git binary.
    #[serde(default = "default_program")]
    pub program: PathBuf,

    /// Kill git after this many seconds. Unset means no limit.
    #[serde(default, rename = "timeout-secs", skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,

    /// Extra environment for every git invocation.
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub env: BTreeMap<String, String>,
}

impl Default for GitSection {
    fn default() -> Self {
        Self {
            program: default_program(),
            timeout_secs: None,
            env: BTreeMap::new(),
        }
    }
}

fn default_program() -> PathBuf {
    PathBuf::from("git")
}

/// Logging configuration section.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogSection {
    /// A `tracing` filter directive, e.g. `gitrig=debug`.
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

impl Default for LogSection {
    fn default() -> Self {
        Self {
            filter: default_log_filter(),
        }
    }
}

fn default_log_filter() -> String {
    "warn".to_string()
}

// ---------------------------------------------------------------------------
// Main config struct
// ---------------------------------------------------------------------------

/// The full gitrig configuration.
///
/// All fields use `serde` defaults so that a partially-specified YAML file
/// deserializes with sensible values for the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct RigConfig {
    /// Git invocation settings.
    #[serde(default)]
    pub git: GitSection,

    /// Logging settings.
    #[serde(default)]
    pub log: LogSection,

    /// Output JSON instead of human-readable text.
    #[serde(default)]
    pub json: bool,
}

impl RigConfig {
    /// Check values serde cannot check for us.
    pub fn validate(&self) -> Result<()> {
        if self.git.program.as_os_str().is_empty() {
            return Err(ConfigError::InvalidValue {
                key: "git.program".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        if self.git.timeout_secs == Some(0) {
            return Err(ConfigError::InvalidValue {
                key: "git.timeout-secs".to_string(),
                reason: "must be greater than zero".to_string(),
            });
        }
        if let Some(key) = self.git.env.keys().find(|k| k.is_empty() || k.contains('=')) {
            return Err(ConfigError::InvalidValue {
                key: format!("git.env.{key}"),
                reason: "not a valid environment variable name".to_string(),
            });
        }
        Ok(())
    }

    /// The runner settings described by the `git` section.
    pub fn runner_settings(&self) -> RunnerSettings {
        RunnerSettings {
            program: self.git.program.clone(),
            timeout: self.git.timeout_secs.map(Duration::from_secs),
            env: self
                .git
                .env
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        }
    }
}

// ---------------------------------------------------------------------------
// Public API
// ---------------------------------------------------------------------------

/// Load configuration from the YAML file at `path`.
///
/// If the file does not exist or is empty, a default [`RigConfig`] is
/// returned.
///
/// # Errors
///
/// Returns [`ConfigError::ReadError`] if the file exists but cannot be read,
/// [`ConfigError::ParseError`] if it contains invalid YAML, or
/// [`ConfigError::InvalidValue`] if a value fails validation.
pub fn load_config(path: &Path) -> Result<RigConfig> {
    if !path.exists() {
        return Ok(RigConfig::default());
    }

    let content = std::fs::read_to_string(path)?;
    if content.trim().is_empty() {
        return Ok(RigConfig::default());
    }

    let config: RigConfig = serde_yaml::from_str(&content)?;
    config.validate()?;
    Ok(config)
}

/// Save configuration to `path`, creating parent directories as needed.
pub fn save_config(path: &Path, config: &RigConfig) -> Result<()> {
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }
    let yaml = serde_yaml::to_string(config)?;
    std::fs::write(path, yaml)?;
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_default_config() {
        let cfg = RigConfig::default();
        assert_eq!(cfg.git.program, PathBuf::from("git"));
        assert!(cfg.git.timeout_secs.is_none());
        assert!(!cfg.json);
        assert_eq!(cfg.runner_settings(), RunnerSettings::default());
    }

    #[test]
    fn test_load_missing_config_returns_default() {
        let cfg = load_config(Path::new("/nonexistent/path/.gitrig.yaml")).unwrap();
        assert_eq!(cfg, RigConfig::default());
    }

    #[test]
    fn test_load_empty_file_returns_default() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitrig.yaml");
        std::fs::write(&path, "  \n").unwrap();
        assert_eq!(load_config(&path).unwrap(), RigConfig::default());
    }

    #[test]
    fn test_deserialize_partial_yaml() {
        let yaml = "git:\n  timeout-secs: 30\n  env:\n    GIT_AUTHOR_NAME: bot\n";
        let cfg: RigConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(cfg.git.program, PathBuf::from("git"));
        assert_eq!(cfg.log.filter, "warn");

        let settings = cfg.runner_settings();
        assert_eq!(settings.timeout, Some(Duration::from_secs(30)));
        assert_eq!(
            settings.env,
            vec![("GIT_AUTHOR_NAME".to_string(), "bot".to_string())]
        );
    }

    #[test]
    fn test_roundtrip_config() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join(".gitrig.yaml");

        let mut cfg = RigConfig::default();
        cfg.git.program = PathBuf::from("/usr/local/bin/git");
        cfg.log.filter = "gitrig=debug".to_string();

        save_config(&path, &cfg).unwrap();
        assert_eq!(load_config(&path).unwrap(), cfg);
    }

    #[test]
    fn test_invalid_values_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(".gitrig.yaml");

        std::fs::write(&path, "git:\n  timeout-secs: 0\n").unwrap();
        assert!(matches!(
            load_config(&path),
            Err(ConfigError::InvalidValue { .. })
        ));

        std::fs::write(&path, "git: [not, a, map]\n").unwrap();
        assert!(matches!(load_config(&path), Err(ConfigError::ParseError(_))));
    }
}
