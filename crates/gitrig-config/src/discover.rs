//! Discovery of the `.gitrig.yaml` configuration file.

use std::path::{Path, PathBuf};

/// The name of the configuration file looked for in each directory.
pub const CONFIG_FILE_NAME: &str = ".gitrig.yaml";

/// The environment variable that can point at a configuration file.
pub const CONFIG_ENV: &str = "GITRIG_CONFIG";

/// Locate the configuration file for `start`.
///
/// `GITRIG_CONFIG` wins if it names an existing file. Otherwise the tree is
/// walked up from `start` looking for `.gitrig.yaml`. Returns `None` if
/// nothing is found.
pub fn find_config(start: &Path) -> Option<PathBuf> {
    if let Some(env_path) = std::env::var_os(CONFIG_ENV).map(PathBuf::from) {
        if env_path.is_file() {
            return Some(env_path);
        }
    }
    find_config_upwards(start)
}

/// The walk-up half of [`find_config`], without the environment override.
pub fn find_config_upwards(start: &Path) -> Option<PathBuf> {
    let start = start.canonicalize().ok()?;

    let mut current = start.as_path();
    loop {
        let candidate = current.join(CONFIG_FILE_NAME);
        if candidate.is_file() {
            return Some(candidate);
        }

        match current.parent() {
            Some(parent) if parent != current => current = parent,
            _ => break,
        }
    }

    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn finds_config_in_ancestor() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::write(root.join(CONFIG_FILE_NAME), "json: true\n").unwrap();
        let nested = root.join("a").join("b");
        std::fs::create_dir_all(&nested).unwrap();

        assert_eq!(
            find_config_upwards(&nested),
            Some(root.join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn directory_named_like_config_is_ignored() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().canonicalize().unwrap();
        std::fs::create_dir(root.join(CONFIG_FILE_NAME)).unwrap();
        // An ancestor outside the temp dir could still hold a real config,
        // so only check that this directory was not returned.
        assert_ne!(
            find_config_upwards(&root),
            Some(root.join(CONFIG_FILE_NAME))
        );
    }

    #[test]
    fn missing_start_is_none() {
        assert_eq!(find_config_upwards(Path::new("/nonexistent/xyz")), None);
    }
}
