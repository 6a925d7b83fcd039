//! Shared helpers for repository integration tests.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use gitrig::{CommitOptions, Repository, RunnerSettings};
use tempfile::TempDir;

/// Settings that make commits work without any user or system git config.
pub fn settings() -> RunnerSettings {
    RunnerSettings {
        env: vec![
            ("GIT_AUTHOR_NAME".into(), "Gitrig Test".into()),
            ("GIT_AUTHOR_EMAIL".into(), "test@example.com".into()),
            ("GIT_COMMITTER_NAME".into(), "Gitrig Test".into()),
            ("GIT_COMMITTER_EMAIL".into(), "test@example.com".into()),
            ("GIT_CONFIG_NOSYSTEM".into(), "1".into()),
            ("GIT_CONFIG_GLOBAL".into(), "/dev/null".into()),
            ("GIT_EDITOR".into(), "true".into()),
        ],
        timeout: Some(Duration::from_secs(30)),
        ..RunnerSettings::default()
    }
}

/// A fresh non-bare repository in a temp directory.
pub fn init_repo() -> (TempDir, Repository) {
    let tmp = TempDir::new().unwrap();
    let repo = Repository::init_with(tmp.path().join("work"), false, settings()).unwrap();
    (tmp, repo)
}

/// Write `content` to `name` inside the working tree.
pub fn write(repo: &Repository, name: &str, content: &str) -> PathBuf {
    let path = repo.path().join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

/// Write, stage and commit a file; returns the new HEAD id.
pub fn commit_file(repo: &Repository, name: &str, content: &str, message: &str) -> String {
    let path = write(repo, name, content);
    repo.add([&path]).unwrap();
    repo.commit(no_paths(), Some(message), CommitOptions::default())
        .unwrap();
    repo.rev_parse("HEAD").unwrap().unwrap()
}

/// The current branch name (e.g. `main` or `master`).
pub fn current_branch(repo: &Repository) -> String {
    repo.symbolic_ref("HEAD", None)
        .unwrap()
        .trim_start_matches("refs/heads/")
        .to_string()
}

pub fn no_paths() -> Vec<PathBuf> {
    Vec::new()
}

/// A directory that passes the non-bare check without being a real
/// repository, for runs with stand-in programs.
pub fn fake_layout(dir: &Path) -> PathBuf {
    let root = dir.join("fake");
    fs::create_dir_all(root.join(".git")).unwrap();
    root
}

pub fn is_hex_id(s: &str) -> bool {
    s.len() == 40 && s.chars().all(|c| c.is_ascii_hexdigit())
}
