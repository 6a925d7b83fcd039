//! Translation of caller-supplied paths into repository-relative form.
//!
//! git is always run with the repository root as its working directory, so
//! every path handed to it must be relative to that root. [`PathTranslator`]
//! proves that a path lies inside the repository before it is passed on and
//! rewrites it into the form git expects.

use std::ffi::OsString;
use std::path::{Component, Path, PathBuf};

use crate::error::{GitError, Result};

/// A single argument of a git invocation.
///
/// Literals are passed to git untouched. Paths are validated and rewritten
/// relative to the repository root by [`PathTranslator::render`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Arg {
    /// A flag, revision expression or other literal string.
    Lit(OsString),
    /// A filesystem path that must lie inside the repository.
    Path(PathBuf),
}

impl Arg {
    /// Shorthand for a path argument.
    pub fn path(path: impl Into<PathBuf>) -> Self {
        Arg::Path(path.into())
    }
}

impl From<&str> for Arg {
    fn from(s: &str) -> Self {
        Arg::Lit(s.into())
    }
}

impl From<&&str> for Arg {
    fn from(s: &&str) -> Self {
        Arg::Lit((*s).into())
    }
}

impl From<String> for Arg {
    fn from(s: String) -> Self {
        Arg::Lit(s.into())
    }
}

impl From<&String> for Arg {
    fn from(s: &String) -> Self {
        Arg::Lit(s.into())
    }
}

impl From<&Path> for Arg {
    fn from(p: &Path) -> Self {
        Arg::Path(p.to_path_buf())
    }
}

impl From<PathBuf> for Arg {
    fn from(p: PathBuf) -> Self {
        Arg::Path(p)
    }
}

impl From<&PathBuf> for Arg {
    fn from(p: &PathBuf) -> Self {
        Arg::Path(p.clone())
    }
}

/// Converts paths into paths relative to a canonical repository root.
#[derive(Debug, Clone, Copy)]
pub struct PathTranslator<'a> {
    root: &'a Path,
}

impl<'a> PathTranslator<'a> {
    /// `root` must already be canonical (symlinks resolved).
    pub fn new(root: &'a Path) -> Self {
        Self { root }
    }

    /// Translate `path` into a path relative to the root.
    ///
    /// Relative inputs are interpreted against the root. The parent directory
    /// is resolved through symlinks while the final component is kept as
    /// written, so it does not need to exist. The root itself translates to
    /// an empty path.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::PathOutsideRepository`] if the resolved path is
    /// not the root or below it.
    pub fn translate(&self, path: &Path) -> Result<PathBuf> {
        let absolute = if path.is_absolute() {
            path.to_path_buf()
        } else {
            self.root.join(path)
        };

        let resolved = match (absolute.parent(), absolute.file_name()) {
            (Some(parent), Some(name)) => resolve_existing(parent).join(name),
            _ => resolve_existing(&absolute),
        };

        match resolved.strip_prefix(self.root) {
            Ok(relative) => Ok(relative.to_path_buf()),
            Err(_) => Err(GitError::PathOutsideRepository { path: resolved }),
        }
    }

    /// Render an [`Arg`] into the string git receives.
    ///
    /// A path equal to the root is rendered as `.` since git rejects an
    /// empty pathspec.
    pub fn render(&self, arg: &Arg) -> Result<OsString> {
        match arg {
            Arg::Lit(s) => Ok(s.clone()),
            Arg::Path(p) => {
                let relative = self.translate(p)?;
                if relative.as_os_str().is_empty() {
                    Ok(OsString::from("."))
                } else {
                    Ok(relative.into_os_string())
                }
            }
        }
    }
}

/// Resolve `path` like `realpath(3)` without requiring it to exist.
///
/// Components that exist are canonicalized as we go, so symlinks along the
/// way are followed. Once a component is missing the rest is applied
/// lexically.
fn resolve_existing(path: &Path) -> PathBuf {
    let mut resolved = PathBuf::new();
    let mut missing = false;

    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => resolved.push(component.as_os_str()),
            Component::CurDir => {}
            Component::ParentDir => {
                resolved.pop();
            }
            Component::Normal(name) => {
                resolved.push(name);
                if !missing {
                    match resolved.canonicalize() {
                        Ok(real) => resolved = real,
                        Err(_) => missing = true,
                    }
                }
            }
        }
    }

    resolved
}
