//! Direct filesystem access to refs, alternates and marker files.
//!
//! Nothing here spawns git.

use std::fs;
use std::io::{self, Write};
use std::path::{Component, Path, PathBuf};

use tracing::debug;

use crate::error::{GitError, Result};
use crate::repo::Repository;

/// Name of the ignore file written by [`Repository::set_gitignore`].
pub const GITIGNORE: &str = ".gitignore";

/// Name of the marker file written by [`Repository::anchor`].
pub const ANCHOR: &str = ".anchor";

impl Repository {
    fn refs_dir(&self) -> PathBuf {
        self.git_dir().join("refs")
    }

    /// `refs/<name>` in the control directory. `name` must be relative and
    /// free of `..`.
    fn ref_path(&self, name: &str) -> Result<PathBuf> {
        let relative = Path::new(name);
        let plain = !name.is_empty()
            && relative
                .components()
                .all(|c| matches!(c, Component::Normal(_) | Component::CurDir));
        if !plain {
            return Err(GitError::InvalidRefName {
                name: name.to_string(),
            });
        }
        Ok(self.refs_dir().join(relative))
    }

    /// Entry names under `refs/<category>` (e.g. `heads`, `tags`).
    ///
    /// A missing directory yields an empty list. Packed refs are not
    /// included. Order is whatever the filesystem returns.
    ///
    /// # Errors
    ///
    /// [`GitError::InvalidRefName`] if `category` is absolute or climbs out
    /// with `..`.
    pub fn list_refs(&self, category: &str) -> Result<Vec<String>> {
        let dir = self.ref_path(category)?;
        if !dir.is_dir() {
            return Ok(Vec::new());
        }
        let mut names = Vec::new();
        for entry in fs::read_dir(&dir)? {
            names.push(entry?.file_name().to_string_lossy().into_owned());
        }
        Ok(names)
    }

    /// Branch names under `refs/heads`.
    pub fn list_heads(&self) -> Result<Vec<String>> {
        self.list_refs("heads")
    }

    /// Tag names under `refs/tags`.
    pub fn list_tags(&self) -> Result<Vec<String>> {
        self.list_refs("tags")
    }

    /// Delete `refs/<reference>` if it exists.
    ///
    /// `reference` is checked like the category of [`Repository::list_refs`].
    pub fn remove_ref(&self, reference: &str) -> Result<()> {
        let path = self.ref_path(reference)?;
        match fs::remove_file(&path) {
            Ok(()) => {
                debug!(path = %path.display(), "removed ref");
                Ok(())
            }
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(e.into()),
        }
    }

    /// Delete the tag `name`.
    pub fn remove_tag(&self, name: &str) -> Result<()> {
        self.remove_ref(&format!("tags/{name}"))
    }

    /// Borrow objects from `other` by listing its object store in
    /// `objects/info/alternates`.
    pub fn set_alternates(&self, other: &Repository) -> Result<()> {
        let info = self.git_dir().join("objects").join("info");
        fs::create_dir_all(&info)?;
        let target = other.git_dir().join("objects");
        fs::write(
            info.join("alternates"),
            format!("{}\n", target.display()),
        )?;
        debug!(target = %target.display(), "set alternates");
        Ok(())
    }

    /// Write `lines` to `<dir>/.gitignore`, one per line.
    pub fn set_gitignore<I, S>(dir: impl AsRef<Path>, lines: I) -> Result<()>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut file = io::BufWriter::new(fs::File::create(dir.as_ref().join(GITIGNORE))?);
        for line in lines {
            writeln!(file, "{}", line.as_ref())?;
        }
        file.flush()?;
        Ok(())
    }

    /// Create an empty `<dir>/.anchor`, e.g. to keep an otherwise empty
    /// directory in the tree.
    pub fn anchor(dir: impl AsRef<Path>) -> Result<()> {
        fs::File::create(dir.as_ref().join(ANCHOR))?;
        Ok(())
    }
}
