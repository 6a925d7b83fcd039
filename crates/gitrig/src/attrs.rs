//! File-backed attributes of a repository.
//!
//! These look like plain fields but live in the control directory: every
//! read and write goes to the filesystem, nothing is cached.

use std::fs;
use std::io;
use std::path::PathBuf;

use tracing::debug;

use crate::error::Result;
use crate::repo::Repository;

const MERGE_MSG: &str = "MERGE_MSG";
const INDEX_LOCK: &str = "index.lock";

impl Repository {
    fn merge_msg_path(&self) -> PathBuf {
        self.git_dir().join(MERGE_MSG)
    }

    fn index_lock_path(&self) -> PathBuf {
        self.git_dir().join(INDEX_LOCK)
    }

    /// Contents of `MERGE_MSG`, or `None` if there is no pending merge
    /// message.
    pub fn merge_message(&self) -> Result<Option<String>> {
        match fs::read_to_string(self.merge_msg_path()) {
            Ok(msg) => Ok(Some(msg)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }

    /// Overwrite `MERGE_MSG` with `message`.
    pub fn set_merge_message(&self, message: &str) -> Result<()> {
        fs::write(self.merge_msg_path(), message)?;
        Ok(())
    }

    /// Whether `index.lock` exists.
    pub fn has_index_lock(&self) -> bool {
        self.index_lock_path().exists()
    }

    /// Create an empty `index.lock` when `locked`, remove it otherwise.
    pub fn set_index_lock(&self, locked: bool) -> Result<()> {
        let path = self.index_lock_path();
        if locked {
            fs::File::create(&path)?;
            debug!(path = %path.display(), "created index lock");
        } else if fs::symlink_metadata(&path).is_ok() {
            fs::remove_file(&path)?;
            debug!(path = %path.display(), "removed index lock");
        }
        Ok(())
    }
}
