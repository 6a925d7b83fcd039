//! Typed command channel to a git repository.
//!
//! [`Repository`] resolves a path to a working tree or bare repository and
//! runs git subcommands against it, turning their text output into
//! structured values. Each operation builds its own [`ExecContext`]: git is
//! started with the repository as working directory and `GIT_DIR` set on the
//! child process only, so the calling process's state is never touched.
//!
//! ```no_run
//! use gitrig::{CommitOptions, Repository};
//!
//! let repo = Repository::open(".")?;
//! repo.add(["README.md"])?;
//! repo.commit(Vec::<&str>::new(), Some("docs"), CommitOptions::default())?;
//! println!("{:?}", repo.rev_parse("HEAD")?);
//! # Ok::<(), gitrig::GitError>(())
//! ```

mod attrs;
pub mod commands;
pub mod context;
pub mod error;
pub mod parse;
pub mod paths;
pub mod plumbing;
pub mod refs;
pub mod repo;

pub use commands::Invocation;
pub use context::{ExecContext, RunnerSettings, GIT_DIR_ENV};
pub use error::{GitError, Result};
pub use parse::StatusEntry;
pub use paths::{Arg, PathTranslator};
pub use plumbing::LogStream;
pub use repo::{CommitOptions, Repository};
