//! Low-level object plumbing that talks to git over pipes.
//!
//! `commit-tree` and `mktree` read from stdin, and `log` output can be too
//! long to buffer, so these bypass the plain run/capture helpers.

use std::io::{self, BufRead, BufReader, Write};
use std::process::{Child, ChildStdout};

use tracing::{debug, warn};

use crate::commands::{wait_child, Invocation};
use crate::error::{GitError, Result};
use crate::paths::Arg;
use crate::repo::Repository;

impl Repository {
    /// Create a commit object for `tree` with `message` and the given
    /// parents, returning the new commit id.
    ///
    /// git may close stdin before reading the whole message; only its exit
    /// status decides success.
    pub fn commit_tree(&self, tree: &str, message: &str, parents: &[&str]) -> Result<String> {
        let mut invocation = Invocation::new("commit-tree").arg(tree);
        for parent in parents {
            invocation = invocation.arg("-p").arg(*parent);
        }
        self.context()
            .capture_with_input(&invocation, message.as_bytes())
    }

    /// The id of the empty tree, written into the object store.
    pub fn mktree_empty(&self) -> Result<String> {
        self.context()
            .capture_with_input(&Invocation::new("mktree"), b"")
    }

    /// `git describe <args...>`, one line per described argument.
    ///
    /// describe stops at the first argument it cannot describe and exits
    /// non-zero; whatever it printed up to that point is returned.
    pub fn describe<I, A>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let output = self
            .context()
            .output(&Invocation::new("describe").args(args))?;
        if !output.status.success() {
            debug!(code = ?output.status.code(), "git describe stopped early");
        }
        Ok(String::from_utf8_lossy(&output.stdout)
            .lines()
            .map(str::to_string)
            .collect())
    }

    /// Start `git log <args...>` and return its output as a line stream.
    ///
    /// No timeout applies; the stream lives as long as the consumer keeps
    /// it.
    pub fn log<I, A>(&self, args: I) -> Result<LogStream>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let invocation = Invocation::new("log").args(args);
        let mut child = self.context().spawn_stdout(&invocation)?;
        let stdout = child.stdout.take().ok_or_else(|| {
            GitError::Io(io::Error::new(io::ErrorKind::Other, "git log stdout not captured"))
        })?;
        Ok(LogStream {
            child: Some(child),
            reader: BufReader::new(stdout),
        })
    }

    /// Copy `git log <args...>` into `sink` line by line.
    ///
    /// If the sink goes away (broken pipe, e.g. a pager was closed) the log
    /// process is stopped and this returns `Ok`.
    pub fn write_log<I, A, W>(&self, args: I, sink: &mut W) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
        W: Write + ?Sized,
    {
        let mut stream = self.log(args)?;
        while let Some(line) = stream.next() {
            let line = line?;
            if let Err(e) = writeln!(sink, "{line}") {
                if e.kind() == io::ErrorKind::BrokenPipe {
                    return stream.terminate();
                }
                return Err(e.into());
            }
        }
        if let Err(e) = sink.flush() {
            if e.kind() != io::ErrorKind::BrokenPipe {
                return Err(e.into());
            }
        }
        stream.finish()
    }
}

/// Forward-only stream of `git log` output lines.
///
/// Each line is yielded without its newline. Invalid UTF-8 is replaced
/// rather than reported. Call [`LogStream::finish`] after draining to learn
/// whether git succeeded, or [`LogStream::terminate`] to stop early.
/// Dropping the stream kills and reaps the process.
#[derive(Debug)]
pub struct LogStream {
    child: Option<Child>,
    reader: BufReader<ChildStdout>,
}

impl LogStream {
    /// Drain the remaining output and wait for git.
    ///
    /// # Errors
    ///
    /// [`GitError::CommandFailed`] if git exited non-zero. stderr is not
    /// captured for streams (it goes to the caller's terminal).
    pub fn finish(mut self) -> Result<()> {
        for line in self.by_ref() {
            line?;
        }
        let Some(mut child) = self.child.take() else {
            return Ok(());
        };
        let status = wait_child(&mut child, "log", None)?;
        if status.success() {
            Ok(())
        } else {
            Err(GitError::CommandFailed {
                command: "log".to_string(),
                code: status.code(),
                stderr: String::new(),
            })
        }
    }

    /// Stop git without reading the rest of its output.
    pub fn terminate(mut self) -> Result<()> {
        if let Some(mut child) = self.child.take() {
            debug!(pid = child.id(), "terminating git log");
            // The process may already have exited.
            let _ = child.kill();
            child.wait()?;
        }
        Ok(())
    }
}

impl Iterator for LogStream {
    type Item = Result<String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut buf = Vec::new();
        match self.reader.read_until(b'\n', &mut buf) {
            Ok(0) => None,
            Ok(_) => {
                if buf.last() == Some(&b'\n') {
                    buf.pop();
                }
                Some(Ok(String::from_utf8_lossy(&buf).into_owned()))
            }
            Err(e) => Some(Err(e.into())),
        }
    }
}

impl Drop for LogStream {
    fn drop(&mut self) {
        if let Some(mut child) = self.child.take() {
            if let Ok(None) = child.try_wait() {
                warn!(pid = child.id(), "git log stream dropped before completion");
                let _ = child.kill();
            }
            let _ = child.wait();
        }
    }
}
