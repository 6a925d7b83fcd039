//! Git command execution.
//!
//! An [`Invocation`] describes one git subcommand and its arguments. It is
//! executed through an [`ExecContext`] in one of two modes:
//!
//! - [`ExecContext::run`] (fire-and-check) discards stdout and fails on a
//!   non-zero exit.
//! - [`ExecContext::capture`] returns stdout with one trailing newline
//!   removed and fails the same way.
//!
//! The remaining entry points exist for the plumbing commands that need to
//! feed stdin or stream stdout.

use std::io::{self, Read, Write};
use std::process::{Child, ChildStderr, ChildStdin, ChildStdout, ExitStatus, Output, Stdio};
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};

use tracing::{debug, warn};

use crate::context::ExecContext;
use crate::error::{GitError, Result};
use crate::paths::Arg;

/// How often a child is polled while a timeout is armed.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// One git subcommand with its ordered arguments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    subcommand: String,
    args: Vec<Arg>,
}

impl Invocation {
    /// Start an invocation of `git <subcommand>`.
    pub fn new(subcommand: impl Into<String>) -> Self {
        Self {
            subcommand: subcommand.into(),
            args: Vec::new(),
        }
    }

    /// Append one argument.
    pub fn arg(mut self, arg: impl Into<Arg>) -> Self {
        self.args.push(arg.into());
        self
    }

    /// Append several arguments.
    pub fn args<I, A>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.args.extend(args.into_iter().map(Into::into));
        self
    }

    /// Append each item of `paths` as a path argument.
    pub fn paths<I, P>(self, paths: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: AsRef<std::path::Path>,
    {
        self.args(paths.into_iter().map(|p| Arg::path(p.as_ref())))
    }

    /// The git subcommand, e.g. `rev-parse`.
    pub fn subcommand(&self) -> &str {
        &self.subcommand
    }

    /// The arguments following the subcommand.
    pub fn args_slice(&self) -> &[Arg] {
        &self.args
    }
}

impl ExecContext<'_> {
    /// Fire-and-check mode: run `invocation`, ignoring its stdout.
    ///
    /// # Errors
    ///
    /// [`GitError::CommandFailed`] on a non-zero exit, [`GitError::Spawn`]
    /// if git cannot be started, [`GitError::Timeout`] if the configured
    /// timeout expires.
    pub fn run(&self, invocation: &Invocation) -> Result<()> {
        self.output_checked(invocation, None).map(|_| ())
    }

    /// Capture mode: run `invocation` and return its stdout.
    ///
    /// One trailing newline is removed; everything else is returned as is.
    pub fn capture(&self, invocation: &Invocation) -> Result<String> {
        let output = self.output_checked(invocation, None)?;
        Ok(trim_newline(String::from_utf8_lossy(&output.stdout).into_owned()))
    }

    /// Run `invocation` with `input` written to its stdin and return the
    /// trimmed stdout.
    ///
    /// A broken pipe while writing is not an error by itself: the exit
    /// status decides.
    pub fn capture_with_input(&self, invocation: &Invocation, input: &[u8]) -> Result<String> {
        let output = self.output_checked(invocation, Some(input))?;
        Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
    }

    /// Run `invocation` and return its output whatever the exit status.
    pub fn output(&self, invocation: &Invocation) -> Result<Output> {
        let cmd = self.command(invocation)?;
        execute(
            cmd,
            invocation.subcommand(),
            &self.settings().program_name(),
            self.settings().timeout,
            None,
        )
    }

    /// Spawn `invocation` with stdout piped for incremental reading.
    ///
    /// stderr is inherited. The caller owns the child and must reap it.
    pub fn spawn_stdout(&self, invocation: &Invocation) -> Result<Child> {
        let mut cmd = self.command(invocation)?;
        cmd.stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit());
        cmd.spawn().map_err(|source| GitError::Spawn {
            program: self.settings().program_name(),
            source,
        })
    }

    fn output_checked(&self, invocation: &Invocation, input: Option<&[u8]>) -> Result<Output> {
        let cmd = self.command(invocation)?;
        let output = execute(
            cmd,
            invocation.subcommand(),
            &self.settings().program_name(),
            self.settings().timeout,
            input,
        )?;
        check_status(output, invocation.subcommand())
    }
}

/// Turn a non-zero exit into [`GitError::CommandFailed`].
pub(crate) fn check_status(output: Output, command: &str) -> Result<Output> {
    if output.status.success() {
        return Ok(output);
    }
    let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
    Err(GitError::CommandFailed {
        command: command.to_string(),
        code: output.status.code(),
        stderr,
    })
}

/// Spawn `cmd`, optionally feed it `input`, and collect its output.
pub(crate) fn execute(
    mut cmd: std::process::Command,
    command: &str,
    program: &str,
    timeout: Option<Duration>,
    input: Option<&[u8]>,
) -> Result<Output> {
    cmd.stdin(if input.is_some() {
        Stdio::piped()
    } else {
        Stdio::null()
    })
    .stdout(Stdio::piped())
    .stderr(Stdio::piped());

    let mut child = cmd.spawn().map_err(|source| GitError::Spawn {
        program: program.to_string(),
        source,
    })?;

    let stdout = child.stdout.take().map(drain_stdout);
    let stderr = child.stderr.take().map(drain_stderr);

    let stdin = match (input, child.stdin.take()) {
        (Some(input), Some(pipe)) => Some(feed_stdin(pipe, input.to_vec())),
        _ => None,
    };

    let status = wait_child(&mut child, command, timeout)?;

    if let Some(writer) = stdin {
        match writer.join() {
            Ok(Ok(())) => {}
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {
                debug!(command, "git closed stdin early");
            }
            Ok(Err(e)) => return Err(GitError::Io(e)),
            Err(_) => {
                return Err(GitError::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "stdin writer panicked",
                )))
            }
        }
    }

    Ok(Output {
        status,
        stdout: join_reader(stdout),
        stderr: join_reader(stderr),
    })
}

/// Wait for `child`, killing it if `timeout` expires first.
pub(crate) fn wait_child(
    child: &mut Child,
    command: &str,
    timeout: Option<Duration>,
) -> Result<ExitStatus> {
    let Some(timeout) = timeout else {
        return Ok(child.wait()?);
    };

    let deadline = Instant::now() + timeout;
    loop {
        if let Some(status) = child.try_wait()? {
            return Ok(status);
        }
        if Instant::now() >= deadline {
            warn!(command, pid = child.id(), ?timeout, "git timed out, killing it");
            let _ = child.kill();
            let _ = child.wait();
            return Err(GitError::Timeout {
                command: command.to_string(),
                timeout,
            });
        }
        thread::sleep(POLL_INTERVAL);
    }
}

/// Feed `input` to the child from a separate thread. The pipe closes when
/// the thread ends.
fn feed_stdin(mut pipe: ChildStdin, input: Vec<u8>) -> JoinHandle<io::Result<()>> {
    thread::spawn(move || pipe.write_all(&input))
}

fn drain_stdout(mut pipe: ChildStdout) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn drain_stderr(mut pipe: ChildStderr) -> JoinHandle<Vec<u8>> {
    thread::spawn(move || {
        let mut buf = Vec::new();
        let _ = pipe.read_to_end(&mut buf);
        buf
    })
}

fn join_reader(handle: Option<JoinHandle<Vec<u8>>>) -> Vec<u8> {
    handle
        .and_then(|h| h.join().ok())
        .unwrap_or_default()
}

/// Remove a single trailing newline (`\n` or `\r\n`).
fn trim_newline(mut s: String) -> String {
    if s.ends_with('\n') {
        s.pop();
        if s.ends_with('\r') {
            s.pop();
        }
    }
    s
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
