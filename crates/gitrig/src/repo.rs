//! The resolved repository handle and its git command surface.
//!
//! Most methods that return values fail with [`GitError::CommandFailed`] when
//! git does. The exceptions return `Ok(None)` instead and say so in their
//! documentation: [`Repository::rev_parse`], [`Repository::merge_base`] and
//! [`Repository::show_ref`].

use std::fs;
use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::commands::Invocation;
use crate::context::{ExecContext, RunnerSettings};
use crate::error::{absent_on_failure, GitError, Result};
use crate::parse::{self, StatusEntry};
use crate::paths::Arg;

/// Suffix that marks a bare repository directory.
const BARE_SUFFIX: &str = ".git";

/// Name of the control directory inside a working tree.
const DOT_GIT: &str = ".git";

/// Flags for [`Repository::commit`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CommitOptions {
    /// `-a`: stage modified and deleted tracked files first.
    pub update_all: bool,
    /// `-v`: include the diff in the commit message template.
    pub verbose: bool,
}

/// A validated git repository.
///
/// Construction decides between a working tree (`<path>/.git` is a
/// directory) and a bare repository (the path ends in `.git` and holds
/// `refs/` and `objects/`). The handle is immutable afterwards.
#[derive(Debug, Clone)]
pub struct Repository {
    path: PathBuf,
    git_dir: PathBuf,
    bare: bool,
    settings: RunnerSettings,
}

impl Repository {
    /// Open the repository at `path` with default runner settings.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::open_with(path, RunnerSettings::default())
    }

    /// Open the repository at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::NotARepository`] if neither layout matches.
    pub fn open_with(path: impl AsRef<Path>, settings: RunnerSettings) -> Result<Self> {
        let given = path.as_ref();
        let path = given
            .canonicalize()
            .map_err(|_| GitError::NotARepository {
                path: given.to_path_buf(),
            })?;

        let dot_git = path.join(DOT_GIT);
        let (git_dir, bare) = if dot_git.is_dir() {
            (dot_git, false)
        } else if has_bare_suffix(&path)
            && path.join("refs").is_dir()
            && path.join("objects").is_dir()
        {
            (path.clone(), true)
        } else {
            return Err(GitError::NotARepository { path });
        };

        debug!(path = %path.display(), bare, "opened repository");
        Ok(Self {
            path,
            git_dir,
            bare,
            settings,
        })
    }

    /// Create a repository at `path` (creating the directory if needed) and
    /// open it.
    pub fn init(path: impl AsRef<Path>, bare: bool) -> Result<Self> {
        Self::init_with(path, bare, RunnerSettings::default())
    }

    /// Like [`Repository::init`] with explicit runner settings.
    ///
    /// A bare repository is only recognised by [`Repository::open`] if its
    /// directory name ends in `.git`.
    pub fn init_with(path: impl AsRef<Path>, bare: bool, settings: RunnerSettings) -> Result<Self> {
        let path = path.as_ref();
        if fs::symlink_metadata(path).is_err() {
            fs::create_dir(path)?;
        }
        let path = path.canonicalize()?;
        let init_dir = if bare { path.clone() } else { path.join(DOT_GIT) };

        info!(path = %path.display(), bare, "initializing repository");
        let mut invocation = Invocation::new("init");
        if bare {
            invocation = invocation.arg("--bare");
        }
        ExecContext::new(&path, &init_dir, &settings).run(&invocation)?;

        Self::open_with(&path, settings)
    }

    /// Returns `true` if `path` is a repository by the rules of
    /// [`Repository::open`].
    pub fn is_repository(path: impl AsRef<Path>) -> bool {
        Self::open(path).is_ok()
    }

    /// Canonical path of the repository (the working tree, or the bare
    /// directory).
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The control directory.
    pub fn git_dir(&self) -> &Path {
        &self.git_dir
    }

    /// Whether this is a bare repository.
    pub fn is_bare(&self) -> bool {
        self.bare
    }

    /// The runner settings used for every invocation.
    pub fn settings(&self) -> &RunnerSettings {
        &self.settings
    }

    /// The execution context for one operation on this repository.
    pub fn context(&self) -> ExecContext<'_> {
        ExecContext::new(&self.path, &self.git_dir, &self.settings)
    }

    fn run(&self, invocation: Invocation) -> Result<()> {
        self.context().run(&invocation)
    }

    fn capture(&self, invocation: Invocation) -> Result<String> {
        self.context().capture(&invocation)
    }

    // -----------------------------------------------------------------------
    // Index and tree mutation
    // -----------------------------------------------------------------------

    /// `git read-tree <opts...>`
    pub fn read_tree<I, A>(&self, opts: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.run(Invocation::new("read-tree").args(opts))
    }

    /// `git update-index --remove <paths...>`
    pub fn update_index<I, P>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.run(Invocation::new("update-index").arg("--remove").paths(paths))
    }

    /// `git update-index -q --unmerged --refresh`
    pub fn update_index_refresh(&self) -> Result<()> {
        self.run(
            Invocation::new("update-index")
                .arg("-q")
                .arg("--unmerged")
                .arg("--refresh"),
        )
    }

    /// Refresh the index and re-add every file git reports as needing an
    /// update.
    pub fn update_index_all(&self) -> Result<()> {
        let output = self
            .context()
            .output(&Invocation::new("update-index").arg("--refresh"))?;
        if output.status.success() {
            return Ok(());
        }

        let mut text = String::from_utf8_lossy(&output.stdout).into_owned();
        text.push_str(&String::from_utf8_lossy(&output.stderr));
        let stale = parse::parse_needs_update(&text);
        debug!(count = stale.len(), "updating stale index entries");
        self.update_index(stale)
    }

    /// `git add <paths...>`
    pub fn add<I, P>(&self, paths: I) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.run(Invocation::new("add").paths(paths))
    }

    /// `git checkout <args...>`
    pub fn checkout<I, A>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.run(Invocation::new("checkout").args(args))
    }

    /// `git checkout-index -a -f`
    pub fn checkout_index(&self) -> Result<()> {
        self.run(Invocation::new("checkout-index").arg("-a").arg("-f"))
    }

    /// `git update-ref [-d] <ref> <rev> [<oldvalue>]`
    pub fn update_ref<I, A>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.run(Invocation::new("update-ref").args(args))
    }

    /// Stop tracking `path` without touching the working tree.
    pub fn rm_cached(&self, path: impl AsRef<Path>) -> Result<()> {
        self.run(
            Invocation::new("rm")
                .args(["--ignore-unmatch", "--cached", "--quiet", "-f", "-r"])
                .arg(Arg::path(path.as_ref())),
        )
    }

    /// `git commit [-a] [-v] [-m <msg>] <paths...>`
    ///
    /// An empty message is treated like no message.
    pub fn commit<I, P>(&self, paths: I, message: Option<&str>, options: CommitOptions) -> Result<()>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let mut invocation = Invocation::new("commit");
        if options.update_all {
            invocation = invocation.arg("-a");
        }
        if options.verbose {
            invocation = invocation.arg("-v");
        }
        if let Some(msg) = message.filter(|m| !m.is_empty()) {
            invocation = invocation.arg("-m").arg(msg);
        }
        self.run(invocation.paths(paths))
    }

    /// `git merge <remote>`
    pub fn merge(&self, remote: &str) -> Result<()> {
        self.run(Invocation::new("merge").arg(remote))
    }

    /// `git reset <args...>`
    pub fn reset<I, A>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.run(Invocation::new("reset").args(args))
    }

    /// `git branch -D <branch>`
    pub fn branch_delete(&self, branch: &str) -> Result<()> {
        self.run(Invocation::new("branch").arg("-D").arg(branch))
    }

    /// `git branch <args...>`
    pub fn branch<I, A>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.run(Invocation::new("branch").args(args))
    }

    /// `git prune`
    pub fn prune(&self) -> Result<()> {
        self.run(Invocation::new("prune"))
    }

    /// `git repack <args...>`
    pub fn repack<I, A>(&self, args: I) -> Result<()>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.run(Invocation::new("repack").args(args))
    }

    /// `git fetch <repository> <refspec>`
    pub fn fetch(&self, repository: &str, refspec: &str) -> Result<()> {
        self.run(Invocation::new("fetch").arg(repository).arg(refspec))
    }

    /// Run an arbitrary subcommand in fire-and-check mode, but report a
    /// failing exit code as a value.
    ///
    /// Returns `Ok(None)` on success and `Ok(Some(code))` on failure. A
    /// process killed by a signal reports `-1`.
    pub fn raw<I, A>(&self, command: &str, args: I) -> Result<Option<i32>>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        match self.run(Invocation::new(command).args(args)) {
            Ok(()) => Ok(None),
            Err(GitError::CommandFailed { code, .. }) => Ok(Some(code.unwrap_or(-1))),
            Err(e) => Err(e),
        }
    }

    // -----------------------------------------------------------------------
    // Queries
    // -----------------------------------------------------------------------

    /// `git cat-file <args...>`
    pub fn cat_file<I, A>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.capture(Invocation::new("cat-file").args(args))
    }

    /// `git write-tree`, returning the id of the written tree.
    pub fn write_tree(&self) -> Result<String> {
        self.capture(Invocation::new("write-tree"))
    }

    /// Resolve a revision expression to an object id.
    ///
    /// Returns `Ok(None)` if git cannot resolve it.
    pub fn rev_parse(&self, rev: &str) -> Result<Option<String>> {
        absent_on_failure(self.capture(Invocation::new("rev-parse").arg(rev)))
    }

    /// The common ancestor of `a` and `b`.
    ///
    /// Returns `Ok(None)` if git fails (e.g. unrelated histories).
    pub fn merge_base(&self, a: &str, b: &str) -> Result<Option<String>> {
        absent_on_failure(self.capture(Invocation::new("merge-base").arg(a).arg(b)))
    }

    /// `git symbolic-ref <name> [<ref>]`
    ///
    /// Reads the symbolic ref when `target` is `None`, otherwise points
    /// `name` at `target`.
    pub fn symbolic_ref(&self, name: &str, target: Option<&str>) -> Result<String> {
        let mut invocation = Invocation::new("symbolic-ref").arg(name);
        if let Some(target) = target.filter(|t| !t.is_empty()) {
            invocation = invocation.arg(target);
        }
        self.capture(invocation)
    }

    /// `git rev-list <args...>` as a list of commit ids, newest first.
    pub fn rev_list<I, A>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let output = self.capture(Invocation::new("rev-list").args(args))?;
        Ok(parse::parse_lines(&output))
    }

    /// A human-readable name for `rev` (`git name-rev`).
    pub fn name_rev(&self, rev: &str) -> Result<String> {
        let output = self.capture(Invocation::new("name-rev").arg(rev))?;
        parse::second_token("name-rev", &output)
    }

    /// The full ref name for `reference`.
    ///
    /// Returns `Ok(None)` if the ref does not exist.
    pub fn show_ref(&self, reference: &str) -> Result<Option<String>> {
        match absent_on_failure(self.capture(Invocation::new("show-ref").arg(reference)))? {
            Some(output) => parse::second_token("show-ref", &output).map(Some),
            None => Ok(None),
        }
    }

    /// `git show <args...>`
    pub fn show<I, A>(&self, args: I) -> Result<String>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        self.capture(Invocation::new("show").args(args))
    }

    /// Changes between `HEAD` and the index, after refreshing the index.
    pub fn status<I, P>(&self, paths: I) -> Result<Vec<StatusEntry>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        self.update_index_refresh()?;
        let output = self.capture(
            Invocation::new("diff-index")
                .args(["--ignore-submodules", "--name-status", "HEAD"])
                .paths(paths),
        )?;
        parse::parse_status(&output)
    }

    /// Paths with unresolved merge conflicts.
    pub fn list_unmerged(&self) -> Result<Vec<String>> {
        let output = self.capture(
            Invocation::new("diff")
                .arg("--name-only")
                .arg("--diff-filter=U"),
        )?;
        Ok(parse::parse_lines(&output))
    }

    /// The log message of `committish`: the commit object after its headers.
    pub fn commit_log(&self, committish: &str) -> Result<String> {
        let raw = self.capture(Invocation::new("cat-file").arg("commit").arg(committish))?;
        parse::commit_message(&raw)
    }

    /// `git ls-files <args...>`
    pub fn ls_files<I, A>(&self, args: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = A>,
        A: Into<Arg>,
    {
        let output = self.capture(Invocation::new("ls-files").args(args))?;
        Ok(output.lines().map(str::to_string).collect())
    }

    /// Files that differ between revisions.
    ///
    /// With two revisions the trees are compared (`diff-tree`); with one,
    /// the revision is compared to the index (`diff-index`). The index is
    /// refreshed first.
    ///
    /// # Errors
    ///
    /// Returns [`GitError::InvalidComparison`] for any other number of
    /// revisions, before running anything.
    pub fn list_changed_files<I, P>(&self, compared: &[&str], paths: I) -> Result<Vec<String>>
    where
        I: IntoIterator<Item = P>,
        P: AsRef<Path>,
    {
        let invocation = changed_files_invocation(compared, paths)?;
        self.update_index_refresh()?;
        let output = self.capture(invocation)?;
        Ok(parse::parse_lines(&output))
    }
}

/// Pick the diff form for [`Repository::list_changed_files`].
pub(crate) fn changed_files_invocation<I, P>(compared: &[&str], paths: I) -> Result<Invocation>
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    let invocation = match compared {
        [a, b] => Invocation::new("diff-tree")
            .args(["-r", "--name-only"])
            .arg(*a)
            .arg(*b),
        [rev] => Invocation::new("diff-index")
            .args(["--ignore-submodules", "-r", "--name-only"])
            .arg(*rev),
        _ => {
            return Err(GitError::InvalidComparison {
                count: compared.len(),
            })
        }
    };
    Ok(invocation.paths(paths))
}

fn has_bare_suffix(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().ends_with(BARE_SUFFIX))
        .unwrap_or(false)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
