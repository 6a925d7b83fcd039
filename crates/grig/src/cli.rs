//! Clap CLI definitions for the `grig` command.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

/// grig -- run git against a repository and get structured answers back.
#[derive(Parser, Debug)]
#[command(
    name = "grig",
    about = "Typed command channel to git repositories",
    long_about = "Runs git subcommands against a repository and prints their results as plain lines or JSON.",
    version,
    propagate_version = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalArgs,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Global flags available to all subcommands.
#[derive(Args, Debug, Clone)]
pub struct GlobalArgs {
    /// Repository to operate on.
    #[arg(short = 'C', long = "repo", global = true, default_value = ".", env = "GRIG_REPO")]
    pub repo: PathBuf,

    /// Configuration file (default: $GITRIG_CONFIG or the nearest .gitrig.yaml).
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// git binary to run (overrides the config file).
    #[arg(long, global = true)]
    pub git: Option<PathBuf>,

    /// Kill git after this many seconds (overrides the config file).
    #[arg(long, global = true)]
    pub timeout: Option<u64>,

    /// Output in JSON format.
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose/debug output.
    #[arg(short = 'v', long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output (errors only).
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,
}

/// All available subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    // ===== Setup =====
    /// Create a repository (the directory is created if missing).
    Init(InitArgs),

    /// Manage the grig configuration file.
    Config(ConfigArgs),

    // ===== Working tree and index =====
    /// Show changes between HEAD and the working tree.
    Status(PathsArgs),

    /// Stage paths.
    Add(PathsArgs),

    /// Commit staged changes.
    Commit(CommitArgs),

    // ===== Queries =====
    /// Resolve a revision to an object id (exit 1 if it does not resolve).
    RevParse(RevArgs),

    /// Find the common ancestor of two revisions (exit 1 if there is none).
    MergeBase(MergeBaseArgs),

    /// List commit ids (`git rev-list`).
    RevList(PassThroughArgs),

    /// Name a revision relative to refs.
    NameRev(RevArgs),

    /// Resolve a ref to its full name (exit 1 if it does not exist).
    ShowRef(ShowRefArgs),

    /// Read or set a symbolic ref.
    SymbolicRef(SymbolicRefArgs),

    /// Print the log message of a commit.
    CommitLog(RevArgs),

    /// List tracked files (`git ls-files`).
    LsFiles(PassThroughArgs),

    /// List files changed between one revision and the index, or two revisions.
    Changed(ChangedArgs),

    /// List paths with unresolved conflicts.
    Unmerged,

    /// Describe revisions by tags (`git describe`).
    Describe(PassThroughArgs),

    /// List entries under refs/<category> in the control directory.
    Refs(RefsArgs),

    /// Stream `git log` output.
    Log(PassThroughArgs),

    // ===== Control directory files =====
    /// Read or write the pending merge message.
    MergeMsg(MergeMsgArgs),

    /// Query, create or remove the index lock.
    IndexLock(IndexLockArgs),

    // ===== Utilities =====
    /// Generate shell completions.
    Completion(CompletionArgs),

    /// Print version information.
    Version,
}

/// Arguments for `grig init`.
#[derive(Args, Debug)]
pub struct InitArgs {
    /// Where to create the repository.
    pub path: PathBuf,

    /// Create a bare repository (the name should end in `.git`).
    #[arg(long)]
    pub bare: bool,
}

/// A list of paths inside the repository.
#[derive(Args, Debug)]
pub struct PathsArgs {
    /// Paths (absolute, or relative to the repository root).
    pub paths: Vec<PathBuf>,
}

/// Arguments for `grig commit`.
#[derive(Args, Debug)]
pub struct CommitArgs {
    /// Commit message.
    #[arg(short = 'm', long)]
    pub message: Option<String>,

    /// Stage modified and deleted tracked files first.
    #[arg(short = 'a', long)]
    pub all: bool,

    /// Only commit these paths.
    pub paths: Vec<PathBuf>,
}

/// A single revision expression.
#[derive(Args, Debug)]
pub struct RevArgs {
    /// Revision expression (hash, branch, tag, HEAD~2, ...).
    pub rev: String,
}

/// Arguments for `grig merge-base`.
#[derive(Args, Debug)]
pub struct MergeBaseArgs {
    pub a: String,
    pub b: String,
}

/// Arguments for `grig show-ref`.
#[derive(Args, Debug)]
pub struct ShowRefArgs {
    /// Ref pattern, e.g. `main` or `refs/tags/v1`.
    pub reference: String,
}

/// Arguments for `grig symbolic-ref`.
#[derive(Args, Debug)]
pub struct SymbolicRefArgs {
    /// Symbolic ref name, e.g. `HEAD`.
    pub name: String,

    /// Point the symbolic ref here instead of reading it.
    pub target: Option<String>,
}

/// Arguments passed straight through to git.
#[derive(Args, Debug)]
pub struct PassThroughArgs {
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
}

/// Arguments for `grig changed`.
#[derive(Args, Debug)]
pub struct ChangedArgs {
    /// One revision (compared to the index) or two (compared to each other).
    #[arg(required = true)]
    pub revs: Vec<String>,

    /// Limit to these paths.
    #[arg(last = true)]
    pub paths: Vec<PathBuf>,
}

/// Arguments for `grig refs`.
#[derive(Args, Debug)]
pub struct RefsArgs {
    /// Subdirectory of refs/ to list.
    #[arg(default_value = "heads")]
    pub category: String,
}

/// Arguments for `grig merge-msg`.
#[derive(Args, Debug)]
pub struct MergeMsgArgs {
    /// Replace the merge message with this text.
    #[arg(long)]
    pub set: Option<String>,
}

/// Arguments for `grig index-lock`.
#[derive(Args, Debug)]
pub struct IndexLockArgs {
    /// Create the lock file.
    #[arg(long, conflicts_with = "clear")]
    pub set: bool,

    /// Remove the lock file.
    #[arg(long)]
    pub clear: bool,
}

/// Arguments for `grig config`.
#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

/// `grig config` subcommands.
#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Write a default .gitrig.yaml.
    Init {
        /// Where to write it (default: .gitrig.yaml in the current directory).
        #[arg(long)]
        path: Option<PathBuf>,

        /// Overwrite an existing file.
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration.
    Show,
}

/// Arguments for `grig completion`.
#[derive(Args, Debug)]
pub struct CompletionArgs {
    /// Shell to generate the script for.
    #[arg(value_enum)]
    pub shell: clap_complete::Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn changed_splits_revs_and_paths() {
        let cli = Cli::try_parse_from(["grig", "changed", "HEAD~1", "HEAD", "--", "src"]).unwrap();
        match cli.command {
            Some(Commands::Changed(args)) => {
                assert_eq!(args.revs, vec!["HEAD~1", "HEAD"]);
                assert_eq!(args.paths, vec![PathBuf::from("src")]);
            }
            other => panic!("unexpected parse: {other:?}"),
        }
    }

    #[test]
    fn pass_through_keeps_flags() {
        let cli = Cli::try_parse_from(["grig", "log", "--format=%s", "-n", "3"]).unwrap();
        match cli.command {
            Some(Commands::Log(args)) => assert_eq!(args.args, vec!["--format=%s", "-n", "3"]),
            other => panic!("unexpected parse: {other:?}"),
        }
    }
}
