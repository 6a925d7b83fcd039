//! `grig add` and `grig commit`.

use anyhow::Result;
use gitrig::CommitOptions;

use crate::cli::{CommitArgs, PathsArgs};
use crate::context::RuntimeContext;
use crate::output::print_value;

/// Execute the `grig add` command.
pub fn run_add(ctx: &RuntimeContext, args: &PathsArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    repo.add(&args.paths)?;
    Ok(())
}

/// Execute the `grig commit` command. Prints the new HEAD id.
pub fn run_commit(ctx: &RuntimeContext, args: &CommitArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    let options = CommitOptions {
        update_all: args.all,
        verbose: false,
    };
    repo.commit(&args.paths, args.message.as_deref(), options)?;

    if let Some(head) = repo.rev_parse("HEAD")? {
        if !ctx.quiet {
            print_value(ctx, &head);
        }
    }
    Ok(())
}
