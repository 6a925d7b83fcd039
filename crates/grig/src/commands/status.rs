//! `grig status` -- changes between HEAD and the working tree.

use anyhow::Result;

use crate::cli::PathsArgs;
use crate::context::RuntimeContext;
use crate::output::print_status;

/// Execute the `grig status` command.
pub fn run(ctx: &RuntimeContext, args: &PathsArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    let entries = repo.status(&args.paths)?;
    print_status(ctx, &entries);
    Ok(())
}
