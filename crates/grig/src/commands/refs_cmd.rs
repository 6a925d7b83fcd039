//! `grig refs` -- list loose refs in the control directory.

use anyhow::Result;

use crate::cli::RefsArgs;
use crate::context::RuntimeContext;
use crate::output::print_lines;

/// Execute the `grig refs` command. Names are printed sorted.
pub fn run(ctx: &RuntimeContext, args: &RefsArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    let mut names = repo.list_refs(&args.category)?;
    names.sort();
    print_lines(ctx, &names);
    Ok(())
}
