//! Read-only queries: rev-parse, merge-base, rev-list and friends.

use anyhow::Result;

use crate::cli::{
    ChangedArgs, MergeBaseArgs, PassThroughArgs, RevArgs, ShowRefArgs, SymbolicRefArgs,
};
use crate::context::RuntimeContext;
use crate::output::{print_lines, print_optional, print_value};

/// Execute `grig rev-parse`.
pub fn run_rev_parse(ctx: &RuntimeContext, args: &RevArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_optional(ctx, repo.rev_parse(&args.rev)?)
}

/// Execute `grig merge-base`.
pub fn run_merge_base(ctx: &RuntimeContext, args: &MergeBaseArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_optional(ctx, repo.merge_base(&args.a, &args.b)?)
}

/// Execute `grig rev-list`.
pub fn run_rev_list(ctx: &RuntimeContext, args: &PassThroughArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_lines(ctx, &repo.rev_list(&args.args)?);
    Ok(())
}

/// Execute `grig name-rev`.
pub fn run_name_rev(ctx: &RuntimeContext, args: &RevArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_value(ctx, &repo.name_rev(&args.rev)?);
    Ok(())
}

/// Execute `grig show-ref`.
pub fn run_show_ref(ctx: &RuntimeContext, args: &ShowRefArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_optional(ctx, repo.show_ref(&args.reference)?)
}

/// Execute `grig symbolic-ref`. Prints the target when reading.
pub fn run_symbolic_ref(ctx: &RuntimeContext, args: &SymbolicRefArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    let output = repo.symbolic_ref(&args.name, args.target.as_deref())?;
    if args.target.is_none() {
        print_value(ctx, &output);
    }
    Ok(())
}

/// Execute `grig commit-log`.
pub fn run_commit_log(ctx: &RuntimeContext, args: &RevArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_value(ctx, &repo.commit_log(&args.rev)?);
    Ok(())
}

/// Execute `grig ls-files`.
pub fn run_ls_files(ctx: &RuntimeContext, args: &PassThroughArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_lines(ctx, &repo.ls_files(&args.args)?);
    Ok(())
}

/// Execute `grig changed`.
pub fn run_changed(ctx: &RuntimeContext, args: &ChangedArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    let revs: Vec<&str> = args.revs.iter().map(String::as_str).collect();
    print_lines(ctx, &repo.list_changed_files(&revs, &args.paths)?);
    Ok(())
}

/// Execute `grig unmerged`.
pub fn run_unmerged(ctx: &RuntimeContext) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_lines(ctx, &repo.list_unmerged()?);
    Ok(())
}

/// Execute `grig describe`.
pub fn run_describe(ctx: &RuntimeContext, args: &PassThroughArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    print_lines(ctx, &repo.describe(&args.args)?);
    Ok(())
}
