//! `grig merge-msg` and `grig index-lock` -- files in the control directory.

use anyhow::Result;

use crate::cli::{IndexLockArgs, MergeMsgArgs};
use crate::context::RuntimeContext;
use crate::output::{output_json, print_optional};

/// Execute the `grig merge-msg` command.
pub fn run_merge_msg(ctx: &RuntimeContext, args: &MergeMsgArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    match &args.set {
        Some(message) => {
            repo.set_merge_message(message)?;
            Ok(())
        }
        None => {
            let message = repo
                .merge_message()?
                .map(|m| m.trim_end_matches('\n').to_string());
            print_optional(ctx, message)
        }
    }
}

/// Execute the `grig index-lock` command.
pub fn run_index_lock(ctx: &RuntimeContext, args: &IndexLockArgs) -> Result<()> {
    let repo = ctx.open_repo()?;
    if args.set {
        repo.set_index_lock(true)?;
    } else if args.clear {
        repo.set_index_lock(false)?;
    }

    let locked = repo.has_index_lock();
    if ctx.json {
        output_json(&serde_json::json!({ "locked": locked }));
    } else if !ctx.quiet {
        println!("{}", if locked { "locked" } else { "unlocked" });
    }
    Ok(())
}
