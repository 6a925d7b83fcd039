//! `grig init` -- create a repository.

use anyhow::{Context, Result};
use gitrig::Repository;

use crate::cli::InitArgs;
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `grig init` command.
pub fn run(ctx: &RuntimeContext, args: &InitArgs) -> Result<()> {
    let repo = Repository::init_with(&args.path, args.bare, ctx.settings())
        .with_context(|| format!("failed to initialize {}", args.path.display()))?;

    if ctx.json {
        output_json(&serde_json::json!({
            "path": repo.path(),
            "git_dir": repo.git_dir(),
            "bare": repo.is_bare(),
        }));
    } else if !ctx.quiet {
        let kind = if repo.is_bare() { "bare " } else { "" };
        println!(
            "Initialized empty {}repository in {}",
            kind,
            repo.git_dir().display()
        );
    }
    Ok(())
}
