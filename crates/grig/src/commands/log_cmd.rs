//! `grig log` -- stream `git log` to stdout.

use std::io;

use anyhow::Result;

use crate::cli::PassThroughArgs;
use crate::context::RuntimeContext;

/// Execute the `grig log` command.
///
/// Output is copied line by line as git produces it. `--json` collects the
/// lines into an array instead.
pub fn run(ctx: &RuntimeContext, args: &PassThroughArgs) -> Result<()> {
    let repo = ctx.open_repo()?;

    if ctx.json {
        let mut stream = repo.log(&args.args)?;
        let lines = stream
            .by_ref()
            .collect::<gitrig::Result<Vec<String>>>()?;
        stream.finish()?;
        crate::output::output_json(&lines);
        return Ok(());
    }

    let stdout = io::stdout();
    let mut handle = stdout.lock();
    repo.write_log(&args.args, &mut handle)?;
    Ok(())
}
