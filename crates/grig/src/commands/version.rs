//! `grig version` -- print the grig version and the git it drives.

use std::process::Command;

use anyhow::Result;
use tracing::debug;

use crate::context::RuntimeContext;
use crate::output::output_json;

const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Execute the `grig version` command.
///
/// The configured git program is asked for its version too; if it cannot be
/// run that part is reported as missing rather than failing the command.
pub fn run(ctx: &RuntimeContext) -> Result<()> {
    let settings = ctx.settings();
    let git = git_version(&settings.program);

    if ctx.json {
        output_json(&serde_json::json!({
            "version": VERSION,
            "git_program": settings.program,
            "git_version": git,
        }));
    } else {
        println!("grig version {}", VERSION);
        match git {
            Some(v) => println!("{} ({})", v, settings.program_name()),
            None => println!("git: {} not runnable", settings.program_name()),
        }
    }

    Ok(())
}

/// First line of `<program> --version`, if it runs successfully.
fn git_version(program: &std::path::Path) -> Option<String> {
    let output = match Command::new(program).arg("--version").output() {
        Ok(output) => output,
        Err(e) => {
            debug!(error = %e, "cannot run git --version");
            return None;
        }
    };
    if !output.status.success() {
        return None;
    }
    String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .map(|line| line.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_program_has_no_version() {
        assert_eq!(git_version(std::path::Path::new("/nonexistent/git")), None);
    }
}
