//! `grig config` -- write or show the configuration file.

use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use gitrig_config::{discover::CONFIG_FILE_NAME, save_config, RigConfig};

use crate::cli::{ConfigArgs, ConfigCommands};
use crate::context::RuntimeContext;
use crate::output::output_json;

/// Execute the `grig config` command.
pub fn run(ctx: &RuntimeContext, args: &ConfigArgs) -> Result<()> {
    match &args.command {
        ConfigCommands::Init { path, force } => {
            let path = path
                .clone()
                .unwrap_or_else(|| PathBuf::from(CONFIG_FILE_NAME));
            if path.exists() && !force {
                bail!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                );
            }
            save_config(&path, &RigConfig::default())
                .with_context(|| format!("failed to write {}", path.display()))?;
            if !ctx.quiet && !ctx.json {
                println!("Wrote {}", path.display());
            }
            Ok(())
        }
        ConfigCommands::Show => {
            if ctx.json {
                output_json(&serde_json::json!({
                    "path": ctx.config_path,
                    "config": ctx.config,
                }));
            } else {
                if let Some(path) = &ctx.config_path {
                    println!("# {}", path.display());
                }
                print!(
                    "{}",
                    serde_yaml::to_string(&ctx.config).context("failed to render config")?
                );
            }
            Ok(())
        }
    }
}
