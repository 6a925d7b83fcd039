//! `grig` -- typed command channel to git repositories.
//!
//! Parses CLI arguments with clap, resolves the runtime context, and
//! dispatches to command handlers.

mod cli;
mod commands;
mod context;
mod output;

use std::sync::atomic::{AtomicBool, Ordering};

use clap::Parser;
use tracing_subscriber::EnvFilter;

use cli::{Cli, Commands};
use context::RuntimeContext;

/// Tracks whether a Ctrl+C has already been received.
static CTRLC_RECEIVED: AtomicBool = AtomicBool::new(false);

fn main() {
    // First Ctrl+C: exit cleanly. Second: force exit.
    let _ = ctrlc::set_handler(|| {
        if CTRLC_RECEIVED.swap(true, Ordering::SeqCst) {
            std::process::exit(1);
        }
        std::process::exit(130);
    });

    let cli = Cli::parse();

    let ctx = match RuntimeContext::from_global_args(&cli.global) {
        Ok(ctx) => ctx,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(1);
        }
    };

    // RUST_LOG wins unless --verbose/--quiet asked for something explicit.
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) if !ctx.verbose && !ctx.quiet => filter,
        _ => EnvFilter::new(ctx.log_filter()),
    };
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();

    let result = match cli.command {
        Some(Commands::Init(args)) => commands::init::run(&ctx, &args),
        Some(Commands::Config(args)) => commands::config_cmd::run(&ctx, &args),
        Some(Commands::Status(args)) => commands::status::run(&ctx, &args),
        Some(Commands::Add(args)) => commands::stage::run_add(&ctx, &args),
        Some(Commands::Commit(args)) => commands::stage::run_commit(&ctx, &args),
        Some(Commands::RevParse(args)) => commands::query::run_rev_parse(&ctx, &args),
        Some(Commands::MergeBase(args)) => commands::query::run_merge_base(&ctx, &args),
        Some(Commands::RevList(args)) => commands::query::run_rev_list(&ctx, &args),
        Some(Commands::NameRev(args)) => commands::query::run_name_rev(&ctx, &args),
        Some(Commands::ShowRef(args)) => commands::query::run_show_ref(&ctx, &args),
        Some(Commands::SymbolicRef(args)) => commands::query::run_symbolic_ref(&ctx, &args),
        Some(Commands::CommitLog(args)) => commands::query::run_commit_log(&ctx, &args),
        Some(Commands::LsFiles(args)) => commands::query::run_ls_files(&ctx, &args),
        Some(Commands::Changed(args)) => commands::query::run_changed(&ctx, &args),
        Some(Commands::Unmerged) => commands::query::run_unmerged(&ctx),
        Some(Commands::Describe(args)) => commands::query::run_describe(&ctx, &args),
        Some(Commands::Refs(args)) => commands::refs_cmd::run(&ctx, &args),
        Some(Commands::Log(args)) => commands::log_cmd::run(&ctx, &args),
        Some(Commands::MergeMsg(args)) => commands::control::run_merge_msg(&ctx, &args),
        Some(Commands::IndexLock(args)) => commands::control::run_index_lock(&ctx, &args),
        Some(Commands::Completion(args)) => commands::completion::run(&ctx, &args),
        Some(Commands::Version) => commands::version::run(&ctx),
        None => {
            // No subcommand -- print help
            use clap::CommandFactory;
            Cli::command().print_help().ok();
            println!();
            Ok(())
        }
    };

    if let Err(e) = result {
        // Empty query results exit 1 silently, like `git rev-parse -q --verify`.
        if e.downcast_ref::<output::Absent>().is_some() {
            std::process::exit(1);
        }
        if ctx.json {
            let err_json = serde_json::json!({
                "error": format!("{:#}", e),
            });
            if let Ok(s) = serde_json::to_string_pretty(&err_json) {
                eprintln!("{}", s);
            }
        } else {
            eprintln!("Error: {:#}", e);
        }
        std::process::exit(1);
    }
}
