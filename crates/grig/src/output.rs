//! Output formatting helpers for the `grig` CLI.

use std::fmt;
use std::io::{self, Write};

use gitrig::StatusEntry;
use serde::Serialize;

use crate::context::RuntimeContext;

/// Marker error for queries that found nothing.
///
/// `main` exits with status 1 without printing a message when a handler
/// returns it.
#[derive(Debug)]
pub struct Absent;

impl fmt::Display for Absent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("no result")
    }
}

impl std::error::Error for Absent {}

/// Print a value as pretty-printed JSON to stdout.
///
/// Terminates the process with exit code 1 if serialization fails.
pub fn output_json<T: Serialize + ?Sized>(value: &T) {
    match serde_json::to_string_pretty(value) {
        Ok(json) => {
            let stdout = io::stdout();
            let mut handle = stdout.lock();
            // Ignore broken pipe errors (e.g., piped to `head`)
            let _ = writeln!(handle, "{}", json);
        }
        Err(e) => {
            eprintln!("Error: failed to serialize JSON: {}", e);
            std::process::exit(1);
        }
    }
}

/// Print one value per line, or a JSON array.
pub fn print_lines(ctx: &RuntimeContext, lines: &[String]) {
    if ctx.json {
        output_json(lines);
        return;
    }
    let stdout = io::stdout();
    let mut handle = stdout.lock();
    for line in lines {
        if writeln!(handle, "{}", line).is_err() {
            break;
        }
    }
}

/// Print a single value, or a JSON string.
pub fn print_value(ctx: &RuntimeContext, value: &str) {
    if ctx.json {
        output_json(value);
    } else {
        println!("{}", value);
    }
}

/// Print a value that may be absent.
///
/// Absence prints `null` in JSON mode (nothing otherwise) and is returned
/// as [`Absent`] so the process exits with status 1.
pub fn print_optional(ctx: &RuntimeContext, value: Option<String>) -> anyhow::Result<()> {
    match value {
        Some(v) => {
            print_value(ctx, &v);
            Ok(())
        }
        None => {
            if ctx.json {
                output_json(&serde_json::Value::Null);
            }
            Err(Absent.into())
        }
    }
}

/// Print status entries as `status<TAB>path`, or as JSON objects.
pub fn print_status(ctx: &RuntimeContext, entries: &[StatusEntry]) {
    if ctx.json {
        output_json(entries);
        return;
    }
    let lines: Vec<String> = entries
        .iter()
        .map(|e| format!("{}\t{}", e.status, e.path))
        .collect();
    print_lines(ctx, &lines);
}
