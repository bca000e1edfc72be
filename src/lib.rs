// src/lib.rs

pub mod cli;
pub mod context;
pub mod errors;
pub mod exec;
pub mod logging;
pub mod output;
pub mod resolve;
pub mod sched;
pub mod signals;

use std::sync::Arc;

use tracing::{debug, warn};

use crate::cli::{CliArgs, ModeCommand};
use crate::context::{OrchestratorContext, RunMode, RunSettings};
use crate::errors::Result;
use crate::output::OutputSink;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - command resolution
/// - the orchestration context (live-process registry + signal state)
/// - the signal listener
/// - the chosen scheduling discipline
pub async fn run(args: CliArgs) -> Result<()> {
    let (mode, raw_commands) = match args.mode {
        ModeCommand::Parallel { commands } => (RunMode::Parallel, commands),
        ModeCommand::Sequential { commands } => (RunMode::Sequential, commands),
    };

    let items = resolve::resolve_commands(&raw_commands, &args.tags)?;
    debug!(count = items.len(), ?mode, "resolved work list");

    let settings = RunSettings {
        force_shell: args.shell,
        env_overrides: parse_env_overrides(&args.env),
    };

    let color = output::detect_color_support(args.no_color);
    let sink = OutputSink::stdout(color);

    let ctx = Arc::new(OrchestratorContext::new(mode, settings));
    signals::spawn_signal_listener(Arc::clone(&ctx), sink.clone());

    match mode {
        RunMode::Parallel => sched::run_parallel(items, ctx, sink).await,
        RunMode::Sequential => sched::run_sequential(items, ctx, sink).await,
    }

    Ok(())
}

/// Split `KEY=VALUE` entries, warning about and dropping malformed ones.
fn parse_env_overrides(entries: &[String]) -> Vec<(String, String)> {
    let mut overrides = Vec::with_capacity(entries.len());

    for entry in entries {
        match entry.split_once('=') {
            Some((key, value)) if !key.is_empty() => {
                overrides.push((key.to_string(), value.to_string()));
            }
            _ => warn!(entry = %entry, "ignoring malformed --env entry, expected KEY=VALUE"),
        }
    }

    overrides
}
