// src/exec/supervisor.rs

//! Spawning and supervision of a single work item.

use std::process::Stdio;
use std::sync::Arc;

use tokio::process::Command;
use tracing::{debug, warn};

use crate::context::{LiveProcess, OrchestratorContext, RunMode};
use crate::exec::shell::{needs_shell, platform_shell};
use crate::exec::stream::spawn_stream_reader;
use crate::output::{OutputSink, StatusClass, StreamKind};
use crate::resolve::WorkItem;

/// Execute one work item to completion.
///
/// Every failure here is per-command: it is reported through the sink and the
/// function returns normally, so sibling and following commands proceed. The
/// child is registered in the live-process registry from spawn until reap; in
/// sequential mode it is also recorded as the current process for the signal
/// listener, and that record is cleared on every exit path.
pub async fn execute(item: &WorkItem, ctx: &Arc<OrchestratorContext>, sink: &OutputSink) {
    let use_shell = needs_shell(
        &item.command,
        ctx.settings.force_shell,
        !ctx.settings.env_overrides.is_empty(),
    );

    let mut cmd = if use_shell {
        let (shell, flag) = platform_shell();
        let mut c = Command::new(shell);
        c.arg(flag).arg(&item.command);
        sink.status(
            &item.tag,
            StatusClass::Info,
            &format!("Executing with shell: {}", item.command),
        );
        c
    } else {
        let argv = match shell_words::split(&item.command) {
            Ok(argv) => argv,
            Err(err) => {
                sink.status(
                    &item.tag,
                    StatusClass::Error,
                    &format!("Error parsing command: {err}"),
                );
                return;
            }
        };

        let Some((program, args)) = argv.split_first() else {
            sink.status(&item.tag, StatusClass::Error, "Empty command");
            return;
        };

        let mut c = Command::new(program);
        c.args(args);
        sink.status(
            &item.tag,
            StatusClass::Info,
            &format!("Executing directly: {}", item.command),
        );
        c
    };

    // Children inherit the full parent environment; overrides are appended on
    // top, so later entries win on conflicting keys.
    for (key, value) in &ctx.settings.env_overrides {
        cmd.env(key, value);
    }

    if !ctx.settings.env_overrides.is_empty() {
        let joined = ctx
            .settings
            .env_overrides
            .iter()
            .map(|(key, value)| format!("{key}={value}"))
            .collect::<Vec<_>>()
            .join(", ");
        sink.status(
            &item.tag,
            StatusClass::Note,
            &format!("With additional environment: {joined}"),
        );
    }

    cmd.stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .kill_on_drop(true);

    let mut child = match cmd.spawn() {
        Ok(child) => child,
        Err(err) => {
            sink.status(
                &item.tag,
                StatusClass::Error,
                &format!("Error starting command: {err}"),
            );
            return;
        }
    };

    let registry_id = child.id().map(|pid| {
        let id = format!("{}-{}", item.tag, pid);
        ctx.register(LiveProcess {
            id: id.clone(),
            tag: item.tag.clone(),
            pid,
        });
        if ctx.mode == RunMode::Sequential {
            ctx.set_current_sequential(Some(pid));
        }
        id
    });

    let stdout = child.stdout.take();
    let stderr = child.stderr.take();

    let mut readers = Vec::with_capacity(2);
    if let Some(stdout) = stdout {
        readers.push(spawn_stream_reader(
            stdout,
            item.tag.clone(),
            StreamKind::Out,
            sink.clone(),
        ));
    }
    if let Some(stderr) = stderr {
        readers.push(spawn_stream_reader(
            stderr,
            item.tag.clone(),
            StreamKind::Err,
            sink.clone(),
        ));
    }

    // Drain both streams before reaping so no trailing output is lost.
    for reader in readers {
        if let Err(err) = reader.await {
            warn!(tag = %item.tag, error = %err, "output reader task failed");
        }
    }

    let wait_result = child.wait().await;

    if let Some(id) = registry_id {
        ctx.deregister(&id);
    }
    if ctx.mode == RunMode::Sequential {
        ctx.set_current_sequential(None);
    }

    match wait_result {
        Ok(status) if status.success() => {
            debug!(tag = %item.tag, "command completed");
            sink.status(
                &item.tag,
                StatusClass::Success,
                "Command completed successfully",
            );
        }
        Ok(status) => {
            // A signal-terminated child has no exit code on Unix.
            let code = status.code().unwrap_or(-1);
            sink.status(
                &item.tag,
                StatusClass::Warning,
                &format!("Command exited with status: {code}"),
            );
        }
        Err(err) => {
            sink.status(
                &item.tag,
                StatusClass::Error,
                &format!("Error waiting for command: {err}"),
            );
        }
    }
}
