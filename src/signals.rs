// src/signals.rs

//! Signal handling for the lifetime of a run.
//!
//! Signals are forwarded to the child processes the orchestrator owns. The
//! policy depends on the scheduling mode:
//!
//! - parallel: interrupt/terminate broadcast to every live child, then the
//!   program exits with `128 + signo`
//! - sequential: a single interrupt goes only to the currently running child
//!   and the run continues with the next command; a second interrupt within
//!   one second exits the whole program
//! - hangup: broadcast only, the orchestrator keeps running
//!
//! The listener runs on its own task, never blocks command execution, and
//! tolerates an empty registry or an unset current-process reference.

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::context::{OrchestratorContext, RunMode};
use crate::output::{OutputSink, StatusClass};

/// Window within which a second interrupt exits the whole program.
pub const DOUBLE_INTERRUPT_WINDOW: Duration = Duration::from_secs(1);

/// Platform-independent classification of the signals we react to. Platform
/// adapters map raw OS signals into this; the policy above never deals in
/// signal numbers directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignalClass {
    Interrupt,
    Terminate,
    Hangup,
}

impl SignalClass {
    /// Conventional exit code for a process terminated by this signal.
    pub fn exit_code(self) -> i32 {
        128 + self.number()
    }

    /// OS signal number.
    pub fn number(self) -> i32 {
        match self {
            SignalClass::Hangup => 1,
            SignalClass::Interrupt => 2,
            SignalClass::Terminate => 15,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SignalClass::Hangup => "SIGHUP",
            SignalClass::Interrupt => "SIGINT",
            SignalClass::Terminate => "SIGTERM",
        }
    }
}

/// Spawn the signal listener for the lifetime of the program.
pub fn spawn_signal_listener(ctx: Arc<OrchestratorContext>, sink: OutputSink) {
    tokio::spawn(async move {
        listen(ctx, sink).await;
    });
}

#[cfg(unix)]
async fn listen(ctx: Arc<OrchestratorContext>, sink: OutputSink) {
    use tokio::signal::unix::{SignalKind, signal};

    let mut interrupt = match signal(SignalKind::interrupt()) {
        Ok(stream) => stream,
        Err(err) => {
            debug!(error = %err, "failed to install SIGINT handler");
            return;
        }
    };
    let mut terminate = match signal(SignalKind::terminate()) {
        Ok(stream) => stream,
        Err(err) => {
            debug!(error = %err, "failed to install SIGTERM handler");
            return;
        }
    };
    let mut hangup = match signal(SignalKind::hangup()) {
        Ok(stream) => stream,
        Err(err) => {
            debug!(error = %err, "failed to install SIGHUP handler");
            return;
        }
    };

    loop {
        let class = tokio::select! {
            _ = interrupt.recv() => SignalClass::Interrupt,
            _ = terminate.recv() => SignalClass::Terminate,
            _ = hangup.recv() => SignalClass::Hangup,
        };

        handle_signal(class, &ctx, &sink);
    }
}

/// Non-Unix fallback: only Ctrl+C is observable.
#[cfg(not(unix))]
async fn listen(ctx: Arc<OrchestratorContext>, sink: OutputSink) {
    loop {
        if tokio::signal::ctrl_c().await.is_err() {
            return;
        }
        handle_signal(SignalClass::Interrupt, &ctx, &sink);
    }
}

fn handle_signal(class: SignalClass, ctx: &Arc<OrchestratorContext>, sink: &OutputSink) {
    debug!(signal = class.name(), mode = ?ctx.mode, "received signal");

    // Sequential mode treats interrupts specially: the first one only stops
    // the running command, a second one within the window stops parseq.
    if class == SignalClass::Interrupt && ctx.mode == RunMode::Sequential {
        if ctx.register_interrupt(Instant::now(), DOUBLE_INTERRUPT_WINDOW) {
            sink.notice(StatusClass::Warning, "Double Ctrl+C detected. Exiting...");
            std::process::exit(class.exit_code());
        }

        sink.notice(
            StatusClass::Warning,
            "Interrupting current command. Press Ctrl+C again within 1 second to exit parseq.",
        );
        if let Some(pid) = ctx.current_sequential() {
            forward(pid, class);
        }
        return;
    }

    sink.notice(
        StatusClass::Warning,
        &format!(
            "Received signal: {}. Forwarding to all child processes...",
            class.name()
        ),
    );
    for process in ctx.live_processes() {
        forward(process.pid, class);
    }

    match class {
        SignalClass::Interrupt | SignalClass::Terminate => std::process::exit(class.exit_code()),
        SignalClass::Hangup => {}
    }
}

/// Forward a signal to one child. Delivery failure (child already gone) is
/// ignored.
#[cfg(unix)]
fn forward(pid: u32, class: SignalClass) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    let sig = match class {
        SignalClass::Hangup => Signal::SIGHUP,
        SignalClass::Interrupt => Signal::SIGINT,
        SignalClass::Terminate => Signal::SIGTERM,
    };
    let _ = kill(Pid::from_raw(pid as i32), sig);
}

/// Without per-pid signal delivery there is nothing to forward; exiting the
/// parent is what reaches children sharing the console.
#[cfg(not(unix))]
fn forward(_pid: u32, _class: SignalClass) {}
