// src/context.rs

//! Shared orchestration state.
//!
//! One [`OrchestratorContext`] is created per invocation and passed (behind an
//! `Arc`) to the scheduler, the process supervisor, and the signal listener.
//! It owns the live-process registry and the signal state; nothing here is a
//! process-wide global.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Scheduling discipline for a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Parallel,
    Sequential,
}

/// Settings that apply to every command in a run.
#[derive(Debug, Clone, Default)]
pub struct RunSettings {
    /// Force shell execution regardless of command content.
    pub force_shell: bool,
    /// Additional `KEY=VALUE` pairs appended to the inherited environment.
    pub env_overrides: Vec<(String, String)>,
}

/// A child process that has been spawned and not yet reaped.
#[derive(Debug, Clone)]
pub struct LiveProcess {
    /// Registry key, derived as `"<tag>-<pid>"`.
    pub id: String,
    pub tag: String,
    pub pid: u32,
}

/// State consulted and mutated by the signal listener.
#[derive(Debug, Default)]
pub struct SignalState {
    last_interrupt: Option<Instant>,
    current_sequential: Option<u32>,
}

impl SignalState {
    /// Record an interrupt observed at `now`.
    ///
    /// Returns true when it lands within `window` of the previous interrupt,
    /// i.e. the double-interrupt convention applies.
    pub fn register_interrupt(&mut self, now: Instant, window: Duration) -> bool {
        let doubled = self
            .last_interrupt
            .is_some_and(|prev| now.duration_since(prev) < window);
        self.last_interrupt = Some(now);
        doubled
    }
}

/// Shared, synchronized state for one orchestrator invocation.
#[derive(Debug)]
pub struct OrchestratorContext {
    pub mode: RunMode,
    pub settings: RunSettings,
    registry: Mutex<HashMap<String, LiveProcess>>,
    signal: Mutex<SignalState>,
}

impl OrchestratorContext {
    pub fn new(mode: RunMode, settings: RunSettings) -> Self {
        Self {
            mode,
            settings,
            registry: Mutex::new(HashMap::new()),
            signal: Mutex::new(SignalState::default()),
        }
    }

    /// Register a freshly spawned child. An entry lives in the registry for
    /// exactly as long as the child is started and not yet reaped.
    pub fn register(&self, process: LiveProcess) {
        self.registry
            .lock()
            .unwrap()
            .insert(process.id.clone(), process);
    }

    /// Remove a reaped child from the registry.
    pub fn deregister(&self, id: &str) {
        self.registry.lock().unwrap().remove(id);
    }

    /// Snapshot of every currently registered child.
    pub fn live_processes(&self) -> Vec<LiveProcess> {
        self.registry.lock().unwrap().values().cloned().collect()
    }

    /// Record (or clear) the child currently running in sequential mode.
    pub fn set_current_sequential(&self, pid: Option<u32>) {
        self.signal.lock().unwrap().current_sequential = pid;
    }

    /// The child currently running in sequential mode, if any.
    pub fn current_sequential(&self) -> Option<u32> {
        self.signal.lock().unwrap().current_sequential
    }

    /// See [`SignalState::register_interrupt`].
    pub fn register_interrupt(&self, now: Instant, window: Duration) -> bool {
        self.signal.lock().unwrap().register_interrupt(now, window)
    }
}
