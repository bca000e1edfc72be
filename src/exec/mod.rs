// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`shell`] decides whether a command string needs a shell.
//! - [`supervisor`] spawns one child per work item, registers it in the live
//!   registry, and reports its completion status.
//! - [`stream`] fans a child's stdout/stderr into the shared output sink.

pub mod shell;
pub mod stream;
pub mod supervisor;

pub use supervisor::execute;
