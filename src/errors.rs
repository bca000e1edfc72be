// src/errors.rs

//! Crate-wide error type and result alias.
//!
//! Per-command failures (spawn errors, tokenization errors, non-zero exits,
//! stream read errors) are reported through the output sink and never surface
//! here; only errors that abort the whole invocation do.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ParseqError {
    #[error(
        "no commands specified; use positional arguments, +NAME:COMMAND syntax, or -t/--tag flags"
    )]
    EmptyCommandSet,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, ParseqError>;
