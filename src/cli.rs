// src/cli.rs

//! CLI argument parsing using `clap`.
//!
//! NOTE: this expects `clap` to be built with the `derive` feature, e.g.:
//! `clap = { version = "4.5.53", features = ["derive"] }` in `Cargo.toml`.

use clap::{Parser, Subcommand, ValueEnum};

/// Command-line arguments for `parseq`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "parseq",
    version,
    about = "Run commands in parallel or sequentially with tagged output.",
    long_about = "parseq executes other commands either in parallel or sequentially,
prefixing every output line with the command's tag.

Examples:
  parseq p \"echo hello world\" \"cat /etc/hosts\"
  parseq s \"echo hello world\" \"cat /etc/hosts\"

  # Tag commands with names using the -t flag
  parseq p -t \"greeting:echo hello\" -t \"hosts:cat /etc/hosts\"

  # Tag commands with names using the + syntax
  parseq p \"+greeting:echo hello\" \"+hosts:cat /etc/hosts\""
)]
pub struct CliArgs {
    #[command(subcommand)]
    pub mode: ModeCommand,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Set additional environment variables (format: KEY=VALUE).
    #[arg(short = 'e', long = "env", global = true, value_name = "KEY=VALUE")]
    pub env: Vec<String>,

    /// Tag a command with a name (format: NAME:COMMAND).
    #[arg(short = 't', long = "tag", global = true, value_name = "NAME:COMMAND")]
    pub tags: Vec<String>,

    /// Force the use of a shell for all commands.
    #[arg(long, global = true)]
    pub shell: bool,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `PARSEQ_LOG` or a default level will be used.
    #[arg(long, value_enum, global = true, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,
}

/// Scheduling discipline, chosen via subcommand.
#[derive(Debug, Clone, Subcommand)]
pub enum ModeCommand {
    /// Run commands in parallel, printing output as it arrives.
    #[command(visible_alias = "p")]
    Parallel {
        /// Commands to run; `+NAME:COMMAND` declares a tagged command inline.
        #[arg(value_name = "COMMAND")]
        commands: Vec<String>,
    },

    /// Run commands one after another.
    #[command(visible_alias = "s")]
    Sequential {
        /// Commands to run; `+NAME:COMMAND` declares a tagged command inline.
        #[arg(value_name = "COMMAND")]
        commands: Vec<String>,
    },
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
