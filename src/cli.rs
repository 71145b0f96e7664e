// src/cli.rs

//! CLI argument parsing using `clap`.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};

use crate::options::Progress;

/// Command-line arguments for `simplecmd`.
///
/// Either runs a single program given on the command line, or every command
/// of a plan file (`--plan`) in order.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "simplecmd",
    version,
    about = "Run external programs with redirected, recorded or progress-ticked output.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to a plan file (TOML) listing commands to run in order.
    ///
    /// When given, `PROGRAM` and the per-run flags are not allowed.
    #[arg(long, value_name = "PATH", conflicts_with_all = ["program", "redirect", "progress", "record", "cwd"])]
    pub plan: Option<PathBuf>,

    /// Working directory for the program (default: current directory).
    #[arg(long, value_name = "DIR")]
    pub cwd: Option<PathBuf>,

    /// Send all program output to this file.
    #[arg(long, value_name = "PATH")]
    pub redirect: Option<PathBuf>,

    /// Progress reporting: `false`, `true`, or a chunk count per tick.
    #[arg(long, value_name = "false|true|N", value_parser = parse_progress)]
    pub progress: Option<Progress>,

    /// Record sink output to this file as well as the console.
    #[arg(long, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `SIMPLECMD_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Print the resolved I/O strategy for each command without running it.
    #[arg(long)]
    pub dry_run: bool,

    /// Program to run, followed by its arguments.
    ///
    /// Without a program or `--plan`, `Simplecmd.toml` in the current
    /// directory is run if it exists.
    #[arg(value_name = "PROGRAM")]
    pub program: Option<String>,

    /// Arguments passed verbatim to the program.
    #[arg(value_name = "ARGS", trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<String>,
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

fn parse_progress(s: &str) -> Result<Progress, String> {
    s.parse()
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
