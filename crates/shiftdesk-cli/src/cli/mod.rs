//! CLI command definitions for the `shiftdesk` binary.
//!
//! Uses clap derive macros for argument parsing. Commands follow a
//! noun-verb pattern (e.g., `shiftdesk drafts list`).

pub mod drafts;
pub mod status;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use drafts::DraftsCommand;

/// Inspect and manage autosaved report drafts.
#[derive(Parser)]
#[command(name = "shiftdesk", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Log errors only. Command output is still printed.
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Detailed output (-v for verbose, -vv for debug/trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Export tracing spans via OpenTelemetry (stdout exporter).
    #[arg(long, global = true, env = "SHIFTDESK_OTEL")]
    pub otel: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Work with saved drafts.
    #[command(alias = "d")]
    Drafts {
        #[command(subcommand)]
        command: DraftsCommand,
    },

    /// Show draft counts, storage usage and settings.
    Status,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Default log filter for the chosen verbosity.
    pub fn log_filter(&self) -> &'static str {
        match self.verbose {
            0 if self.quiet => "error",
            0 => "warn",
            1 => "info,shiftdesk_core=debug",
            _ => "trace",
        }
    }
}
