//! # CLI Interface
//!
//! Command-line structure for `scrooge-node`, using `clap` derive. Logging
//! options are global so they can follow any subcommand.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::logging::LogFormat;

/// Scrooge ledger operator tool.
///
/// Generates keys, writes a sample scenario, and resolves epochs over JSON
/// scenario files. Command output goes to stdout, logs to stderr.
#[derive(Parser, Debug)]
#[command(
    name = "scrooge-node",
    about = "Scrooge ledger operator tool",
    version,
    propagate_version = true
)]
pub struct ScroogeNodeCli {
    /// Default tracing filter directive. `RUST_LOG` overrides it.
    #[arg(
        long,
        global = true,
        env = "SCROOGE_LOG",
        default_value = "scrooge_node=info,scrooge_protocol=info"
    )]
    pub log: String,

    /// Log output format: `pretty` or `json`.
    #[arg(long, global = true, env = "SCROOGE_LOG_FORMAT", default_value = "pretty")]
    pub log_format: LogFormat,

    /// Subcommand to execute.
    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a fresh Ed25519 keypair and print it as JSON.
    Keygen,
    /// Write the Alice/Bob/Carol sample scenario.
    Demo(DemoArgs),
    /// Resolve one epoch from a scenario file and print the outcome.
    Epoch(EpochArgs),
    /// Print version information and exit.
    Version,
}

/// Arguments for the `demo` subcommand.
#[derive(Parser, Debug)]
pub struct DemoArgs {
    /// Where to write the scenario. Printed to stdout when omitted.
    #[arg(long, short = 'o')]
    pub out: Option<PathBuf>,
}

/// Arguments for the `epoch` subcommand.
#[derive(Parser, Debug)]
pub struct EpochArgs {
    /// Scenario file: `{ "ledger": [...], "candidates": [...] }`.
    pub scenario: PathBuf,

    /// Pretty-print the JSON outcome.
    #[arg(long)]
    pub pretty: bool,
}
