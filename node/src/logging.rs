//! # Structured Logging
//!
//! One `tracing` subscriber for the whole process: an `EnvFilter` built from
//! `RUST_LOG` (falling back to the `--log` directive) under a pretty or
//! JSON formatter.
//!
//! Output goes to stderr. stdout is reserved for command results, so
//! `scrooge-node epoch s.json | jq` works with logging on.

use std::str::FromStr;

use anyhow::{anyhow, Result};
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// How log lines are rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Multi-line, colored, for a terminal.
    Pretty,
    /// One JSON object per event, for collectors.
    Json,
}

impl FromStr for LogFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "pretty" => Ok(LogFormat::Pretty),
            "json" => Ok(LogFormat::Json),
            other => Err(format!("unknown log format `{other}` (expected `pretty` or `json`)")),
        }
    }
}

/// Installs the global subscriber.
///
/// `RUST_LOG` wins over `directive` when set:
///
/// ```text
/// RUST_LOG=scrooge_protocol=debug scrooge-node epoch scenario.json
/// ```
///
/// # Errors
///
/// If a global subscriber is already installed.
pub fn init_logging(directive: &str, format: LogFormat) -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directive));
    let registry = tracing_subscriber::registry().with(filter);

    let installed = match format {
        LogFormat::Pretty => registry
            .with(fmt::layer().pretty().with_writer(std::io::stderr))
            .try_init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .try_init(),
    };
    installed.map_err(|e| anyhow!("failed to install tracing subscriber: {e}"))
}
