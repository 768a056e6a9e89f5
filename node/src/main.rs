// Copyright (c) 2026 Scrooge Ledger Contributors. MIT License.
// See LICENSE for details.

//! # Scrooge Node
//!
//! Entry point for the `scrooge-node` binary. Parses CLI arguments,
//! initializes logging, and dispatches:
//!
//! - `keygen`  - print a fresh Ed25519 keypair
//! - `demo`    - write the Alice/Bob/Carol sample scenario
//! - `epoch`   - resolve a scenario file and print the outcome
//! - `version` - print build version information

mod cli;
mod logging;
mod scenario;

use anyhow::{Context, Result};
use clap::Parser;

use scrooge_protocol::config;
use scrooge_protocol::crypto::Keypair;

use cli::{Commands, ScroogeNodeCli};
use scenario::Scenario;

fn main() -> Result<()> {
    let cli = ScroogeNodeCli::parse();
    logging::init_logging(&cli.log, cli.log_format)?;

    match cli.command {
        Commands::Keygen => keygen(),
        Commands::Demo(args) => demo(args),
        Commands::Epoch(args) => epoch(args),
        Commands::Version => {
            print_version();
            Ok(())
        }
    }
}

/// Prints a fresh keypair. The secret goes to stdout only.
fn keygen() -> Result<()> {
    let keypair = Keypair::generate();
    let public_key = keypair.public_key().to_hex();
    tracing::info!(public_key = %public_key, "keypair generated");

    let out = serde_json::json!({
        "public_key": public_key,
        "secret_key": keypair.secret_key_hex(),
    });
    println!("{}", serde_json::to_string_pretty(&out).context("failed to encode keypair")?);
    Ok(())
}

fn demo(args: cli::DemoArgs) -> Result<()> {
    let scenario = Scenario::alice_bob_carol()?;

    match args.out {
        Some(path) => {
            scenario.save(&path)?;
            tracing::info!(
                path = %path.display(),
                candidates = scenario.candidates.len(),
                "sample scenario written"
            );
        }
        None => println!("{}", scenario.to_json_pretty()?),
    }
    Ok(())
}

fn epoch(args: cli::EpochArgs) -> Result<()> {
    let scenario = Scenario::load(&args.scenario)?;
    tracing::info!(
        path = %args.scenario.display(),
        utxos = scenario.ledger.len(),
        candidates = scenario.candidates.len(),
        "scenario loaded"
    );

    let outcome = scenario.resolve();
    let json = if args.pretty {
        serde_json::to_string_pretty(&outcome)
    } else {
        serde_json::to_string(&outcome)
    }
    .context("failed to encode epoch outcome")?;

    println!("{json}");
    Ok(())
}

fn print_version() {
    println!("scrooge-node {}", env!("CARGO_PKG_VERSION"));
    println!("encoding     v{}", config::TX_ENCODING_VERSION);
    println!("signatures   {}", config::SIGNING_ALGORITHM);
    println!("tx hash      {}", config::TX_HASH_FUNCTION);
    println!("ledger hash  {}", config::LEDGER_DIGEST_FUNCTION);
}
