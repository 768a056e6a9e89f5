//! # Scenario Files
//!
//! A scenario is a starting ledger plus a batch of candidate transactions,
//! stored as JSON:
//!
//! ```json
//! {
//!   "ledger":     [{ "utxo": { "tx_hash": "..", "index": 0 },
//!                    "output": { "amount": 100, "owner": ".." } }],
//!   "candidates": [{ "inputs": [..], "outputs": [..] }]
//! }
//! ```
//!
//! Candidates carry no hash; it is re-derived when they are decoded.

use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

use scrooge_protocol::crypto::Keypair;
use scrooge_protocol::epoch::EpochResolver;
use scrooge_protocol::ledger::{LedgerEntry, LedgerState};
use scrooge_protocol::transaction::{sign_input, Transaction, TransactionBuilder, TxHash, UtxoId};

/// Fixed seeds for the sample scenario's participants.
const ALICE_SEED: [u8; 32] = [0xA1; 32];
const BOB_SEED: [u8; 32] = [0xB0; 32];
const CAROL_SEED: [u8; 32] = [0xC0; 32];

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Scenario {
    #[serde(default)]
    pub ledger: Vec<LedgerEntry>,
    #[serde(default)]
    pub candidates: Vec<Transaction>,
}

/// What `epoch` prints.
#[derive(Debug, Clone, Serialize)]
pub struct EpochOutcome {
    /// Accepted transaction hashes, in acceptance order.
    pub accepted: Vec<TxHash>,
    pub dropped: Vec<DroppedTx>,
    pub passes: usize,
    /// Final ledger, sorted by id.
    pub ledger: Vec<LedgerEntry>,
    pub ledger_digest: String,
    /// Decimal string: the sum is `i128`.
    pub total_value: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct DroppedTx {
    pub tx: TxHash,
    pub reason: String,
}

impl Scenario {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read scenario {}", path.display()))?;
        serde_json::from_str(&raw)
            .with_context(|| format!("failed to parse scenario {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write scenario {}", path.display()))
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("failed to encode scenario")
    }

    /// Ledger `U0 = (100, Alice)`; batch `[tx1, tx2]` where tx1 pays 10 to
    /// Bob with 90 change to Alice and tx2 forwards Bob's 10 to Carol.
    pub fn alice_bob_carol() -> Result<Self> {
        let alice = Keypair::from_seed(&ALICE_SEED);
        let bob = Keypair::from_seed(&BOB_SEED);
        let carol = Keypair::from_seed(&CAROL_SEED);

        let genesis = Transaction::coinbase(0, 100, alice.public_key());

        let mut tx1 = TransactionBuilder::new()
            .input(UtxoId::new(genesis.hash(), 0))
            .output(10, bob.public_key())
            .output(90, alice.public_key());
        sign_input(&mut tx1, 0, &alice).context("signing tx1")?;
        let tx1 = tx1.finalize();

        let mut tx2 = TransactionBuilder::new()
            .input(UtxoId::new(tx1.hash(), 0))
            .output(10, carol.public_key());
        sign_input(&mut tx2, 0, &bob).context("signing tx2")?;
        let tx2 = tx2.finalize();

        Ok(Scenario {
            ledger: LedgerState::from_transactions([&genesis]).entries(),
            candidates: vec![tx1, tx2],
        })
    }

    /// The starting ledger. Later entries win over earlier ones with the
    /// same id.
    pub fn initial_ledger(&self) -> LedgerState {
        let ledger: LedgerState = self.ledger.iter().copied().collect();
        if ledger.len() != self.ledger.len() {
            warn!(
                entries = self.ledger.len(),
                distinct = ledger.len(),
                "scenario ledger repeats ids, later entries win"
            );
        }
        ledger
    }

    /// Resolves the candidates against the starting ledger.
    pub fn resolve(&self) -> EpochOutcome {
        let mut resolver = EpochResolver::new(&self.initial_ledger());
        let report = resolver.process_epoch_with_report(self.candidates.iter().cloned());
        let ledger = resolver.into_ledger();

        EpochOutcome {
            accepted: report.accepted_hashes(),
            dropped: report
                .dropped
                .iter()
                .map(|d| DroppedTx {
                    tx: d.tx.hash(),
                    reason: d.reason.to_string(),
                })
                .collect(),
            passes: report.passes,
            ledger: ledger.entries(),
            ledger_digest: ledger.digest_hex(),
            total_value: ledger.total_value().to_string(),
        }
    }
}
