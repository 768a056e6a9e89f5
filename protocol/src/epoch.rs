//! # Epoch Resolver
//!
//! Given an unordered batch of candidate transactions and a ledger, picks a
//! mutually consistent subset, applies it, and returns it in acceptance
//! order.
//!
//! ## Algorithm
//!
//! Candidates may conflict (two of them claim the same output) or depend on
//! each other (one claims an output another creates). Both are handled by
//! iterating to a fixed point instead of building a dependency graph:
//!
//! ```text
//! pending = batch
//! loop:
//!     for tx in pending (in order):
//!         if is_valid(tx, ledger): apply tx to ledger, accept tx
//!         else: defer tx
//!     if nothing was accepted this pass: stop
//!     pending = deferred
//! ```
//!
//! A transaction spending an output created earlier in the batch becomes
//! valid in the pass after its parent is accepted, so chains of any depth
//! resolve. Of two transactions claiming the same output, the one evaluated
//! first wins and the other never validates again.
//!
//! ## Design
//!
//! - Greedy: the result is *a* mutually valid subset, not the largest one.
//! - Every pass either accepts something or is the last, so the number of
//!   passes is at most `batch size + 1` and resolution always terminates.
//! - Deterministic: the same batch in the same order against the same
//!   ledger gives the same result.
//! - Candidates that never validate are dropped. The resolver never fails
//!   as a whole; [`EpochReport`] keeps the last reason each was rejected.

use tracing::{debug, info};

use crate::crypto::signatures::{Ed25519Verifier, SignatureVerifier};
use crate::ledger::LedgerState;
use crate::transaction::{check_transaction, Transaction, TxHash, ValidationError};

// ---------------------------------------------------------------------------
// Report
// ---------------------------------------------------------------------------

/// A candidate that was still invalid when resolution stopped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DroppedCandidate {
    pub tx: Transaction,
    /// Why it failed on the final pass.
    pub reason: ValidationError,
}

/// Outcome of one epoch.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EpochReport {
    /// Accepted transactions, in the order they were applied.
    pub accepted: Vec<Transaction>,

    /// Rejected candidates, in batch order.
    pub dropped: Vec<DroppedCandidate>,

    /// Full passes over the pending list. Zero for an empty batch.
    pub passes: usize,
}

impl EpochReport {
    pub fn accepted_hashes(&self) -> Vec<TxHash> {
        self.accepted.iter().map(Transaction::hash).collect()
    }

    pub fn dropped_hashes(&self) -> Vec<TxHash> {
        self.dropped.iter().map(|d| d.tx.hash()).collect()
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Resolves `candidates` against `ledger`, mutating it in place, and
/// returns the accepted transactions in acceptance order.
///
/// `ledger` is borrowed exclusively for the whole call, so no one observes
/// an intermediate state.
pub fn process_epoch<V: SignatureVerifier + ?Sized>(
    candidates: impl IntoIterator<Item = Transaction>,
    ledger: &mut LedgerState,
    verifier: &V,
) -> Vec<Transaction> {
    process_epoch_with_report(candidates, ledger, verifier).accepted
}

/// [`process_epoch`], also reporting dropped candidates and pass count.
pub fn process_epoch_with_report<V: SignatureVerifier + ?Sized>(
    candidates: impl IntoIterator<Item = Transaction>,
    ledger: &mut LedgerState,
    verifier: &V,
) -> EpochReport {
    let mut pending: Vec<Transaction> = candidates.into_iter().collect();
    let candidate_count = pending.len();
    let mut accepted: Vec<Transaction> = Vec::with_capacity(candidate_count);
    let mut passes = 0usize;

    let dropped = loop {
        if pending.is_empty() {
            break Vec::new();
        }
        passes += 1;

        let accepted_before = accepted.len();
        let mut deferred: Vec<DroppedCandidate> = Vec::new();

        for tx in pending.drain(..) {
            match check_transaction(&tx, ledger, verifier) {
                Ok(()) => {
                    ledger.apply_accepted(&tx);
                    accepted.push(tx);
                }
                Err(reason) => {
                    debug!(pass = passes, tx = %tx.hash(), reason = %reason, "candidate deferred");
                    deferred.push(DroppedCandidate { tx, reason });
                }
            }
        }

        let progress = accepted.len() - accepted_before;
        debug!(
            pass = passes,
            accepted = progress,
            deferred = deferred.len(),
            "epoch pass complete"
        );

        if progress == 0 {
            break deferred;
        }
        pending = deferred.into_iter().map(|d| d.tx).collect();
    };

    info!(
        candidates = candidate_count,
        accepted = accepted.len(),
        dropped = dropped.len(),
        passes = passes,
        utxos = ledger.len(),
        "epoch resolved"
    );

    EpochReport {
        accepted,
        dropped,
        passes,
    }
}

// ---------------------------------------------------------------------------
// EpochResolver
// ---------------------------------------------------------------------------

/// A resolver that owns its ledger.
///
/// Built from a snapshot copy of the caller's state, so nothing the caller
/// holds is ever aliased or mutated. Successive epochs build on each other;
/// read the result with [`ledger`](Self::ledger) or take it back with
/// [`into_ledger`](Self::into_ledger).
#[derive(Debug, Clone)]
pub struct EpochResolver<V = Ed25519Verifier> {
    ledger: LedgerState,
    verifier: V,
}

impl EpochResolver<Ed25519Verifier> {
    /// A resolver over a private copy of `ledger`, verifying Ed25519.
    pub fn new(ledger: &LedgerState) -> Self {
        Self::with_verifier(ledger, Ed25519Verifier)
    }
}

impl<V: SignatureVerifier> EpochResolver<V> {
    /// A resolver over a private copy of `ledger` with a custom verifier.
    pub fn with_verifier(ledger: &LedgerState, verifier: V) -> Self {
        Self {
            ledger: ledger.snapshot(),
            verifier,
        }
    }

    /// `true` iff `tx` is valid against the resolver's current ledger.
    pub fn is_valid(&self, tx: &Transaction) -> bool {
        self.check(tx).is_ok()
    }

    /// Like [`is_valid`](Self::is_valid), with the failing rule.
    pub fn check(&self, tx: &Transaction) -> Result<(), ValidationError> {
        check_transaction(tx, &self.ledger, &self.verifier)
    }

    /// Resolves one epoch against the owned ledger.
    pub fn process_epoch(
        &mut self,
        candidates: impl IntoIterator<Item = Transaction>,
    ) -> Vec<Transaction> {
        process_epoch(candidates, &mut self.ledger, &self.verifier)
    }

    pub fn process_epoch_with_report(
        &mut self,
        candidates: impl IntoIterator<Item = Transaction>,
    ) -> EpochReport {
        process_epoch_with_report(candidates, &mut self.ledger, &self.verifier)
    }

    pub fn ledger(&self) -> &LedgerState {
        &self.ledger
    }

    pub fn verifier(&self) -> &V {
        &self.verifier
    }

    pub fn into_ledger(self) -> LedgerState {
        self.ledger
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
