//! The transaction validator.
//!
//! [`check_transaction`] decides whether one finalized transaction may be
//! applied to a ledger state. It reads the state and never writes it, holds
//! no state of its own, and gives the same answer every time it is asked
//! the same question. [`is_valid`] is the boolean form the epoch resolver
//! and most callers want.
//!
//! Rules, in order, stopping at the first failure:
//!
//! 1. No input claims a [`UtxoId`] an earlier input of the same transaction
//!    already claimed.
//! 2. Every claimed id is in the ledger.
//! 3. Every input carries a signature that the verifier accepts for the
//!    claimed output's owner over that input's signing message. The key
//!    comes from the ledger, never from the transaction.
//! 4. No output amount is negative.
//! 5. The claimed outputs are worth at least as much as the new outputs.
//!    The difference is destroyed.
//!
//! Rules 1 to 3 run per input, in declaration order, before rules 4 and 5.

use std::collections::HashSet;

use thiserror::Error;

use super::builder::Transaction;
use super::types::{Amount, UtxoId};
use crate::crypto::signatures::SignatureVerifier;
use crate::ledger::LedgerState;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

/// Why a transaction was rejected.
///
/// These are diagnostics, not faults: every variant is an ordinary "no".
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Two inputs of the same transaction claim one output.
    #[error("input {index} claims {utxo}, already claimed by an earlier input")]
    DuplicateClaim { index: usize, utxo: UtxoId },

    /// The claimed output does not exist or was already spent.
    #[error("input {index} claims {utxo}, which is not in the ledger")]
    MissingUtxo { index: usize, utxo: UtxoId },

    /// The input has no signature attached.
    #[error("input {index} is unsigned")]
    MissingSignature { index: usize },

    /// The signature is not the claimed output owner's over this input's
    /// signing message.
    #[error("input {index} signature does not verify against the owner of {utxo}")]
    InvalidSignature { index: usize, utxo: UtxoId },

    /// An output carries a negative amount.
    #[error("output {index} has negative amount {amount}")]
    NegativeOutput { index: usize, amount: Amount },

    /// Outputs are worth more than the outputs they spend.
    #[error("outputs total {outputs} exceeds inputs total {inputs}")]
    ValueCreated { inputs: i128, outputs: i128 },
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validates `tx` against `ledger`, reporting the first rule it breaks.
///
/// Sums are accumulated in `i128`, so no combination of `i64` amounts can
/// overflow and sneak past rule 5.
///
/// # Errors
///
/// The first failing rule as a [`ValidationError`].
///
/// # Panics
///
/// Only if `verifier` panics. A verifier that cannot answer is a broken
/// capability, not an invalid transaction.
pub fn check_transaction<V: SignatureVerifier + ?Sized>(
    tx: &Transaction,
    ledger: &LedgerState,
    verifier: &V,
) -> Result<(), ValidationError> {
    let mut claimed: HashSet<UtxoId> = HashSet::with_capacity(tx.num_inputs());
    let mut input_total: i128 = 0;

    for (index, input) in tx.inputs().iter().enumerate() {
        let utxo = input.claims;

        // 1. Duplicate claim within this transaction.
        if !claimed.insert(utxo) {
            return Err(ValidationError::DuplicateClaim { index, utxo });
        }

        // 2. Claimed output must be spendable.
        let Some(spent) = ledger.get(&utxo) else {
            return Err(ValidationError::MissingUtxo { index, utxo });
        };

        // 3. Owner of the claimed output must have signed this input.
        let signature = input
            .signature
            .as_ref()
            .ok_or(ValidationError::MissingSignature { index })?;
        let message = tx
            .signing_message(index)
            .ok_or(ValidationError::InvalidSignature { index, utxo })?;
        if !verifier.verify(&spent.owner, &message, signature) {
            return Err(ValidationError::InvalidSignature { index, utxo });
        }

        input_total += i128::from(spent.amount.value());
    }

    // 4. No negative outputs.
    if let Some((index, output)) = tx
        .outputs()
        .iter()
        .enumerate()
        .find(|(_, output)| output.amount.is_negative())
    {
        return Err(ValidationError::NegativeOutput {
            index,
            amount: output.amount,
        });
    }

    // 5. Conservation: value may be destroyed, never created.
    let output_total: i128 = tx.outputs().iter().map(|output| &output.amount).sum();
    if input_total < output_total {
        return Err(ValidationError::ValueCreated {
            inputs: input_total,
            outputs: output_total,
        });
    }

    Ok(())
}

/// `true` iff [`check_transaction`] accepts `tx` against `ledger`.
pub fn is_valid<V: SignatureVerifier + ?Sized>(
    tx: &Transaction,
    ledger: &LedgerState,
    verifier: &V,
) -> bool {
    check_transaction(tx, ledger, verifier).is_ok()
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
