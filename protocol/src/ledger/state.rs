//! # Ledger State -- the Unspent-Output Set
//!
//! A flat map from [`UtxoId`] to [`Output`]. An entry exists exactly while
//! the output it names has been created by an accepted transaction and not
//! yet claimed by one. There is no account model and no balance field:
//! a participant's funds are the entries whose `owner` is their key.
//!
//! ## Mutation
//!
//! `insert` and `remove` each touch one entry and nothing else. The
//! validator never mutates; the epoch resolver is the only caller of
//! [`LedgerState::apply_accepted`], and it only calls it on a transaction
//! it has just validated against this same state.
//!
//! ## Digest
//!
//! [`LedgerState::digest`] hashes the sorted entries with BLAKE3:
//!
//! ```text
//! leaves = sort_by_id([ BLAKE3(tag || id_bytes || amount || owner) ])
//! digest = BLAKE3(tag || count || leaves...)
//! ```
//!
//! Sorting makes the digest independent of insertion order, so two states
//! with the same entries have the same digest.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use tracing::warn;

use crate::config::LEDGER_DIGEST_DOMAIN_TAG;
use crate::crypto::hash::blake3_hash;
use crate::crypto::keys::PublicKey;
use crate::transaction::{Output, Transaction, UtxoId};

/// One `(id, output)` pair, the unit of import and export.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerEntry {
    pub utxo: UtxoId,
    pub output: Output,
}

/// The set of currently spendable outputs.
///
/// `Clone` is a deep copy: a cloned state shares nothing with its source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LedgerState {
    utxos: HashMap<UtxoId, Output>,
}

impl LedgerState {
    /// An empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// A ledger holding every output of `transactions`, as if each had been
    /// accepted. Nothing is validated and no inputs are retired. This is how
    /// genesis funds come into existence.
    ///
    /// Output ids derive from the transaction hash, so the same transaction
    /// given twice seeds its outputs once. Coinbases need distinct nonces to
    /// count separately.
    pub fn from_transactions<'a>(transactions: impl IntoIterator<Item = &'a Transaction>) -> Self {
        let mut ledger = Self::new();
        for tx in transactions {
            if tx.created_utxos().any(|(id, _)| ledger.contains(&id)) {
                warn!(tx = %tx.hash(), "transaction seeded twice, outputs counted once");
            }
            ledger.insert_outputs(tx);
        }
        ledger
    }

    /// `true` if `id` names a spendable output.
    pub fn contains(&self, id: &UtxoId) -> bool {
        self.utxos.contains_key(id)
    }

    /// The output `id` names, if it is spendable.
    pub fn get(&self, id: &UtxoId) -> Option<&Output> {
        self.utxos.get(id)
    }

    /// Adds or replaces one entry.
    pub fn insert(&mut self, id: UtxoId, output: Output) {
        self.utxos.insert(id, output);
    }

    /// Removes one entry, returning it if it was present.
    pub fn remove(&mut self, id: &UtxoId) -> Option<Output> {
        self.utxos.remove(id)
    }

    /// An independent deep copy.
    pub fn snapshot(&self) -> LedgerState {
        self.clone()
    }

    /// All ids, sorted. The order is stable across calls and across
    /// ledgers with the same entries.
    pub fn ids(&self) -> Vec<UtxoId> {
        let mut ids: Vec<UtxoId> = self.utxos.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    /// All entries, sorted by id.
    pub fn entries(&self) -> Vec<LedgerEntry> {
        let mut entries: Vec<LedgerEntry> = self
            .utxos
            .iter()
            .map(|(utxo, output)| LedgerEntry {
                utxo: *utxo,
                output: *output,
            })
            .collect();
        entries.sort_unstable_by_key(|entry| entry.utxo);
        entries
    }

    /// Unordered iteration over `(id, output)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (&UtxoId, &Output)> {
        self.utxos.iter()
    }

    pub fn len(&self) -> usize {
        self.utxos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.utxos.is_empty()
    }

    /// Sum of every spendable amount. `i128` so the sum cannot overflow.
    pub fn total_value(&self) -> i128 {
        self.utxos.values().map(|output| &output.amount).sum()
    }

    /// Entries owned by `owner`, sorted by id.
    pub fn outputs_owned_by(&self, owner: &PublicKey) -> Vec<LedgerEntry> {
        self.entries()
            .into_iter()
            .filter(|entry| &entry.output.owner == owner)
            .collect()
    }

    /// Retires every output `tx` claims and adds every output it creates.
    ///
    /// Callers must have validated `tx` against this state first; the
    /// resolver does. On a validated transaction every claimed id is present
    /// and distinct, so the removals cannot partially fail.
    pub fn apply_accepted(&mut self, tx: &Transaction) {
        for id in tx.claimed_utxos() {
            self.utxos.remove(&id);
        }
        self.insert_outputs(tx);
    }

    fn insert_outputs(&mut self, tx: &Transaction) {
        for (id, output) in tx.created_utxos() {
            self.utxos.insert(id, *output);
        }
    }

    /// Deterministic BLAKE3 digest of the sorted entries. An empty ledger
    /// digests the tag and a zero count, not all-zero bytes.
    pub fn digest(&self) -> [u8; 32] {
        let entries = self.entries();
        let mut preimage = Vec::with_capacity(LEDGER_DIGEST_DOMAIN_TAG.len() + 8 + entries.len() * 32);
        preimage.extend_from_slice(LEDGER_DIGEST_DOMAIN_TAG);
        preimage.extend_from_slice(&(entries.len() as u64).to_le_bytes());

        for entry in &entries {
            let mut leaf = Vec::with_capacity(LEDGER_DIGEST_DOMAIN_TAG.len() + 76);
            leaf.extend_from_slice(LEDGER_DIGEST_DOMAIN_TAG);
            leaf.extend_from_slice(&entry.utxo.to_bytes());
            leaf.extend_from_slice(&entry.output.amount.value().to_le_bytes());
            leaf.extend_from_slice(entry.output.owner.as_bytes());
            preimage.extend_from_slice(&blake3_hash(&leaf));
        }

        blake3_hash(&preimage)
    }

    /// [`digest`](Self::digest) as lowercase hex.
    pub fn digest_hex(&self) -> String {
        hex::encode(self.digest())
    }
}

impl FromIterator<LedgerEntry> for LedgerState {
    fn from_iter<I: IntoIterator<Item = LedgerEntry>>(iter: I) -> Self {
        Self {
            utxos: iter
                .into_iter()
                .map(|entry| (entry.utxo, entry.output))
                .collect(),
        }
    }
}

impl Extend<LedgerEntry> for LedgerState {
    fn extend<I: IntoIterator<Item = LedgerEntry>>(&mut self, iter: I) {
        self.utxos
            .extend(iter.into_iter().map(|entry| (entry.utxo, entry.output)));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Keypair;
    use crate::transaction::{Amount, TransactionBuilder, TxHash};

    fn key(seed: u8) -> PublicKey {
        Keypair::from_seed(&[seed; 32]).public_key()
    }

    fn utxo(byte: u8, index: u32) -> UtxoId {
        UtxoId::new(TxHash::new([byte; 32]), index)
    }

    #[test]
    fn insert_get_contains_remove() {
        let mut ledger = LedgerState::new();
        let out = Output::new(100, key(1));
        ledger.insert(utxo(1, 0), out);

        assert!(ledger.contains(&utxo(1, 0)));
        assert_eq!(ledger.get(&utxo(1, 0)), Some(&out));
        assert_eq!(ledger.get(&utxo(1, 1)), None);

        assert_eq!(ledger.remove(&utxo(1, 0)), Some(out));
        assert!(!ledger.contains(&utxo(1, 0)));
        assert_eq!(ledger.remove(&utxo(1, 0)), None);
        assert!(ledger.is_empty());
    }

    #[test]
    fn snapshot_is_independent() {
        let mut ledger = LedgerState::new();
        ledger.insert(utxo(1, 0), Output::new(5, key(1)));

        let mut copy = ledger.snapshot();
        copy.remove(&utxo(1, 0));
        copy.insert(utxo(2, 0), Output::new(7, key(2)));

        assert!(ledger.contains(&utxo(1, 0)));
        assert!(!ledger.contains(&utxo(2, 0)));
        assert_eq!(ledger.len(), 1);
        assert_eq!(copy.len(), 1);
    }

    #[test]
    fn ids_are_sorted_and_stable() {
        let mut a = LedgerState::new();
        a.insert(utxo(3, 1), Output::new(1, key(1)));
        a.insert(utxo(1, 0), Output::new(1, key(1)));
        a.insert(utxo(3, 0), Output::new(1, key(1)));

        let ids = a.ids();
        assert_eq!(ids, vec![utxo(1, 0), utxo(3, 0), utxo(3, 1)]);
        assert_eq!(ids, a.ids());
    }

    #[test]
    fn digest_ignores_insertion_order() {
        let mut a = LedgerState::new();
        let mut b = LedgerState::new();
        a.insert(utxo(1, 0), Output::new(100, key(1)));
        a.insert(utxo(2, 0), Output::new(200, key(2)));
        b.insert(utxo(2, 0), Output::new(200, key(2)));
        b.insert(utxo(1, 0), Output::new(100, key(1)));

        assert_eq!(a.digest(), b.digest());
    }

    #[test]
    fn digest_tracks_contents() {
        let mut a = LedgerState::new();
        let mut b = LedgerState::new();
        a.insert(utxo(1, 0), Output::new(100, key(1)));
        b.insert(utxo(1, 0), Output::new(101, key(1)));

        assert_ne!(a.digest(), b.digest());
        assert_ne!(a.digest(), LedgerState::new().digest());
    }

    #[test]
    fn from_transactions_seeds_outputs() {
        let cb1 = Transaction::coinbase(0, 100, key(1));
        let cb2 = Transaction::coinbase(1, 50, key(2));
        let ledger = LedgerState::from_transactions([&cb1, &cb2]);

        assert_eq!(ledger.len(), 2);
        assert_eq!(
            ledger.get(&UtxoId::new(cb1.hash(), 0)).map(|o| o.amount),
            Some(Amount::new(100))
        );
        assert_eq!(ledger.total_value(), 150);
    }

    #[test]
    fn equal_grants_with_distinct_nonces_stay_separate() {
        let first = Transaction::coinbase(0, 100, key(1));
        let second = Transaction::coinbase(1, 100, key(1));
        assert_ne!(first.hash(), second.hash());

        let ledger = LedgerState::from_transactions([&first, &second]);
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_value(), 200);
        assert_eq!(ledger.outputs_owned_by(&key(1)).len(), 2);
    }

    #[test]
    fn same_coinbase_twice_seeds_once() {
        let grant = Transaction::coinbase(7, 100, key(1));
        let ledger = LedgerState::from_transactions([&grant, &grant.clone()]);
        assert_eq!(ledger.len(), 1);
        assert_eq!(ledger.total_value(), 100);
    }

    #[test]
    fn apply_accepted_retires_and_creates() {
        let cb = Transaction::coinbase(0, 100, key(1));
        let mut ledger = LedgerState::from_transactions([&cb]);

        let tx = TransactionBuilder::new()
            .input(UtxoId::new(cb.hash(), 0))
            .output(60, key(2))
            .output(40, key(1))
            .finalize();
        ledger.apply_accepted(&tx);

        assert!(!ledger.contains(&UtxoId::new(cb.hash(), 0)));
        assert_eq!(ledger.len(), 2);
        assert_eq!(ledger.total_value(), 100);
        assert_eq!(ledger.outputs_owned_by(&key(2)).len(), 1);
        assert_eq!(
            ledger.outputs_owned_by(&key(1))[0].utxo,
            UtxoId::new(tx.hash(), 1)
        );
    }

    #[test]
    fn entries_roundtrip_through_from_iterator() {
        let mut ledger = LedgerState::new();
        ledger.insert(utxo(1, 0), Output::new(1, key(1)));
        ledger.insert(utxo(2, 4), Output::new(2, key(2)));

        let rebuilt: LedgerState = ledger.entries().into_iter().collect();
        assert_eq!(rebuilt, ledger);

        let mut extended = LedgerState::new();
        extended.extend(ledger.entries());
        assert_eq!(extended, ledger);
    }
}
