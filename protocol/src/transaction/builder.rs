//! Transaction construction and finalization.
//!
//! A transaction has two lives. While it is a [`TransactionBuilder`] its
//! inputs and outputs can be edited and signatures attached one input at a
//! time. [`TransactionBuilder::finalize`] turns it into a [`Transaction`]:
//! the content hash is computed exactly once and nothing can change after.
//! The validator only ever sees finalized transactions.
//!
//! # Canonical Byte Formats
//!
//! Both formats are fixed-width little-endian with explicit counts. serde is
//! not involved, so hashes and signing messages are independent of any
//! serialization format's field ordering.
//!
//! Signing message for input `i`:
//!
//! ```text
//! SIGNING_DOMAIN_TAG
//! i                                  u32
//! nonce                              u64
//! n_inputs                           u32
//! n_inputs  x (tx_hash[32] index u32)
//! n_outputs                          u32
//! n_outputs x (amount i64 owner[32])
//! ```
//!
//! Every input's claim is covered but no signature is, so each input can be
//! signed independently and in any order.
//!
//! The nonce exists for coinbases. With no inputs, two grants of the same
//! amount to the same owner would otherwise share a hash, and so share the
//! id of their only output.
//!
//! Raw transaction bytes (content hash preimage):
//!
//! ```text
//! TX_HASH_DOMAIN_TAG
//! TX_ENCODING_VERSION                u16
//! nonce                              u64
//! n_inputs                           u32
//! n_inputs  x (tx_hash[32] index u32 flag u8 [sig_len u32 sig])
//! n_outputs                          u32
//! n_outputs x (amount i64 owner[32])
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::types::{Amount, Input, Output, TxHash, UtxoId};
use crate::config::{SIGNING_DOMAIN_TAG, TX_ENCODING_VERSION, TX_HASH_DOMAIN_TAG};
use crate::crypto::hash::double_sha256;
use crate::crypto::keys::{PublicKey, Signature};

/// Errors raised while editing a transaction before finalization.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum BuilderError {
    /// The input index does not exist.
    #[error("input index {index} out of range (transaction has {len} inputs)")]
    InputIndexOutOfRange { index: usize, len: usize },
}

// ---------------------------------------------------------------------------
// Canonical encoding
// ---------------------------------------------------------------------------

fn encode_outputs(buf: &mut Vec<u8>, outputs: &[Output]) {
    buf.extend_from_slice(&(outputs.len() as u32).to_le_bytes());
    for output in outputs {
        buf.extend_from_slice(&output.amount.value().to_le_bytes());
        buf.extend_from_slice(output.owner.as_bytes());
    }
}

fn signing_message(index: usize, nonce: u64, inputs: &[Input], outputs: &[Output]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        SIGNING_DOMAIN_TAG.len() + 20 + inputs.len() * 36 + outputs.len() * 40,
    );
    buf.extend_from_slice(SIGNING_DOMAIN_TAG);
    buf.extend_from_slice(&(index as u32).to_le_bytes());
    buf.extend_from_slice(&nonce.to_le_bytes());
    buf.extend_from_slice(&(inputs.len() as u32).to_le_bytes());
    for input in inputs {
        buf.extend_from_slice(&input.claims.to_bytes());
    }
    encode_outputs(&mut buf, outputs);
    buf
}

fn raw_bytes(nonce: u64, inputs: &[Input], outputs: &[Output]) -> Vec<u8> {
    let mut buf = Vec::with_capacity(
        TX_HASH_DOMAIN_TAG.len() + 18 + inputs.len() * 105 + outputs.len() * 40,
    );
    buf.extend_from_slice(TX_HASH_DOMAIN_TAG);
    buf.extend_from_slice(&TX_ENCODING_VERSION.to_le_bytes());
    buf.extend_from_slice(&nonce.to_le_bytes());
    buf.extend_from_slice(&(inputs.len() as u32).to_le_bytes());
    for input in inputs {
        buf.extend_from_slice(&input.claims.to_bytes());
        match &input.signature {
            Some(sig) => {
                buf.push(0x01);
                buf.extend_from_slice(&(sig.as_bytes().len() as u32).to_le_bytes());
                buf.extend_from_slice(sig.as_bytes());
            }
            None => buf.push(0x00),
        }
    }
    encode_outputs(&mut buf, outputs);
    buf
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A finalized, immutable transaction.
///
/// The hash is `double_sha256(raw_bytes)` and is fixed at finalization. It
/// covers signatures, so two transactions spending the same outputs to the
/// same recipients with different signatures have different hashes.
///
/// Serializes as its body (`nonce`, `inputs`, `outputs`); deserializing
/// re-derives the hash, so a decoded `Transaction` is always
/// self-consistent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "TransactionBody", into = "TransactionBody")]
pub struct Transaction {
    hash: TxHash,
    nonce: u64,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
}

fn is_zero(nonce: &u64) -> bool {
    *nonce == 0
}

/// Wire form of a transaction. A zero nonce is omitted.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct TransactionBody {
    #[serde(default, skip_serializing_if = "is_zero")]
    nonce: u64,
    #[serde(default)]
    inputs: Vec<Input>,
    #[serde(default)]
    outputs: Vec<Output>,
}

impl From<TransactionBody> for Transaction {
    fn from(body: TransactionBody) -> Self {
        Transaction::seal(body.nonce, body.inputs, body.outputs)
    }
}

impl From<Transaction> for TransactionBody {
    fn from(tx: Transaction) -> Self {
        TransactionBody {
            nonce: tx.nonce,
            inputs: tx.inputs,
            outputs: tx.outputs,
        }
    }
}

impl Transaction {
    fn seal(nonce: u64, inputs: Vec<Input>, outputs: Vec<Output>) -> Self {
        let hash = TxHash::new(double_sha256(&raw_bytes(nonce, &inputs, &outputs)));
        Self {
            hash,
            nonce,
            inputs,
            outputs,
        }
    }

    /// A coinbase: no inputs, one output minting `amount` to `owner`.
    ///
    /// `nonce` tells apart grants that are otherwise identical; give every
    /// coinbase seeding the same ledger a distinct one (a height or a
    /// counter). The validator gives coinbases no special treatment, so one
    /// offered in a batch fails the value check. Coinbases exist to seed a
    /// ledger (see [`LedgerState::from_transactions`](crate::ledger::LedgerState::from_transactions)).
    pub fn coinbase(nonce: u64, amount: impl Into<Amount>, owner: PublicKey) -> Self {
        TransactionBuilder::new()
            .nonce(nonce)
            .output(amount, owner)
            .finalize()
    }

    /// Content hash, fixed at finalization.
    pub fn hash(&self) -> TxHash {
        self.hash
    }

    pub fn nonce(&self) -> u64 {
        self.nonce
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn input(&self, index: usize) -> Option<&Input> {
        self.inputs.get(index)
    }

    pub fn output(&self, index: usize) -> Option<&Output> {
        self.outputs.get(index)
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// `true` for an input-less transaction.
    pub fn is_coinbase(&self) -> bool {
        self.inputs.is_empty()
    }

    /// The exact bytes input `index`'s signature must cover. `None` if the
    /// index is out of range.
    pub fn signing_message(&self, index: usize) -> Option<Vec<u8>> {
        (index < self.inputs.len())
            .then(|| signing_message(index, self.nonce, &self.inputs, &self.outputs))
    }

    /// The content-hash preimage.
    pub fn raw_bytes(&self) -> Vec<u8> {
        raw_bytes(self.nonce, &self.inputs, &self.outputs)
    }

    /// The ledger entries this transaction creates once accepted: each
    /// output keyed by this transaction's hash and the output's position.
    pub fn created_utxos(&self) -> impl Iterator<Item = (UtxoId, &Output)> + '_ {
        self.outputs
            .iter()
            .enumerate()
            .map(move |(index, output)| (UtxoId::new(self.hash, index as u32), output))
    }

    /// The ledger entries this transaction claims, in declaration order.
    pub fn claimed_utxos(&self) -> impl Iterator<Item = UtxoId> + '_ {
        self.inputs.iter().map(|input| input.claims)
    }
}

// ---------------------------------------------------------------------------
// TransactionBuilder
// ---------------------------------------------------------------------------

/// Mutable, pre-finalization transaction.
///
/// # Usage
///
/// ```
/// use scrooge_protocol::crypto::Keypair;
/// use scrooge_protocol::transaction::{sign_input, Transaction, TransactionBuilder, UtxoId};
///
/// let alice = Keypair::generate();
/// let bob = Keypair::generate();
/// let genesis = Transaction::coinbase(0, 100, alice.public_key());
///
/// let mut builder = TransactionBuilder::new()
///     .input(UtxoId::new(genesis.hash(), 0))
///     .output(10, bob.public_key())
///     .output(90, alice.public_key());
/// sign_input(&mut builder, 0, &alice).unwrap();
/// let tx = builder.finalize();
/// assert_eq!(tx.num_outputs(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransactionBuilder {
    nonce: u64,
    inputs: Vec<Input>,
    outputs: Vec<Output>,
}

impl TransactionBuilder {
    /// An empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the nonce. Zero unless set.
    pub fn nonce(mut self, nonce: u64) -> Self {
        self.nonce = nonce;
        self
    }

    /// Appends an unsigned input claiming `claims`.
    pub fn input(mut self, claims: UtxoId) -> Self {
        self.inputs.push(Input::new(claims));
        self
    }

    /// Appends an output of `amount` owned by `owner`.
    pub fn output(mut self, amount: impl Into<Amount>, owner: PublicKey) -> Self {
        self.outputs.push(Output::new(amount, owner));
        self
    }

    /// Appends an input in place.
    pub fn add_input(&mut self, claims: UtxoId) {
        self.inputs.push(Input::new(claims));
    }

    /// Appends an output in place.
    pub fn add_output(&mut self, amount: impl Into<Amount>, owner: PublicKey) {
        self.outputs.push(Output::new(amount, owner));
    }

    /// Removes and returns the input at `index`, if any. Later inputs shift
    /// down, so signing messages of every input change: sign after editing.
    pub fn remove_input(&mut self, index: usize) -> Option<Input> {
        (index < self.inputs.len()).then(|| self.inputs.remove(index))
    }

    /// Removes the first input claiming `claims`. Returns whether one was
    /// found.
    pub fn remove_input_by_utxo(&mut self, claims: &UtxoId) -> bool {
        match self.inputs.iter().position(|input| &input.claims == claims) {
            Some(index) => {
                self.inputs.remove(index);
                true
            }
            None => false,
        }
    }

    /// Attaches (or replaces) the signature on input `index`.
    pub fn add_signature(&mut self, index: usize, signature: Signature) -> Result<(), BuilderError> {
        let len = self.inputs.len();
        let input = self
            .inputs
            .get_mut(index)
            .ok_or(BuilderError::InputIndexOutOfRange { index, len })?;
        input.signature = Some(signature);
        Ok(())
    }

    /// The bytes input `index` must be signed over, given the current
    /// inputs and outputs.
    pub fn signing_message(&self, index: usize) -> Result<Vec<u8>, BuilderError> {
        if index >= self.inputs.len() {
            return Err(BuilderError::InputIndexOutOfRange {
                index,
                len: self.inputs.len(),
            });
        }
        Ok(signing_message(index, self.nonce, &self.inputs, &self.outputs))
    }

    pub fn inputs(&self) -> &[Input] {
        &self.inputs
    }

    pub fn outputs(&self) -> &[Output] {
        &self.outputs
    }

    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Computes the content hash and freezes the transaction.
    pub fn finalize(self) -> Transaction {
        Transaction::seal(self.nonce, self.inputs, self.outputs)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::keys::Keypair;

    fn key(seed: u8) -> PublicKey {
        Keypair::from_seed(&[seed; 32]).public_key()
    }

    fn utxo(byte: u8, index: u32) -> UtxoId {
        UtxoId::new(TxHash::new([byte; 32]), index)
    }

    #[test]
    fn finalize_is_deterministic() {
        let build = || {
            TransactionBuilder::new()
                .input(utxo(1, 0))
                .output(10, key(2))
                .finalize()
        };
        assert_eq!(build().hash(), build().hash());
    }

    #[test]
    fn hash_depends_on_outputs() {
        let a = TransactionBuilder::new()
            .input(utxo(1, 0))
            .output(10, key(2))
            .finalize();
        let b = TransactionBuilder::new()
            .input(utxo(1, 0))
            .output(11, key(2))
            .finalize();
        assert_ne!(a.hash(), b.hash());
    }

    #[test]
    fn hash_covers_signatures() {
        let mut unsigned = TransactionBuilder::new()
            .input(utxo(1, 0))
            .output(10, key(2));
        let before = unsigned.clone().finalize().hash();
        unsigned
            .add_signature(0, Signature::from_bytes([9u8; 64]))
            .unwrap();
        assert_ne!(before, unsigned.finalize().hash());
    }

    #[test]
    fn signing_message_excludes_signatures() {
        let mut builder = TransactionBuilder::new()
            .input(utxo(1, 0))
            .input(utxo(1, 1))
            .output(10, key(2));
        let before = builder.signing_message(0).unwrap();
        builder
            .add_signature(1, Signature::from_bytes([7u8; 64]))
            .unwrap();
        assert_eq!(builder.signing_message(0).unwrap(), before);
    }

    #[test]
    fn signing_message_differs_per_input() {
        let builder = TransactionBuilder::new()
            .input(utxo(1, 0))
            .input(utxo(1, 1))
            .output(10, key(2));
        assert_ne!(
            builder.signing_message(0).unwrap(),
            builder.signing_message(1).unwrap()
        );
    }

    #[test]
    fn signing_message_survives_finalization() {
        let builder = TransactionBuilder::new()
            .input(utxo(1, 0))
            .output(10, key(2));
        let msg = builder.signing_message(0).unwrap();
        let tx = builder.finalize();
        assert_eq!(tx.signing_message(0), Some(msg));
        assert_eq!(tx.signing_message(1), None);
    }

    #[test]
    fn add_signature_out_of_range() {
        let mut builder = TransactionBuilder::new().input(utxo(1, 0));
        assert_eq!(
            builder.add_signature(3, Signature::from_bytes([0u8; 64])),
            Err(BuilderError::InputIndexOutOfRange { index: 3, len: 1 })
        );
    }

    #[test]
    fn remove_input_by_index_and_utxo() {
        let mut builder = TransactionBuilder::new()
            .input(utxo(1, 0))
            .input(utxo(1, 1))
            .input(utxo(1, 2));

        let removed = builder.remove_input(1).unwrap();
        assert_eq!(removed.claims, utxo(1, 1));
        assert!(builder.remove_input(5).is_none());

        assert!(builder.remove_input_by_utxo(&utxo(1, 2)));
        assert!(!builder.remove_input_by_utxo(&utxo(1, 2)));
        assert_eq!(builder.num_inputs(), 1);
    }

    #[test]
    fn in_place_editing_matches_chaining() {
        let chained = TransactionBuilder::new()
            .input(utxo(4, 0))
            .output(3, key(1));
        let mut in_place = TransactionBuilder::new();
        in_place.add_input(utxo(4, 0));
        in_place.add_output(3, key(1));
        assert_eq!(chained, in_place);
    }

    #[test]
    fn coinbase_shape() {
        let cb = Transaction::coinbase(0, 100, key(1));
        assert!(cb.is_coinbase());
        assert_eq!(cb.num_outputs(), 1);
        assert_eq!(cb.output(0).unwrap().amount, Amount::new(100));
    }

    #[test]
    fn nonce_separates_identical_coinbases() {
        let a = Transaction::coinbase(0, 100, key(1));
        let b = Transaction::coinbase(1, 100, key(1));
        assert_ne!(a.hash(), b.hash());
        assert_ne!(a.created_utxos().next(), b.created_utxos().next());
        assert_eq!(Transaction::coinbase(1, 100, key(1)).hash(), b.hash());
        assert_eq!(b.nonce(), 1);
    }

    #[test]
    fn nonce_is_covered_by_signing_message() {
        let base = TransactionBuilder::new()
            .input(utxo(1, 0))
            .output(10, key(2));
        assert_ne!(
            base.signing_message(0).unwrap(),
            base.clone().nonce(9).signing_message(0).unwrap()
        );
    }

    #[test]
    fn nonce_survives_serde_and_zero_is_omitted() {
        let plain = TransactionBuilder::new().output(1, key(1)).finalize();
        let value = serde_json::to_value(&plain).unwrap();
        assert!(value.get("nonce").is_none());

        let grant = Transaction::coinbase(42, 1, key(1));
        let json = serde_json::to_string(&grant).unwrap();
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded.nonce(), 42);
        assert_eq!(decoded.hash(), grant.hash());
    }

    #[test]
    fn created_utxos_use_hash_and_position() {
        let tx = TransactionBuilder::new()
            .output(1, key(1))
            .output(2, key(2))
            .finalize();
        let created: Vec<_> = tx.created_utxos().map(|(id, _)| id).collect();
        assert_eq!(
            created,
            vec![UtxoId::new(tx.hash(), 0), UtxoId::new(tx.hash(), 1)]
        );
    }

    #[test]
    fn serde_roundtrip_recomputes_hash() {
        let mut builder = TransactionBuilder::new()
            .input(utxo(1, 0))
            .output(10, key(2));
        builder
            .add_signature(0, Signature::from_bytes([5u8; 64]))
            .unwrap();
        let tx = builder.finalize();

        let json = serde_json::to_string(&tx).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert!(value.get("hash").is_none());
        let decoded: Transaction = serde_json::from_str(&json).unwrap();
        assert_eq!(decoded, tx);
        assert_eq!(decoded.hash(), tx.hash());
    }
}
