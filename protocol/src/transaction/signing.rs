//! Per-input signing.
//!
//! Each input is authorized separately by the owner of the output it
//! claims, so a transaction spending outputs of three different owners
//! collects three signatures before it is finalized. Signing happens on the
//! [`TransactionBuilder`]; a finalized [`Transaction`](super::Transaction)
//! can no longer take signatures.

use super::builder::{BuilderError, TransactionBuilder};
use crate::crypto::keys::Keypair;

/// Signs input `index` of `builder` with `keypair`, replacing any earlier
/// signature on that input.
///
/// The keypair must own the output the input claims; nothing here checks
/// that, the validator does. Editing inputs or outputs after signing
/// invalidates every signature already attached.
///
/// # Errors
///
/// [`BuilderError::InputIndexOutOfRange`] if `index` does not name an
/// input.
pub fn sign_input(
    builder: &mut TransactionBuilder,
    index: usize,
    keypair: &Keypair,
) -> Result<(), BuilderError> {
    let message = builder.signing_message(index)?;
    let signature = keypair.sign(&message);
    builder.add_signature(index, signature)
}

/// Signs every input with the same keypair. Convenience for the common
/// case of a single owner consolidating or splitting their own outputs.
pub fn sign_all_inputs(
    builder: &mut TransactionBuilder,
    keypair: &Keypair,
) -> Result<(), BuilderError> {
    for index in 0..builder.num_inputs() {
        sign_input(builder, index, keypair)?;
    }
    Ok(())
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crypto::signatures::verify;
    use crate::transaction::types::{TxHash, UtxoId};

    fn utxo(index: u32) -> UtxoId {
        UtxoId::new(TxHash::new([1u8; 32]), index)
    }

    #[test]
    fn sign_sets_signature_field() {
        let kp = Keypair::generate();
        let mut builder = TransactionBuilder::new()
            .input(utxo(0))
            .output(5, kp.public_key());

        assert!(!builder.inputs()[0].is_signed());
        sign_input(&mut builder, 0, &kp).unwrap();
        assert!(builder.inputs()[0].is_signed());
    }

    #[test]
    fn signature_verifies_against_signing_message() {
        let kp = Keypair::generate();
        let mut builder = TransactionBuilder::new()
            .input(utxo(0))
            .output(5, kp.public_key());
        sign_input(&mut builder, 0, &kp).unwrap();

        let tx = builder.finalize();
        let sig = tx.input(0).unwrap().signature.as_ref().unwrap();
        assert!(verify(&kp.public_key(), &tx.signing_message(0).unwrap(), sig));
    }

    #[test]
    fn signing_one_input_leaves_others_untouched() {
        let kp = Keypair::generate();
        let mut builder = TransactionBuilder::new()
            .input(utxo(0))
            .input(utxo(1))
            .output(5, kp.public_key());
        sign_input(&mut builder, 1, &kp).unwrap();

        assert!(!builder.inputs()[0].is_signed());
        assert!(builder.inputs()[1].is_signed());
    }

    #[test]
    fn signing_order_does_not_matter() {
        let kp_a = Keypair::from_seed(&[1u8; 32]);
        let kp_b = Keypair::from_seed(&[2u8; 32]);
        let base = TransactionBuilder::new()
            .input(utxo(0))
            .input(utxo(1))
            .output(5, kp_a.public_key());

        let mut forward = base.clone();
        sign_input(&mut forward, 0, &kp_a).unwrap();
        sign_input(&mut forward, 1, &kp_b).unwrap();

        let mut backward = base;
        sign_input(&mut backward, 1, &kp_b).unwrap();
        sign_input(&mut backward, 0, &kp_a).unwrap();

        assert_eq!(forward.finalize().hash(), backward.finalize().hash());
    }

    #[test]
    fn sign_out_of_range_fails() {
        let kp = Keypair::generate();
        let mut builder = TransactionBuilder::new().input(utxo(0));
        assert!(sign_input(&mut builder, 1, &kp).is_err());
    }

    #[test]
    fn sign_all_inputs_signs_each() {
        let kp = Keypair::generate();
        let mut builder = TransactionBuilder::new()
            .input(utxo(0))
            .input(utxo(1))
            .input(utxo(2))
            .output(5, kp.public_key());
        sign_all_inputs(&mut builder, &kp).unwrap();
        assert!(builder.inputs().iter().all(|i| i.is_signed()));
    }
}
