//! # Digital Signatures
//!
//! The validator does not call ed25519-dalek directly. It asks a
//! [`SignatureVerifier`] whether a signature is good, which keeps the
//! signature scheme an injected capability: the ledger rules are the same
//! whether the verifier is [`Ed25519Verifier`], a test double, or a batch
//! verifier behind a cache.
//!
//! ## Faults
//!
//! `verify` answers `true` or `false`. A verifier that cannot answer at all
//! (a hardware token gone away, a poisoned cache) must panic rather than
//! return `false`: a broken capability is not a bad signature, and the panic
//! unwinds out of validation and epoch resolution untouched.

use super::keys::{Keypair, PublicKey, Signature};

/// Signature verification as a capability consumed by the validator.
pub trait SignatureVerifier {
    /// Returns `true` iff `signature` is a valid signature by `public_key`
    /// over exactly `message`.
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool;
}

/// Verifier backed by ed25519-dalek.
#[derive(Debug, Clone, Copy, Default)]
pub struct Ed25519Verifier;

impl SignatureVerifier for Ed25519Verifier {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        public_key.verify(message, signature)
    }
}

impl<V: SignatureVerifier + ?Sized> SignatureVerifier for &V {
    fn verify(&self, public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
        (**self).verify(public_key, message, signature)
    }
}

/// Sign a message with a keypair.
///
/// # Example
///
/// ```
/// use scrooge_protocol::crypto::{sign, verify, Keypair};
///
/// let keypair = Keypair::generate();
/// let signature = sign(&keypair, b"claim output 3");
/// assert!(verify(&keypair.public_key(), b"claim output 3", &signature));
/// ```
pub fn sign(keypair: &Keypair, message: &[u8]) -> Signature {
    keypair.sign(message)
}

/// Verify an Ed25519 signature. Shorthand for [`Ed25519Verifier`].
pub fn verify(public_key: &PublicKey, message: &[u8], signature: &Signature) -> bool {
    Ed25519Verifier.verify(public_key, message, signature)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct RejectAll;

    impl SignatureVerifier for RejectAll {
        fn verify(&self, _: &PublicKey, _: &[u8], _: &Signature) -> bool {
            false
        }
    }

    #[test]
    fn test_sign_and_verify() {
        let kp = Keypair::generate();
        let sig = sign(&kp, b"hello, ledger");
        assert!(verify(&kp.public_key(), b"hello, ledger", &sig));
    }

    #[test]
    fn test_wrong_key_fails() {
        let kp1 = Keypair::generate();
        let kp2 = Keypair::generate();
        let sig = sign(&kp1, b"test message");
        assert!(!verify(&kp2.public_key(), b"test message", &sig));
    }

    #[test]
    fn test_empty_message() {
        let kp = Keypair::generate();
        let sig = sign(&kp, b"");
        assert!(verify(&kp.public_key(), b"", &sig));
    }

    #[test]
    fn test_verifier_through_reference() {
        let kp = Keypair::generate();
        let sig = sign(&kp, b"msg");
        let verifier = Ed25519Verifier;
        let by_ref: &dyn SignatureVerifier = &verifier;
        assert!(by_ref.verify(&kp.public_key(), b"msg", &sig));
    }

    #[test]
    fn test_custom_verifier_overrides_scheme() {
        let kp = Keypair::generate();
        let sig = sign(&kp, b"msg");
        assert!(!RejectAll.verify(&kp.public_key(), b"msg", &sig));
    }
}
