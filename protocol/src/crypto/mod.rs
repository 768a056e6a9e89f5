//! # Cryptographic Primitives
//!
//! Thin, type-safe wrappers around audited implementations:
//!
//! - **Ed25519** (ed25519-dalek) authorizes spending an output.
//! - **double-SHA-256** (sha2) names a transaction.
//! - **BLAKE3** digests a ledger state.
//!
//! Nothing here knows about transactions or ledgers.

pub mod hash;
pub mod keys;
pub mod signatures;

pub use hash::{blake3_hash, double_sha256, sha256};
pub use keys::{KeyError, Keypair, PublicKey, Signature};
pub use signatures::{sign, verify, Ed25519Verifier, SignatureVerifier};
