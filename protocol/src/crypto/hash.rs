//! # Hashing Utilities
//!
//! Two hash functions, two jobs:
//!
//! - **double-SHA-256** identifies transactions. A transaction's content hash
//!   is `SHA-256(SHA-256(raw_bytes))`, the same construction Bitcoin uses for
//!   txids, and it is what every [`UtxoId`](crate::transaction::UtxoId)
//!   points back to.
//!
//! - **BLAKE3** digests the ledger. The digest is never referenced by
//!   another structure; it exists so two ledgers can be compared in one
//!   `==` and logged as a single short value.

use sha2::{Digest, Sha256};

/// Compute the SHA-256 hash of the input data as a fixed-size array.
///
/// # Example
///
/// ```
/// use scrooge_protocol::crypto::sha256;
///
/// let hash = sha256(b"scrooge");
/// assert_eq!(hash.len(), 32);
/// ```
pub fn sha256(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    let result = hasher.finalize();
    let mut output = [0u8; 32];
    output.copy_from_slice(&result);
    output
}

/// Compute the double-SHA-256 hash: `SHA-256(SHA-256(data))`.
///
/// Used for transaction content hashes. The outer hash closes off the
/// length-extension property of a single SHA-256.
///
/// # Example
///
/// ```
/// use scrooge_protocol::crypto::double_sha256;
///
/// let tx_hash = double_sha256(b"raw transaction bytes");
/// assert_eq!(tx_hash.len(), 32);
/// ```
pub fn double_sha256(data: &[u8]) -> [u8; 32] {
    sha256(&sha256(data))
}

/// Compute the BLAKE3 hash of the input data.
pub fn blake3_hash(data: &[u8]) -> [u8; 32] {
    *blake3::hash(data).as_bytes()
}
