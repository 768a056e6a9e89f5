//! # Protocol Constants
//!
//! Every fixed number the ledger depends on lives here. The core has no
//! runtime tunables: changing any of these changes which transactions are
//! valid and which hashes they get, so treat edits as a protocol break.

// ---------------------------------------------------------------------------
// Cryptographic Parameters
// ---------------------------------------------------------------------------

/// Signature scheme used for input authorization.
pub const SIGNING_ALGORITHM: &str = "Ed25519";

/// Ed25519 secret key length in bytes.
pub const SIGNING_KEY_LENGTH: usize = 32;

/// Ed25519 public (verifying) key length in bytes.
pub const VERIFYING_KEY_LENGTH: usize = 32;

/// Ed25519 signature length. Always 64 bytes.
pub const SIGNATURE_LENGTH: usize = 64;

/// Transaction content hash: `SHA-256(SHA-256(raw_bytes))`.
pub const TX_HASH_FUNCTION: &str = "double-SHA-256";

/// Ledger digest hash.
pub const LEDGER_DIGEST_FUNCTION: &str = "BLAKE3";

/// Output length of both hash functions, in bytes.
pub const HASH_OUTPUT_LENGTH: usize = 32;

// ---------------------------------------------------------------------------
// Canonical Encoding
// ---------------------------------------------------------------------------

/// Domain tag prefixed to every per-input signing message. Keeps a
/// signature over a ledger message from ever being replayed as a signature
/// over some other byte string the same key signs.
pub const SIGNING_DOMAIN_TAG: &[u8] = b"scrooge/sign/v1";

/// Domain tag prefixed to the raw transaction bytes before hashing.
pub const TX_HASH_DOMAIN_TAG: &[u8] = b"scrooge/tx/v1";

/// Domain tag prefixed to each ledger entry when computing the digest.
pub const LEDGER_DIGEST_DOMAIN_TAG: &[u8] = b"scrooge/ledger/v1";

/// Encoding version written into the raw transaction bytes.
pub const TX_ENCODING_VERSION: u16 = 1;

// ---------------------------------------------------------------------------
// Amounts
// ---------------------------------------------------------------------------

/// Number of minor units in one whole coin. Amounts are integers in the
/// minor unit, so display is the only place this matters.
pub const MINOR_UNITS_PER_COIN: i64 = 100;

/// Decimal places shown when formatting an amount as whole coins.
pub const AMOUNT_DECIMALS: u32 = 2;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_crypto_parameter_sizes() {
        assert_eq!(SIGNING_KEY_LENGTH, 32);
        assert_eq!(VERIFYING_KEY_LENGTH, 32);
        assert_eq!(SIGNATURE_LENGTH, 64);
        assert_eq!(HASH_OUTPUT_LENGTH, 32);
    }

    #[test]
    fn test_domain_tags_are_distinct() {
        // A shared tag would let a signing message collide with hash input.
        assert_ne!(SIGNING_DOMAIN_TAG, TX_HASH_DOMAIN_TAG);
        assert_ne!(SIGNING_DOMAIN_TAG, LEDGER_DIGEST_DOMAIN_TAG);
        assert_ne!(TX_HASH_DOMAIN_TAG, LEDGER_DIGEST_DOMAIN_TAG);
    }

    #[test]
    fn test_minor_units_match_decimals() {
        assert_eq!(10i64.pow(AMOUNT_DECIMALS), MINOR_UNITS_PER_COIN);
    }
}
