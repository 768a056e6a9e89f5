//! Value types shared by transactions and the ledger.
//!
//! These are small and mostly `Copy`. A [`UtxoId`] is the key of the
//! ledger map and gets hashed on every validator call, so it stays a flat
//! 36-byte value.

use serde::{de, Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;

use crate::config::{AMOUNT_DECIMALS, HASH_OUTPUT_LENGTH, MINOR_UNITS_PER_COIN};
use crate::crypto::keys::{PublicKey, Signature};

// ---------------------------------------------------------------------------
// TxHash
// ---------------------------------------------------------------------------

/// Content hash of a finalized transaction (double-SHA-256).
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TxHash([u8; HASH_OUTPUT_LENGTH]);

impl TxHash {
    /// Wrap raw digest bytes.
    pub const fn new(bytes: [u8; HASH_OUTPUT_LENGTH]) -> Self {
        Self(bytes)
    }

    /// Raw digest bytes.
    pub fn as_bytes(&self) -> &[u8; HASH_OUTPUT_LENGTH] {
        &self.0
    }

    /// Lowercase hex, 64 characters.
    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }

    /// Parse a 64-character hex string.
    pub fn from_hex(s: &str) -> Option<Self> {
        let bytes = hex::decode(s).ok()?;
        let arr: [u8; HASH_OUTPUT_LENGTH] = bytes.as_slice().try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Display for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_hex())
    }
}

impl fmt::Debug for TxHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TxHash({})", &self.to_hex()[..16])
    }
}

impl Serialize for TxHash {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for TxHash {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::from_hex(&s).ok_or_else(|| de::Error::custom("expected 32-byte hex tx hash"))
    }
}

// ---------------------------------------------------------------------------
// Amount
// ---------------------------------------------------------------------------

/// A quantity of value in the smallest indivisible unit.
///
/// Integer, never floating point: sums and comparisons are exact. The inner
/// value is signed so that a negative output decoded off the wire can be
/// represented and then rejected by validation.
///
/// # Examples
///
/// ```
/// use scrooge_protocol::transaction::Amount;
///
/// let fee = Amount::new(150);
/// assert_eq!(fee.display_decimal(), "1.50");
/// assert!(!fee.is_negative());
/// ```
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
#[serde(transparent)]
pub struct Amount(i64);

impl Amount {
    /// Zero value.
    pub const ZERO: Amount = Amount(0);

    /// Creates an amount in minor units.
    pub const fn new(minor_units: i64) -> Self {
        Self(minor_units)
    }

    /// The raw minor-unit value.
    pub const fn value(&self) -> i64 {
        self.0
    }

    /// `true` if the amount is below zero.
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// `true` if the amount is exactly zero.
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    /// Checked addition. `None` on `i64` overflow.
    pub fn checked_add(self, other: Amount) -> Option<Amount> {
        self.0.checked_add(other.0).map(Amount)
    }

    /// Human-readable whole-coin formatting, e.g. `Amount(150)` -> `"1.50"`.
    pub fn display_decimal(&self) -> String {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        let divisor = MINOR_UNITS_PER_COIN as u64;
        format!(
            "{}{}.{:0>width$}",
            sign,
            abs / divisor,
            abs % divisor,
            width = AMOUNT_DECIMALS as usize
        )
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<i64> for Amount {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

/// Sums into `i128`, which cannot overflow for any realistic number of
/// `i64` terms.
impl<'a> Sum<&'a Amount> for i128 {
    fn sum<I: Iterator<Item = &'a Amount>>(iter: I) -> i128 {
        iter.map(|a| i128::from(a.0)).sum()
    }
}

// ---------------------------------------------------------------------------
// UtxoId
// ---------------------------------------------------------------------------

/// Identifies one spendable output: the hash of the transaction that
/// created it and the output's position in that transaction.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
)]
pub struct UtxoId {
    /// Content hash of the originating transaction.
    pub tx_hash: TxHash,
    /// Position of the output within the originating transaction.
    pub index: u32,
}

impl UtxoId {
    pub const fn new(tx_hash: TxHash, index: u32) -> Self {
        Self { tx_hash, index }
    }

    /// Fixed-width encoding: 32 hash bytes then the index as little-endian
    /// `u32`.
    pub fn to_bytes(&self) -> [u8; HASH_OUTPUT_LENGTH + 4] {
        let mut bytes = [0u8; HASH_OUTPUT_LENGTH + 4];
        bytes[..HASH_OUTPUT_LENGTH].copy_from_slice(self.tx_hash.as_bytes());
        bytes[HASH_OUTPUT_LENGTH..].copy_from_slice(&self.index.to_le_bytes());
        bytes
    }
}

impl fmt::Display for UtxoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.tx_hash, self.index)
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

/// A quantity of value locked to a public key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Output {
    pub amount: Amount,
    /// Only a signature by this key can spend the output.
    pub owner: PublicKey,
}

impl Output {
    pub fn new(amount: impl Into<Amount>, owner: PublicKey) -> Self {
        Self {
            amount: amount.into(),
            owner,
        }
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A claim on an existing output, plus the owner's authorization.
///
/// `signature` is `None` until the input is signed. An unsigned input in a
/// finalized transaction is representable and fails validation.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Input {
    /// The output this input spends.
    pub claims: UtxoId,
    #[serde(default)]
    pub signature: Option<Signature>,
}

impl Input {
    /// An unsigned input claiming `claims`.
    pub fn new(claims: UtxoId) -> Self {
        Self {
            claims,
            signature: None,
        }
    }

    /// `true` once a signature has been attached.
    pub fn is_signed(&self) -> bool {
        self.signature.is_some()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
