//! # Transaction Module
//!
//! Value types, construction, per-input signing, and validation.
//!
//! ```text
//! types.rs        - TxHash, Amount, UtxoId, Input, Output
//! builder.rs      - TransactionBuilder (mutable) and Transaction (finalized)
//! signing.rs      - per-input Ed25519 signing on the builder
//! verification.rs - the validator: check_transaction / is_valid
//! ```
//!
//! ## Lifecycle
//!
//! 1. **Build**: assemble inputs and outputs with [`TransactionBuilder`].
//! 2. **Sign**: each claimed output's owner calls [`sign_input`] for the
//!    input claiming it.
//! 3. **Finalize**: [`TransactionBuilder::finalize`] fixes the content hash.
//! 4. **Validate**: [`is_valid`] against a ledger, usually through the
//!    epoch resolver.
//!
//! ## Design Decisions
//!
//! - Amounts are `i64` minor units. Sums are taken in `i128`.
//! - Each signature covers every input's claim and every output, but no
//!   signature, so inputs can be signed independently and in any order.
//! - The content hash is `double_sha256` of the full encoding, signatures
//!   included, and an output's ledger id is `(hash, position)`.

pub mod builder;
pub mod signing;
pub mod types;
pub mod verification;

pub use builder::{BuilderError, Transaction, TransactionBuilder};
pub use signing::{sign_all_inputs, sign_input};
pub use types::{Amount, Input, Output, TxHash, UtxoId};
pub use verification::{check_transaction, is_valid, ValidationError};
