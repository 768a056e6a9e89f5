// Copyright (c) 2026 Scrooge Ledger Contributors. MIT License.
// See LICENSE for details.

//! # Scrooge Protocol - Core Library
//!
//! The validation core of a minimal unspent-output ledger. There are no
//! blocks, no peers and no consensus here: a batch of candidate
//! transactions comes in, a mutually consistent subset goes out, and the
//! ledger is updated to match.
//!
//! ## Architecture
//!
//! - **config** - Protocol constants: lengths, domain tags, units.
//! - **crypto** - Ed25519 keys and the `SignatureVerifier` capability, plus
//!   the hash functions that name transactions and digest ledgers.
//! - **transaction** - Value types, the builder, per-input signing, and the
//!   transaction validator.
//! - **ledger** - `LedgerState`, the set of currently spendable outputs.
//! - **epoch** - The epoch resolver: fixed-point batch acceptance.
//!
//! ## Quick Start
//!
//! ```
//! use scrooge_protocol::crypto::Keypair;
//! use scrooge_protocol::epoch::EpochResolver;
//! use scrooge_protocol::ledger::LedgerState;
//! use scrooge_protocol::transaction::{sign_input, Transaction, TransactionBuilder, UtxoId};
//!
//! let alice = Keypair::generate();
//! let bob = Keypair::generate();
//! let genesis = Transaction::coinbase(0, 100, alice.public_key());
//! let ledger = LedgerState::from_transactions([&genesis]);
//!
//! let mut builder = TransactionBuilder::new()
//!     .input(UtxoId::new(genesis.hash(), 0))
//!     .output(10, bob.public_key())
//!     .output(90, alice.public_key());
//! sign_input(&mut builder, 0, &alice).unwrap();
//!
//! let mut resolver = EpochResolver::new(&ledger);
//! let accepted = resolver.process_epoch(vec![builder.finalize()]);
//! assert_eq!(accepted.len(), 1);
//! assert_eq!(resolver.ledger().total_value(), 100);
//! ```
//!
//! ## Design Philosophy
//!
//! 1. Rejection is a value, not a fault. Only a broken verifier panics.
//! 2. Integer amounts. No floating point anywhere near money.
//! 3. The validator reads, the resolver writes, nothing else touches the
//!    ledger.

pub mod config;
pub mod crypto;
pub mod epoch;
pub mod ledger;
pub mod transaction;
