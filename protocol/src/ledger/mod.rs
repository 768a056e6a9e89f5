//! The ledger: the set of currently spendable outputs.

pub mod state;

pub use state::{LedgerEntry, LedgerState};
