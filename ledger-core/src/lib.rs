//! SecureUPI Ledger Core
//!
//! Append-only record of decided payment attempts.
//!
//! # Invariants
//!
//! - Append-only: transactions never modified or deleted
//! - Status fixed at creation: a different disposition is a new transaction
//! - Total ordering: listing order is the reverse of append order

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod ledger;
pub mod error;

// Re-exports
pub use error::{Error, Result};
pub use types::{LedgerStats, Transaction, TransactionStatus};
pub use ledger::{Ledger, CLOCK_SKEW_TOLERANCE_SECS};
