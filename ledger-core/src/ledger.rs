//! Append-only transaction ledger
//!
//! # Example
//!
//! ```
//! use ledger_core::{Ledger, TransactionStatus};
//! use rust_decimal::Decimal;
//!
//! let ledger = Ledger::new();
//! let tx = ledger.record_success(Decimal::from(500), "merchant@upi")?;
//! assert_eq!(tx.status, TransactionStatus::Success);
//! assert_eq!(ledger.list()[0].id, tx.id);
//! # Ok::<(), ledger_core::Error>(())
//! ```

use crate::{
    types::{LedgerStats, Transaction, TransactionStatus},
    Error, Result,
};
use chrono::{DateTime, Duration, Utc};
use parking_lot::RwLock;
use rust_decimal::Decimal;
use tracing::info;
use uuid::Uuid;

/// Tolerated clock skew for imported timestamps
pub const CLOCK_SKEW_TOLERANCE_SECS: i64 = 5;

/// Transaction ledger
///
/// Single writer lock around an append-only log. Entries are never modified or
/// removed; readers get copies.
#[derive(Debug, Default)]
pub struct Ledger {
    entries: RwLock<Vec<Transaction>>,
}

impl Ledger {
    /// Create empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a successful payment
    pub fn record_success(&self, amount: Decimal, recipient_id: &str) -> Result<Transaction> {
        self.append(TransactionStatus::Success, amount, recipient_id)
    }

    /// Record a payment that proceeded but is tagged for audit
    ///
    /// Stamped with the current time; use [`Ledger::import`] for historical
    /// entries.
    pub fn record_flagged(&self, amount: Decimal, recipient_id: &str) -> Result<Transaction> {
        self.append(TransactionStatus::Flagged, amount, recipient_id)
    }

    /// Record a blocked payment
    pub fn record_blocked(&self, amount: Decimal, recipient_id: &str) -> Result<Transaction> {
        self.append(TransactionStatus::Blocked, amount, recipient_id)
    }

    /// Append a transaction with the given status
    pub fn append(
        &self,
        status: TransactionStatus,
        amount: Decimal,
        recipient_id: &str,
    ) -> Result<Transaction> {
        Self::validate(amount, recipient_id)?;

        // id and timestamp are taken under the lock so append order matches them
        let transaction = {
            let mut entries = self.entries.write();
            let transaction = Transaction::new(status, amount, recipient_id.to_string());
            entries.push(transaction.clone());
            transaction
        };

        info!(
            id = %transaction.id,
            recipient = %transaction.recipient_id,
            amount = %transaction.amount,
            status = %transaction.status,
            "Transaction recorded"
        );

        Ok(transaction)
    }

    /// Append a historical transaction keeping its original timestamp
    ///
    /// Imported entries take their place in append order like any other; only
    /// `created_at` reflects the past.
    pub fn import(
        &self,
        status: TransactionStatus,
        amount: Decimal,
        recipient_id: &str,
        created_at: DateTime<Utc>,
    ) -> Result<Transaction> {
        Self::validate(amount, recipient_id)?;

        let ahead = created_at - Utc::now();
        if ahead > Duration::seconds(CLOCK_SKEW_TOLERANCE_SECS) {
            return Err(Error::InvalidTransaction(format!(
                "Timestamp is {}s in the future",
                ahead.num_seconds()
            )));
        }

        let transaction = Transaction::at(status, amount, recipient_id.to_string(), created_at);
        self.entries.write().push(transaction.clone());

        info!(
            id = %transaction.id,
            recipient = %transaction.recipient_id,
            status = %transaction.status,
            created_at = %transaction.created_at,
            "Transaction imported"
        );

        Ok(transaction)
    }

    /// All transactions, most recent first
    pub fn list(&self) -> Vec<Transaction> {
        self.entries.read().iter().rev().cloned().collect()
    }

    /// Get transaction by ID
    pub fn get(&self, id: Uuid) -> Result<Transaction> {
        self.entries
            .read()
            .iter()
            .find(|tx| tx.id == id)
            .cloned()
            .ok_or_else(|| Error::TransactionNotFound(id.to_string()))
    }

    /// Number of recorded transactions
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    /// Whether nothing has been recorded
    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }

    /// Counts per status
    pub fn stats(&self) -> LedgerStats {
        self.entries
            .read()
            .iter()
            .fold(LedgerStats::default(), |mut stats, tx| {
                match tx.status {
                    TransactionStatus::Success => stats.success += 1,
                    TransactionStatus::Flagged => stats.flagged += 1,
                    TransactionStatus::Blocked => stats.blocked += 1,
                }
                stats
            })
    }

    fn validate(amount: Decimal, recipient_id: &str) -> Result<()> {
        if amount <= Decimal::ZERO {
            return Err(Error::InvalidTransaction(
                "Amount must be positive".to_string(),
            ));
        }

        if recipient_id.trim().is_empty() {
            return Err(Error::InvalidTransaction(
                "Recipient must not be empty".to_string(),
            ));
        }

        Ok(())
    }
}
