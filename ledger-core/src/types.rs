//! Core types for the ledger
//!
//! All types are designed for:
//! - Exact arithmetic (Decimal for money)
//! - Immutability once appended (the ledger only hands out copies)

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Final disposition of a payment attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    /// Payment went through
    Success,
    /// Payment went through but is tagged for audit
    Flagged,
    /// Payment stopped
    Blocked,
}

impl TransactionStatus {
    /// Stable label
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Success => "success",
            TransactionStatus::Flagged => "flagged",
            TransactionStatus::Blocked => "blocked",
        }
    }
}

impl fmt::Display for TransactionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Recorded payment attempt
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    /// Unique transaction ID (UUIDv7 for time-ordering)
    pub id: Uuid,

    /// Payment amount (exact decimal)
    pub amount: Decimal,

    /// Recipient identifier
    pub recipient_id: String,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Disposition, fixed at creation
    pub status: TransactionStatus,
}

impl Transaction {
    pub(crate) fn new(status: TransactionStatus, amount: Decimal, recipient_id: String) -> Self {
        Self::at(status, amount, recipient_id, Utc::now())
    }

    pub(crate) fn at(
        status: TransactionStatus,
        amount: Decimal,
        recipient_id: String,
        created_at: DateTime<Utc>,
    ) -> Self {
        Self {
            id: Uuid::now_v7(),
            amount,
            recipient_id,
            created_at,
            status,
        }
    }
}

/// Per-status transaction counts
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerStats {
    /// Successful transactions
    pub success: usize,
    /// Flagged transactions
    pub flagged: usize,
    /// Blocked transactions
    pub blocked: usize,
}

impl LedgerStats {
    /// Total transactions
    pub fn total(&self) -> usize {
        self.success + self.flagged + self.blocked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_labels() {
        assert_eq!(TransactionStatus::Blocked.to_string(), "blocked");
        assert_eq!(
            serde_json::to_string(&TransactionStatus::Flagged).unwrap(),
            r#""flagged""#
        );
    }

    #[test]
    fn test_new_transaction_ids_unique() {
        let a = Transaction::new(TransactionStatus::Success, Decimal::ONE, "a@upi".into());
        let b = Transaction::new(TransactionStatus::Success, Decimal::ONE, "a@upi".into());
        assert_ne!(a.id, b.id);
        assert!(b.created_at >= a.created_at);
    }
}
