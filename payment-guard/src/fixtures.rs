//! Demo session seed
//!
//! The identifiers and transaction history a fresh demo session starts with. Production deployments
//! load their own seed through [`InMemoryRegistry::from_json`] or supply a
//! different [`RecipientRegistry`](risk_engine::RecipientRegistry).

use crate::Result;
use chrono::{Duration, Utc};
use ledger_core::{Ledger, Transaction, TransactionStatus};
use risk_engine::{InMemoryRegistry, RegistryPolicy};
use rust_decimal::Decimal;

/// Demo seed as a JSON array of registry entries
pub const DEMO_REGISTRY_JSON: &str = r#"[
    { "recipient_id": "scammer@upi", "report_count": 15, "max_safe_amount": "1000" },
    { "recipient_id": "unknown@suspicious", "report_count": 8, "max_safe_amount": "2000" },
    { "recipient_id": "fake@payment", "report_count": 25, "max_safe_amount": "500" }
]"#;

/// Registry seeded with the demo identifiers
pub fn demo_registry(policy: RegistryPolicy) -> Result<InMemoryRegistry> {
    Ok(InMemoryRegistry::from_json(policy, DEMO_REGISTRY_JSON)?)
}

/// Import the demo transaction history, oldest first
///
/// Entries keep their age relative to now: a flagged transfer two hours ago,
/// a blocked one an hour ago, a successful one just now.
pub fn import_demo_history(ledger: &Ledger) -> Result<Vec<Transaction>> {
    let now = Utc::now();
    let history = [
        (TransactionStatus::Flagged, 25_000, "newuser@upi", now - Duration::hours(2)),
        (TransactionStatus::Blocked, 50_000, "unknown@suspicious", now - Duration::hours(1)),
        (TransactionStatus::Success, 1_000, "merchant@upi", now),
    ];

    let mut imported = Vec::with_capacity(history.len());
    for (status, amount, recipient, at) in history {
        imported.push(ledger.import(status, Decimal::from(amount), recipient, at)?);
    }
    Ok(imported)
}
