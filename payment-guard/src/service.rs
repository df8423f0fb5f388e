//! Payment guard: the in-process interface the presentation layer calls
//!
//! Ties the evaluator, report intake and ledger together and applies the
//! disposition policy when a payment attempt is finalized.

use crate::{
    config::{Config, LedgerPolicy},
    metrics::GuardMetrics,
    Error, Result,
};
use ledger_core::{Ledger, LedgerStats, Transaction, TransactionStatus};
use risk_engine::{
    Amount, Decision, InMemoryRegistry, RecipientId, RecipientRegistry, RecipientRiskEntry,
    ReportFlow, ReportIntake, RiskEvaluator,
};
use rust_decimal::Decimal;
use std::sync::Arc;
use std::time::Instant;
use tracing::{info, warn};

/// Map a decision to the status it is recorded with
///
/// - `Allow` is recorded as `Success`
/// - `FlagHighAmount` / `FlagSuspiciousWithinLimit` need `user_confirmed`;
///   confirmed overrides are `Success`, or `Flagged` when the policy tags them
/// - `FlagSuspiciousOverLimit` is always `Blocked`
pub fn disposition(
    decision: &Decision,
    user_confirmed: bool,
    policy: &LedgerPolicy,
) -> Result<TransactionStatus> {
    match decision {
        Decision::Allow => Ok(TransactionStatus::Success),
        Decision::FlagHighAmount | Decision::FlagSuspiciousWithinLimit(_) => {
            if !user_confirmed {
                return Err(Error::UnconfirmedOverride {
                    decision: decision.kind(),
                });
            }
            if policy.tag_confirmed_overrides {
                Ok(TransactionStatus::Flagged)
            } else {
                Ok(TransactionStatus::Success)
            }
        }
        Decision::FlagSuspiciousOverLimit(_) => Ok(TransactionStatus::Blocked),
    }
}

/// Payment guard
///
/// Owns the session state: one registry handle, one ledger. Construct once per
/// session and share by reference.
pub struct PaymentGuard {
    evaluator: RiskEvaluator,
    intake: ReportIntake,
    registry: Arc<dyn RecipientRegistry>,
    ledger: Ledger,
    metrics: GuardMetrics,
    config: Config,
}

impl PaymentGuard {
    /// Create guard over an existing registry
    pub fn new(config: Config, registry: Arc<dyn RecipientRegistry>) -> Result<Self> {
        config.validate()?;
        let metrics = GuardMetrics::new()?;

        info!(service = %config.service_name, "Payment guard started");

        Ok(Self {
            evaluator: RiskEvaluator::new(registry.clone(), config.evaluator.clone()),
            intake: ReportIntake::new(registry.clone()),
            registry,
            ledger: Ledger::new(),
            metrics,
            config,
        })
    }

    /// Create guard with an empty in-memory registry
    pub fn in_memory(config: Config) -> Result<Self> {
        let registry = Arc::new(InMemoryRegistry::new(config.registry.clone()));
        Self::new(config, registry)
    }

    /// Evaluate a proposed transfer
    pub fn evaluate(&self, amount: Decimal, recipient_id: &str) -> Result<Decision> {
        let started = Instant::now();
        let decision = self
            .evaluator
            .evaluate(amount, recipient_id)
            .map_err(|e| self.rejected(e.into()))?;

        self.metrics
            .record_decision(decision.kind(), started.elapsed().as_secs_f64());
        Ok(decision)
    }

    /// Evaluate raw form input
    pub fn evaluate_input(&self, amount: &str, recipient_id: &str) -> Result<Decision> {
        let amount = Amount::parse(amount).map_err(|e| self.rejected(e.into()))?;
        self.evaluate(amount.value(), recipient_id)
    }

    /// Record the final disposition of an evaluated transfer
    ///
    /// The transfer is re-evaluated against the current registry; a supplied
    /// decision of a different kind is rejected as stale. Nothing is recorded
    /// when the decision is stale or confirmation is required but missing.
    pub fn finalize(
        &self,
        decision: &Decision,
        amount: Decimal,
        recipient_id: &str,
        user_confirmed: bool,
    ) -> Result<Transaction> {
        let (checked_amount, checked_recipient) = self
            .validate_input(amount, recipient_id)
            .map_err(|e| self.rejected(e))?;

        let current = self
            .evaluator
            .evaluate_validated(checked_amount, &checked_recipient)
            .map_err(|e| self.rejected(e.into()))?;
        if current.kind() != decision.kind() {
            warn!(
                recipient = recipient_id,
                supplied = %decision.kind(),
                current = %current.kind(),
                "Finalize with stale decision"
            );
            return Err(self.rejected(Error::DecisionMismatch {
                supplied: decision.kind(),
                current: current.kind(),
            }));
        }

        let status = disposition(&current, user_confirmed, &self.config.ledger).map_err(|e| {
            warn!(
                recipient = recipient_id,
                decision = %current.kind(),
                "Override attempted without confirmation"
            );
            self.rejected(e)
        })?;

        let transaction = self.ledger.append(status, amount, recipient_id)?;
        self.metrics.record_transaction(transaction.status);

        if transaction.status == TransactionStatus::Blocked {
            warn!(
                id = %transaction.id,
                recipient = recipient_id,
                amount = %amount,
                "Transfer blocked: amount over recipient safe limit"
            );
        }

        Ok(transaction)
    }

    /// Report a recipient as suspicious
    pub fn report(&self, recipient_id: &str) -> Result<RecipientRiskEntry> {
        let entry = self
            .intake
            .report(recipient_id)
            .map_err(|e| self.rejected(e.into()))?;
        self.metrics.record_report();
        Ok(entry)
    }

    /// Confirm a pending report flow, submitting its report
    pub fn confirm_report(&self, flow: &mut ReportFlow) -> Result<RecipientRiskEntry> {
        let entry = flow
            .confirm(&self.intake)
            .map_err(|e| self.rejected(e.into()))?;
        self.metrics.record_report();
        Ok(entry)
    }

    /// Look up a recipient's registry entry
    pub fn lookup(&self, recipient_id: &str) -> Result<Option<RecipientRiskEntry>> {
        let recipient_id = RecipientId::new(recipient_id)?;
        Ok(self.registry.lookup(&recipient_id)?)
    }

    /// All transactions, most recent first
    pub fn list_transactions(&self) -> Vec<Transaction> {
        self.ledger.list()
    }

    /// Transaction counts per status
    pub fn stats(&self) -> LedgerStats {
        self.ledger.stats()
    }

    /// Session ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Metrics collector
    pub fn metrics(&self) -> &GuardMetrics {
        &self.metrics
    }

    /// Active configuration
    pub fn config(&self) -> &Config {
        &self.config
    }

    fn validate_input(&self, amount: Decimal, recipient_id: &str) -> Result<(Amount, RecipientId)> {
        Ok((Amount::new(amount)?, RecipientId::new(recipient_id)?))
    }

    fn rejected(&self, err: Error) -> Error {
        self.metrics.record_rejection(err.reason());
        err
    }
}

impl std::fmt::Debug for PaymentGuard {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PaymentGuard")
            .field("config", &self.config)
            .field("transactions", &self.ledger.len())
            .finish_non_exhaustive()
    }
}
