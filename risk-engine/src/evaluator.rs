//! Risk evaluation for proposed transfers

use crate::{Amount, Decision, Error, RecipientId, RecipientRegistry, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::debug;

/// Default high-amount threshold in currency units
pub const HIGH_AMOUNT_THRESHOLD: i64 = 10_000;

/// Evaluator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluatorConfig {
    /// Amounts strictly above this need confirmation for unlisted recipients
    pub high_amount_threshold: Decimal,
}

impl Default for EvaluatorConfig {
    fn default() -> Self {
        Self {
            high_amount_threshold: Decimal::from(HIGH_AMOUNT_THRESHOLD),
        }
    }
}

impl EvaluatorConfig {
    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        if self.high_amount_threshold <= Decimal::ZERO {
            return Err(Error::InvalidConfig(format!(
                "high_amount_threshold must be positive, got {}",
                self.high_amount_threshold
            )));
        }
        Ok(())
    }
}

/// Risk evaluator
///
/// Stateless apart from the registry it reads; the same input always yields
/// the same decision while the registry is unchanged.
pub struct RiskEvaluator {
    registry: Arc<dyn RecipientRegistry>,
    config: EvaluatorConfig,
}

impl RiskEvaluator {
    /// Create new evaluator
    pub fn new(registry: Arc<dyn RecipientRegistry>, config: EvaluatorConfig) -> Self {
        Self { registry, config }
    }

    /// Evaluate raw input, validating it first
    pub fn evaluate(&self, amount: Decimal, recipient_id: &str) -> Result<Decision> {
        let amount = Amount::new(amount)?;
        let recipient_id = RecipientId::new(recipient_id)?;
        self.evaluate_validated(amount, &recipient_id)
    }

    /// Evaluate already validated input
    ///
    /// A listed recipient always yields a suspicious decision, whatever the
    /// amount; the high-amount check only applies to unlisted recipients.
    pub fn evaluate_validated(&self, amount: Amount, recipient_id: &RecipientId) -> Result<Decision> {
        let decision = match self.registry.lookup(recipient_id)? {
            Some(entry) if entry.permits(amount) => Decision::FlagSuspiciousWithinLimit(entry),
            Some(entry) => Decision::FlagSuspiciousOverLimit(entry),
            None if amount.value() > self.config.high_amount_threshold => Decision::FlagHighAmount,
            None => Decision::Allow,
        };

        debug!(
            recipient = %recipient_id,
            amount = %amount,
            decision = %decision.kind(),
            "Evaluated transfer"
        );

        Ok(decision)
    }

    /// Active configuration
    pub fn config(&self) -> &EvaluatorConfig {
        &self.config
    }
}
