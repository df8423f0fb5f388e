//! Core types for risk engine

use crate::{Error, Result};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Positive payment amount in currency units
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "Decimal", into = "Decimal")]
pub struct Amount(Decimal);

impl Amount {
    /// Create amount, rejecting zero and negative values
    pub fn new(value: Decimal) -> Result<Self> {
        if value <= Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "amount must be positive, got {}",
                value
            )));
        }
        Ok(Self(value))
    }

    /// Parse amount from user input (e.g. a form field)
    pub fn parse(input: &str) -> Result<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Err(Error::InvalidAmount("amount is required".to_string()));
        }
        let value = Decimal::from_str(trimmed)
            .map_err(|_| Error::InvalidAmount(format!("'{}' is not a number", trimmed)))?;
        Self::new(value)
    }

    /// Get raw decimal value
    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Conversion from a float form value
///
/// Only values `Decimal` can hold are accepted: magnitudes from about 1e-28
/// up to about 7.9e28. Positive values outside that range are rejected with
/// their own message rather than as non-positive.
impl TryFrom<f64> for Amount {
    type Error = Error;

    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() {
            return Err(Error::InvalidAmount(format!(
                "amount must be finite, got {}",
                value
            )));
        }
        if value <= 0.0 {
            return Err(Error::InvalidAmount(format!(
                "amount must be positive, got {}",
                value
            )));
        }
        let decimal = Decimal::try_from(value).map_err(|_| {
            Error::InvalidAmount(format!("amount {} cannot be represented as a decimal", value))
        })?;
        if decimal.is_zero() {
            return Err(Error::InvalidAmount(format!(
                "amount {} is below the smallest representable unit",
                value
            )));
        }
        Self::new(decimal)
    }
}

impl TryFrom<Decimal> for Amount {
    type Error = Error;

    fn try_from(value: Decimal) -> Result<Self> {
        Self::new(value)
    }
}

impl From<Amount> for Decimal {
    fn from(amount: Amount) -> Self {
        amount.0
    }
}

impl fmt::Display for Amount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Recipient identifier (UPI handle, account alias, etc.)
///
/// Opaque: the value is kept exactly as supplied. Matching rules live in
/// [`RecipientMatching`](crate::RecipientMatching).
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RecipientId(String);

impl RecipientId {
    /// Create recipient ID, rejecting empty identifiers
    pub fn new(id: impl Into<String>) -> Result<Self> {
        let id = id.into();
        if id.trim().is_empty() {
            return Err(Error::InvalidRecipient(
                "recipient identifier must not be empty".to_string(),
            ));
        }
        Ok(Self(id))
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for RecipientId {
    type Error = Error;

    fn try_from(value: String) -> Result<Self> {
        Self::new(value)
    }
}

impl From<RecipientId> for String {
    fn from(id: RecipientId) -> Self {
        id.0
    }
}

impl fmt::Display for RecipientId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Registry entry for a recipient known to be risky
///
/// Presence in the registry is the suspicious flag; there is no separate
/// boolean.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecipientRiskEntry {
    /// Recipient identifier
    pub recipient_id: RecipientId,

    /// Number of user reports received
    pub report_count: u64,

    /// Largest amount the recipient may receive without being blocked
    pub max_safe_amount: Decimal,
}

impl RecipientRiskEntry {
    /// Create entry
    pub fn new(recipient_id: RecipientId, report_count: u64, max_safe_amount: Decimal) -> Self {
        Self {
            recipient_id,
            report_count,
            max_safe_amount,
        }
    }

    /// Check whether amount stays within the safe limit
    pub fn permits(&self, amount: Amount) -> bool {
        amount.value() <= self.max_safe_amount
    }
}

/// Outcome of evaluating one proposed transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "entry", rename_all = "snake_case")]
pub enum Decision {
    /// No concern
    Allow,
    /// Amount exceeds the high-amount threshold; recipient not listed
    FlagHighAmount,
    /// Recipient listed, amount within its safe limit
    FlagSuspiciousWithinLimit(RecipientRiskEntry),
    /// Recipient listed, amount above its safe limit
    FlagSuspiciousOverLimit(RecipientRiskEntry),
}

impl Decision {
    /// Kind discriminant
    pub fn kind(&self) -> DecisionKind {
        match self {
            Decision::Allow => DecisionKind::Allow,
            Decision::FlagHighAmount => DecisionKind::FlagHighAmount,
            Decision::FlagSuspiciousWithinLimit(_) => DecisionKind::FlagSuspiciousWithinLimit,
            Decision::FlagSuspiciousOverLimit(_) => DecisionKind::FlagSuspiciousOverLimit,
        }
    }

    /// Registry entry behind a suspicious decision
    pub fn entry(&self) -> Option<&RecipientRiskEntry> {
        match self {
            Decision::FlagSuspiciousWithinLimit(entry)
            | Decision::FlagSuspiciousOverLimit(entry) => Some(entry),
            _ => None,
        }
    }

    /// Whether the user must confirm before the payment can proceed
    pub fn requires_confirmation(&self) -> bool {
        matches!(
            self,
            Decision::FlagHighAmount | Decision::FlagSuspiciousWithinLimit(_)
        )
    }

    /// Whether the payment may proceed at all ("Proceed Anyway" availability)
    pub fn can_proceed(&self) -> bool {
        !self.is_blocking()
    }

    /// Whether the payment is blocked with no override path
    pub fn is_blocking(&self) -> bool {
        matches!(self, Decision::FlagSuspiciousOverLimit(_))
    }

    /// Alert text for the caller to render
    pub fn summary(&self) -> String {
        match self {
            Decision::Allow => "No risk detected".to_string(),
            Decision::FlagHighAmount => {
                "Unusually large amount. Please confirm before proceeding.".to_string()
            }
            Decision::FlagSuspiciousWithinLimit(entry) => format!(
                "High-risk recipient {} reported {} times (safe limit {}). \
                 Amount is within limit, verify the recipient before proceeding.",
                entry.recipient_id, entry.report_count, entry.max_safe_amount
            ),
            Decision::FlagSuspiciousOverLimit(entry) => format!(
                "High-risk recipient {} reported {} times (safe limit {}). \
                 Amount exceeds safe limit, transaction cannot proceed.",
                entry.recipient_id, entry.report_count, entry.max_safe_amount
            ),
        }
    }
}

/// Decision discriminant, used for labels and error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DecisionKind {
    /// No concern
    Allow,
    /// Large amount
    FlagHighAmount,
    /// Listed recipient, within limit
    FlagSuspiciousWithinLimit,
    /// Listed recipient, over limit
    FlagSuspiciousOverLimit,
}

impl DecisionKind {
    /// Stable label
    pub fn as_str(&self) -> &'static str {
        match self {
            DecisionKind::Allow => "allow",
            DecisionKind::FlagHighAmount => "flag_high_amount",
            DecisionKind::FlagSuspiciousWithinLimit => "flag_suspicious_within_limit",
            DecisionKind::FlagSuspiciousOverLimit => "flag_suspicious_over_limit",
        }
    }
}

impl fmt::Display for DecisionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(limit: i64) -> RecipientRiskEntry {
        RecipientRiskEntry::new(RecipientId::new("scammer@upi").unwrap(), 15, Decimal::from(limit))
    }

    #[test]
    fn test_amount_parse() {
        assert_eq!(Amount::parse(" 500 ").unwrap().value(), Decimal::from(500));
        assert_eq!(Amount::parse("0.50").unwrap().value(), Decimal::new(50, 2));
        assert!(matches!(Amount::parse(""), Err(Error::InvalidAmount(_))));
        assert!(matches!(Amount::parse("12abc"), Err(Error::InvalidAmount(_))));
        assert!(matches!(Amount::parse("0"), Err(Error::InvalidAmount(_))));
        assert!(matches!(Amount::parse("-5"), Err(Error::InvalidAmount(_))));
    }

    #[test]
    fn test_amount_from_f64() {
        assert_eq!(Amount::try_from(250.0).unwrap().value(), Decimal::from(250));
        assert!(Amount::try_from(f64::NAN).is_err());
        assert!(Amount::try_from(f64::INFINITY).is_err());
        assert!(Amount::try_from(-1.0).is_err());
    }

    #[test]
    fn test_amount_from_f64_out_of_range() {
        let err = Amount::try_from(1e30).unwrap_err();
        assert!(err.to_string().contains("cannot be represented"));

        let err = Amount::try_from(1e-30).unwrap_err();
        assert!(matches!(err, Error::InvalidAmount(_)));
        assert!(!err.to_string().contains("must be positive"));

        let err = Amount::try_from(0.0).unwrap_err();
        assert!(err.to_string().contains("must be positive"));
    }

    #[test]
    fn test_recipient_id_rejects_empty() {
        assert!(matches!(RecipientId::new(""), Err(Error::InvalidRecipient(_))));
        assert!(matches!(RecipientId::new("   "), Err(Error::InvalidRecipient(_))));
        // kept verbatim, no normalization
        assert_eq!(RecipientId::new(" A@upi").unwrap().as_str(), " A@upi");
    }

    #[test]
    fn test_recipient_id_deserialize_validates() {
        let id: RecipientId = serde_json::from_str(r#""merchant@upi""#).unwrap();
        assert_eq!(id.as_str(), "merchant@upi");
        assert!(serde_json::from_str::<RecipientId>(r#""""#).is_err());
    }

    #[test]
    fn test_entry_permits_boundary() {
        let e = entry(1000);
        assert!(e.permits(Amount::new(Decimal::from(1000)).unwrap()));
        assert!(!e.permits(Amount::new(Decimal::new(100001, 2)).unwrap()));
    }

    #[test]
    fn test_decision_flags() {
        assert!(Decision::Allow.can_proceed());
        assert!(!Decision::Allow.requires_confirmation());
        assert!(Decision::FlagHighAmount.requires_confirmation());

        let within = Decision::FlagSuspiciousWithinLimit(entry(1000));
        assert!(within.requires_confirmation());
        assert!(within.can_proceed());
        assert_eq!(within.entry().map(|e| e.report_count), Some(15));

        let over = Decision::FlagSuspiciousOverLimit(entry(1000));
        assert!(over.is_blocking());
        assert!(!over.can_proceed());
        assert!(!over.requires_confirmation());
        assert!(over.summary().contains("cannot proceed"));
    }

    #[test]
    fn test_decision_serialization() {
        let json = serde_json::to_string(&Decision::FlagHighAmount).unwrap();
        assert_eq!(json, r#"{"kind":"flag_high_amount"}"#);

        let over = Decision::FlagSuspiciousOverLimit(entry(2000));
        let json = serde_json::to_string(&over).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        assert_eq!(back, over);
    }
}
