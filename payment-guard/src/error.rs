//! Error types for the payment guard
//!
//! Lower crates report their own errors; this enum flattens them into the
//! taxonomy the caller handles.

use risk_engine::DecisionKind;
use thiserror::Error;

/// Result type for payment guard operations
pub type Result<T> = std::result::Result<T, Error>;

/// Payment guard errors
#[derive(Error, Debug)]
pub enum Error {
    /// Amount is not a finite positive number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Recipient identifier is empty
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Finalize called for a decision that needs confirmation, without it
    #[error("Decision {decision} requires user confirmation")]
    UnconfirmedOverride {
        /// Decision that was not confirmed
        decision: DecisionKind,
    },

    /// Finalize called with a decision that no longer matches a fresh evaluation
    #[error("Decision {supplied} is stale, transfer now evaluates to {current}")]
    DecisionMismatch {
        /// Decision the caller supplied
        supplied: DecisionKind,
        /// Decision for the same transfer against the current registry
        current: DecisionKind,
    },

    /// Report flow driven out of order
    #[error("Invalid report transition: {0}")]
    InvalidTransition(String),

    /// Registry backing store error
    #[error("Registry error: {0}")]
    Registry(String),

    /// Ledger error
    #[error("Ledger error: {0}")]
    Ledger(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Metrics error
    #[error("Metrics error: {0}")]
    Metrics(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// Short label for metrics
    pub fn reason(&self) -> &'static str {
        match self {
            Error::InvalidAmount(_) => "invalid_amount",
            Error::InvalidRecipient(_) => "invalid_recipient",
            Error::UnconfirmedOverride { .. } => "unconfirmed_override",
            Error::DecisionMismatch { .. } => "decision_mismatch",
            Error::InvalidTransition(_) => "invalid_transition",
            Error::Registry(_) => "registry",
            Error::Ledger(_) => "ledger",
            Error::Config(_) => "config",
            Error::Metrics(_) => "metrics",
            Error::Io(_) => "io",
        }
    }
}

impl From<risk_engine::Error> for Error {
    fn from(err: risk_engine::Error) -> Self {
        match err {
            risk_engine::Error::InvalidAmount(msg) => Error::InvalidAmount(msg),
            risk_engine::Error::InvalidRecipient(msg) => Error::InvalidRecipient(msg),
            risk_engine::Error::InvalidTransition(msg) => Error::InvalidTransition(msg),
            risk_engine::Error::Registry(msg) => Error::Registry(msg),
            risk_engine::Error::InvalidConfig(msg) => Error::Config(msg),
        }
    }
}

impl From<ledger_core::Error> for Error {
    fn from(err: ledger_core::Error) -> Self {
        Error::Ledger(err.to_string())
    }
}

impl From<prometheus::Error> for Error {
    fn from(err: prometheus::Error) -> Self {
        Error::Metrics(err.to_string())
    }
}
