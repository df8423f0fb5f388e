//! Error types for risk engine

use thiserror::Error;

/// Risk engine error
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// Amount is not a finite positive number
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),

    /// Recipient identifier is empty
    #[error("Invalid recipient: {0}")]
    InvalidRecipient(String),

    /// Report flow driven out of order
    #[error("Invalid report transition: {0}")]
    InvalidTransition(String),

    /// Backing store failure
    #[error("Registry error: {0}")]
    Registry(String),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

/// Result type
pub type Result<T> = std::result::Result<T, Error>;
