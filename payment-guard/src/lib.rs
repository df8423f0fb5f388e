//! SecureUPI Payment Guard
//!
//! In-process interface between the payment form and the risk core:
//! evaluate a transfer, finalize it under the disposition policy, report
//! recipients, and list the session's transactions.
//!
//! # Example
//!
//! ```
//! use payment_guard::{fixtures, Config, PaymentGuard};
//! use risk_engine::Decision;
//! use rust_decimal::Decimal;
//! use std::sync::Arc;
//!
//! let config = Config::default();
//! let registry = Arc::new(fixtures::demo_registry(config.registry.clone())?);
//! let guard = PaymentGuard::new(config, registry)?;
//!
//! let decision = guard.evaluate(Decimal::from(500), "merchant@upi")?;
//! assert_eq!(decision, Decision::Allow);
//! guard.finalize(&decision, Decimal::from(500), "merchant@upi", false)?;
//! # Ok::<(), payment_guard::Error>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs, rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod fixtures;
pub mod metrics;
pub mod service;
pub mod telemetry;

pub use config::{Config, LedgerPolicy, LogConfig};
pub use error::{Error, Result};
pub use metrics::GuardMetrics;
pub use service::{disposition, PaymentGuard};
pub use telemetry::init_tracing;
