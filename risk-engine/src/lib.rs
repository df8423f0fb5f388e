//! Risk Engine for SecureUPI
//!
//! Recipient-risk decisions for proposed transfers: a suspicious recipient
//! registry, the evaluator that consults it, and report intake.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod error;
pub mod types;
pub mod registry;
pub mod evaluator;
pub mod reports;

pub use error::{Error, Result};
pub use types::*;
pub use registry::{InMemoryRegistry, RecipientMatching, RecipientRegistry, RegistryPolicy};
pub use evaluator::{EvaluatorConfig, RiskEvaluator, HIGH_AMOUNT_THRESHOLD};
pub use reports::{ReportFlow, ReportIntake, ReportState};
