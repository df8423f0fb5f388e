//! Configuration for the payment guard

use crate::{Error, Result};
use risk_engine::{EvaluatorConfig, RecipientMatching, RegistryPolicy};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Payment guard configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Service name
    pub service_name: String,

    /// Evaluator configuration
    pub evaluator: EvaluatorConfig,

    /// Registry policy
    pub registry: RegistryPolicy,

    /// Ledger policy
    pub ledger: LedgerPolicy,

    /// Logging configuration
    pub log: LogConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            service_name: "payment-guard".to_string(),
            evaluator: EvaluatorConfig::default(),
            registry: RegistryPolicy::default(),
            ledger: LedgerPolicy::default(),
            log: LogConfig::default(),
        }
    }
}

/// Ledger policy
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct LedgerPolicy {
    /// Record confirmed overrides as `Flagged` instead of `Success`
    pub tag_confirmed_overrides: bool,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LogConfig {
    /// Filter directive used when `RUST_LOG` is unset
    pub level: String,

    /// Emit JSON lines instead of human-readable output
    pub json: bool,
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

impl Config {
    /// Load from file
    pub fn from_file(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    /// Apply `PAYGUARD_*` overrides from `lookup` on top of the defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let mut config = Config::default();

        if let Some(threshold) = lookup("PAYGUARD_HIGH_AMOUNT_THRESHOLD") {
            config.evaluator.high_amount_threshold =
                parse_decimal("PAYGUARD_HIGH_AMOUNT_THRESHOLD", &threshold)?;
        }

        if let Some(limit) = lookup("PAYGUARD_DEFAULT_MAX_SAFE_AMOUNT") {
            config.registry.default_max_safe_amount =
                parse_decimal("PAYGUARD_DEFAULT_MAX_SAFE_AMOUNT", &limit)?;
        }

        if let Some(matching) = lookup("PAYGUARD_RECIPIENT_MATCHING") {
            config.registry.matching = RecipientMatching::from_str(&matching).ok_or_else(|| {
                Error::Config(format!("Unknown recipient matching: {}", matching))
            })?;
        }

        if let Some(level) = lookup("PAYGUARD_LOG_LEVEL") {
            config.log.level = level;
        }

        if let Some(json) = lookup("PAYGUARD_LOG_JSON") {
            config.log.json = matches!(json.as_str(), "1" | "true" | "yes");
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<()> {
        self.evaluator.validate()?;
        self.registry.validate()?;
        Ok(())
    }
}

fn parse_decimal(var: &str, value: &str) -> Result<Decimal> {
    Decimal::from_str(value.trim())
        .map_err(|e| Error::Config(format!("{} is not a decimal ({}): {}", var, value, e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn lookup_in(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |var| vars.get(var).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.service_name, "payment-guard");
        assert_eq!(config.evaluator.high_amount_threshold, Decimal::from(10_000));
        assert_eq!(config.registry.default_max_safe_amount, Decimal::ZERO);
        assert_eq!(config.registry.matching, RecipientMatching::Exact);
        assert!(!config.ledger.tag_confirmed_overrides);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"
service_name = "upi-guard"

[evaluator]
high_amount_threshold = "5000"

[registry]
default_max_safe_amount = "100"
matching = "normalized"

[ledger]
tag_confirmed_overrides = true
"#
        )
        .unwrap();

        let config = Config::from_file(file.path()).unwrap();
        assert_eq!(config.service_name, "upi-guard");
        assert_eq!(config.evaluator.high_amount_threshold, Decimal::from(5000));
        assert_eq!(config.registry.default_max_safe_amount, Decimal::from(100));
        assert_eq!(config.registry.matching, RecipientMatching::Normalized);
        assert!(config.ledger.tag_confirmed_overrides);
        // omitted sections keep defaults
        assert_eq!(config.log.level, "info");
    }

    #[test]
    fn test_from_file_rejects_invalid_values() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "[evaluator]\nhigh_amount_threshold = \"0\"\n").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(Error::Config(_))));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "service_name = [").unwrap();
        assert!(matches!(Config::from_file(file.path()), Err(Error::Config(_))));

        assert!(matches!(
            Config::from_file("/nonexistent/payment-guard.toml"),
            Err(Error::Io(_))
        ));
    }

    #[test]
    fn test_parse_decimal() {
        assert_eq!(parse_decimal("X", " 2500 ").unwrap(), Decimal::from(2500));
        assert!(parse_decimal("X", "lots").is_err());
    }

    #[test]
    fn test_env_overrides() {
        let config = Config::from_lookup(lookup_in(&[
            ("PAYGUARD_HIGH_AMOUNT_THRESHOLD", "7500"),
            ("PAYGUARD_DEFAULT_MAX_SAFE_AMOUNT", "250.50"),
            ("PAYGUARD_RECIPIENT_MATCHING", "case_insensitive"),
            ("PAYGUARD_LOG_LEVEL", "debug"),
            ("PAYGUARD_LOG_JSON", "true"),
        ]))
        .unwrap();

        assert_eq!(config.evaluator.high_amount_threshold, Decimal::from(7500));
        assert_eq!(config.registry.default_max_safe_amount, Decimal::new(25050, 2));
        assert_eq!(config.registry.matching, RecipientMatching::CaseInsensitive);
        assert_eq!(config.log.level, "debug");
        assert!(config.log.json);

        // unset variables keep defaults
        let config = Config::from_lookup(lookup_in(&[("PAYGUARD_LOG_JSON", "no")])).unwrap();
        assert!(!config.log.json);
        assert_eq!(config.evaluator.high_amount_threshold, Decimal::from(10_000));
    }

    #[test]
    fn test_env_overrides_rejected() {
        let result = Config::from_lookup(lookup_in(&[("PAYGUARD_RECIPIENT_MATCHING", "fuzzy")]));
        match result {
            Err(Error::Config(msg)) => assert!(msg.contains("fuzzy")),
            other => panic!("expected config error, got {:?}", other),
        }

        assert!(matches!(
            Config::from_lookup(lookup_in(&[("PAYGUARD_HIGH_AMOUNT_THRESHOLD", "ten")])),
            Err(Error::Config(_))
        ));
        assert!(matches!(
            Config::from_lookup(lookup_in(&[("PAYGUARD_DEFAULT_MAX_SAFE_AMOUNT", "-1")])),
            Err(Error::Config(_))
        ));
    }

    #[test]
    fn test_from_env_reads_process_environment() {
        std::env::set_var("PAYGUARD_RECIPIENT_MATCHING", "trimmed");
        let config = Config::from_env();
        std::env::remove_var("PAYGUARD_RECIPIENT_MATCHING");

        assert_eq!(config.unwrap().registry.matching, RecipientMatching::Trimmed);
    }
}
