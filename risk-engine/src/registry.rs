//! Suspicious recipient registry
//!
//! The registry is a port: the evaluator and report intake only see the
//! [`RecipientRegistry`] trait, so the backing store can be swapped without
//! touching decision logic. [`InMemoryRegistry`] is the reference adapter.

use crate::{Error, RecipientId, RecipientRiskEntry, Result};
use dashmap::DashMap;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

/// Lookup and report access to the suspicious recipient table
pub trait RecipientRegistry: Send + Sync {
    /// Find the entry for a recipient, if listed
    fn lookup(&self, recipient_id: &RecipientId) -> Result<Option<RecipientRiskEntry>>;

    /// Record one report against a recipient, creating the entry if needed
    ///
    /// Must increment `report_count` by exactly one per call.
    fn report_and_upsert(&self, recipient_id: &RecipientId) -> Result<RecipientRiskEntry>;
}

/// How recipient identifiers are compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecipientMatching {
    /// Byte-for-byte comparison
    #[default]
    Exact,
    /// Case-insensitive comparison
    CaseInsensitive,
    /// Leading and trailing whitespace ignored
    Trimmed,
    /// Trimmed and case-insensitive
    Normalized,
}

impl RecipientMatching {
    /// Registry key for an identifier under this policy
    pub fn key(&self, recipient_id: &RecipientId) -> String {
        let raw = recipient_id.as_str();
        match self {
            RecipientMatching::Exact => raw.to_string(),
            RecipientMatching::CaseInsensitive => raw.to_lowercase(),
            RecipientMatching::Trimmed => raw.trim().to_string(),
            RecipientMatching::Normalized => raw.trim().to_lowercase(),
        }
    }

    /// Parse from a config string
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "exact" => Some(RecipientMatching::Exact),
            "case_insensitive" => Some(RecipientMatching::CaseInsensitive),
            "trimmed" => Some(RecipientMatching::Trimmed),
            "normalized" => Some(RecipientMatching::Normalized),
            _ => None,
        }
    }
}

/// Registry policy
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryPolicy {
    /// Safe limit given to identifiers reported for the first time.
    /// Zero blocks every amount until an administrative process sets a limit.
    pub default_max_safe_amount: Decimal,

    /// Identifier comparison rule
    pub matching: RecipientMatching,
}

impl Default for RegistryPolicy {
    fn default() -> Self {
        Self {
            default_max_safe_amount: Decimal::ZERO,
            matching: RecipientMatching::Exact,
        }
    }
}

impl RegistryPolicy {
    /// Validate policy values
    pub fn validate(&self) -> Result<()> {
        if self.default_max_safe_amount < Decimal::ZERO {
            return Err(Error::InvalidConfig(format!(
                "default_max_safe_amount must not be negative, got {}",
                self.default_max_safe_amount
            )));
        }
        Ok(())
    }
}

/// In-memory registry backed by a concurrent map
///
/// Each key is guarded by the map's shard lock, so concurrent reports against
/// the same recipient never lose an increment.
#[derive(Debug)]
pub struct InMemoryRegistry {
    // Map: matching key -> entry
    entries: DashMap<String, RecipientRiskEntry>,
    policy: RegistryPolicy,
}

impl InMemoryRegistry {
    /// Create empty registry
    pub fn new(policy: RegistryPolicy) -> Self {
        Self {
            entries: DashMap::new(),
            policy,
        }
    }

    /// Create registry seeded with entries from an external source
    pub fn from_entries(
        policy: RegistryPolicy,
        entries: impl IntoIterator<Item = RecipientRiskEntry>,
    ) -> Self {
        let registry = Self::new(policy);
        for entry in entries {
            registry.insert(entry);
        }
        info!(entries = registry.len(), "Loaded suspicious recipient registry");
        registry
    }

    /// Create registry from a JSON array of entries
    pub fn from_json(policy: RegistryPolicy, json: &str) -> Result<Self> {
        let entries: Vec<RecipientRiskEntry> = serde_json::from_str(json)
            .map_err(|e| Error::Registry(format!("Failed to parse registry seed: {}", e)))?;
        Ok(Self::from_entries(policy, entries))
    }

    /// Insert or replace an entry
    pub fn insert(&self, entry: RecipientRiskEntry) -> Option<RecipientRiskEntry> {
        let key = self.policy.matching.key(&entry.recipient_id);
        self.entries.insert(key, entry)
    }

    /// Set the safe limit of a listed recipient
    pub fn set_max_safe_amount(
        &self,
        recipient_id: &RecipientId,
        max_safe_amount: Decimal,
    ) -> Result<RecipientRiskEntry> {
        if max_safe_amount < Decimal::ZERO {
            return Err(Error::InvalidAmount(format!(
                "safe limit must not be negative, got {}",
                max_safe_amount
            )));
        }

        let key = self.policy.matching.key(recipient_id);
        let mut entry = self
            .entries
            .get_mut(&key)
            .ok_or_else(|| Error::Registry(format!("Recipient not listed: {}", recipient_id)))?;
        entry.max_safe_amount = max_safe_amount;

        info!(recipient = %recipient_id, limit = %max_safe_amount, "Updated safe limit");
        Ok(entry.clone())
    }

    /// Snapshot of all entries
    pub fn entries(&self) -> Vec<RecipientRiskEntry> {
        self.entries.iter().map(|e| e.value().clone()).collect()
    }

    /// Number of listed recipients
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the registry is empty
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registry policy
    pub fn policy(&self) -> &RegistryPolicy {
        &self.policy
    }
}

impl Default for InMemoryRegistry {
    fn default() -> Self {
        Self::new(RegistryPolicy::default())
    }
}

impl RecipientRegistry for InMemoryRegistry {
    fn lookup(&self, recipient_id: &RecipientId) -> Result<Option<RecipientRiskEntry>> {
        let key = self.policy.matching.key(recipient_id);
        Ok(self.entries.get(&key).map(|e| e.value().clone()))
    }

    fn report_and_upsert(&self, recipient_id: &RecipientId) -> Result<RecipientRiskEntry> {
        let key = self.policy.matching.key(recipient_id);
        let default_limit = self.policy.default_max_safe_amount;

        let mut entry = self.entries.entry(key).or_insert_with(|| {
            debug!(recipient = %recipient_id, "Listing new recipient");
            RecipientRiskEntry::new(recipient_id.clone(), 0, default_limit)
        });
        entry.report_count += 1;

        Ok(entry.clone())
    }
}
