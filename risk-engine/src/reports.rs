//! User reports against recipients

use crate::{Error, RecipientId, RecipientRegistry, RecipientRiskEntry, Result};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Report intake
///
/// Every accepted report adds exactly one to the recipient's report count.
/// Repeated reports are tallied, not deduplicated.
pub struct ReportIntake {
    registry: Arc<dyn RecipientRegistry>,
}

impl ReportIntake {
    /// Create new report intake
    pub fn new(registry: Arc<dyn RecipientRegistry>) -> Self {
        Self { registry }
    }

    /// Report a recipient as suspicious
    pub fn report(&self, recipient_id: &str) -> Result<RecipientRiskEntry> {
        let recipient_id = RecipientId::new(recipient_id)?;
        let entry = self.registry.report_and_upsert(&recipient_id)?;

        info!(
            recipient = %entry.recipient_id,
            reports = entry.report_count,
            limit = %entry.max_safe_amount,
            "Recipient reported"
        );

        Ok(entry)
    }
}

/// State of a report confirmation dialog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum ReportState {
    /// Nothing requested
    Idle,
    /// Waiting for the user to confirm
    PendingConfirmation {
        /// Recipient about to be reported
        recipient_id: RecipientId,
    },
    /// Report submitted
    Reported(RecipientRiskEntry),
    /// User backed out
    Cancelled,
}

/// Report confirmation flow: `Idle -> PendingConfirmation -> {Reported, Cancelled}`
///
/// Owned by the caller. Only [`ReportFlow::confirm`] touches the registry, and
/// it does so exactly once per flow.
#[derive(Debug, Clone)]
pub struct ReportFlow {
    state: ReportState,
}

impl ReportFlow {
    /// Create idle flow
    pub fn new() -> Self {
        Self {
            state: ReportState::Idle,
        }
    }

    /// Current state
    pub fn state(&self) -> &ReportState {
        &self.state
    }

    /// Ask the user to confirm reporting a recipient
    pub fn request(&mut self, recipient_id: &str) -> Result<()> {
        match self.state {
            ReportState::Idle => {
                let recipient_id = RecipientId::new(recipient_id)?;
                self.state = ReportState::PendingConfirmation { recipient_id };
                Ok(())
            }
            _ => Err(self.invalid("request")),
        }
    }

    /// User confirmed: submit the report
    ///
    /// On a registry failure the flow stays pending so the caller may retry
    /// or cancel.
    pub fn confirm(&mut self, intake: &ReportIntake) -> Result<RecipientRiskEntry> {
        let recipient_id = match &self.state {
            ReportState::PendingConfirmation { recipient_id } => recipient_id.clone(),
            _ => return Err(self.invalid("confirm")),
        };

        let entry = intake.report(recipient_id.as_str())?;
        self.state = ReportState::Reported(entry.clone());
        Ok(entry)
    }

    /// User cancelled: no report is submitted
    pub fn cancel(&mut self) -> Result<()> {
        match self.state {
            ReportState::PendingConfirmation { .. } => {
                self.state = ReportState::Cancelled;
                Ok(())
            }
            _ => Err(self.invalid("cancel")),
        }
    }

    fn invalid(&self, action: &str) -> Error {
        Error::InvalidTransition(format!("cannot {} from {:?}", action, self.state))
    }
}

impl Default for ReportFlow {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{InMemoryRegistry, RegistryPolicy};
    use rust_decimal::Decimal;

    fn setup() -> (Arc<InMemoryRegistry>, ReportIntake) {
        let registry = Arc::new(InMemoryRegistry::from_entries(
            RegistryPolicy::default(),
            vec![RecipientRiskEntry::new(
                RecipientId::new("scammer@upi").unwrap(),
                15,
                Decimal::from(1000),
            )],
        ));
        let intake = ReportIntake::new(registry.clone());
        (registry, intake)
    }

    #[test]
    fn test_report_increments_each_call() {
        let (registry, intake) = setup();

        assert_eq!(intake.report("scammer@upi").unwrap().report_count, 16);
        assert_eq!(intake.report("scammer@upi").unwrap().report_count, 17);

        let id = RecipientId::new("scammer@upi").unwrap();
        assert_eq!(registry.lookup(&id).unwrap().unwrap().report_count, 17);
    }

    #[test]
    fn test_report_unknown_recipient() {
        let (_, intake) = setup();

        let entry = intake.report("new@upi").unwrap();
        assert_eq!(entry.report_count, 1);
        assert_eq!(entry.max_safe_amount, Decimal::ZERO);
    }

    #[test]
    fn test_report_rejects_empty() {
        let (registry, intake) = setup();

        assert!(matches!(intake.report(""), Err(Error::InvalidRecipient(_))));
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_flow_confirm_reports_once() {
        let (registry, intake) = setup();
        let mut flow = ReportFlow::new();

        flow.request("scammer@upi").unwrap();
        assert!(matches!(flow.state(), ReportState::PendingConfirmation { .. }));

        let entry = flow.confirm(&intake).unwrap();
        assert_eq!(entry.report_count, 16);
        assert_eq!(flow.state(), &ReportState::Reported(entry));

        // terminal
        assert!(matches!(flow.confirm(&intake), Err(Error::InvalidTransition(_))));
        let id = RecipientId::new("scammer@upi").unwrap();
        assert_eq!(registry.lookup(&id).unwrap().unwrap().report_count, 16);
    }

    #[test]
    fn test_flow_cancel_reports_nothing() {
        let (registry, _) = setup();
        let mut flow = ReportFlow::new();

        flow.request("scammer@upi").unwrap();
        flow.cancel().unwrap();
        assert_eq!(flow.state(), &ReportState::Cancelled);
        assert!(flow.cancel().is_err());

        let id = RecipientId::new("scammer@upi").unwrap();
        assert_eq!(registry.lookup(&id).unwrap().unwrap().report_count, 15);
    }

    #[test]
    fn test_flow_rejects_out_of_order() {
        let (_, intake) = setup();
        let mut flow = ReportFlow::new();

        assert!(flow.confirm(&intake).is_err());
        assert!(flow.cancel().is_err());
        assert!(matches!(flow.request(""), Err(Error::InvalidRecipient(_))));
        assert_eq!(flow.state(), &ReportState::Idle);

        flow.request("a@upi").unwrap();
        assert!(flow.request("b@upi").is_err());
    }
}
