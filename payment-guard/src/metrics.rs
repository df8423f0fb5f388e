//! Metrics collection for observability
//!
//! Prometheus metrics for monitoring risk decisions.
//!
//! # Metrics
//!
//! - `payguard_decisions_total{kind}` - Evaluations by decision kind
//! - `payguard_transactions_total{status}` - Recorded transactions by status
//! - `payguard_reports_total` - Accepted recipient reports
//! - `payguard_rejections_total{reason}` - Rejected calls by error reason
//! - `payguard_evaluation_duration_seconds` - Histogram of evaluation latencies

use crate::Result;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use risk_engine::DecisionKind;
use ledger_core::TransactionStatus;

/// Metrics collector
///
/// Registered on its own registry, so several guards can live in one process.
#[derive(Clone)]
pub struct GuardMetrics {
    /// Evaluations by decision kind
    pub decisions_total: IntCounterVec,

    /// Recorded transactions by status
    pub transactions_total: IntCounterVec,

    /// Accepted reports
    pub reports_total: IntCounter,

    /// Rejected calls by reason
    pub rejections_total: IntCounterVec,

    /// Evaluation duration histogram
    pub evaluation_duration: Histogram,

    registry: Registry,
}

impl GuardMetrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Registry::new();

        let decisions_total = IntCounterVec::new(
            Opts::new("payguard_decisions_total", "Evaluations by decision kind"),
            &["kind"],
        )?;
        registry.register(Box::new(decisions_total.clone()))?;

        let transactions_total = IntCounterVec::new(
            Opts::new("payguard_transactions_total", "Recorded transactions by status"),
            &["status"],
        )?;
        registry.register(Box::new(transactions_total.clone()))?;

        let reports_total = IntCounter::new("payguard_reports_total", "Accepted recipient reports")?;
        registry.register(Box::new(reports_total.clone()))?;

        let rejections_total = IntCounterVec::new(
            Opts::new("payguard_rejections_total", "Rejected calls by error reason"),
            &["reason"],
        )?;
        registry.register(Box::new(rejections_total.clone()))?;

        let evaluation_duration = Histogram::with_opts(
            HistogramOpts::new(
                "payguard_evaluation_duration_seconds",
                "Histogram of evaluation latencies",
            )
            .buckets(vec![0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01]),
        )?;
        registry.register(Box::new(evaluation_duration.clone()))?;

        Ok(Self {
            decisions_total,
            transactions_total,
            reports_total,
            rejections_total,
            evaluation_duration,
            registry,
        })
    }

    /// Record an evaluation
    pub fn record_decision(&self, kind: DecisionKind, duration_seconds: f64) {
        self.decisions_total.with_label_values(&[kind.as_str()]).inc();
        self.evaluation_duration.observe(duration_seconds);
    }

    /// Record a ledger append
    pub fn record_transaction(&self, status: TransactionStatus) {
        self.transactions_total.with_label_values(&[status.as_str()]).inc();
    }

    /// Record an accepted report
    pub fn record_report(&self) {
        self.reports_total.inc();
    }

    /// Record a rejected call
    pub fn record_rejection(&self, reason: &str) {
        self.rejections_total.with_label_values(&[reason]).inc();
    }

    /// Get metrics registry
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    /// Render all metrics in the text exposition format
    pub fn render(&self) -> Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| crate::Error::Metrics(e.to_string()))
    }
}

impl std::fmt::Debug for GuardMetrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GuardMetrics")
            .field("reports_total", &self.reports_total.get())
            .finish_non_exhaustive()
    }
}
