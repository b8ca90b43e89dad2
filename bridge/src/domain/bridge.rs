//! Harness plugin instance
//!
//! Owns the reconciled config, the forwarder and the diagnostic report for
//! the lifetime of one harness run.

use std::sync::Arc;

use serde_json::Value as JsonValue;

use super::forward::{ReportForwarder, ReportKind};
use super::report::{DiagnosticRecord, DiagnosticReport};
use super::stats::sanitize;
use crate::core::config::BridgeConfig;
use crate::data::elastic::MetricsStore;

/// Source of a periodic snapshot
pub trait StatsReport {
    fn report(&self) -> JsonValue;
}

pub struct StatsBridge {
    config: Arc<BridgeConfig>,
    forwarder: ReportForwarder,
    diagnostics: DiagnosticReport,
}

impl StatsBridge {
    pub fn new(config: Arc<BridgeConfig>, store: Arc<dyn MetricsStore>) -> Self {
        let forwarder = ReportForwarder::new(store, config.index_prefix.clone());
        Self {
            config,
            forwarder,
            diagnostics: DiagnosticReport::new(),
        }
    }

    pub fn config(&self) -> &BridgeConfig {
        &self.config
    }

    pub fn forwarder(&self) -> &ReportForwarder {
        &self.forwarder
    }

    /// Periodic stats
    pub fn on_stats(&self, source: &impl StatsReport) {
        tracing::trace!("on_stats");
        let snapshot = source.report();

        if self.config.enable_useless_reporting {
            self.diagnostics.record(&snapshot);
        }

        self.clean_and_forward(snapshot, ReportKind::Stats);
    }

    /// Final stats
    pub fn on_done(&self, snapshot: JsonValue) {
        tracing::trace!("on_done");
        self.clean_and_forward(snapshot, ReportKind::Done);
    }

    /// Diagnostic records with an aggregate marker appended, `None` if empty.
    pub fn report(&self) -> Option<Vec<DiagnosticRecord>> {
        self.diagnostics.flush()
    }

    fn clean_and_forward(&self, snapshot: JsonValue, kind: ReportKind) {
        match sanitize(snapshot, &self.config.skip_list, &self.config.default_value) {
            Ok(cleaned) => self.forwarder.forward(cleaned, kind),
            Err(e) => tracing::warn!(kind = %kind, error = %e, "Dropping unexpected snapshot"),
        }
    }
}
