//! In-memory diagnostic report
//!
//! Exercises the harness plugin reporting interface. When enabled, every
//! periodic snapshot leaves a `{timestamp, value}` record behind. Records live
//! as long as the bridge and are never trimmed.

use parking_lot::Mutex;
use serde::Serialize;
use serde_json::{Value as JsonValue, json};

use crate::core::constants::{
    DIAGNOSTIC_AGGREGATE_TIMESTAMP, DIAGNOSTIC_AGGREGATE_VALUE, DIAGNOSTIC_RECORD_VALUE,
};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DiagnosticRecord {
    /// Absent when the snapshot had no `timestamp` field
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<JsonValue>,
    pub value: JsonValue,
}

#[derive(Debug, Default)]
pub struct DiagnosticReport {
    records: Mutex<Vec<DiagnosticRecord>>,
}

impl DiagnosticReport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one periodic snapshot, keyed by its `timestamp` field
    pub fn record(&self, snapshot: &JsonValue) {
        self.records.lock().push(DiagnosticRecord {
            timestamp: snapshot.get("timestamp").cloned(),
            value: JsonValue::String(DIAGNOSTIC_RECORD_VALUE.to_string()),
        });
    }

    /// `None` if nothing was recorded yet.
    ///
    /// Otherwise appends an aggregate marker to the stored records and
    /// returns all of them. Each call adds another marker.
    pub fn flush(&self) -> Option<Vec<DiagnosticRecord>> {
        let mut records = self.records.lock();
        if records.is_empty() {
            return None;
        }
        records.push(DiagnosticRecord {
            timestamp: Some(JsonValue::String(DIAGNOSTIC_AGGREGATE_TIMESTAMP.to_string())),
            value: json!({ "test": DIAGNOSTIC_AGGREGATE_VALUE }),
        });
        Some(records.clone())
    }
}
