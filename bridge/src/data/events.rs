//! Harness event intake
//!
//! Events arrive as newline-delimited JSON, one per line:
//!
//! ```text
//! {"event": "stats", "data": {"timestamp": "...", "rps": {...}}}
//! {"event": "done", "data": {"aggregate": {...}}}
//! ```

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::domain::bridge::StatsReport;

/// Event emitted by the load-testing harness
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "event", content = "data", rename_all = "lowercase")]
pub enum HarnessEvent {
    /// Periodic stats for the last reporting interval
    Stats(IntervalReport),
    /// Final stats for the whole run
    Done(JsonValue),
}

/// Periodic stats as handed over by the harness
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct IntervalReport(JsonValue);

impl IntervalReport {
    pub fn new(snapshot: JsonValue) -> Self {
        Self(snapshot)
    }
}

impl StatsReport for IntervalReport {
    fn report(&self) -> JsonValue {
        self.0.clone()
    }
}

/// Reads harness events from a line-oriented stream
pub struct EventSource<R> {
    lines: Lines<R>,
    line_no: u64,
}

impl<R: AsyncBufRead + Unpin> EventSource<R> {
    pub fn new(reader: R) -> Self {
        Self {
            lines: reader.lines(),
            line_no: 0,
        }
    }

    /// Next well-formed event, or `None` at end of input.
    ///
    /// Blank lines are skipped. Lines that do not parse are logged and
    /// skipped. Only read errors are returned.
    pub async fn next_event(&mut self) -> std::io::Result<Option<HarnessEvent>> {
        while let Some(line) = self.lines.next_line().await? {
            self.line_no += 1;
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            match serde_json::from_str::<HarnessEvent>(line) {
                Ok(event) => {
                    tracing::trace!(line = self.line_no, "Harness event received");
                    return Ok(Some(event));
                }
                Err(e) => {
                    tracing::warn!(
                        line = self.line_no,
                        error = %e,
                        "Skipping malformed harness event"
                    );
                }
            }
        }
        Ok(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn source(input: &'static str) -> EventSource<&'static [u8]> {
        EventSource::new(input.as_bytes())
    }

    #[tokio::test]
    async fn test_reads_stats_and_done() {
        let mut events = source(concat!(
            r#"{"event":"stats","data":{"timestamp":"T1","rps":{"mean":3}}}"#,
            "\n",
            r#"{"event":"done","data":{"aggregate":{"scenariosCreated":10}}}"#,
            "\n",
        ));

        let first = events.next_event().await.unwrap().unwrap();
        match first {
            HarnessEvent::Stats(report) => {
                assert_eq!(report.report(), json!({ "timestamp": "T1", "rps": { "mean": 3 } }));
            }
            other => panic!("expected stats, got {:?}", other),
        }

        let second = events.next_event().await.unwrap().unwrap();
        assert_eq!(
            second,
            HarnessEvent::Done(json!({ "aggregate": { "scenariosCreated": 10 } }))
        );

        assert!(events.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_skips_blank_and_malformed_lines() {
        let mut events = source(concat!(
            "\n",
            "   \n",
            "not json\n",
            r#"{"event":"phaseStarted","data":{}}"#,
            "\n",
            r#"{"data":{}}"#,
            "\n",
            r#"{"event":"done","data":{"ok":true}}"#,
        ));

        let event = events.next_event().await.unwrap().unwrap();
        assert_eq!(event, HarnessEvent::Done(json!({ "ok": true })));
        assert_eq!(events.line_no, 6);
        assert!(events.next_event().await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_empty_input() {
        let mut events = source("");
        assert!(events.next_event().await.unwrap().is_none());
    }

    #[test]
    fn test_interval_report_returns_snapshot() {
        let report = IntervalReport::new(json!({ "codes": { "200": 4 } }));
        assert_eq!(report.report(), json!({ "codes": { "200": 4 } }));
        // The accessor can be called more than once.
        assert_eq!(report.report(), report.report());
    }
}
