//! Fire-and-forget delivery to the metrics store
//!
//! Every write runs as its own task. The outcome is logged and then dropped:
//! failed writes are not retried and never reach the event source.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use serde_json::Value as JsonValue;
use tokio_util::task::TaskTracker;

use crate::data::elastic::{IndexRequest, MetricsStore};

/// Which harness event a snapshot came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Periodic interval stats
    Stats,
    /// Final stats at the end of the run
    Done,
}

impl ReportKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Stats => "stats",
            Self::Done => "done",
        }
    }
}

impl fmt::Display for ReportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

pub struct ReportForwarder {
    store: Arc<dyn MetricsStore>,
    index_prefix: String,
    tasks: TaskTracker,
}

impl ReportForwarder {
    pub fn new(store: Arc<dyn MetricsStore>, index_prefix: impl Into<String>) -> Self {
        Self {
            store,
            index_prefix: index_prefix.into(),
            tasks: TaskTracker::new(),
        }
    }

    /// Ask the store for its cluster info. The answer is only logged.
    pub fn handshake(&self) {
        let store = Arc::clone(&self.store);
        self.tasks.spawn(async move {
            match store.info().await {
                Ok(info) => tracing::debug!(info = %info, "Metrics store handshake done"),
                Err(e) => tracing::warn!(error = %e, "Metrics store handshake failed"),
            }
        });
    }

    /// Submit a sanitized snapshot and return immediately.
    pub fn forward(&self, snapshot: JsonValue, kind: ReportKind) {
        let store = Arc::clone(&self.store);
        let request = IndexRequest {
            index: self.index_prefix.clone(),
            doc_type: kind.as_str().to_string(),
            body: snapshot,
        };

        self.tasks.spawn(async move {
            let index = request.index.clone();
            match store.index(request).await {
                Ok(response) => {
                    tracing::debug!(index = %index, kind = %kind, response = %response, "Report stored");
                }
                Err(e) => {
                    tracing::warn!(index = %index, kind = %kind, error = %e, "Report write failed");
                }
            }
        });
    }

    /// Writes still in flight
    pub fn pending(&self) -> usize {
        self.tasks.len()
    }

    /// Stop accepting writes and wait for in-flight ones, up to `limit`.
    ///
    /// Returns false if writes were still pending when the limit was hit.
    pub async fn drain(&self, limit: Duration) -> bool {
        self.tasks.close();
        let drained = tokio::time::timeout(limit, self.tasks.wait()).await.is_ok();
        if !drained {
            tracing::warn!(
                pending = self.pending(),
                timeout_ms = limit.as_millis() as u64,
                "Timeout waiting for pending report writes"
            );
        }
        drained
    }
}
