//! External collaborators
//!
//! - `elastic` - Metrics store client (trait and Elasticsearch implementation)
//! - `events` - Harness event intake from newline-delimited JSON

pub mod elastic;
pub mod events;

pub use elastic::{ElasticClient, IndexRequest, MetricsStore, StoreError};
pub use events::{EventSource, HarnessEvent, IntervalReport};
