//! Metrics store client
//!
//! `MetricsStore` is the seam the forwarder writes through. `ElasticClient`
//! implements it over the Elasticsearch REST API.

mod client;
mod error;

use async_trait::async_trait;
use serde_json::Value as JsonValue;

pub use client::ElasticClient;
pub use error::StoreError;

/// A single document write
#[derive(Debug, Clone, PartialEq)]
pub struct IndexRequest {
    /// Target index
    pub index: String,
    /// Sub-classification within the index
    pub doc_type: String,
    pub body: JsonValue,
}

#[async_trait]
pub trait MetricsStore: Send + Sync {
    /// Cluster handshake
    async fn info(&self) -> Result<JsonValue, StoreError>;

    /// Write one document
    async fn index(&self, request: IndexRequest) -> Result<JsonValue, StoreError>;
}
