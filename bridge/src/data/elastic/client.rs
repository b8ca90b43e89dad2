use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value as JsonValue;

use super::error::StoreError;
use super::{IndexRequest, MetricsStore};
use crate::core::config::BridgeConfig;
use crate::core::constants::STORE_REQUEST_TIMEOUT_SECS;

const USER_AGENT: &str = concat!("statsbridge/", env!("CARGO_PKG_VERSION"));

/// Elasticsearch REST client with basic auth
pub struct ElasticClient {
    client: reqwest::Client,
    base: Url,
    user: String,
    password: String,
}

impl fmt::Debug for ElasticClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ElasticClient")
            .field("base", &self.base.as_str())
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .finish()
    }
}

impl ElasticClient {
    /// Build a client for `http://{host}:{port}`.
    ///
    /// The port must be a TCP port number. The host is not checked beyond
    /// what URL parsing rejects.
    pub fn new(config: &BridgeConfig) -> Result<Self, StoreError> {
        let port: u16 = config.port.trim().parse().map_err(|e| {
            StoreError::Config(format!("invalid store port '{}': {}", config.port, e))
        })?;
        let address = format!("http://{}:{}", config.host, port);
        let base = Url::parse(&address).map_err(|e| {
            StoreError::Config(format!("invalid store address {}: {}", address, e))
        })?;

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(STORE_REQUEST_TIMEOUT_SECS))
            .user_agent(USER_AGENT)
            .build()
            .map_err(|e| StoreError::Config(format!("failed to build HTTP client: {}", e)))?;

        tracing::debug!(
            address = %base,
            user = %config.user,
            "Metrics store client initialized"
        );
        Ok(Self {
            client,
            base,
            user: config.user.clone(),
            password: config.password.clone(),
        })
    }

    /// `{base}/{segments...}` with each segment percent-encoded
    fn url(&self, segments: &[&str]) -> Result<Url, StoreError> {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .map_err(|_| StoreError::Config(format!("store address {} cannot be a base", self.base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<JsonValue, StoreError> {
        let resp = request
            .basic_auth(&self.user, Some(&self.password))
            .send()
            .await?;

        let status = resp.status();
        let body = resp.text().await?;
        if !status.is_success() {
            return Err(StoreError::status(status, body));
        }
        if body.trim().is_empty() {
            return Ok(JsonValue::Null);
        }
        serde_json::from_str(&body).map_err(|e| StoreError::Decode(e.to_string()))
    }
}

#[async_trait]
impl MetricsStore for ElasticClient {
    async fn info(&self) -> Result<JsonValue, StoreError> {
        tracing::trace!(url = %self.base, "GET");
        self.send(self.client.get(self.base.clone())).await
    }

    async fn index(&self, request: IndexRequest) -> Result<JsonValue, StoreError> {
        let url = self.url(&[request.index.as_str(), request.doc_type.as_str()])?;
        tracing::trace!(url = %url, "POST");
        self.send(self.client.post(url).json(&request.body)).await
    }
}
