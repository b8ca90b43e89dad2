//! Core application

use std::io::Write;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tokio::io::{AsyncBufRead, BufReader};

use crate::core::cli;
use crate::core::config::{AppConfig, LogLevel};
use crate::core::constants::ENV_LOG;
use crate::core::shutdown::{self, ShutdownSignal};
use crate::data::elastic::{ElasticClient, MetricsStore};
use crate::data::events::{EventSource, HarnessEvent};
use crate::domain::StatsBridge;

pub struct CoreApp {
    pub config: AppConfig,
    pub bridge: StatsBridge,
    pub shutdown: ShutdownSignal,
    /// Wait limit for in-flight writes at shutdown
    grace: Duration,
}

impl CoreApp {
    /// Run the application with CLI argument parsing
    pub async fn run() -> Result<()> {
        dotenvy::dotenv().ok();

        let cli_config = cli::parse();
        let config = AppConfig::load(&cli_config)?;
        Self::init_logging(config.bridge.resolve_log_level()?);

        tracing::debug!(config = ?config.bridge, "Plugin config reconciled");

        let app = Self::init(config)?;
        app.start().await
    }

    fn init(config: AppConfig) -> Result<Self> {
        let store =
            ElasticClient::new(&config.bridge).context("Failed to create metrics store client")?;
        Self::with_store(config, Arc::new(store))
    }

    fn with_store(config: AppConfig, store: Arc<dyn MetricsStore>) -> Result<Self> {
        let grace = shutdown::grace_period(config.bridge.resolve_closing_timeout()?);
        let bridge = StatsBridge::new(Arc::new(config.bridge.clone()), store);
        Ok(Self {
            config,
            bridge,
            shutdown: ShutdownSignal::new(),
            grace,
        })
    }

    fn init_logging(level: LogLevel) {
        let filter = std::env::var(ENV_LOG)
            .or_else(|_| std::env::var("RUST_LOG"))
            .unwrap_or_else(|_| level.default_filter());

        tracing_subscriber::fmt()
            .with_target(false)
            .with_thread_ids(false)
            .with_level(true)
            .with_ansi(true)
            .with_writer(std::io::stderr)
            .compact()
            .with_env_filter(filter)
            .init();
    }

    async fn start(self) -> Result<()> {
        self.shutdown.install_signal_handlers();
        self.bridge.forwarder().handshake();

        match self.config.input {
            Some(ref path) => {
                tracing::debug!(path = %path.display(), "Reading harness events from file");
                let file = tokio::fs::File::open(path)
                    .await
                    .with_context(|| format!("Failed to open event input: {}", path.display()))?;
                self.pump(BufReader::new(file)).await?;
            }
            None => {
                tracing::debug!("Reading harness events from stdin");
                self.pump(BufReader::new(tokio::io::stdin())).await?;
            }
        }

        self.finish().await
    }

    /// Feed events to the bridge until end of input or shutdown
    async fn pump<R: AsyncBufRead + Unpin>(&self, reader: R) -> Result<()> {
        let mut events = EventSource::new(reader);
        let stop = self.shutdown.wait();
        tokio::pin!(stop);

        loop {
            tokio::select! {
                _ = &mut stop => {
                    tracing::debug!("Shutdown requested, no longer reading events");
                    break;
                }
                event = events.next_event() => {
                    match event.context("Failed to read harness events")? {
                        Some(HarnessEvent::Stats(report)) => self.bridge.on_stats(&report),
                        Some(HarnessEvent::Done(snapshot)) => self.bridge.on_done(snapshot),
                        None => {
                            tracing::debug!("Harness event stream ended");
                            break;
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Wait for pending writes, then print the diagnostic report if any
    async fn finish(&self) -> Result<()> {
        let forwarder = self.bridge.forwarder();
        tracing::debug!(
            pending = forwarder.pending(),
            "Waiting for pending report writes..."
        );
        if forwarder.drain(self.grace).await {
            tracing::debug!("All report writes completed");
        }

        if let Some(records) = self.bridge.report() {
            let json = serde_json::to_string_pretty(&records)
                .context("Failed to serialize diagnostic report")?;
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{}", json)?;
            stdout.flush()?;
        }

        tracing::debug!("Shutdown complete");
        Ok(())
    }
}
