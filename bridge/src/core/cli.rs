use clap::Parser;

use std::path::PathBuf;

use super::config::LogLevel;
use super::constants::{
    ENV_CONFIG, ENV_HOST, ENV_INDEX_PREFIX, ENV_INPUT, ENV_LOG_LEVEL, ENV_PORT,
};

#[derive(Parser)]
#[command(name = "statsbridge")]
#[command(
    version,
    about = "Forward load-test stats snapshots to Elasticsearch",
    long_about = None
)]
pub struct Cli {
    /// Path to the harness config file (JSON)
    #[arg(long, short = 'c', env = ENV_CONFIG)]
    pub config: Option<PathBuf>,

    /// Read harness events from this file instead of stdin
    #[arg(long, short = 'i', env = ENV_INPUT)]
    pub input: Option<PathBuf>,

    /// Metrics store host
    #[arg(long, short = 'H', env = ENV_HOST)]
    pub host: Option<String>,

    /// Metrics store port
    #[arg(long, short = 'p', env = ENV_PORT)]
    pub port: Option<u64>,

    /// Target index name
    #[arg(long, env = ENV_INDEX_PREFIX)]
    pub index_prefix: Option<String>,

    /// Store client verbosity (trace, debug, info, warning, error, silent)
    #[arg(long, env = ENV_LOG_LEVEL, value_parser = parse_log_level)]
    pub log_level: Option<LogLevel>,
}

/// Parse log level from CLI/env string
fn parse_log_level(s: &str) -> Result<LogLevel, String> {
    s.parse()
}

/// Configuration derived from CLI arguments
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    pub config: Option<PathBuf>,
    pub input: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u64>,
    pub index_prefix: Option<String>,
    pub log_level: Option<LogLevel>,
}

impl From<Cli> for CliConfig {
    fn from(cli: Cli) -> Self {
        Self {
            config: cli.config,
            input: cli.input,
            host: cli.host,
            port: cli.port,
            index_prefix: cli.index_prefix,
            log_level: cli.log_level,
        }
    }
}

/// Parse CLI arguments
pub fn parse() -> CliConfig {
    Cli::parse().into()
}
