use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};

use crate::domain::stats::SkipList;
use crate::utils::file::expand_path;
use crate::utils::json::truthy;

use super::cli::CliConfig;
use super::constants::{
    APP_NAME_LOWER, CONFIG_FILE_NAME, DEFAULT_CLOSING_TIMEOUT_MS, DEFAULT_HOST,
    DEFAULT_INDEX_PREFIX, DEFAULT_PASSWORD, DEFAULT_PORT, DEFAULT_USER, DEFAULT_VALUE,
    PLUGIN_NAMESPACE,
};

/// Top-level keys of a harness script that the bridge does not read
const HARNESS_KEYS: &[&str] = &["scenarios", "before", "after"];

// =============================================================================
// Log Level Enum
// =============================================================================

/// Store client verbosity
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    #[default]
    Trace,
    Debug,
    Info,
    Warning,
    Error,
    Silent,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Trace => "trace",
            Self::Debug => "debug",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Silent => "silent",
        }
    }

    /// Log filter used when neither the log env var nor `RUST_LOG` is set
    pub fn default_filter(&self) -> String {
        match self {
            Self::Trace => format!("info,{}=trace", APP_NAME_LOWER),
            Self::Debug => format!("info,{}=debug", APP_NAME_LOWER),
            Self::Info => "info".to_string(),
            Self::Warning => "warn".to_string(),
            Self::Error => "error".to_string(),
            Self::Silent => "off".to_string(),
        }
    }
}

impl FromStr for LogLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "trace" => Ok(Self::Trace),
            "debug" => Ok(Self::Debug),
            "info" => Ok(Self::Info),
            "warning" | "warn" => Ok(Self::Warning),
            "error" => Ok(Self::Error),
            "silent" => Ok(Self::Silent),
            _ => Err(format!(
                "Invalid log level '{}'. Valid options: trace, debug, info, warning, error, silent",
                s
            )),
        }
    }
}

impl fmt::Display for LogLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// =============================================================================
// Bridge Config (reconciled plugin options)
// =============================================================================

/// Reconciled plugin configuration. Built once, read-only afterwards.
///
/// Supplied values are kept as given. Options that feed a collaborator
/// (`port`, `logLevel`, `timeout`) are only checked by that collaborator.
#[derive(Clone, PartialEq)]
pub struct BridgeConfig {
    pub host: String,
    /// Rendered as supplied; the store client rejects what it cannot use
    pub port: String,
    pub user: String,
    pub password: String,
    /// Store client verbosity as supplied, see [`BridgeConfig::resolve_log_level`]
    pub log_level: String,
    pub index_prefix: String,
    /// Close timeout in milliseconds as supplied, see
    /// [`BridgeConfig::resolve_closing_timeout`]
    pub timeout: String,
    /// Substitute for null leaves, of any JSON type
    pub default_value: JsonValue,
    pub skip_list: SkipList,
    pub enable_useless_reporting: bool,
}

impl BridgeConfig {
    /// Merge raw plugin options with defaults.
    ///
    /// An option counts as supplied only if it is truthy: `null`, `false`,
    /// `0` and `""` all select the default, the same as a missing key. Any
    /// truthy value wins, whatever its shape.
    pub fn reconcile(raw: &Map<String, JsonValue>) -> Self {
        Self {
            host: string_option(raw, "host", DEFAULT_HOST),
            port: string_option(raw, "port", &DEFAULT_PORT.to_string()),
            user: string_option(raw, "user", DEFAULT_USER),
            password: string_option(raw, "password", DEFAULT_PASSWORD),
            log_level: string_option(raw, "logLevel", LogLevel::default().as_str()),
            index_prefix: string_option(raw, "indexPrefix", DEFAULT_INDEX_PREFIX),
            timeout: string_option(raw, "timeout", &DEFAULT_CLOSING_TIMEOUT_MS.to_string()),
            default_value: truthy(raw.get("default"))
                .cloned()
                .unwrap_or_else(|| JsonValue::from(DEFAULT_VALUE)),
            skip_list: SkipList::build(raw.get("skipList")),
            enable_useless_reporting: truthy(raw.get("enableUselessReporting")).is_some(),
        }
    }

    /// Verbosity for log filtering. Fails if `logLevel` names no known level.
    pub fn resolve_log_level(&self) -> Result<LogLevel> {
        self.log_level.parse().map_err(|e: String| {
            anyhow::anyhow!("Invalid plugins.{}.logLevel: {}", PLUGIN_NAMESPACE, e)
        })
    }

    /// Close timeout. Fails unless `timeout` is a whole number of milliseconds.
    pub fn resolve_closing_timeout(&self) -> Result<Duration> {
        let ms: u64 = self.timeout.trim().parse().with_context(|| {
            format!(
                "Invalid plugins.{}.timeout '{}', expected milliseconds",
                PLUGIN_NAMESPACE, self.timeout
            )
        })?;
        Ok(Duration::from_millis(ms))
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::reconcile(&Map::new())
    }
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("user", &self.user)
            .field("password", &"[REDACTED]")
            .field("log_level", &self.log_level)
            .field("index_prefix", &self.index_prefix)
            .field("timeout", &self.timeout)
            .field("default_value", &self.default_value)
            .field("skip_list", &self.skip_list)
            .field("enable_useless_reporting", &self.enable_useless_reporting)
            .finish()
    }
}

/// Truthy value as text. Strings are taken as is, anything else is rendered
/// as JSON.
fn string_option(raw: &Map<String, JsonValue>, key: &str, default: &str) -> String {
    match truthy(raw.get(key)) {
        Some(JsonValue::String(s)) => s.clone(),
        Some(other) => other.to_string(),
        None => default.to_string(),
    }
}

// =============================================================================
// File Config Structs (JSON deserialization)
// =============================================================================

/// `plugins` section; other plugins' sections are ignored
#[derive(Debug, Default, Clone, Deserialize)]
pub struct PluginsFileConfig {
    pub elastic: Option<Map<String, JsonValue>>,
}

/// Harness `config` section, as found in a full test script
#[derive(Debug, Default, Clone, Deserialize)]
pub struct HarnessFileConfig {
    pub plugins: Option<PluginsFileConfig>,
}

/// File-based configuration (JSON)
///
/// Accepts either a bare `{"plugins": {...}}` document or a harness script
/// with the plugins nested under `config`.
#[derive(Debug, Default, Deserialize)]
pub struct FileConfig {
    pub config: Option<HarnessFileConfig>,
    pub plugins: Option<PluginsFileConfig>,
    #[serde(flatten)]
    pub extra: JsonValue,
}

impl FileConfig {
    /// Load configuration from a JSON file
    fn load_from_file(path: &Path) -> Result<Self> {
        tracing::debug!(path = %path.display(), "Loading config file");
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        let config: Self = serde_json::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        tracing::trace!(config = ?config, "Parsed config file");
        Ok(config)
    }

    /// Warn about unknown fields in the config
    fn warn_unknown_fields(&self) {
        if let JsonValue::Object(map) = &self.extra {
            let keys_str: String = map
                .keys()
                .map(|k| k.as_str())
                .filter(|k| !HARNESS_KEYS.contains(k))
                .collect::<Vec<_>>()
                .join(", ");
            if !keys_str.is_empty() {
                tracing::warn!(
                    fields = %keys_str,
                    "Unknown fields in config file (possible typos)"
                );
            }
        }
    }

    /// Raw options under `plugins.elastic`. Top-level `plugins` wins over the
    /// nested harness `config.plugins`, key by key.
    fn into_plugin_options(self) -> Map<String, JsonValue> {
        let nested = self
            .config
            .and_then(|c| c.plugins)
            .and_then(|p| p.elastic)
            .unwrap_or_default();
        let top = self.plugins.and_then(|p| p.elastic).unwrap_or_default();

        let mut options = nested;
        for (key, value) in top {
            tracing::trace!(option = %key, "Merging plugins.{}", PLUGIN_NAMESPACE);
            options.insert(key, value);
        }
        options
    }
}

/// Write CLI/env overrides into the raw option bag so they go through the
/// same defaulting rules as file values.
fn apply_cli_overrides(options: &mut Map<String, JsonValue>, cli: &CliConfig) {
    if let Some(ref host) = cli.host {
        options.insert("host".to_string(), JsonValue::String(host.clone()));
    }
    if let Some(port) = cli.port {
        options.insert("port".to_string(), JsonValue::from(port));
    }
    if let Some(ref prefix) = cli.index_prefix {
        options.insert("indexPrefix".to_string(), JsonValue::String(prefix.clone()));
    }
    if let Some(level) = cli.log_level {
        options.insert(
            "logLevel".to_string(),
            JsonValue::String(level.as_str().to_string()),
        );
    }
}

// =============================================================================
// Final Config
// =============================================================================

/// Final merged application configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bridge: BridgeConfig,
    /// Event input file, stdin when absent
    pub input: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from all sources
    ///
    /// Priority (lowest to highest):
    /// 1. Defaults
    /// 2. Local directory config OR CLI-specified config path
    /// 3. CLI arguments (which include env var fallbacks via clap)
    pub fn load(cli: &CliConfig) -> Result<Self> {
        tracing::debug!("Loading application configuration");
        tracing::trace!(cli = ?cli, "CLI config");

        let path = if let Some(ref path) = cli.config {
            let expanded = expand_path(&path.to_string_lossy());
            if !expanded.exists() {
                anyhow::bail!("Config file not found: {}", expanded.display());
            }
            Some(expanded)
        } else {
            let local = PathBuf::from(CONFIG_FILE_NAME);
            if local.exists() { Some(local) } else { None }
        };

        let mut options = match path {
            Some(path) => {
                let file_config = FileConfig::load_from_file(&path)?;
                file_config.warn_unknown_fields();
                file_config.into_plugin_options()
            }
            None => {
                tracing::debug!("No config file found, using defaults");
                Map::new()
            }
        };

        apply_cli_overrides(&mut options, cli);

        Ok(Self {
            bridge: BridgeConfig::reconcile(&options),
            input: cli
                .input
                .as_ref()
                .map(|p| expand_path(&p.to_string_lossy())),
        })
    }
}
