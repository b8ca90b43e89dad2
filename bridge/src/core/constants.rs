// =============================================================================
// Application Identity
// =============================================================================

/// Application name in lowercase (for paths, identifiers and log targets)
pub const APP_NAME_LOWER: &str = "statsbridge";

// =============================================================================
// Configuration Files
// =============================================================================

/// Config file name looked up in the working directory
pub const CONFIG_FILE_NAME: &str = "statsbridge.json";

/// Key under `plugins` that holds the bridge options
pub const PLUGIN_NAMESPACE: &str = "elastic";

/// Environment variable for config file path
pub const ENV_CONFIG: &str = "STATSBRIDGE_CONFIG";

/// Environment variable for the event input file
pub const ENV_INPUT: &str = "STATSBRIDGE_INPUT";

/// Environment variable for log level/filter
pub const ENV_LOG: &str = "STATSBRIDGE_LOG";

// =============================================================================
// Environment Variables - Store Overrides
// =============================================================================

/// Environment variable for metrics store host
pub const ENV_HOST: &str = "STATSBRIDGE_HOST";

/// Environment variable for metrics store port
pub const ENV_PORT: &str = "STATSBRIDGE_PORT";

/// Environment variable for the target index name
pub const ENV_INDEX_PREFIX: &str = "STATSBRIDGE_INDEX_PREFIX";

/// Environment variable for store client verbosity
pub const ENV_LOG_LEVEL: &str = "STATSBRIDGE_LOG_LEVEL";

// =============================================================================
// Plugin Option Defaults
// =============================================================================

/// Default metrics store host
pub const DEFAULT_HOST: &str = "localhost";

/// Default metrics store port
pub const DEFAULT_PORT: u64 = 9200;

/// Default basic-auth user
pub const DEFAULT_USER: &str = "elastic";

/// Default basic-auth password
pub const DEFAULT_PASSWORD: &str = "changeme";

/// Default target index
pub const DEFAULT_INDEX_PREFIX: &str = "artillery";

/// Default close timeout in milliseconds
pub const DEFAULT_CLOSING_TIMEOUT_MS: u64 = 0;

/// Default substitution value for null/invalid leaves
pub const DEFAULT_VALUE: u64 = 0;

/// Field that is always removed from the snapshot root
pub const MANDATORY_SKIP_FIELD: &str = "latencies";

// =============================================================================
// Store Client
// =============================================================================

/// Per-request timeout for metrics store calls
pub const STORE_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Wait limit for in-flight writes when no close timeout is configured
pub const SHUTDOWN_TIMEOUT_SECS: u64 = 10;

// =============================================================================
// Diagnostic Report
// =============================================================================

/// Value recorded for every periodic snapshot when diagnostics are enabled
pub const DIAGNOSTIC_RECORD_VALUE: &str = "test";

/// Timestamp of the synthetic record appended on flush
pub const DIAGNOSTIC_AGGREGATE_TIMESTAMP: &str = "aggregate";

/// Payload of the synthetic record appended on flush
pub const DIAGNOSTIC_AGGREGATE_VALUE: &str = "aggregate test";
