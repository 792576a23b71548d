/// Constants used throughout the faultline codebase
// Resource key used when the context names no service
pub const DEFAULT_SERVICE_ID: &str = "default";

// Environment variable names
pub const FAULTLINE_LOG_VAR: &str = "FAULTLINE_LOG";
pub const FAULTLINE_FAILURE_THRESHOLD_VAR: &str = "FAULTLINE_FAILURE_THRESHOLD";
pub const FAULTLINE_OPEN_TIMEOUT_VAR: &str = "FAULTLINE_OPEN_TIMEOUT_SECS";
pub const FAULTLINE_HISTORY_CAPACITY_VAR: &str = "FAULTLINE_HISTORY_CAPACITY";
pub const FAULTLINE_PARALLEL_VAR: &str = "FAULTLINE_PARALLEL_ORCHESTRATION";

// Exponential moving average weights for pattern statistics
pub const EMA_PREVIOUS_WEIGHT: f64 = 0.9;
pub const EMA_SAMPLE_WEIGHT: f64 = 0.1;

// Fixed strategy policy
pub const LOW_SEVERITY_MAX_RETRIES: u32 = 5;
pub const DEFAULT_MAX_RETRIES: u32 = 3;
pub const DEFAULT_BACKOFF_BASE: f64 = 2.0;
pub const DEFAULT_STRATEGY_TIMEOUT_SECS: u64 = 60;

// Severity thresholds
pub const HIGH_FREQUENCY_THRESHOLD: u64 = 10;
pub const LOW_SUCCESS_RATE_THRESHOLD: f64 = 0.3;
pub const RETRY_SUCCESS_RATE_THRESHOLD: f64 = 0.7;
