//! Central place for all configuration constants.
//!
//! Default values and environment variable key names used by the config builder.

/// Environment variable prefix (e.g. `OXIGRAD_ITERATIONS`).
pub(crate) const ENV_PREFIX: &str = "OXIGRAD_";

// --- Env key suffixes (full key = ENV_PREFIX + suffix) ---

pub(crate) const ENV_SEED: &str = "SEED";
pub(crate) const ENV_DATA_PATH: &str = "DATA_PATH";
pub(crate) const ENV_ITERATIONS: &str = "ITERATIONS";
pub(crate) const ENV_LEARNING_RATE: &str = "LEARNING_RATE";
pub(crate) const ENV_MOMENTUM: &str = "MOMENTUM";
pub(crate) const ENV_LOG_EVERY: &str = "LOG_EVERY";

// --- Default values ---

pub(crate) const DEFAULT_SEED: u64 = 42;
pub(crate) const DEFAULT_ITERATIONS: usize = 1000;
pub(crate) const DEFAULT_LEARNING_RATE: f64 = 0.002;
pub(crate) const DEFAULT_MOMENTUM: f64 = 0.0;
pub(crate) const DEFAULT_LOG_EVERY: usize = 100;
