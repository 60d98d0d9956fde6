//! Reads a [`Config`] from `OXIGRAD_*` environment variables.

use std::env::{self, VarError};
use std::fmt::Display;
use std::path::PathBuf;
use std::str::FromStr;

use super::constants::{
    ENV_DATA_PATH, ENV_ITERATIONS, ENV_LEARNING_RATE, ENV_LOG_EVERY, ENV_MOMENTUM, ENV_PREFIX,
    ENV_SEED,
};
use super::{Config, ConfigError};

/// Full variable name for a key suffix: `SEED` becomes `OXIGRAD_SEED`.
#[must_use]
pub fn env_key(suffix: &str) -> String {
    format!("{ENV_PREFIX}{suffix}")
}

/// Raw value of `key`, or `None` when it is unset.
///
/// # Errors
///
/// [`ConfigError::EnvVar`] when the value is not valid Unicode.
pub fn env_string(key: &str) -> Result<Option<String>, ConfigError> {
    match env::var(key) {
        Ok(raw) => Ok(Some(raw)),
        Err(VarError::NotPresent) => Ok(None),
        Err(source) => Err(ConfigError::EnvVar {
            key: key.to_owned(),
            source,
        }),
    }
}

/// Value of `key` parsed as `T` (surrounding whitespace ignored), or `None` when unset.
///
/// # Errors
///
/// [`ConfigError::Parse`] when the value is set but not a valid `T`.
pub fn env_parsed<T>(key: &str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: Display,
{
    env_string(key)?
        .map(|raw| {
            raw.trim().parse().map_err(|e: T::Err| ConfigError::Parse {
                key: key.to_owned(),
                message: e.to_string(),
                value: raw.clone(),
            })
        })
        .transpose()
}

/// Overlays every set `OXIGRAD_*` variable on [`Config::default`].
///
/// A blank `OXIGRAD_DATA_PATH` selects the built-in points.
///
/// # Errors
///
/// The first variable that cannot be read or parsed.
pub fn from_env() -> Result<Config, ConfigError> {
    let mut cfg = Config::default();

    if let Some(seed) = env_parsed(&env_key(ENV_SEED))? {
        cfg.seed = seed;
    }
    if let Some(raw) = env_string(&env_key(ENV_DATA_PATH))? {
        let raw = raw.trim();
        cfg.data_path = (!raw.is_empty()).then(|| PathBuf::from(raw));
    }
    if let Some(iterations) = env_parsed(&env_key(ENV_ITERATIONS))? {
        cfg.iterations = iterations;
    }
    if let Some(lr) = env_parsed(&env_key(ENV_LEARNING_RATE))? {
        cfg.learning_rate = lr;
    }
    if let Some(momentum) = env_parsed(&env_key(ENV_MOMENTUM))? {
        cfg.momentum = momentum;
    }
    if let Some(log_every) = env_parsed(&env_key(ENV_LOG_EVERY))? {
        cfg.log_every = log_every;
    }

    tracing::debug!(?cfg, "configuration from environment");
    Ok(cfg)
}
