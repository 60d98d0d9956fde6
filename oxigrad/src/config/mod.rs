//! Training-run settings.
//!
//! [`from_env`] overlays `OXIGRAD_*` variables on the defaults in `constants`;
//! the binary then applies its flags and calls [`Config::validate`].

mod builder;
mod constants;
mod error;

use std::path::PathBuf;

use constants::{
    DEFAULT_ITERATIONS, DEFAULT_LEARNING_RATE, DEFAULT_LOG_EVERY, DEFAULT_MOMENTUM, DEFAULT_SEED,
};

pub use builder::{env_key, env_parsed, env_string, from_env};
pub use error::ConfigError;

/// Central configuration for a regression training run.
///
/// Use [`from_env`] to build from environment variables and [`Config::validate`] before use.
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    /// Seed for parameter initialization.
    pub seed: u64,
    /// `x,y` sample file; `None` selects the built-in dataset.
    pub data_path: Option<PathBuf>,
    /// Number of gradient-descent iterations.
    pub iterations: usize,
    /// Gradient-descent step size.
    pub learning_rate: f64,
    /// SGD momentum in `[0, 1)`; 0 is plain gradient descent.
    pub momentum: f64,
    /// Log loss every this many iterations (and at iteration 0).
    pub log_every: usize,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed: DEFAULT_SEED,
            data_path: None,
            iterations: DEFAULT_ITERATIONS,
            learning_rate: DEFAULT_LEARNING_RATE,
            momentum: DEFAULT_MOMENTUM,
            log_every: DEFAULT_LOG_EVERY,
        }
    }
}

impl Config {
    /// Checks every setting is in range.
    ///
    /// # Errors
    ///
    /// [`ConfigError::Validation`] naming the first bad field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.iterations == 0 {
            return Err(ConfigError::invalid("iterations", "must be greater than 0"));
        }
        if !self.learning_rate.is_finite() || self.learning_rate <= 0.0 {
            return Err(ConfigError::invalid(
                "learning_rate",
                format!("must be positive and finite, got {}", self.learning_rate),
            ));
        }
        if !(0.0..1.0).contains(&self.momentum) {
            return Err(ConfigError::invalid(
                "momentum",
                format!("must be in [0, 1), got {}", self.momentum),
            ));
        }
        if self.log_every == 0 {
            return Err(ConfigError::invalid("log_every", "must be greater than 0"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::constants::{
        ENV_DATA_PATH, ENV_ITERATIONS, ENV_LEARNING_RATE, ENV_LOG_EVERY, ENV_MOMENTUM, ENV_SEED,
    };
    use super::*;

    #[test]
    fn default_config_is_valid() {
        let cfg = Config::default();
        assert!(cfg.validate().is_ok());
        assert_eq!(cfg.iterations, 1000);
        assert_eq!(cfg.learning_rate, 0.002);
        assert!(cfg.data_path.is_none());
    }

    #[test]
    fn validate_rejects_zero_iterations() {
        let cfg = Config {
            iterations: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_bad_learning_rate() {
        for lr in [0.0, -0.1, f64::INFINITY, f64::NAN] {
            let cfg = Config {
                learning_rate: lr,
                ..Config::default()
            };
            assert!(cfg.validate().is_err(), "lr = {lr}");
        }
    }

    #[test]
    fn validate_rejects_momentum_out_of_range() {
        let cfg = Config {
            momentum: 1.0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_log_every() {
        let cfg = Config {
            log_every: 0,
            ..Config::default()
        };
        assert!(cfg.validate().is_err());
    }

    /// Lock so env tests don't run in parallel and pollute each other.
    static CONFIG_ENV_LOCK: std::sync::OnceLock<std::sync::Mutex<()>> = std::sync::OnceLock::new();

    fn env_lock() -> std::sync::MutexGuard<'static, ()> {
        CONFIG_ENV_LOCK
            .get_or_init(|| std::sync::Mutex::new(()))
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    #[test]
    fn from_env_falls_back_to_defaults() {
        let _g = env_lock();
        for suffix in [
            ENV_SEED,
            ENV_ITERATIONS,
            ENV_LEARNING_RATE,
            ENV_MOMENTUM,
            ENV_LOG_EVERY,
            ENV_DATA_PATH,
        ] {
            std::env::remove_var(env_key(suffix));
        }
        let cfg = from_env().unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn from_env_overrides_with_env_vars() {
        let _g = env_lock();
        let key_iters = env_key(ENV_ITERATIONS);
        let key_lr = env_key(ENV_LEARNING_RATE);
        let key_path = env_key(ENV_DATA_PATH);
        std::env::set_var(&key_iters, "250");
        std::env::set_var(&key_lr, "0.01");
        std::env::set_var(&key_path, "points.csv");
        let cfg = from_env().unwrap();
        std::env::remove_var(key_iters);
        std::env::remove_var(key_lr);
        std::env::remove_var(key_path);
        assert_eq!(cfg.iterations, 250);
        assert_eq!(cfg.learning_rate, 0.01);
        assert_eq!(cfg.data_path, Some(PathBuf::from("points.csv")));
    }

    #[test]
    fn from_env_empty_data_path_means_builtin() {
        let _g = env_lock();
        let key = env_key(ENV_DATA_PATH);
        std::env::set_var(&key, "  ");
        let cfg = from_env().unwrap();
        std::env::remove_var(key);
        assert!(cfg.data_path.is_none());
    }

    #[test]
    fn from_env_returns_error_on_invalid_parse() {
        let _g = env_lock();
        let key = env_key(ENV_SEED);
        std::env::set_var(&key, "not_a_number");
        let res = from_env();
        std::env::remove_var(&key);
        match res {
            Err(ConfigError::Parse { key: k, value, .. }) => {
                assert_eq!(k, key);
                assert_eq!(value, "not_a_number");
            }
            other => panic!("expected parse error, got {other:?}"),
        }
    }

    #[test]
    fn validation_error_names_the_field() {
        let cfg = Config {
            log_every: 0,
            ..Config::default()
        };
        let e = cfg.validate().unwrap_err();
        assert_eq!(e.key(), "log_every");
        assert_eq!(
            e.to_string(),
            "config validation: log_every: must be greater than 0"
        );
    }

    #[test]
    fn parse_error_display_names_key_and_value() {
        let e = ConfigError::Parse {
            key: "OXIGRAD_SEED".to_string(),
            value: "abc".to_string(),
            message: "invalid digit found in string".to_string(),
        };
        assert_eq!(e.key(), "OXIGRAD_SEED");
        assert!(e.to_string().contains("OXIGRAD_SEED=\"abc\""));
    }

    #[test]
    fn env_parsed_unset_returns_none() {
        let key = "OXIGRAD_UNLIKELY_KEY_67890";
        assert_eq!(env_parsed::<u64>(key).unwrap(), None);
        assert_eq!(env_string(key).unwrap(), None);
    }
}
