//! Errors raised while reading `OXIGRAD_*` variables or checking a [`Config`](super::Config).

/// Configuration failure.
///
/// `Validation` comes from [`Config::validate`](super::Config::validate) and names
/// the offending field; `EnvVar` and `Parse` come from [`from_env`](super::from_env)
/// and name the full variable key.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// A setting is out of range.
    #[error("config validation: {field}: {message}")]
    Validation {
        field: &'static str,
        message: String,
    },

    /// The variable is set but is not valid Unicode.
    #[error("env var {key}: {source}")]
    EnvVar {
        key: String,
        #[source]
        source: std::env::VarError,
    },

    /// The variable is set but does not parse as the setting's type.
    #[error("env var {key}={value:?}: {message}")]
    Parse {
        key: String,
        value: String,
        message: String,
    },
}

impl ConfigError {
    pub(crate) fn invalid(field: &'static str, message: impl Into<String>) -> Self {
        ConfigError::Validation {
            field,
            message: message.into(),
        }
    }

    /// Name of the setting or variable the error is about.
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            ConfigError::Validation { field, .. } => field,
            ConfigError::EnvVar { key, .. } | ConfigError::Parse { key, .. } => key,
        }
    }
}
