//! Crate-level error type.
//!
//! Autograd and loss failures are local and deterministic: they are raised
//! before any node is allocated or any `data`/`grad` is mutated. Module errors
//! from [`crate::config`] and [`crate::data`] are wrapped so callers can use a
//! single [`Result`].

use crate::autograd::Op;
use crate::config::ConfigError;
use crate::data::DataError;

/// All errors that can occur within oxigrad.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Illegal arithmetic detected eagerly at operation time
    /// (division by zero, invalid power, log of a non-positive value).
    #[error("numeric domain error in {op}: {reason}")]
    NumericDomain { op: Op, reason: String },

    /// Loss inputs of different lengths.
    #[error("shape mismatch: {predictions} predictions vs {targets} targets")]
    ShapeMismatch { predictions: usize, targets: usize },

    /// A reduction was given no values.
    #[error("empty input: at least one value is required")]
    EmptyInput,

    /// Training produced a non-finite loss (learning rate too large).
    #[error("training diverged at iteration {iteration}: loss = {loss}")]
    Diverged { iteration: usize, loss: f64 },

    /// A hyper-parameter is out of range (e.g. a non-positive learning rate).
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Data(#[from] DataError),
}

impl Error {
    pub(crate) fn numeric_domain(op: Op, reason: impl Into<String>) -> Self {
        Error::NumericDomain {
            op,
            reason: reason.into(),
        }
    }
}

/// Convenience Result type used throughout oxigrad.
pub type Result<T> = std::result::Result<T, Error>;
