//! # oxigrad
//!
//! Scalar reverse-mode automatic differentiation: a dynamically built graph of
//! [`Value`] nodes, a topologically ordered backward pass with gradient
//! accumulation, an MSE loss built from node arithmetic, and a small gradient
//! descent toolkit for fitting a line.

pub mod autograd;
pub mod config;
pub mod data;
pub mod error;
pub mod loss;
pub mod optim;
pub mod regression;

pub use autograd::{Exp, Log, NodeId, Op, Pow, ScalarNode, Value};
pub use error::{Error, Result};
pub use loss::{Loss, LossFn, MseLoss};
