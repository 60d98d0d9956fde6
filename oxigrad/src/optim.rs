//! Gradient-descent optimizers over lists of leaf parameters.

use crate::autograd::Value;
use crate::error::{Error, Result};

/// Trait for optimization algorithms.
pub trait Optimizer {
    /// Updates every parameter's `data` from its accumulated `grad`.
    fn step(&mut self, params: &[Value]);

    /// Zeros the gradient of every parameter.
    fn zero_grad(&self, params: &[Value]) {
        zero_grad(params);
    }

    /// Current learning rate.
    fn lr(&self) -> f64;

    /// Replaces the learning rate.
    fn set_lr(&mut self, lr: f64);
}

/// Resets the gradient of each parameter; operands of intermediate nodes are not touched.
pub fn zero_grad(params: &[Value]) {
    for p in params {
        p.zero_grad();
    }
}

/// Stochastic gradient descent with optional momentum.
///
/// With `momentum == 0` the update is `p.data -= lr * p.grad`.
#[derive(Clone, Debug)]
pub struct Sgd {
    lr: f64,
    momentum: f64,
    velocities: Vec<f64>,
}

impl Sgd {
    /// Plain gradient descent.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `lr` is not a positive finite number.
    pub fn new(lr: f64) -> Result<Self> {
        Self::with_momentum(lr, 0.0)
    }

    /// Gradient descent with momentum: `v = momentum * v - lr * grad; p += v`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `lr` is not positive and finite or
    /// `momentum` is outside `[0, 1)`.
    pub fn with_momentum(lr: f64, momentum: f64) -> Result<Self> {
        validate_lr(lr)?;
        if !(0.0..1.0).contains(&momentum) {
            return Err(Error::InvalidParameter(format!(
                "momentum must be in [0, 1), got {momentum}"
            )));
        }
        Ok(Self {
            lr,
            momentum,
            velocities: Vec::new(),
        })
    }
}

fn validate_lr(lr: f64) -> Result<()> {
    if !lr.is_finite() || lr <= 0.0 {
        return Err(Error::InvalidParameter(format!(
            "learning rate must be positive and finite, got {lr}"
        )));
    }
    Ok(())
}

impl Optimizer for Sgd {
    fn step(&mut self, params: &[Value]) {
        if self.momentum == 0.0 {
            for p in params {
                p.set_data(p.data() - self.lr * p.grad());
            }
            return;
        }
        if self.velocities.len() != params.len() {
            self.velocities = vec![0.0; params.len()];
        }
        for (p, v) in params.iter().zip(self.velocities.iter_mut()) {
            *v = self.momentum * *v - self.lr * p.grad();
            p.set_data(p.data() + *v);
        }
    }

    fn lr(&self) -> f64 {
        self.lr
    }

    fn set_lr(&mut self, lr: f64) {
        self.lr = lr;
    }
}
