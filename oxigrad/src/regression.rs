//! Single-feature linear regression `y = m * x + c` trained by gradient descent.
//!
//! The parameters are persistent leaves; every iteration builds a fresh graph
//! (predictions and loss), runs backward, steps the optimizer and resets the
//! parameter gradients.

use rand::Rng;
use rand_distr::{Distribution, Normal};

use crate::autograd::Value;
use crate::config::Config;
use crate::data::Dataset;
use crate::error::{Error, Result};
use crate::loss::LossFn;
use crate::optim::Optimizer;

/// Slope and intercept as trainable leaves.
#[derive(Clone, Debug)]
pub struct LinearRegression {
    m: Value,
    c: Value,
}

impl LinearRegression {
    /// Creates a model with the given slope and intercept.
    #[must_use]
    pub fn new(m: f64, c: f64) -> Self {
        Self {
            m: Value::new(m).with_label("m"),
            c: Value::new(c).with_label("c"),
        }
    }

    /// Creates a model with slope and intercept drawn uniformly from `[0, 1)`.
    pub fn random<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let m = rng.random::<f64>();
        let c = rng.random::<f64>();
        Self::new(m, c)
    }

    /// Creates a model with slope and intercept drawn from `N(0, std)`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `std` is negative or not finite.
    pub fn random_normal<R: Rng + ?Sized>(rng: &mut R, std: f64) -> Result<Self> {
        let normal = Normal::new(0.0, std)
            .map_err(|e| Error::InvalidParameter(format!("init std {std}: {e}")))?;
        Ok(Self::new(normal.sample(rng), normal.sample(rng)))
    }

    /// Slope parameter.
    #[must_use]
    pub fn slope(&self) -> &Value {
        &self.m
    }

    /// Intercept parameter.
    #[must_use]
    pub fn intercept(&self) -> &Value {
        &self.c
    }

    /// Trainable parameters, in `[m, c]` order.
    #[must_use]
    pub fn params(&self) -> Vec<Value> {
        vec![self.m.clone(), self.c.clone()]
    }

    /// Builds `m * x + c` into the graph.
    #[must_use]
    pub fn forward(&self, x: &Value) -> Value {
        &(&self.m * x) + &self.c
    }

    /// Evaluates the model on a plain number without building a graph.
    #[must_use]
    pub fn predict(&self, x: f64) -> f64 {
        self.m.data() * x + self.c.data()
    }
}

/// Loop settings for [`fit`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TrainOptions {
    /// Number of iterations (one forward + backward + step each).
    pub iterations: usize,
    /// Log loss every this many iterations (and at iteration 0).
    pub log_every: usize,
}

impl From<&Config> for TrainOptions {
    fn from(cfg: &Config) -> Self {
        Self {
            iterations: cfg.iterations,
            log_every: cfg.log_every,
        }
    }
}

/// Outcome of a training run.
#[derive(Clone, Debug, Default)]
pub struct TrainReport {
    /// Loss recorded at every iteration, before that iteration's update.
    pub losses: Vec<f64>,
}

impl TrainReport {
    /// Loss of the last iteration, if any ran.
    #[must_use]
    pub fn final_loss(&self) -> Option<f64> {
        self.losses.last().copied()
    }
}

/// Trains `model` on `data` in place.
///
/// # Errors
///
/// - Any error from `loss_fn` (e.g. a shape mismatch).
/// - [`Error::Diverged`] when the loss stops being finite.
pub fn fit<L, O>(
    model: &LinearRegression,
    data: &Dataset,
    loss_fn: &L,
    optimizer: &mut O,
    options: &TrainOptions,
) -> Result<TrainReport>
where
    L: LossFn + ?Sized,
    O: Optimizer + ?Sized,
{
    let inputs = data.inputs();
    let targets = data.targets();
    let params = model.params();
    let log_every = options.log_every.max(1);
    let mut report = TrainReport {
        losses: Vec::with_capacity(options.iterations),
    };

    for iteration in 0..options.iterations {
        let predictions: Vec<Value> = inputs.iter().map(|x| model.forward(x)).collect();
        let loss = loss_fn.forward(&predictions, &targets)?;
        let loss_value = loss.data();
        if !loss_value.is_finite() {
            return Err(Error::Diverged {
                iteration,
                loss: loss_value,
            });
        }
        report.losses.push(loss_value);

        loss.backward();
        tracing::debug!(
            iteration,
            grad_m = model.m.grad(),
            grad_c = model.c.grad(),
            "gradients"
        );
        optimizer.step(&params);
        optimizer.zero_grad(&params);

        if iteration % log_every == 0 {
            tracing::info!(
                iteration,
                loss = loss_value,
                loss_fn = loss_fn.name(),
                "training progress"
            );
        }
    }

    tracing::info!(
        m = model.m.data(),
        c = model.c.data(),
        final_loss = report.final_loss(),
        "training finished"
    );
    Ok(report)
}
