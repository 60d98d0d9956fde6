//! Loss functions over sequences of graph nodes.
//!
//! Losses are plain compositions of [`Value`] arithmetic, so backward through a
//! loss needs no special rule: it reaches every prediction (and the parameters
//! that produced it) through the ordinary chain rule.

use crate::autograd::{self, Value};
use crate::error::{Error, Result};

/// Trait for loss functions.
pub trait LossFn {
    /// Computes a scalar loss node from predictions and targets.
    ///
    /// # Errors
    ///
    /// Returns an error when the inputs cannot be paired up.
    fn forward(&self, predictions: &[Value], targets: &[Value]) -> Result<Value>;

    /// Name of the loss function.
    fn name(&self) -> &str;
}

/// Mean squared error: `(1/n) * Σ (pred_i - target_i)^2`.
#[derive(Clone, Copy, Debug, Default)]
pub struct MseLoss;

impl LossFn for MseLoss {
    fn forward(&self, predictions: &[Value], targets: &[Value]) -> Result<Value> {
        mse(predictions, targets)
    }

    fn name(&self) -> &str {
        "mse"
    }
}

/// Namespace mirroring the `Loss.MSE(...)` call surface.
pub struct Loss;

impl Loss {
    /// See [`mse`].
    ///
    /// # Errors
    ///
    /// Same as [`mse`].
    pub fn mse(predictions: &[Value], targets: &[Value]) -> Result<Value> {
        mse(predictions, targets)
    }
}

/// Mean squared error between two equal-length sequences of nodes.
///
/// Built from subtraction, multiplication, summation and a division by the
/// constant `n`. Targets are usually constants but may be trainable.
///
/// # Errors
///
/// - [`Error::ShapeMismatch`] when the lengths differ.
/// - [`Error::EmptyInput`] when both sequences are empty.
///
/// Lengths are checked before any node is created.
pub fn mse(predictions: &[Value], targets: &[Value]) -> Result<Value> {
    if predictions.len() != targets.len() {
        return Err(Error::ShapeMismatch {
            predictions: predictions.len(),
            targets: targets.len(),
        });
    }
    if predictions.is_empty() {
        return Err(Error::EmptyInput);
    }
    let squared: Vec<Value> = predictions
        .iter()
        .zip(targets)
        .map(|(p, t)| {
            let diff = p - t;
            &diff * &diff
        })
        .collect();
    &autograd::sum(&squared) / predictions.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn single_pair_is_squared_difference() {
        let p = Value::new(3.5);
        let t = Value::constant(1.0);
        let loss = Loss::mse(&[p.clone()], &[t.clone()]).unwrap();
        assert_eq!(loss.data(), (3.5_f64 - 1.0).powi(2));
        loss.backward();
        assert_eq!(p.grad(), 2.0 * (3.5 - 1.0));
        assert_eq!(t.grad(), 0.0);
    }

    #[test]
    fn mean_over_several_pairs() {
        let preds: Vec<Value> = [1.0, 2.0, 3.0].into_iter().map(Value::new).collect();
        let targets: Vec<Value> = [1.5, 2.5, 3.5].into_iter().map(Value::constant).collect();
        let loss = mse(&preds, &targets).unwrap();
        assert_abs_diff_eq!(loss.data(), 0.25, epsilon = 1e-12);
        loss.backward();
        for p in &preds {
            // 2 * (p - t) / n
            assert_abs_diff_eq!(p.grad(), 2.0 * -0.5 / 3.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn trainable_targets_receive_opposite_gradient() {
        let p = Value::new(4.0);
        let t = Value::new(1.0);
        let loss = mse(&[p.clone()], &[t.clone()]).unwrap();
        loss.backward();
        assert_eq!(p.grad(), 6.0);
        assert_eq!(t.grad(), -6.0);
    }

    #[test]
    fn mismatched_lengths_fail_without_touching_state() {
        let preds = vec![Value::new(1.0), Value::new(2.0)];
        let targets = vec![Value::constant(1.0)];
        let err = Loss::mse(&preds, &targets).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                predictions: 2,
                targets: 1
            }
        ));
        for v in preds.iter().chain(&targets) {
            assert_eq!(v.grad(), 0.0);
            assert!(v.is_leaf());
        }
        assert_eq!(preds[0].data(), 1.0);
        assert_eq!(preds[1].data(), 2.0);
    }

    #[test]
    fn empty_inputs_fail() {
        assert!(matches!(mse(&[], &[]), Err(Error::EmptyInput)));
    }

    #[test]
    fn loss_fn_trait_delegates() {
        let loss_fn = MseLoss;
        assert_eq!(loss_fn.name(), "mse");
        let loss = loss_fn
            .forward(&[Value::new(2.0)], &[Value::constant(0.0)])
            .unwrap();
        assert_eq!(loss.data(), 4.0);
    }
}
