//! Autograd: scalar computation graph with reverse-mode automatic differentiation.
//!
//! The graph is built eagerly during forward operations on [`Value`]; every
//! operation allocates a new node that remembers its operands, its [`Op`] kind
//! and the local partial derivatives evaluated at construction time.
//! [`ScalarNode::backward`] propagates gradients from a root (e.g. a loss) to
//! every node it depends on, in the order returned by [`topological_order`].
//!
//! Gradients accumulate. Nothing resets them automatically; call
//! [`ScalarNode::zero_grad`] on the parameters between iterations.

mod engine;
pub mod impls;
mod op;

pub use engine::topological_order;
pub use impls::value::{NodeId, Value};
pub use op::Op;

use crate::error::Result;

/// Trait for raising a node to a constant power (e.g. `(&a).pow(2.0)`).
pub trait Pow<Rhs> {
    /// Result of the power operation.
    type Output;

    /// Returns `self^exp` with gradient tracking.
    ///
    /// # Errors
    ///
    /// Implementations return a numeric-domain error for a negative base with a
    /// non-integer exponent, or a zero base with a negative exponent.
    ///
    /// Like `/` and [`Log::log`], the value implementation also rejects a
    /// finite base whose result or derivative is not finite. So `0.pow(0.5)`
    /// fails even though its value is 0, because `d/dx sqrt(x)` is unbounded
    /// at 0, and `1e200.pow(2.0)` fails on overflow. The infallible operations
    /// (`+`, `-`, `*`, negation, [`Exp::exp`], `tanh`, `relu`) do no such check:
    /// overflow yields `±inf`, which a training loop reports as divergence.
    fn pow(self, exp: Rhs) -> Self::Output;
}

/// Trait for the exponential of a node (e.g. `(&a).exp()`).
pub trait Exp {
    /// Result of the exponential.
    type Output;

    /// Returns `exp(self)` with gradient tracking. Overflows to `inf` unchecked.
    #[must_use]
    fn exp(self) -> Self::Output;
}

/// Trait for the natural log of a node (e.g. `(&a).log()`).
pub trait Log {
    /// Result of the log.
    type Output;

    /// Returns `ln(self)` with gradient tracking.
    ///
    /// # Errors
    ///
    /// Implementations return a numeric-domain error for non-positive input.
    fn log(self) -> Self::Output;
}

/// A differentiable scalar node in the computation graph.
///
/// Implementations hold a single float value and an accumulated gradient, and
/// participate in backward propagation. Use [`ScalarNode::data`] for the
/// forward value and [`ScalarNode::grad`] after [`ScalarNode::backward`].
pub trait ScalarNode: Clone {
    /// Returns the forward pass value.
    fn data(&self) -> f64;

    /// Overwrites the forward value (e.g. an optimizer step on a leaf).
    ///
    /// Graphs already built from this node keep the derivatives they captured.
    fn set_data(&self, data: f64);

    /// Returns the accumulated gradient; 0 until a backward pass reaches this node.
    fn grad(&self) -> f64;

    /// Runs backpropagation from this node to every node it depends on.
    ///
    /// Calling it again without [`ScalarNode::zero_grad`] adds a second
    /// contribution to every reachable gradient.
    fn backward(&self);

    /// Zeros the gradient at this node only (operands are left untouched).
    fn zero_grad(&self);
}

/// Sums nodes into one node by chaining additions; an empty input yields a constant 0.
pub fn sum<'a, I>(values: I) -> Value
where
    I: IntoIterator<Item = &'a Value>,
{
    let mut iter = values.into_iter();
    match iter.next() {
        Some(first) => iter.fold(first.clone(), |acc, v| &acc + v),
        None => Value::constant(0.0),
    }
}

/// Mean of `values`, built from [`sum`] and a division by the count.
///
/// # Errors
///
/// Returns [`crate::Error::EmptyInput`] when `values` is empty.
pub fn mean(values: &[Value]) -> Result<Value> {
    if values.is_empty() {
        return Err(crate::Error::EmptyInput);
    }
    &sum(values) / values.len() as f64
}
