//! Scalar autograd node: a single float value with its place in the computation graph.

use std::cell::RefCell;
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, Div, Mul, Neg, Sub};
use std::rc::Rc;
use std::sync::atomic::{AtomicU64, Ordering};

use crate::autograd::engine;
use crate::autograd::{Exp, Log, Op, Pow, ScalarNode};
use crate::error::{Error, Result};

static NEXT_NODE_ID: AtomicU64 = AtomicU64::new(0);

/// Process-unique identity of a graph node.
///
/// The backward engine keys its visited set on this id, so a node shared by
/// several consumers is ordered exactly once.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u64);

impl NodeId {
    fn next() -> Self {
        NodeId(NEXT_NODE_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Internal scalar node: forward value, gradient, and graph edges for backprop.
struct Node {
    id: NodeId,
    /// Forward pass value.
    data: f64,
    /// Accumulated d(root)/d(this).
    grad: f64,
    op: Op,
    /// Operand nodes, in operation order.
    operands: Vec<Value>,
    /// d(this)/d(operand) for each operand, captured at construction.
    local_grads: Vec<f64>,
    /// False for constants and for nodes built only from constants.
    requires_grad: bool,
    label: Option<String>,
}

impl Drop for Node {
    /// Frees uniquely owned operands iteratively so long chains do not
    /// recurse once per node.
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.operands);
        while let Some(Value(rc)) = pending.pop() {
            if let Ok(cell) = Rc::try_unwrap(rc) {
                let mut node = cell.into_inner();
                pending.append(&mut node.operands);
            }
        }
    }
}

/// Handle to a scalar node in the autograd computation graph.
///
/// Wraps the node state in `Rc<RefCell<_>>` so that the graph can be shared
/// and gradients can be accumulated during backward. Cloning a `Value` clones
/// the handle, not the node.
///
/// ```
/// use oxigrad::{Pow, Value};
///
/// let m = Value::new(2.0);
/// let c = Value::new(0.0);
/// let pred = &(&m * 3.0) + &c;
/// let loss = (&pred - 7.0).pow(2.0).unwrap();
/// loss.backward();
/// assert_eq!(m.grad(), -6.0);
/// assert_eq!(c.grad(), -2.0);
/// ```
#[derive(Clone)]
pub struct Value(Rc<RefCell<Node>>);

impl Value {
    /// Creates a trainable leaf node with the given value and zero gradient.
    #[must_use]
    pub fn new(data: f64) -> Self {
        Self::leaf(data, true)
    }

    /// Creates a constant leaf: gradient never flows into it and its `grad` stays 0.
    #[must_use]
    pub fn constant(data: f64) -> Self {
        Self::leaf(data, false)
    }

    fn leaf(data: f64, requires_grad: bool) -> Self {
        Value(Rc::new(RefCell::new(Node {
            id: NodeId::next(),
            data,
            grad: 0.0,
            op: Op::Leaf,
            operands: Vec::new(),
            local_grads: Vec::new(),
            requires_grad,
            label: None,
        })))
    }

    /// Creates a node that remembers its operands and local grads for backprop.
    fn with_graph(op: Op, operands: Vec<Value>, data: f64, local_grads: Vec<f64>) -> Self {
        let requires_grad = operands.iter().any(Value::requires_grad);
        Value(Rc::new(RefCell::new(Node {
            id: NodeId::next(),
            data,
            grad: 0.0,
            op,
            operands,
            local_grads,
            requires_grad,
            label: None,
        })))
    }

    /// Builds the node for `op` from its operands and forward result.
    fn from_op(op: Op, operands: Vec<Value>, data: f64) -> Self {
        let inputs: Vec<f64> = operands.iter().map(Value::data).collect();
        let local_grads = op.local_grads(&inputs, data);
        Self::with_graph(op, operands, data, local_grads)
    }

    /// Like [`Value::from_op`], but rejects non-finite results or derivatives
    /// produced from finite inputs. Nothing is allocated on error.
    fn checked_from_op(op: Op, operands: Vec<Value>, data: f64) -> Result<Self> {
        let inputs: Vec<f64> = operands.iter().map(Value::data).collect();
        if inputs.iter().all(|x| x.is_finite()) {
            if !data.is_finite() {
                return Err(Error::numeric_domain(
                    op,
                    format!("non-finite result {data} for inputs {inputs:?}"),
                ));
            }
            let local_grads = op.local_grads(&inputs, data);
            if local_grads.iter().any(|g| !g.is_finite()) {
                return Err(Error::numeric_domain(
                    op,
                    format!("derivative undefined at {inputs:?}"),
                ));
            }
            return Ok(Self::with_graph(op, operands, data, local_grads));
        }
        Ok(Self::from_op(op, operands, data))
    }

    /// Attaches a human-readable name (shown in `Debug`/`Display` and traces).
    #[must_use]
    pub fn with_label(self, label: impl Into<String>) -> Self {
        self.0.borrow_mut().label = Some(label.into());
        self
    }

    /// Returns the label set by [`Value::with_label`], if any.
    #[must_use]
    pub fn label(&self) -> Option<String> {
        self.0.borrow().label.clone()
    }

    /// Identity of this node.
    #[must_use]
    pub fn id(&self) -> NodeId {
        self.0.borrow().id
    }

    /// The operation that produced this node ([`Op::Leaf`] for leaves).
    #[must_use]
    pub fn op(&self) -> Op {
        self.0.borrow().op
    }

    /// Handles to the operands, in operation order. Empty for leaves.
    #[must_use]
    pub fn operands(&self) -> Vec<Value> {
        self.0.borrow().operands.clone()
    }

    /// Local partial derivatives captured when this node was built.
    #[must_use]
    pub fn local_grads(&self) -> Vec<f64> {
        self.0.borrow().local_grads.clone()
    }

    /// Returns `true` if this node has no operands.
    #[must_use]
    pub fn is_leaf(&self) -> bool {
        self.0.borrow().operands.is_empty()
    }

    /// Returns `false` for constants and nodes computed only from constants.
    #[must_use]
    pub fn requires_grad(&self) -> bool {
        self.0.borrow().requires_grad
    }

    /// Returns `true` if both handles point at the same node.
    #[must_use]
    pub fn same_node(&self, other: &Value) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }

    /// Forward pass value.
    #[must_use]
    pub fn data(&self) -> f64 {
        self.0.borrow().data
    }

    /// Overwrites the forward value. Already-built graphs are unaffected.
    pub fn set_data(&self, data: f64) {
        self.0.borrow_mut().data = data;
    }

    /// Accumulated gradient; 0 until a backward pass reaches this node.
    #[must_use]
    pub fn grad(&self) -> f64 {
        self.0.borrow().grad
    }

    /// Adds to this node's gradient (for accumulation when a value is used multiple times).
    pub(crate) fn accumulate_grad(&self, g: f64) {
        self.0.borrow_mut().grad += g;
    }

    /// Applies the chain rule one step for a single backward pass: hands
    /// `local * upstream` to `push` for every operand that requires grad.
    ///
    /// `upstream` is this pass's gradient at the node, not the stored `grad`,
    /// which may still hold contributions from earlier passes.
    pub(crate) fn propagate(&self, upstream: f64, mut push: impl FnMut(&Value, f64)) {
        let node = self.0.borrow();
        for (operand, &local) in node.operands.iter().zip(node.local_grads.iter()) {
            if operand.requires_grad() {
                push(operand, local * upstream);
            }
        }
    }

    /// Runs backprop from this node to every node it depends on.
    ///
    /// Each call adds exactly one `d(self)/d(node)` to every reachable node's
    /// `grad`, with `d(self)/d(self) = 1`; see [`topological_order`] for the
    /// visiting order. Repeated calls without [`Value::zero_grad`] keep adding.
    ///
    /// [`topological_order`]: crate::autograd::topological_order
    pub fn backward(&self) {
        engine::backward(self);
    }

    /// Sets this node's gradient to 0; operands are not touched.
    pub fn zero_grad(&self) {
        self.0.borrow_mut().grad = 0.0;
    }

    /// Hyperbolic tangent. Local grad is `1 - tanh(self)^2`.
    #[must_use]
    pub fn tanh(&self) -> Value {
        Value::from_op(Op::Tanh, vec![self.clone()], self.data().tanh())
    }

    /// ReLU: `max(0, self)`. Local grad is 1 if `self > 0`, else 0.
    #[must_use]
    pub fn relu(&self) -> Value {
        Value::from_op(Op::Relu, vec![self.clone()], self.data().max(0.0))
    }
}

impl fmt::Debug for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        f.debug_struct("Value")
            .field("id", &node.id)
            .field("label", &node.label)
            .field("op", &node.op)
            .field("data", &node.data)
            .field("grad", &node.grad)
            .field("operands", &node.operands.iter().map(Value::id).collect::<Vec<_>>())
            .finish()
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let node = self.0.borrow();
        if let Some(label) = &node.label {
            write!(f, "{label}: ")?;
        }
        write!(f, "Value(data={}, grad={})", node.data, node.grad)
    }
}

// -----------------------------------------------------------------------------
// Leaf construction from plain numbers
// -----------------------------------------------------------------------------

macro_rules! impl_from_number {
    ($($t:ty),*) => {$(
        impl From<$t> for Value {
            fn from(x: $t) -> Value {
                Value::new(f64::from(x))
            }
        }
    )*};
}

impl_from_number!(f64, f32, i8, i16, i32, u8, u16, u32);

// -----------------------------------------------------------------------------
// std::ops algebra: x + y, x - y, x * y, x / y, -x
// -----------------------------------------------------------------------------

fn add_nodes(a: &Value, b: &Value) -> Value {
    Value::from_op(Op::Add, vec![a.clone(), b.clone()], a.data() + b.data())
}

fn sub_nodes(a: &Value, b: &Value) -> Value {
    Value::from_op(Op::Sub, vec![a.clone(), b.clone()], a.data() - b.data())
}

fn mul_nodes(a: &Value, b: &Value) -> Value {
    Value::from_op(Op::Mul, vec![a.clone(), b.clone()], a.data() * b.data())
}

fn div_nodes(a: &Value, b: &Value) -> Result<Value> {
    if b.data() == 0.0 {
        return Err(Error::numeric_domain(Op::Div, "division by zero"));
    }
    Value::checked_from_op(Op::Div, vec![a.clone(), b.clone()], a.data() / b.data())
}

fn neg_node(a: &Value) -> Value {
    Value::from_op(Op::Neg, vec![a.clone()], -a.data())
}

/// Implements a binary operator for every owned/borrowed combination of
/// `Value` and for `f64` on either side (lifted to a constant leaf).
macro_rules! impl_binary_op {
    ($trait:ident, $method:ident, $func:ident, $out:ty) => {
        impl $trait<&Value> for &Value {
            type Output = $out;

            fn $method(self, rhs: &Value) -> $out {
                $func(self, rhs)
            }
        }

        impl $trait<Value> for Value {
            type Output = $out;

            fn $method(self, rhs: Value) -> $out {
                $func(&self, &rhs)
            }
        }

        impl $trait<&Value> for Value {
            type Output = $out;

            fn $method(self, rhs: &Value) -> $out {
                $func(&self, rhs)
            }
        }

        impl $trait<Value> for &Value {
            type Output = $out;

            fn $method(self, rhs: Value) -> $out {
                $func(self, &rhs)
            }
        }

        impl $trait<f64> for &Value {
            type Output = $out;

            fn $method(self, rhs: f64) -> $out {
                $func(self, &Value::constant(rhs))
            }
        }

        impl $trait<f64> for Value {
            type Output = $out;

            fn $method(self, rhs: f64) -> $out {
                $func(&self, &Value::constant(rhs))
            }
        }

        impl $trait<&Value> for f64 {
            type Output = $out;

            fn $method(self, rhs: &Value) -> $out {
                $func(&Value::constant(self), rhs)
            }
        }

        impl $trait<Value> for f64 {
            type Output = $out;

            fn $method(self, rhs: Value) -> $out {
                $func(&Value::constant(self), &rhs)
            }
        }
    };
}

impl_binary_op!(Add, add, add_nodes, Value);
impl_binary_op!(Sub, sub, sub_nodes, Value);
impl_binary_op!(Mul, mul, mul_nodes, Value);
impl_binary_op!(Div, div, div_nodes, Result<Value>);

impl Neg for &Value {
    type Output = Value;

    fn neg(self) -> Value {
        neg_node(self)
    }
}

impl Neg for Value {
    type Output = Value;

    fn neg(self) -> Value {
        neg_node(&self)
    }
}

impl Sum<Value> for Value {
    fn sum<I: Iterator<Item = Value>>(iter: I) -> Value {
        let values: Vec<Value> = iter.collect();
        crate::autograd::sum(&values)
    }
}

impl<'a> Sum<&'a Value> for Value {
    fn sum<I: Iterator<Item = &'a Value>>(iter: I) -> Value {
        crate::autograd::sum(iter)
    }
}

// -----------------------------------------------------------------------------
// Pow, Exp, Log: (&a).pow(exp), (&a).exp(), (&a).log()
// -----------------------------------------------------------------------------

fn pow_node(base: &Value, exp: f64) -> Result<Value> {
    let x = base.data();
    if x < 0.0 && exp.fract() != 0.0 {
        return Err(Error::numeric_domain(
            Op::Pow(exp),
            format!("negative base {x} with non-integer exponent"),
        ));
    }
    if x == 0.0 && exp < 0.0 {
        return Err(Error::numeric_domain(
            Op::Pow(exp),
            "zero base with negative exponent",
        ));
    }
    Value::checked_from_op(Op::Pow(exp), vec![base.clone()], x.powf(exp))
}

fn log_node(a: &Value) -> Result<Value> {
    let x = a.data();
    if x <= 0.0 {
        return Err(Error::numeric_domain(
            Op::Log,
            format!("logarithm of non-positive value {x}"),
        ));
    }
    Value::checked_from_op(Op::Log, vec![a.clone()], x.ln())
}

impl Pow<f64> for &Value {
    type Output = Result<Value>;

    fn pow(self, exp: f64) -> Result<Value> {
        pow_node(self, exp)
    }
}

impl Pow<f64> for Value {
    type Output = Result<Value>;

    fn pow(self, exp: f64) -> Result<Value> {
        pow_node(&self, exp)
    }
}

impl Exp for &Value {
    type Output = Value;

    fn exp(self) -> Value {
        Value::from_op(Op::Exp, vec![self.clone()], self.data().exp())
    }
}

impl Exp for Value {
    type Output = Value;

    fn exp(self) -> Value {
        (&self).exp()
    }
}

impl Log for &Value {
    type Output = Result<Value>;

    fn log(self) -> Result<Value> {
        log_node(self)
    }
}

impl Log for Value {
    type Output = Result<Value>;

    fn log(self) -> Result<Value> {
        log_node(&self)
    }
}

impl ScalarNode for Value {
    fn data(&self) -> f64 {
        Value::data(self)
    }

    fn set_data(&self, data: f64) {
        Value::set_data(self, data);
    }

    fn grad(&self) -> f64 {
        Value::grad(self)
    }

    fn backward(&self) {
        Value::backward(self);
    }

    fn zero_grad(&self) {
        Value::zero_grad(self);
    }
}
