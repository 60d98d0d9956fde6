//! Operation kinds recorded on every graph node, with their local-derivative rules.

use std::fmt;

/// The operation that produced a node.
///
/// Each variant carries a fixed formula for the partial derivatives of the
/// output with respect to its operands, see [`Op::local_grads`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Op {
    /// No producing operation (parameter, input or constant).
    Leaf,
    /// `a + b`
    Add,
    /// `a - b`
    Sub,
    /// `a * b`
    Mul,
    /// `a / b`
    Div,
    /// `-a`
    Neg,
    /// `a ^ exp` for a constant exponent.
    Pow(f64),
    /// `e ^ a`
    Exp,
    /// `ln(a)`
    Log,
    /// `tanh(a)`
    Tanh,
    /// `max(0, a)`
    Relu,
}

impl Op {
    /// Number of operands this operation takes.
    #[must_use]
    pub fn arity(&self) -> usize {
        match self {
            Op::Leaf => 0,
            Op::Add | Op::Sub | Op::Mul | Op::Div => 2,
            Op::Neg | Op::Pow(_) | Op::Exp | Op::Log | Op::Tanh | Op::Relu => 1,
        }
    }

    /// Short name used in `Display` output and trace fields.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Op::Leaf => "leaf",
            Op::Add => "add",
            Op::Sub => "sub",
            Op::Mul => "mul",
            Op::Div => "div",
            Op::Neg => "neg",
            Op::Pow(_) => "pow",
            Op::Exp => "exp",
            Op::Log => "log",
            Op::Tanh => "tanh",
            Op::Relu => "relu",
        }
    }

    /// Partial derivatives of the output w.r.t. each operand.
    ///
    /// `inputs` are the operand values and `out` the forward result, both taken
    /// at construction time. The returned vector has [`Op::arity`] entries.
    #[must_use]
    pub(crate) fn local_grads(&self, inputs: &[f64], out: f64) -> Vec<f64> {
        debug_assert_eq!(inputs.len(), self.arity());
        match *self {
            Op::Leaf => Vec::new(),
            Op::Add => vec![1.0, 1.0],
            Op::Sub => vec![1.0, -1.0],
            Op::Mul => vec![inputs[1], inputs[0]],
            Op::Div => {
                let (a, b) = (inputs[0], inputs[1]);
                vec![1.0 / b, -a / (b * b)]
            }
            Op::Neg => vec![-1.0],
            Op::Pow(exp) if exp == 0.0 => vec![0.0],
            Op::Pow(exp) => vec![exp * inputs[0].powf(exp - 1.0)],
            Op::Exp => vec![out],
            Op::Log => vec![1.0 / inputs[0]],
            Op::Tanh => vec![1.0 - out * out],
            Op::Relu => vec![if inputs[0] > 0.0 { 1.0 } else { 0.0 }],
        }
    }
}

impl fmt::Display for Op {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Op::Pow(exp) => write!(f, "pow({exp})"),
            other => f.write_str(other.name()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn arity_matches_local_grad_count() {
        let cases = [
            (Op::Add, vec![2.0, 3.0], 5.0),
            (Op::Sub, vec![2.0, 3.0], -1.0),
            (Op::Mul, vec![2.0, 3.0], 6.0),
            (Op::Div, vec![2.0, 4.0], 0.5),
            (Op::Neg, vec![2.0], -2.0),
            (Op::Pow(2.0), vec![3.0], 9.0),
            (Op::Exp, vec![0.0], 1.0),
            (Op::Log, vec![1.0], 0.0),
            (Op::Tanh, vec![0.0], 0.0),
            (Op::Relu, vec![-1.0], 0.0),
        ];
        for (op, inputs, out) in cases {
            assert_eq!(op.local_grads(&inputs, out).len(), op.arity(), "{op}");
        }
    }

    #[test]
    fn div_rule() {
        assert_eq!(Op::Div.local_grads(&[6.0, 2.0], 3.0), vec![0.5, -1.5]);
    }

    #[test]
    fn display_includes_pow_exponent() {
        assert_eq!(Op::Pow(-1.0).to_string(), "pow(-1)");
        assert_eq!(Op::Tanh.to_string(), "tanh");
    }
}
