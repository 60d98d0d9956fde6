//! Implementations of the autograd node traits.
//!
//! One file per node type: [`value`] for the scalar [`Value`](value::Value).

pub mod value;
