//! Backward engine: topological ordering and chain-rule replay.

use std::collections::{HashMap, HashSet};

use super::{NodeId, Value};

/// Returns every node reachable from `root`, consumers before producers.
///
/// `root` comes first and each node appears exactly once, after all nodes that
/// use it as an operand. The walk is an iterative depth-first post-order keyed
/// on [`NodeId`], reversed at the end, so long chains do not grow the call stack.
#[must_use]
pub fn topological_order(root: &Value) -> Vec<Value> {
    let mut visited: HashSet<NodeId> = HashSet::new();
    let mut post_order = Vec::new();
    // (node, operands already pushed)
    let mut stack: Vec<(Value, bool)> = vec![(root.clone(), false)];

    while let Some((node, expanded)) = stack.pop() {
        if expanded {
            post_order.push(node);
            continue;
        }
        if !visited.insert(node.id()) {
            continue;
        }
        let operands = node.operands();
        stack.push((node, true));
        for operand in operands.into_iter().rev() {
            if !visited.contains(&operand.id()) {
                stack.push((operand, false));
            }
        }
    }

    post_order.reverse();
    post_order
}

/// Runs one backward pass from `root`.
///
/// Gradients for this pass live in a buffer indexed by position in
/// [`topological_order`]; the root starts at 1. Each node adds its pass
/// gradient to the stored `grad` and pushes `local * pass_grad` to its
/// operands, so a repeated call adds the same amount again.
pub(crate) fn backward(root: &Value) {
    let _span = tracing::debug_span!("backward", root = %root.id()).entered();
    let order = topological_order(root);
    let index: HashMap<NodeId, usize> = order
        .iter()
        .enumerate()
        .map(|(i, node)| (node.id(), i))
        .collect();
    let mut pass_grads = vec![0.0; order.len()];
    pass_grads[0] = 1.0;

    for (i, node) in order.iter().enumerate() {
        let upstream = pass_grads[i];
        node.accumulate_grad(upstream);
        node.propagate(upstream, |operand, g| {
            if let Some(&j) = index.get(&operand.id()) {
                pass_grads[j] += g;
            }
        });
    }
    tracing::debug!(nodes = order.len(), "backward pass complete");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn position(order: &[Value], v: &Value) -> usize {
        order
            .iter()
            .position(|n| n.same_node(v))
            .expect("node missing from order")
    }

    #[test]
    fn leaf_order_is_just_the_leaf() {
        let a = Value::new(1.0);
        let order = topological_order(&a);
        assert_eq!(order.len(), 1);
        assert!(order[0].same_node(&a));
    }

    #[test]
    fn shared_node_appears_once_after_all_consumers() {
        // a feeds b and c; d = b * c; a is a diamond bottom.
        let a = Value::new(2.0);
        let b = &a + 1.0;
        let c = &a * 3.0;
        let d = &b * &c;
        let order = topological_order(&d);

        let count = order.iter().filter(|n| n.same_node(&a)).count();
        assert_eq!(count, 1);
        assert_eq!(position(&order, &d), 0);
        assert!(position(&order, &b) < position(&order, &a));
        assert!(position(&order, &c) < position(&order, &a));
    }

    #[test]
    fn every_node_precedes_its_operands() {
        let x = Value::new(0.5);
        let y = Value::new(-1.5);
        let z = &(&(&x * &y) + &x) - &(&y * &y);
        let order = topological_order(&z);
        for node in &order {
            for operand in node.operands() {
                assert!(position(&order, node) < position(&order, &operand));
            }
        }
    }

    #[test]
    fn long_chain_does_not_overflow() {
        let x = Value::new(1.0);
        let mut acc = x.clone();
        for _ in 0..100_000 {
            acc = &acc + 1.0;
        }
        let order = topological_order(&acc);
        // chain nodes + their constants + x
        assert_eq!(order.len(), 100_000 * 2 + 1);
        acc.backward();
        assert_eq!(x.grad(), 1.0);
        drop(order);
        drop(acc);
        assert_eq!(x.data(), 1.0);
    }

    #[test]
    fn large_loss_graph_is_freed_after_backward() {
        let w = Value::new(1.0);
        let preds: Vec<Value> = (0..200_000).map(|i| &w * f64::from(i % 7)).collect();
        let targets: Vec<Value> = (0..200_000).map(|i| Value::constant(f64::from(i % 7))).collect();
        let loss = crate::loss::mse(&preds, &targets).unwrap();
        assert_eq!(loss.data(), 0.0);
        loss.backward();
        assert_eq!(w.grad(), 0.0);
        drop(preds);
        drop(loss);
        assert!(w.is_leaf());
    }
}
