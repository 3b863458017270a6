use std::fmt;

use tracing::trace;

use super::{Autocompleter, Node, NodeData};
use crate::error::{check_weight, Result};
use crate::ordering::{reposition, sort_desc};
use crate::weight::{Delta, WeightMode};

/// Uncompressed prefix tree: the label of every interior node extends the label of its parent by
/// exactly one token, starting from the empty label at the root. The value stored under a key
/// hangs as a leaf below the interior node labelled with exactly that key.
///
/// ```text
/// [] ── [c] ── [c a] ─┬─ [c a r] ─┬─ "car"
///                     │           └─ [c a r e] ── "care"
///                     └─ [c a t] ── "cat"
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SimplePrefixTree<V, T> {
    root: Node<V, T>,
    mode: WeightMode,
}

impl<V, T> SimplePrefixTree<V, T> {
    pub fn new(mode: WeightMode) -> Self {
        Self {
            root: Node::empty(),
            mode,
        }
    }
}

impl<V, T> Default for SimplePrefixTree<V, T> {
    fn default() -> Self {
        Self::new(WeightMode::default())
    }
}

impl<V: fmt::Debug, T: fmt::Debug> fmt::Display for SimplePrefixTree<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl<V: PartialEq, T: PartialEq + Clone> Autocompleter<V, T> for SimplePrefixTree<V, T> {
    fn root(&self) -> &Node<V, T> {
        &self.root
    }

    fn weight_mode(&self) -> WeightMode {
        self.mode
    }

    fn insert(&mut self, value: V, weight: f64, key: &[T]) -> Result<()> {
        check_weight(weight)?;
        if self.root.is_empty() {
            self.root = Node::interior(Vec::new());
        }
        insert(&mut self.root, value, weight, key, self.mode);
        Ok(())
    }

    fn remove(&mut self, prefix: &[T]) -> usize {
        let removed = remove(&mut self.root, prefix, self.mode);
        if removed.leaves > 0 {
            trace!(removed = removed.leaves, prefix_len = prefix.len(), "removed values");
        }
        removed.leaves
    }
}

/// `node` must be an interior node whose label is a prefix of `key`.
fn insert<V: PartialEq, T: PartialEq + Clone>(
    node: &mut Node<V, T>,
    value: V,
    weight: f64,
    key: &[T],
    mode: WeightMode,
) -> Delta {
    let NodeData::Interior { label, children } = &mut node.data else {
        unreachable!("insertion only descends into interior nodes")
    };
    debug_assert!(key.starts_with(label));
    let depth = label.len();

    let (index, delta) = if depth == key.len() {
        // The path is complete, so the value is (or will be) a leaf directly below.
        match children.iter().position(|child| child.value() == Some(&value)) {
            Some(index) => (index, children[index].add_to_leaf(weight, mode)),
            None => {
                let leaf = Node::leaf(value, key.to_vec(), weight, mode);
                let delta = leaf.contribution();
                children.push(leaf);
                (children.len() - 1, delta)
            }
        }
    } else {
        // Descend into the child whose label is one token longer, creating it if necessary.
        let next = &key[..=depth];
        let index = match children.iter().position(|child| child.label() == Some(next)) {
            Some(index) => index,
            None => {
                children.push(Node::interior(next.to_vec()));
                children.len() - 1
            }
        };
        (index, insert(&mut children[index], value, weight, key, mode))
    };

    // Only the touched child changed its weight, so only it needs to move.
    reposition(children, index);
    node.apply(delta, mode);
    delta
}

fn remove<V, T: PartialEq>(node: &mut Node<V, T>, prefix: &[T], mode: WeightMode) -> Delta {
    match &mut node.data {
        NodeData::Empty => Delta::default(),
        NodeData::Leaf { key, .. } => {
            if key.starts_with(prefix) {
                node.clear()
            } else {
                Delta::default()
            }
        }
        NodeData::Interior { label, children } => {
            // Everything below starts with `prefix`.
            if label.starts_with(prefix) {
                return node.clear();
            }
            // Nothing below starts with `prefix`.
            if !prefix.starts_with(label) {
                return Delta::default();
            }

            let mut removed = Delta::default();
            children.retain_mut(|child| {
                let delta = remove(child, prefix, mode);
                removed.weight += delta.weight;
                removed.leaves += delta.leaves;
                !child.is_empty()
            });
            if removed.leaves > 0 {
                sort_desc(children);
                node.retract(removed, mode);
            }
            removed
        }
    }
}
