use std::fmt;

use tracing::trace;

use super::{Autocompleter, Node, NodeData};
use crate::common_prefix::longest_common_prefix;
use crate::error::{check_weight, Result};
use crate::ordering::reposition;
use crate::weight::{Delta, WeightMode};

/// Path-compressed prefix tree (a radix tree): chains of nodes without branches are collapsed,
/// so a label can be more than one token longer than the label of its parent, and a leaf hangs
/// directly below the node where its key branches off from its siblings.
///
/// ```text
/// [c a] ─┬─ [c a r] ─┬─ "car"
///        │           └─ "care"
///        └─ "cat"
/// ```
///
/// Invariants (in addition to those shared with [`SimplePrefixTree`](super::SimplePrefixTree)):
/// - Every interior node except the root has at least two children. The root may also have a
///   single child, but only a leaf, in which case the root label is the key of that leaf.
/// - Below a node labelled `L`, at most one child continues with any given token after `L`.
///   Only leafs whose key is exactly `L` share that position.
/// - Hence, every label is the longest common prefix of the keys below it.
#[derive(Debug, Clone, PartialEq)]
pub struct CompressedPrefixTree<V, T> {
    root: Node<V, T>,
    mode: WeightMode,
}

impl<V, T> CompressedPrefixTree<V, T> {
    pub fn new(mode: WeightMode) -> Self {
        Self {
            root: Node::empty(),
            mode,
        }
    }
}

impl<V, T> Default for CompressedPrefixTree<V, T> {
    fn default() -> Self {
        Self::new(WeightMode::default())
    }
}

impl<V: fmt::Debug, T: fmt::Debug> fmt::Display for CompressedPrefixTree<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.root, f)
    }
}

impl<V: PartialEq, T: PartialEq + Clone> Autocompleter<V, T> for CompressedPrefixTree<V, T> {
    fn root(&self) -> &Node<V, T> {
        &self.root
    }

    fn weight_mode(&self) -> WeightMode {
        self.mode
    }

    fn insert(&mut self, value: V, weight: f64, key: &[T]) -> Result<()> {
        check_weight(weight)?;
        let mode = self.mode;
        match &self.root.data {
            NodeData::Empty => {
                let leaf = Node::leaf(value, key.to_vec(), weight, mode);
                self.root = Node::interior_with(key.to_vec(), vec![leaf], mode);
            }
            NodeData::Interior { label, .. } if !key.starts_with(label) => {
                // The new key branches off above the root, so a new root with the part that both
                // have in common takes its place.
                let common = longest_common_prefix(label, key).common_prefix.to_vec();
                trace!(depth = common.len(), "split root");
                let old_root = std::mem::replace(&mut self.root, Node::empty());
                let leaf = Node::leaf(value, key.to_vec(), weight, mode);
                self.root = Node::interior_with(common, vec![unwrap_single_leaf(old_root), leaf], mode);
            }
            _ => {
                insert(&mut self.root, value, weight, key, mode);
            }
        }
        Ok(())
    }

    fn remove(&mut self, prefix: &[T]) -> usize {
        let removed = remove(&mut self.root, prefix, self.mode);
        if removed.leaves > 0 {
            trace!(removed = removed.leaves, prefix_len = prefix.len(), "removed values");
            compress_root(&mut self.root);
        }
        removed.leaves
    }
}

/// How an insertion continues at an existing child.
enum Step {
    /// The child is the leaf of the inserted value.
    Update,
    /// The child's label is a prefix of the key.
    Descend,
    /// The key branches off inside the child's path.
    Split,
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

    let existing = if depth == key.len() {
        // Leafs with exactly this key are the only children that can hold the value.
        children.iter().position(|child| child.value() == Some(&value))
    } else {
        children.iter().position(|child| child.path().get(depth) == Some(&key[depth]))
    };

    let (index, delta) = match existing {
        None => {
            let leaf = Node::leaf(value, key.to_vec(), weight, mode);
            let delta = leaf.contribution();
            children.push(leaf);
            (children.len() - 1, delta)
        }
        Some(index) => {
            let step = match &children[index].data {
                NodeData::Leaf { value: stored, key: stored_key } if stored_key.as_slice() == key && *stored == value => Step::Update,
                NodeData::Interior { label, .. } if key.starts_with(label) => Step::Descend,
                _ => Step::Split,
            };
            let child = &mut children[index];
            match step {
                Step::Update => (index, child.add_to_leaf(weight, mode)),
                Step::Descend => (index, insert(child, value, weight, key, mode)),
                Step::Split => {
                    // Both the child and the new leaf move below a new node labelled with
                    // their common prefix.
                    let common = longest_common_prefix(child.path(), key).common_prefix.to_vec();
                    trace!(depth = common.len(), "split node");
                    let leaf = Node::leaf(value, key.to_vec(), weight, mode);
                    let delta = leaf.contribution();
                    let old_child = std::mem::replace(child, Node::empty());
                    *child = Node::interior_with(common, vec![old_child, leaf], mode);
                    (index, delta)
                }
            }
        }
    };

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
            // Also covers a prefix that ends somewhere between the labels of this node's parent
            // and this node.
            if label.starts_with(prefix) {
                return node.clear();
            }
            if !prefix.starts_with(label) {
                return Delta::default();
            }

            // At most one child continues with the next token of the prefix.
            let depth = label.len();
            let Some(index) = children
                .iter()
                .position(|child| child.path().get(depth) == Some(&prefix[depth]))
            else {
                return Delta::default();
            };

            let child = &mut children[index];
            let removed = remove(child, prefix, mode);
            if removed.leaves == 0 {
                return removed;
            }
            if child.is_empty() {
                children.remove(index);
            } else {
                compress(child);
                reposition(children, index);
            }
            node.retract(removed, mode);
            removed
        }
    }
}

/// Collapses an interior node with only one child into that child.
fn compress<V, T>(node: &mut Node<V, T>) {
    if let NodeData::Interior { children, .. } = &mut node.data {
        if children.len() == 1 {
            if let Some(only_child) = children.pop() {
                trace!(leaf = only_child.is_leaf(), "merge node into its only child");
                *node = only_child;
            }
        }
    }
}

/// Like [`compress`], except that the root always stays an interior node: a single leaf stays
/// below the root, which takes over the key of the leaf as its label.
fn compress_root<V, T: Clone>(root: &mut Node<V, T>) {
    let NodeData::Interior { label, children } = &mut root.data else {
        return;
    };
    if children.len() != 1 {
        return;
    }
    if let Some(key) = children[0].key() {
        *label = key.to_vec();
        return;
    }
    compress(root);
}

/// The inverse of the root invariant: a root with a single leaf is replaced by that leaf when the
/// root is moved further down.
fn unwrap_single_leaf<V, T>(mut root: Node<V, T>) -> Node<V, T> {
    if let NodeData::Interior { children, .. } = &mut root.data {
        if children.len() == 1 && children[0].is_leaf() {
            if let Some(leaf) = children.pop() {
                return leaf;
            }
        }
    }
    root
}
