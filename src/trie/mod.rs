// see https://en.wikipedia.org/wiki/Trie and https://en.wikipedia.org/wiki/Radix_tree

mod compressed;
mod iteration;
mod simple;


use std::fmt;
use std::str::FromStr;

use crate::common_prefix::is_compatible;
use crate::error::{check_limit, Result};
use crate::ordering::{rank, sort_desc, Weighted};
use crate::weight::{Delta, Tally, WeightMode};

pub use compressed::CompressedPrefixTree;
pub use iteration::{Iter, Leaves};
pub use simple::SimplePrefixTree;

/// Stores values of type `V` under keys that are sequences of tokens `T`, each with a weight,
/// and returns the heaviest values under a key prefix.
pub trait Autocompleter<V, T: PartialEq> {
    fn root(&self) -> &Node<V, T>;

    fn weight_mode(&self) -> WeightMode;

    /// Inserts `value` under `key` with the given `weight`.
    ///
    /// If `value` was inserted before (compared with `==`), its weight is increased instead (or
    /// averaged, in [`WeightMode::Average`]). Re-inserting a value under a *different* key is not
    /// supported.
    ///
    /// Fails with [`Error::InvalidWeight`](crate::Error::InvalidWeight) unless `weight > 0`.
    fn insert(&mut self, value: V, weight: f64, key: &[T]) -> Result<()>;

    /// Removes all values whose key starts with `prefix` and returns how many were removed.
    /// The empty prefix removes everything.
    fn remove(&mut self, prefix: &[T]) -> usize;

    /// Returns the number of stored values.
    fn len(&self) -> usize {
        self.root().len()
    }

    fn is_empty(&self) -> bool {
        self.root().is_empty()
    }

    /// Aggregate weight of all stored values.
    fn weight(&self) -> f64 {
        self.root().weight()
    }

    /// Returns the values whose key starts with `prefix`, heaviest first, and at most `limit` of
    /// them. Values of equal weight are returned in the order in which they are stored in the trie.
    ///
    /// Fails with [`Error::InvalidLimit`](crate::Error::InvalidLimit) if `limit` is `Some(0)`.
    fn autocomplete<'a>(&'a self, prefix: &[T], limit: Option<usize>) -> Result<Vec<(&'a V, f64)>>
    where
        V: 'a,
        T: 'a,
    {
        check_limit(limit)?;
        let mut matches = Vec::new();
        self.root().collect(prefix, &mut matches);
        rank(&mut matches, limit);
        Ok(matches)
    }
}

/// Which of the two trie layouts to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TrieVariant {
    /// One token per level, see [`SimplePrefixTree`].
    Simple,
    /// Chains without branches are collapsed, see [`CompressedPrefixTree`].
    #[default]
    Compressed,
}

impl TrieVariant {
    pub fn build<V, T>(self, mode: WeightMode) -> Box<dyn Autocompleter<V, T>>
    where
        V: PartialEq + 'static,
        T: PartialEq + Clone + 'static,
    {
        match self {
            TrieVariant::Simple => Box::new(SimplePrefixTree::new(mode)),
            TrieVariant::Compressed => Box::new(CompressedPrefixTree::new(mode)),
        }
    }
}

impl FromStr for TrieVariant {
    type Err = &'static str;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "s" | "simple" => Ok(TrieVariant::Simple),
            "c" | "compressed" => Ok(TrieVariant::Compressed),
            _ => Err("trie must be either 'simple' or 'compressed'"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Node<V, T> {
    /// Aggregate weight, always equal to `tally.weight(mode)` of the owning trie.
    weight: f64,
    tally: Tally,
    data: NodeData<V, T>,
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum NodeData<V, T> {
    /// Canonical empty state, only ever found at the root.
    Empty,
    /// A stored value and its full key.
    Leaf { value: V, key: Vec<T> },
    /// `label` is the longest common prefix of the keys of all leaves below.
    /// `children` are sorted by non-increasing weight and never empty.
    Interior { label: Vec<T>, children: Vec<Node<V, T>> },
}

impl<V, T> Node<V, T> {

    // Constructors:

    pub(crate) fn empty() -> Self {
        Node {
            weight: 0.0,
            tally: Tally::default(),
            data: NodeData::Empty,
        }
    }

    pub(crate) fn leaf(value: V, key: Vec<T>, weight: f64, mode: WeightMode) -> Self {
        let tally = Tally { sum: weight, count: 1 };
        Node {
            weight: tally.weight(mode),
            tally,
            data: NodeData::Leaf { value, key },
        }
    }

    /// Interior node without children yet, to be filled by the caller.
    pub(crate) fn interior(label: Vec<T>) -> Self {
        Node {
            weight: 0.0,
            tally: Tally::default(),
            data: NodeData::Interior { label, children: Vec::new() },
        }
    }

    pub(crate) fn interior_with(label: Vec<T>, mut children: Vec<Node<V, T>>, mode: WeightMode) -> Self {
        let mut tally = Tally::default();
        for child in &children {
            tally.add(child.contribution());
        }
        sort_desc(&mut children);
        Node {
            weight: tally.weight(mode),
            tally,
            data: NodeData::Interior { label, children },
        }
    }


    // Accessors:

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn value(&self) -> Option<&V> {
        match &self.data {
            NodeData::Leaf { value, .. } => Some(value),
            _ => None,
        }
    }

    /// The full key of a leaf.
    pub fn key(&self) -> Option<&[T]> {
        match &self.data {
            NodeData::Leaf { key, .. } => Some(key.as_slice()),
            _ => None,
        }
    }

    /// The common prefix of an interior node.
    pub fn label(&self) -> Option<&[T]> {
        match &self.data {
            NodeData::Interior { label, .. } => Some(label.as_slice()),
            _ => None,
        }
    }

    /// The key of a leaf or the label of an interior node, i.e., the token sequence that leads
    /// to this node.
    pub fn path(&self) -> &[T] {
        match &self.data {
            NodeData::Empty => &[],
            NodeData::Leaf { key, .. } => key.as_slice(),
            NodeData::Interior { label, .. } => label.as_slice(),
        }
    }

    pub fn children(&self) -> std::slice::Iter<Node<V, T>> {
        match &self.data {
            NodeData::Interior { children, .. } => children.iter(),
            _ => [].iter(),
        }
    }

    /// Returns the number of stored values (i.e., leafs) in this subtrie.
    /// O(1), interior nodes tally their leafs.
    pub fn len(&self) -> usize {
        match &self.data {
            NodeData::Empty => 0,
            NodeData::Leaf { .. } => 1,
            NodeData::Interior { .. } => self.tally.count,
        }
    }

    /// O(1).
    pub fn is_empty(&self) -> bool {
        matches!(self.data, NodeData::Empty)
    }

    pub fn is_leaf(&self) -> bool {
        matches!(self.data, NodeData::Leaf { .. })
    }


    // Weight bookkeeping:

    /// What this subtrie adds to the tally of its parent.
    pub(crate) fn contribution(&self) -> Delta {
        match &self.data {
            NodeData::Empty => Delta::default(),
            NodeData::Leaf { .. } => Delta { weight: self.weight, leaves: 1 },
            NodeData::Interior { .. } => Delta { weight: self.tally.sum, leaves: self.tally.count },
        }
    }

    /// Adds another insertion of the value to this leaf and returns how its weight changed.
    pub(crate) fn add_to_leaf(&mut self, weight: f64, mode: WeightMode) -> Delta {
        debug_assert!(self.is_leaf());
        let old_weight = self.weight;
        self.tally.sum += weight;
        self.tally.count += 1;
        self.weight = self.tally.weight(mode);
        Delta { weight: self.weight - old_weight, leaves: 0 }
    }

    /// Accounts for a change in one of the children.
    pub(crate) fn apply(&mut self, delta: Delta, mode: WeightMode) {
        self.tally.add(delta);
        self.weight = self.tally.weight(mode);
    }

    /// Accounts for values removed below this node; becomes empty if none are left.
    pub(crate) fn retract(&mut self, delta: Delta, mode: WeightMode) {
        self.tally.subtract(delta);
        if self.tally.count == 0 {
            *self = Node::empty();
            return;
        }
        // Subtracting a large removed weight can cancel out small weights that were absorbed
        // into the sum, so the remaining children are summed up again.
        if let NodeData::Interior { children, .. } = &self.data {
            let mut tally = Tally::default();
            for child in children {
                tally.add(child.contribution());
            }
            self.tally = tally;
        }
        self.weight = self.tally.weight(mode);
    }

    /// Removes the whole subtrie and returns what it contributed.
    pub(crate) fn clear(&mut self) -> Delta {
        let removed = self.contribution();
        *self = Node::empty();
        removed
    }
}

impl<V, T: PartialEq> Node<V, T> {
    /// Pushes all values below this node whose key starts with `prefix` onto `matches`,
    /// in the order of the children.
    pub(crate) fn collect<'trie>(&'trie self, prefix: &[T], matches: &mut Vec<(&'trie V, f64)>) {
        match &self.data {
            NodeData::Empty => {}
            NodeData::Leaf { value, key } => {
                if key.starts_with(prefix) {
                    matches.push((value, self.weight));
                }
            }
            NodeData::Interior { label, children } => {
                if is_compatible(label, prefix) {
                    for child in children {
                        child.collect(prefix, matches);
                    }
                }
            }
        }
    }
}

impl<V, T> Weighted for Node<V, T> {
    fn weight(&self) -> f64 {
        self.weight
    }
}

/// Indented rendering, one node per line: the label of interior nodes, the value of leafs, and
/// the weight of both.
impl<V: fmt::Debug, T: fmt::Debug> fmt::Display for Node<V, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (level, node) in self.iter() {
            let indent = "  ".repeat(level);
            match &node.data {
                NodeData::Empty => {}
                NodeData::Leaf { value, .. } => writeln!(f, "{indent}{value:?} ({})", node.weight)?,
                NodeData::Interior { label, .. } => writeln!(f, "{indent}{label:?} ({})", node.weight)?,
            }
        }
        Ok(())
    }
}
