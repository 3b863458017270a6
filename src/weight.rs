//! Incremental weight bookkeeping shared by both trie variants.
//!
//! Every node carries a [`Tally`] that exactly reflects its subtree, so that its aggregate weight
//! can be recomputed in O(1) after an insertion or removal below it, without traversing the subtree.

use std::str::FromStr;

/// How the aggregate weight of a node is derived from the weights below it.
/// Fixed when the trie is created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum WeightMode {
    /// Total of the leaf weights. Repeated insertions of a value add up.
    #[default]
    Sum,
    /// Total of the leaf weights divided by the number of leaves.
    /// Repeated insertions of a value are averaged as well.
    Average,
}

impl FromStr for WeightMode {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "s" | "sum" => Ok(WeightMode::Sum),
            "a" | "avg" | "average" => Ok(WeightMode::Average),
            _ => Err("weight mode must be either 'sum' or 'average'"),
        }
    }
}

/// Running `(sum, count)` of a node.
///
/// For a leaf, `sum` is the total weight inserted for its value and `count` the number of insertions.
/// For an interior node, `sum` is the total of the leaf weights below it and `count` the number of
/// those leaves.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Tally {
    pub sum: f64,
    pub count: usize,
}

impl Tally {
    pub fn weight(&self, mode: WeightMode) -> f64 {
        if self.count == 0 {
            return 0.0;
        }
        match mode {
            WeightMode::Sum => self.sum,
            WeightMode::Average => self.sum / self.count as f64,
        }
    }

    pub fn add(&mut self, delta: Delta) {
        self.sum += delta.weight;
        self.count += delta.leaves;
    }

    /// Subtracts a removed subtree. Once nothing is left, the tally is reset exactly to zero,
    /// so floating point residue cannot keep an empty node alive.
    pub fn subtract(&mut self, delta: Delta) {
        debug_assert!(delta.leaves <= self.count, "removed more leaves than tallied");
        self.count -= delta.leaves;
        self.sum -= delta.weight;
        if self.count == 0 {
            *self = Tally::default();
        }
    }
}

/// Change of a subtree as seen by its parent: by how much the leaf weights below changed in total,
/// and how many leaves were added (or removed).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Delta {
    pub weight: f64,
    pub leaves: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_weight_mode() {
        assert_eq!("sum".parse::<WeightMode>(), Ok(WeightMode::Sum));
        assert_eq!("a".parse::<WeightMode>(), Ok(WeightMode::Average));
        assert_eq!("average".parse::<WeightMode>(), Ok(WeightMode::Average));
        assert!("median".parse::<WeightMode>().is_err());
    }

    #[test]
    fn sum_and_average() {
        let mut tally = Tally::default();
        assert_eq!(tally.weight(WeightMode::Sum), 0.0);
        assert_eq!(tally.weight(WeightMode::Average), 0.0);

        tally.add(Delta { weight: 2.0, leaves: 1 });
        tally.add(Delta { weight: 6.0, leaves: 1 });
        assert_eq!(tally.weight(WeightMode::Sum), 8.0);
        assert_eq!(tally.weight(WeightMode::Average), 4.0);

        // An existing leaf got heavier: weight changes, leaf count does not.
        tally.add(Delta { weight: 4.0, leaves: 0 });
        assert_eq!(tally.weight(WeightMode::Sum), 12.0);
        assert_eq!(tally.weight(WeightMode::Average), 6.0);
    }

    #[test]
    fn subtract_to_empty_resets() {
        let mut tally = Tally::default();
        tally.add(Delta { weight: 0.1, leaves: 1 });
        tally.add(Delta { weight: 0.2, leaves: 1 });
        tally.subtract(Delta { weight: 0.2, leaves: 1 });
        assert_eq!(tally.count, 1);
        tally.subtract(Delta { weight: 0.1, leaves: 1 });
        assert_eq!(tally, Tally::default());
        assert_eq!(tally.weight(WeightMode::Average), 0.0);
    }
}
