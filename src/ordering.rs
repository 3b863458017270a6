//! Keeps siblings (and results) ordered by non-increasing weight.
//!
//! Ties are broken deterministically: an item that is moved lands behind every item of
//! equal weight, and items that don't move keep their relative order.

pub trait Weighted {
    fn weight(&self) -> f64;
}

impl<V> Weighted for (V, f64) {
    fn weight(&self) -> f64 {
        self.1
    }
}

/// Moves the item at `index`, whose weight just changed, to where it belongs.
/// All other items must still be sorted. Returns the new index, which is `index` unless a
/// neighbour is strictly out of order, so ties keep their order.
pub fn reposition<W: Weighted>(items: &mut [W], index: usize) -> usize {
    let weight = items[index].weight();

    // Got heavier: move to the front, but behind all items of at least the same weight.
    let target = items[..index].partition_point(|other| other.weight() >= weight);
    if target < index {
        items[target..=index].rotate_right(1);
        return target;
    }

    // Got lighter: move to the back, again behind all items of at least the same weight.
    if items.get(index + 1).map_or(true, |next| next.weight() <= weight) {
        return index;
    }
    let target = index + items[index + 1..].partition_point(|other| other.weight() >= weight);
    items[index..=target].rotate_left(1);
    target
}

/// Stable sort by non-increasing weight.
pub fn sort_desc<W: Weighted>(items: &mut [W]) {
    items.sort_by(|a, b| b.weight().total_cmp(&a.weight()));
}

/// Sorts first, then keeps only the `limit` heaviest items.
pub fn rank<W: Weighted>(items: &mut Vec<W>, limit: Option<usize>) {
    sort_desc(items);
    if let Some(limit) = limit {
        items.truncate(limit);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn names<'a>(items: &[(&'a str, f64)]) -> Vec<&'a str> {
        items.iter().map(|(name, _)| *name).collect()
    }

    #[test]
    fn reposition_after_weight_change() {
        let mut items = vec![("a", 5.0), ("b", 3.0), ("c", 2.0), ("d", 2.0), ("e", 1.0)];

        // Heavier.
        items[3].1 = 3.0;
        assert_eq!(reposition(&mut items, 3), 2);
        assert_eq!(names(&items), ["a", "b", "d", "c", "e"]);

        // Lighter.
        items[0].1 = 2.0;
        assert_eq!(reposition(&mut items, 0), 3);
        assert_eq!(names(&items), ["b", "d", "c", "a", "e"]);

        // Unchanged weight does not move.
        assert_eq!(reposition(&mut items, 1), 1);
        assert_eq!(names(&items), ["b", "d", "c", "a", "e"]);

        // To the very end.
        items[0].1 = 0.5;
        assert_eq!(reposition(&mut items, 0), 4);
        assert_eq!(names(&items), ["d", "c", "a", "e", "b"]);
    }

    #[test]
    fn reposition_keeps_ties_in_place() {
        let mut items = vec![("a", 2.0), ("b", 2.0), ("c", 2.0)];
        for index in 0..items.len() {
            assert_eq!(reposition(&mut items, index), index);
            assert_eq!(names(&items), ["a", "b", "c"]);
        }

        // Lighter, but only as light as its neighbour.
        let mut items = vec![("a", 3.0), ("b", 2.0), ("c", 1.0)];
        items[0].1 = 2.0;
        assert_eq!(reposition(&mut items, 0), 0);
        assert_eq!(names(&items), ["a", "b", "c"]);

        // Lighter than its neighbour, so it moves behind every item of the same weight.
        items[0].1 = 1.0;
        assert_eq!(reposition(&mut items, 0), 2);
        assert_eq!(names(&items), ["b", "c", "a"]);
    }

    #[test]
    fn rank_sorts_before_truncating() {
        let mut items = vec![("car", 2.0), ("cat", 2.5), ("care", 3.0), ("cap", 2.5)];
        rank(&mut items, Some(3));
        assert_eq!(items, [("care", 3.0), ("cat", 2.5), ("cap", 2.5)]);

        let mut items = vec![("x", 1.0), ("y", 4.0)];
        rank(&mut items, None);
        assert_eq!(items, [("y", 4.0), ("x", 1.0)]);
    }
}
