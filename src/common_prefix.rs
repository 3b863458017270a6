//! Comparison of token sequences, used for traversal pruning and for deciding where subtries
//! are attached or split.

#[derive(Debug, PartialEq, Eq)]
pub struct LcpResult<'a, T> {
    pub common_prefix: &'a [T],
    pub left_rest: &'a [T],
    pub right_rest: &'a [T],
}

pub fn longest_common_prefix<'a, T: PartialEq>(left: &'a [T], right: &'a [T]) -> LcpResult<'a, T> {
    let difference_start_index = left
        .iter()
        .zip(right)
        .position(|(l, r)| l != r)
        // No difference found, so the shorter one is a prefix of the longer one.
        .unwrap_or(left.len().min(right.len()));

    let (common_prefix, left_rest) = left.split_at(difference_start_index);
    LcpResult {
        common_prefix,
        left_rest,
        right_rest: &right[difference_start_index..],
    }
}

/// Returns `true` iff one of the sequences is a prefix of the other (which includes equality).
pub fn is_compatible<T: PartialEq>(left: &[T], right: &[T]) -> bool {
    let len = left.len().min(right.len());
    left[..len] == right[..len]
}
