use super::Node;

/// External pre-order depth-first iterator over all nodes of a subtrie, together with their level
/// below the starting node. Children are visited in their stored order, i.e., heaviest first.
pub struct Iter<'trie, V, T> {
    /// A worklist of nodes still to process.
    node_stack: Vec<(usize, &'trie Node<V, T>)>,
}

impl<'trie, V, T> Iterator for Iter<'trie, V, T> {
    type Item = (usize, &'trie Node<V, T>);

    fn next(&mut self) -> Option<Self::Item> {
        let (level, node) = self.node_stack.pop()?;
        // Process the children next, i.e., depth-first traversal.
        self.node_stack
            .extend(node.children().rev().map(|child| (level + 1, child)));
        Some((level, node))
    }
}

/// Iterator over the stored values of a subtrie and their weights, in pre-order.
pub struct Leaves<'trie, V, T> {
    nodes: Iter<'trie, V, T>,
}

impl<'trie, V, T> Iterator for Leaves<'trie, V, T> {
    type Item = (&'trie V, f64);

    fn next(&mut self) -> Option<Self::Item> {
        self.nodes
            .by_ref()
            .find_map(|(_, node)| node.value().map(|value| (value, node.weight())))
    }
}

impl<V, T> Node<V, T> {
    pub fn iter(&self) -> Iter<V, T> {
        Iter { node_stack: vec![(0, self)] }
    }

    pub fn leaves(&self) -> Leaves<V, T> {
        Leaves { nodes: self.iter() }
    }
}
