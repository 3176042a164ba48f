use crate::node::{Node, Row};

/// Visitor for walking a layout tree read-only.
///
/// The default methods walk the whole tree in resolver order. Override the
/// hooks you care about and call the matching `walk_*` function to keep
/// descending.
pub trait Visitor: Sized {
    fn visit_node(&mut self, node: &Node, depth: usize) {
        walk_node(self, node, depth);
    }

    fn visit_row(&mut self, row: &Row, index: usize, depth: usize) {
        let _ = index;
        walk_row(self, row, depth);
    }
}

pub fn walk_node<V: Visitor>(visitor: &mut V, node: &Node, depth: usize) {
    for tab in node.tabs() {
        visitor.visit_node(tab, depth + 1);
    }
    for (index, row) in node.rows().iter().enumerate() {
        visitor.visit_row(row, index, depth + 1);
    }
}

pub fn walk_row<V: Visitor>(visitor: &mut V, row: &Row, depth: usize) {
    for child in &row.contents {
        visitor.visit_node(child, depth);
    }
}

/// Call `f` on every node, root included, depth-first
pub fn for_each_node<F: FnMut(&Node)>(root: &Node, f: F) {
    struct Each<F>(F);

    impl<F: FnMut(&Node)> Visitor for Each<F> {
        fn visit_node(&mut self, node: &Node, depth: usize) {
            (self.0)(node);
            walk_node(self, node, depth);
        }
    }

    Each(f).visit_node(root, 0);
}

/// Number of nodes in the tree, root included
pub fn count_nodes(root: &Node) -> usize {
    let mut count = 0;
    for_each_node(root, |_| count += 1);
    count
}
