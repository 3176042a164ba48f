//! Row normalizer: drops every empty row in the tree.

use crate::node::{Node, NodeRef, Row};
use std::sync::Arc;

/// Remove empty rows from every container. Returns `root` itself (same
/// `Arc`) when there is nothing to prune; otherwise only the ancestors of
/// pruned containers are rebuilt.
pub fn normalize(root: &NodeRef) -> NodeRef {
    prune(root).unwrap_or_else(|| Arc::clone(root))
}

/// Does any container in the tree hold an empty row?
pub fn has_empty_rows(node: &Node) -> bool {
    node.rows().iter().any(Row::is_empty) || node.children().any(|child| has_empty_rows(child))
}

fn prune(node: &Node) -> Option<NodeRef> {
    let mut changed = false;

    let tabs = node.tabs.as_ref().map(|tabs| {
        let mut next = Vec::with_capacity(tabs.len());
        for tab in tabs {
            match prune(tab) {
                Some(pruned) => {
                    changed = true;
                    next.push(pruned);
                }
                None => next.push(Arc::clone(tab)),
            }
        }
        next
    });

    let container = node.container.as_ref().map(|container| {
        let mut rows = Vec::with_capacity(container.rows.len());
        for row in &container.rows {
            if row.is_empty() {
                changed = true;
                continue;
            }
            let mut contents = Vec::with_capacity(row.contents.len());
            for child in &row.contents {
                match prune(child) {
                    Some(pruned) => {
                        changed = true;
                        contents.push(pruned);
                    }
                    None => contents.push(Arc::clone(child)),
                }
            }
            rows.push(Row::new(contents));
        }
        container.with_rows_from(rows)
    });

    changed.then(|| Arc::new(node.with_children(tabs, container)))
}
