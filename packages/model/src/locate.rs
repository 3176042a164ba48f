//! # Location Resolver
//!
//! Finds the slot holding a node. Nodes keep no reference to their parent,
//! so a lookup reports the full path of slots from the root down.
//!
//! Search order is depth-first: a form's tabs are checked before descending
//! into any tab, rows in order, and each child's own rows are searched
//! before its next sibling.

use crate::node::{Node, NodeRef};
use std::sync::Arc;

/// Slot a node occupies inside its parent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Location {
    /// `index`-th entry of a form's tabs
    Tab { index: usize },

    /// `slot_index`-th entry of the `row_index`-th row of the parent's container
    Row { row_index: usize, slot_index: usize },
}

impl Location {
    pub fn row_index(&self) -> Option<usize> {
        match self {
            Location::Row { row_index, .. } => Some(*row_index),
            Location::Tab { .. } => None,
        }
    }
}

/// Slots to follow from the root to reach a node (empty for the root itself)
pub type NodePath = Vec<Location>;

/// Result of a successful lookup
#[derive(Debug, Clone)]
pub struct Located {
    /// Path from the root to the parent
    pub parent_path: NodePath,

    /// Slot inside the parent
    pub location: Location,

    pub node: NodeRef,
}

impl Located {
    /// Path from the root to the node itself
    pub fn path(&self) -> NodePath {
        let mut path = self.parent_path.clone();
        path.push(self.location);
        path
    }

    /// Do both lookups sit in the same parent?
    pub fn shares_parent(&self, other: &Located) -> bool {
        self.parent_path == other.parent_path
    }
}

/// Locate the node carrying `id`. The root has no slot and is never returned.
pub fn locate(root: &NodeRef, id: &str) -> Option<Located> {
    let mut path = NodePath::new();
    search(root, id, &mut path)
}

fn search(node: &Node, id: &str, path: &mut NodePath) -> Option<Located> {
    if let Some(tabs) = &node.tabs {
        if let Some(index) = tabs.iter().position(|tab| tab.has_id(id)) {
            return Some(Located {
                parent_path: path.clone(),
                location: Location::Tab { index },
                node: Arc::clone(&tabs[index]),
            });
        }

        for (index, tab) in tabs.iter().enumerate() {
            path.push(Location::Tab { index });
            if let Some(found) = search(tab, id, path) {
                return Some(found);
            }
            path.pop();
        }
    }

    if let Some(container) = &node.container {
        for (row_index, row) in container.rows.iter().enumerate() {
            if let Some(slot_index) = row.contents.iter().position(|child| child.has_id(id)) {
                return Some(Located {
                    parent_path: path.clone(),
                    location: Location::Row {
                        row_index,
                        slot_index,
                    },
                    node: Arc::clone(&row.contents[slot_index]),
                });
            }

            for (slot_index, child) in row.contents.iter().enumerate() {
                path.push(Location::Row {
                    row_index,
                    slot_index,
                });
                if let Some(found) = search(child, id, path) {
                    return Some(found);
                }
                path.pop();
            }
        }
    }

    None
}

/// Path to the node carrying `id`, including the root itself
pub fn find_path(root: &NodeRef, id: &str) -> Option<NodePath> {
    if root.has_id(id) {
        return Some(NodePath::new());
    }
    locate(root, id).map(|located| located.path())
}

/// Node carrying `id`, including the root itself
pub fn find(root: &NodeRef, id: &str) -> Option<NodeRef> {
    if root.has_id(id) {
        return Some(Arc::clone(root));
    }
    locate(root, id).map(|located| located.node)
}

pub fn contains(root: &NodeRef, id: &str) -> bool {
    find(root, id).is_some()
}

/// Follow `path` down from `root`
pub fn node_at<'a>(root: &'a NodeRef, path: &[Location]) -> Option<&'a NodeRef> {
    path.iter()
        .try_fold(root, |node, location| node.child(*location))
}

/// Is `id` held somewhere below `ancestor` (not counting `ancestor` itself)?
pub fn is_descendant(ancestor: &Node, id: &str) -> bool {
    ancestor
        .children()
        .any(|child| child.has_id(id) || is_descendant(child, id))
}
