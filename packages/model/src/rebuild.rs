//! Persistent path rebuild shared by every mutating operation.
//!
//! Editing a node deep in the tree produces a new copy of that node and of
//! each ancestor up to the root. Every other subtree keeps its `Arc`, so a
//! consumer can skip work for any handle that is pointer-equal to the one it
//! saw last time.

use crate::locate::Location;
use crate::node::{Node, NodeRef};
use std::sync::Arc;

/// Apply `edit` to the node at `path` and rebuild its ancestors.
///
/// `edit` receives a private copy of the target node and returns `false` to
/// abandon the change; `None` is returned then, as it is when `path` does
/// not resolve.
pub fn rebuild_path<F>(root: &NodeRef, path: &[Location], edit: F) -> Option<NodeRef>
where
    F: FnOnce(&mut Node) -> bool,
{
    match path.split_first() {
        None => {
            let mut target = Node::clone(root);
            edit(&mut target).then(|| Arc::new(target))
        }
        Some((location, rest)) => {
            let child = root.child(*location)?;
            let rebuilt = rebuild_path(child, rest, edit)?;
            Some(replace_child(root, *location, rebuilt))
        }
    }
}

/// Copy of `parent` with one slot pointing at `child`
pub fn replace_child(parent: &Node, location: Location, child: NodeRef) -> NodeRef {
    let mut next = parent.clone();
    next.set_child(location, child);
    Arc::new(next)
}
