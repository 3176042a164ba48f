//! # Mutation Engine
//!
//! Structural edits on a layout tree. Every operation takes the current root
//! and returns the next one:
//!
//! - a changed operation rebuilds the path from the root to the edited
//!   node(s), prunes emptied rows and backfills ids;
//! - a no-op (stale id, containment violation, nothing to do) returns the
//!   input `Arc` itself, so `Arc::ptr_eq` tells callers nothing happened.
//!
//! Nothing is ever partially applied and there is no error path.
//!
//! ## Move precedence
//!
//! 1. Reparent: the target is a tab or section of a different kind that may
//!    hold the dragged node → append it there as a new row.
//! 2. Tab reorder: both are tabs of the same form → move within the list.
//! 3. Row reorder: both live in rows and the target's parent may hold the
//!    dragged node → give it its own row at the target's row index (one
//!    further when moving forward inside the same container).
//! 4. Anything else is a no-op.

use formgrid_model::{
    assign_missing_ids, check, collect_ids, find_path, for_each_node, locate, locate::is_descendant,
    normalize, rebuild_path, unused_id, Located, Location, Node, NodeKind, NodeRef, Violation,
};
use std::collections::HashSet;
use std::sync::Arc;
use tracing::debug;

/// Append a new `kind` node under `parent_id`.
///
/// Tabs go to the end of a form's tab list; everything else gets a fresh
/// singleton row at the end of the parent's rows.
pub fn add_child(root: &NodeRef, parent_id: &str, kind: NodeKind) -> NodeRef {
    let Some(path) = find_path(root, parent_id) else {
        debug!(parent_id, "add_child: parent not found");
        return Arc::clone(root);
    };

    let child_id = unused_id(root);
    let rebuilt = rebuild_path(root, &path, |parent| {
        if !parent.kind.can_contain(kind) {
            debug!(parent = %parent.kind, child = %kind, "add_child: containment rejected");
            return false;
        }
        let child = Node::placeholder(kind, child_id).into_ref();
        if parent.kind == NodeKind::Form {
            parent.tabs.get_or_insert_with(Vec::new).push(child);
        } else {
            parent.push_row(child);
        }
        true
    });

    finish("add_child", root, rebuilt)
}

/// Remove a node (and its subtree). An emptied row goes with it.
pub fn delete_node(root: &NodeRef, target_id: &str) -> NodeRef {
    let rebuilt = locate(root, target_id).and_then(|target| detach(root, &target));
    finish("delete_node", root, rebuilt)
}

/// Drop `active_id` onto `over_id`
pub fn move_node(root: &NodeRef, active_id: &str, over_id: &str) -> NodeRef {
    if active_id == over_id {
        return Arc::clone(root);
    }

    let (Some(active), Some(over)) = (locate(root, active_id), locate(root, over_id)) else {
        debug!(active_id, over_id, "move_node: node not found");
        return Arc::clone(root);
    };

    if is_descendant(&active.node, over_id) {
        debug!(active_id, over_id, "move_node: target is inside the dragged node");
        return Arc::clone(root);
    }

    let rebuilt = if reparents(&active.node, &over.node) {
        reparent(root, &active, &over)
    } else {
        match (active.location, over.location) {
            (Location::Tab { index: from }, Location::Tab { index: to })
                if active.shares_parent(&over) =>
            {
                reorder_tabs(root, &active.parent_path, from, to)
            }
            (
                Location::Row {
                    row_index: from_row,
                    ..
                },
                Location::Row {
                    row_index: to_row, ..
                },
            ) => {
                let target_row = if active.shares_parent(&over) && from_row < to_row {
                    to_row + 1
                } else {
                    to_row
                };
                move_to_row(root, &active, over_id, target_row)
            }
            _ => None,
        }
    };

    finish("move_node", root, rebuilt)
}

/// Append a node to the end of the row above it
pub fn merge_with_previous(root: &NodeRef, id: &str) -> NodeRef {
    let rebuilt = locate(root, id).and_then(|located| {
        let location = located.location;
        let row_index = location.row_index().filter(|row| *row > 0)?;

        rebuild_path(root, &located.parent_path, |parent| {
            let Some(node) = parent.take_child(location) else {
                return false;
            };
            match parent.container_mut().rows.get_mut(row_index - 1) {
                Some(previous) => {
                    previous.contents.push(node);
                    true
                }
                None => false,
            }
        })
    });

    finish("merge_with_previous", root, rebuilt)
}

/// Move a node out of a shared row into a new row right below it
pub fn split_to_own_row(root: &NodeRef, id: &str) -> NodeRef {
    let rebuilt = locate(root, id).and_then(|located| {
        let location = located.location;
        let row_index = location.row_index()?;

        rebuild_path(root, &located.parent_path, |parent| {
            let shared = parent
                .rows()
                .get(row_index)
                .is_some_and(|row| row.len() > 1);
            if !shared {
                return false;
            }
            let Some(node) = parent.take_child(location) else {
                return false;
            };
            parent.insert_row(row_index + 1, node);
            true
        })
    });

    finish("split_to_own_row", root, rebuilt)
}

/// Commit an edited copy of a node, matched by id.
///
/// A form replaces the whole document. Other nodes must keep an id present
/// in the tree and a kind their parent may hold. Either way the incoming
/// subtree must respect the containment table and may not reuse an id held
/// by a node it does not replace.
pub fn replace_node(root: &NodeRef, updated: impl Into<NodeRef>) -> NodeRef {
    let updated: NodeRef = updated.into();

    if !well_formed(&updated) {
        debug!(node_id = ?updated.id(), "replace_node: malformed subtree");
        return Arc::clone(root);
    }

    if updated.kind == NodeKind::Form {
        if reuses_ids(&updated, &HashSet::new()) {
            debug!(node_id = ?updated.id(), "replace_node: repeated ids in new root");
            return Arc::clone(root);
        }
        debug!(node_id = ?updated.id(), "replace_node: new root");
        return assign_missing_ids(&normalize(&updated));
    }

    let rebuilt = updated
        .id()
        .and_then(|id| locate(root, id))
        .and_then(|located| {
            // Ids of everything outside the replaced subtree
            let mut outside = collect_ids(root);
            for id in collect_ids(&located.node) {
                outside.remove(&id);
            }
            if reuses_ids(&updated, &outside) {
                debug!(node_id = ?updated.id(), "replace_node: id already used elsewhere");
                return None;
            }

            rebuild_path(root, &located.parent_path, |parent| {
                parent.kind.can_contain(updated.kind)
                    && parent.set_child(located.location, Arc::clone(&updated))
            })
        });

    finish("replace_node", root, rebuilt)
}

fn finish(operation: &'static str, root: &NodeRef, rebuilt: Option<NodeRef>) -> NodeRef {
    match rebuilt {
        Some(next) => {
            debug!(operation, "mutation applied");
            assign_missing_ids(&normalize(&next))
        }
        None => {
            debug!(operation, "mutation skipped");
            Arc::clone(root)
        }
    }
}

/// Containment and containers hold throughout `node`. Missing ids and
/// empty rows are repaired after the edit, so they do not count.
fn well_formed(node: &Node) -> bool {
    check(node).iter().all(|violation| {
        matches!(
            violation,
            Violation::MissingId { .. } | Violation::EmptyRow { .. } | Violation::DuplicateId(_)
        )
    })
}

/// Does `node` repeat an id within itself or take one from `taken`?
fn reuses_ids(node: &Node, taken: &HashSet<String>) -> bool {
    let mut seen = HashSet::new();
    let mut clash = false;
    for_each_node(node, |n| {
        if let Some(id) = n.id() {
            clash |= taken.contains(id) || !seen.insert(id.to_string());
        }
    });
    clash
}

/// Does dropping `active` onto `over` move it inside `over`?
fn reparents(active: &Node, over: &Node) -> bool {
    over.kind.is_drop_target() && active.kind != over.kind && over.kind.can_contain(active.kind)
}

/// Take a node out of its slot. The emptied row, if any, stays until the
/// tree is normalized, so row indices computed beforehand remain valid.
fn detach(root: &NodeRef, target: &Located) -> Option<NodeRef> {
    rebuild_path(root, &target.parent_path, |parent| {
        parent.take_child(target.location).is_some()
    })
}

fn reparent(root: &NodeRef, active: &Located, over: &Located) -> Option<NodeRef> {
    // Already the last row of the target on its own: nothing would change.
    if active.parent_path == over.path() {
        if let Location::Row { row_index, .. } = active.location {
            let rows = over.node.rows();
            if row_index + 1 == rows.len() && rows[row_index].len() == 1 {
                return None;
            }
        }
    }

    let over_id = over.node.id()?;
    let detached = detach(root, active)?;
    let over_path = find_path(&detached, over_id)?;
    rebuild_path(&detached, &over_path, |target| {
        target.push_row(Arc::clone(&active.node));
        true
    })
}

fn reorder_tabs(root: &NodeRef, form_path: &[Location], from: usize, to: usize) -> Option<NodeRef> {
    rebuild_path(root, form_path, |form| {
        let Some(tabs) = form.tabs.as_mut() else {
            return false;
        };
        if from >= tabs.len() || to >= tabs.len() {
            return false;
        }
        let moved = tabs.remove(from);
        tabs.insert(to, moved);
        true
    })
}

fn move_to_row(root: &NodeRef, active: &Located, over_id: &str, target_row: usize) -> Option<NodeRef> {
    let detached = detach(root, active)?;
    let over = locate(&detached, over_id)?;
    rebuild_path(&detached, &over.parent_path, |parent| {
        if !parent.kind.can_contain(active.node.kind) {
            debug!(parent = %parent.kind, child = %active.node.kind, "move_node: containment rejected");
            return false;
        }
        parent.insert_row(target_row, Arc::clone(&active.node));
        true
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgrid_model::Row;

    fn field(id: &str) -> NodeRef {
        Node::new(NodeKind::Field, id).with_id(id).into_ref()
    }

    fn section(id: &str, rows: Vec<Row>) -> NodeRef {
        Node::new(NodeKind::Section, id).with_id(id).with_rows(rows).into_ref()
    }

    fn form_with_section(rows: Vec<Row>) -> NodeRef {
        let tab = Node::new(NodeKind::Tab, "t1")
            .with_id("t1")
            .with_rows(vec![Row::single(section("s1", rows))]);
        Node::new(NodeKind::Form, "form")
            .with_id("form")
            .with_tabs(vec![tab.into_ref()])
            .into_ref()
    }

    fn section_rows(root: &NodeRef) -> Vec<Vec<String>> {
        root.tabs()[0].rows()[0].contents[0]
            .rows()
            .iter()
            .map(|row| row.contents.iter().map(|n| n.name.clone()).collect())
            .collect()
    }

    #[test]
    fn test_add_tab_to_form() {
        let root = form_with_section(vec![]);
        let next = add_child(&root, "form", NodeKind::Tab);

        assert_eq!(next.tabs().len(), 2);
        let tab = &next.tabs()[1];
        assert_eq!(tab.name, "New TAB");
        assert!(tab.id().is_some());
        assert!(tab.rows().is_empty());
    }

    #[test]
    fn test_add_rejects_containment_violation() {
        let root = form_with_section(vec![]);
        let next = add_child(&root, "form", NodeKind::Section);
        assert!(Arc::ptr_eq(&root, &next));

        let next = add_child(&root, "t1", NodeKind::Field);
        assert!(Arc::ptr_eq(&root, &next));
    }

    #[test]
    fn test_add_always_opens_new_row() {
        let root = form_with_section(vec![Row::new(vec![field("a"), field("b")])]);
        let next = add_child(&root, "s1", NodeKind::Field);

        let rows = section_rows(&next);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1], vec!["New FIELD".to_string()]);
    }

    #[test]
    fn test_add_creates_missing_container() {
        let subform = Node::new(NodeKind::Subform, "sub").with_id("sub").into_ref();
        let root = form_with_section(vec![Row::single(subform)]);
        let next = add_child(&root, "sub", NodeKind::Field);

        let sub = formgrid_model::find(&next, "sub").unwrap();
        assert_eq!(sub.rows().len(), 1);
        assert_eq!(sub.rows()[0].contents[0].kind, NodeKind::Field);
    }

    #[test]
    fn test_delete_keeps_row_with_siblings() {
        let root = form_with_section(vec![Row::new(vec![field("a"), field("b")])]);
        let next = delete_node(&root, "a");
        assert_eq!(section_rows(&next), vec![vec!["b".to_string()]]);
    }

    #[test]
    fn test_delete_tab() {
        let root = form_with_section(vec![]);
        let next = delete_node(&root, "t1");
        assert!(next.tabs().is_empty());
    }

    #[test]
    fn test_delete_root_is_noop() {
        let root = form_with_section(vec![]);
        assert!(Arc::ptr_eq(&root, &delete_node(&root, "form")));
    }

    #[test]
    fn test_move_backward_within_container() {
        let root = form_with_section(vec![
            Row::single(field("a")),
            Row::single(field("b")),
            Row::single(field("c")),
        ]);
        let next = move_node(&root, "c", "a");
        assert_eq!(
            section_rows(&next),
            vec![vec!["c".to_string()], vec!["a".to_string()], vec!["b".to_string()]]
        );
    }

    #[test]
    fn test_move_out_of_shared_row() {
        let root = form_with_section(vec![Row::new(vec![field("a"), field("x")]), Row::single(field("b"))]);
        let next = move_node(&root, "a", "b");
        assert_eq!(
            section_rows(&next),
            vec![vec!["x".to_string()], vec!["b".to_string()], vec!["a".to_string()]]
        );
    }

    #[test]
    fn test_move_onto_own_descendant_is_noop() {
        let inner = section("inner", vec![Row::single(field("deep"))]);
        let root = form_with_section(vec![Row::single(inner), Row::single(field("b"))]);

        assert!(Arc::ptr_eq(&root, &move_node(&root, "s1", "deep")));
        assert!(Arc::ptr_eq(&root, &move_node(&root, "s1", "inner")));
    }

    #[test]
    fn test_reorder_into_incompatible_parent_is_noop() {
        let subform = Node::new(NodeKind::Subform, "sub")
            .with_id("sub")
            .with_rows(vec![Row::single(field("inside"))])
            .into_ref();
        let other = Node::new(NodeKind::Subform, "other")
            .with_id("other")
            .with_rows(vec![])
            .into_ref();
        let root = form_with_section(vec![Row::single(subform), Row::single(other)]);

        assert!(Arc::ptr_eq(&root, &move_node(&root, "other", "inside")));
    }

    #[test]
    fn test_move_tab_onto_row_item_is_noop() {
        let root = form_with_section(vec![Row::single(field("a"))]);
        assert!(Arc::ptr_eq(&root, &move_node(&root, "t1", "a")));
    }

    #[test]
    fn test_reparent_field_into_section() {
        let target = section("target", vec![]);
        let root = form_with_section(vec![Row::single(field("a")), Row::single(target)]);
        let next = move_node(&root, "a", "target");

        let rows = section_rows(&next);
        assert_eq!(rows, vec![vec!["target".to_string()]]);
        let target = formgrid_model::find(&next, "target").unwrap();
        assert_eq!(target.rows()[0].contents[0].name, "a");
    }

    #[test]
    fn test_reparent_onto_current_parent_when_already_last() {
        let root = form_with_section(vec![]);
        assert!(Arc::ptr_eq(&root, &move_node(&root, "s1", "t1")));
    }

    #[test]
    fn test_merge_first_row_is_noop() {
        let root = form_with_section(vec![Row::single(field("a")), Row::single(field("b"))]);
        assert!(Arc::ptr_eq(&root, &merge_with_previous(&root, "a")));
    }

    #[test]
    fn test_merge_from_shared_row_keeps_rest() {
        let root = form_with_section(vec![Row::single(field("a")), Row::new(vec![field("b"), field("c")])]);
        let next = merge_with_previous(&root, "c");
        assert_eq!(
            section_rows(&next),
            vec![vec!["a".to_string(), "c".to_string()], vec!["b".to_string()]]
        );
    }

    #[test]
    fn test_merge_tab_is_noop() {
        let root = form_with_section(vec![]);
        assert!(Arc::ptr_eq(&root, &merge_with_previous(&root, "t1")));
    }

    #[test]
    fn test_split_single_item_is_noop() {
        let root = form_with_section(vec![Row::single(field("a"))]);
        assert!(Arc::ptr_eq(&root, &split_to_own_row(&root, "a")));
    }

    #[test]
    fn test_split_inserts_directly_below() {
        let root = form_with_section(vec![
            Row::new(vec![field("a"), field("b"), field("c")]),
            Row::single(field("d")),
        ]);
        let next = split_to_own_row(&root, "a");
        assert_eq!(
            section_rows(&next),
            vec![
                vec!["b".to_string(), "c".to_string()],
                vec!["a".to_string()],
                vec!["d".to_string()],
            ]
        );
    }

    #[test]
    fn test_replace_updates_properties() {
        let root = form_with_section(vec![Row::single(field("a"))]);
        let edited = Node::new(NodeKind::Field, "Renamed")
            .with_id("a")
            .with_width(6)
            .with_prop("readonly", true);

        let next = replace_node(&root, edited);
        let node = formgrid_model::find(&next, "a").unwrap();
        assert_eq!(node.name, "Renamed");
        assert_eq!(node.width, Some(6));
    }

    #[test]
    fn test_replace_rejects_unknown_or_invalid() {
        let root = form_with_section(vec![Row::single(field("a"))]);

        let stale = Node::new(NodeKind::Field, "x").with_id("gone");
        assert!(Arc::ptr_eq(&root, &replace_node(&root, stale)));

        let bad_kind = Node::new(NodeKind::Tab, "x").with_id("a");
        assert!(Arc::ptr_eq(&root, &replace_node(&root, bad_kind)));

        let anonymous = Node::new(NodeKind::Field, "x");
        assert!(Arc::ptr_eq(&root, &replace_node(&root, anonymous)));
    }

    #[test]
    fn test_replace_form_swaps_root() {
        let root = form_with_section(vec![]);
        let fresh = Node::new(NodeKind::Form, "Other").with_tabs(vec![Node::new(NodeKind::Tab, "t")
            .with_rows(vec![])
            .into_ref()]);

        let next = replace_node(&root, fresh);
        assert_eq!(next.name, "Other");
        assert!(next.id().is_some());
        assert!(next.tabs()[0].id().is_some());
    }

    #[test]
    fn test_replace_rejects_ids_used_elsewhere() {
        let s2 = section("s2", vec![Row::single(field("f2"))]);
        let tab = Node::new(NodeKind::Tab, "t1").with_id("t1").with_rows(vec![
            Row::single(section("s1", vec![Row::single(field("f1"))])),
            Row::single(s2),
        ]);
        let root = Node::new(NodeKind::Form, "form")
            .with_id("form")
            .with_tabs(vec![tab.into_ref()])
            .into_ref();

        // s1 edited to hold a copy of f2, which still lives under s2
        let stolen = Node::new(NodeKind::Section, "s1")
            .with_id("s1")
            .with_rows(vec![Row::single(field("f1")), Row::single(field("f2"))]);
        assert!(Arc::ptr_eq(&root, &replace_node(&root, stolen)));

        // Repeating an id inside the new subtree is rejected too
        let doubled = Node::new(NodeKind::Section, "s1")
            .with_id("s1")
            .with_rows(vec![Row::single(field("f1")), Row::single(field("f1"))]);
        assert!(Arc::ptr_eq(&root, &replace_node(&root, doubled)));

        // Keeping its own descendants and adding new ones is fine
        let grown = Node::new(NodeKind::Section, "s1")
            .with_id("s1")
            .with_rows(vec![Row::single(field("f1")), Row::single(field("f3"))]);
        let next = replace_node(&root, grown);
        assert!(!Arc::ptr_eq(&root, &next));
        assert!(formgrid_model::check(&next).is_empty());
    }

    #[test]
    fn test_replace_rejects_broken_containment() {
        let root = form_with_section(vec![Row::single(field("a"))]);
        let nested_tab = Node::new(NodeKind::Section, "s1").with_id("s1").with_rows(vec![
            Row::single(Node::new(NodeKind::Tab, "inner").with_rows(vec![]).into_ref()),
        ]);

        assert!(Arc::ptr_eq(&root, &replace_node(&root, nested_tab)));
    }

    #[test]
    fn test_replace_form_with_repeated_ids_is_noop() {
        let root = form_with_section(vec![]);
        let tab = |id: &str| Node::new(NodeKind::Tab, id).with_id("dup").with_rows(vec![]).into_ref();
        let fresh = Node::new(NodeKind::Form, "Other").with_tabs(vec![tab("a"), tab("b")]);

        assert!(Arc::ptr_eq(&root, &replace_node(&root, fresh)));
    }
}
