//! Checks for the tree invariants: containment, no empty rows, unique ids.

use crate::node::{Node, NodeKind};
use std::collections::HashSet;
use std::fmt;

/// A broken invariant found in a tree
#[derive(Debug, Clone, PartialEq)]
pub enum Violation {
    /// `parent` holds a child its kind may not contain
    Containment {
        parent: NodeKind,
        child: NodeKind,
        child_name: String,
    },

    /// Container of `owner` has an empty row at `row_index`
    EmptyRow { owner: String, row_index: usize },

    /// Tab, section or subform without a row container
    MissingContainer { kind: NodeKind, name: String },

    MissingId { kind: NodeKind, name: String },

    DuplicateId(String),
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::Containment {
                parent,
                child,
                child_name,
            } => write!(f, "{} cannot contain {} '{}'", parent, child, child_name),
            Violation::EmptyRow { owner, row_index } => {
                write!(f, "'{}' has an empty row at index {}", owner, row_index)
            }
            Violation::MissingContainer { kind, name } => {
                write!(f, "{} '{}' has no row container", kind, name)
            }
            Violation::MissingId { kind, name } => write!(f, "{} '{}' has no id", kind, name),
            Violation::DuplicateId(id) => write!(f, "id '{}' is used more than once", id),
        }
    }
}

/// Collect every invariant violation in the tree
pub fn check(root: &Node) -> Vec<Violation> {
    let mut violations = Vec::new();
    let mut seen = HashSet::new();
    check_node(root, &mut seen, &mut violations);
    violations
}

pub fn is_valid(root: &Node) -> bool {
    check(root).is_empty()
}

fn check_node(node: &Node, seen: &mut HashSet<String>, violations: &mut Vec<Violation>) {
    match node.id() {
        Some(id) => {
            if !seen.insert(id.to_string()) {
                violations.push(Violation::DuplicateId(id.to_string()));
            }
        }
        None => violations.push(Violation::MissingId {
            kind: node.kind,
            name: node.name.clone(),
        }),
    }

    if node.kind.has_container() && node.container.is_none() {
        violations.push(Violation::MissingContainer {
            kind: node.kind,
            name: node.name.clone(),
        });
    }

    for (row_index, row) in node.rows().iter().enumerate() {
        if row.is_empty() {
            violations.push(Violation::EmptyRow {
                owner: node.name.clone(),
                row_index,
            });
        }
    }

    for child in node.children() {
        if !node.kind.can_contain(child.kind) {
            violations.push(Violation::Containment {
                parent: node.kind,
                child: child.kind,
                child_name: child.name.clone(),
            });
        }
        check_node(child, seen, violations);
    }
}
