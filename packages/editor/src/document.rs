//! # Document Handle
//!
//! Caller-side state around the engine: the current root, a version counter
//! and the selected node.
//!
//! The engine itself keeps nothing between calls. `Document` feeds each
//! mutation the latest root, keeps the result, and clears the selection
//! when the selected node disappears.
//!
//! ```text
//! JSON → Document::from_json → apply(Mutation)* → to_json / to_export_json
//! ```

use crate::{EditorError, Mutation};
use formgrid_model::{
    assign_missing_ids, check, find, normalize, to_export_json, Node, NodeKind, NodeRef, Violation,
};
use std::sync::Arc;
use tracing::debug;

/// Editable layout document
#[derive(Debug, Clone)]
pub struct Document {
    root: NodeRef,

    /// Increments on each mutation that changed the tree
    version: u64,

    selected: Option<String>,
}

impl Document {
    /// Wrap a root, pruning empty rows and backfilling ids
    pub fn new(root: impl Into<NodeRef>) -> Self {
        Self {
            root: accept(&root.into()),
            version: 0,
            selected: None,
        }
    }

    /// Parse a document previously written by `to_json`.
    ///
    /// The root must be a form and the tree must respect the containment
    /// table. Missing ids and empty rows are repaired.
    pub fn from_json(text: &str) -> Result<Self, EditorError> {
        let root: Node = serde_json::from_str(text)?;
        if root.kind != NodeKind::Form {
            return Err(EditorError::NotAForm(root.kind));
        }

        let structural: Vec<String> = check(&root)
            .into_iter()
            .filter(|violation| {
                matches!(
                    violation,
                    Violation::Containment { .. }
                        | Violation::MissingContainer { .. }
                        | Violation::DuplicateId(_)
                )
            })
            .map(|violation| violation.to_string())
            .collect();
        if !structural.is_empty() {
            return Err(EditorError::InvalidStructure(structural.join("; ")));
        }

        Ok(Self::new(root))
    }

    /// Full document, ids included
    pub fn to_json(&self, pretty: bool) -> Result<String, EditorError> {
        let text = if pretty {
            serde_json::to_string_pretty(self.root.as_ref())?
        } else {
            serde_json::to_string(self.root.as_ref())?
        };
        Ok(text)
    }

    /// Export view with ids stripped
    pub fn to_export_json(&self, pretty: bool) -> Result<String, EditorError> {
        Ok(to_export_json(&self.root, pretty)?)
    }

    pub fn root(&self) -> &NodeRef {
        &self.root
    }

    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn find(&self, id: &str) -> Option<NodeRef> {
        find(&self.root, id)
    }

    pub fn selected(&self) -> Option<&str> {
        self.selected.as_deref()
    }

    pub fn selected_node(&self) -> Option<NodeRef> {
        self.selected.as_deref().and_then(|id| self.find(id))
    }

    /// Select a node by id, or clear with `None`. Unknown ids are ignored.
    pub fn select(&mut self, id: Option<&str>) -> bool {
        match id {
            Some(id) if self.find(id).is_none() => false,
            _ => {
                self.selected = id.map(str::to_string);
                true
            }
        }
    }

    /// Apply a mutation. Returns whether the tree changed.
    pub fn apply(&mut self, mutation: &Mutation) -> bool {
        let next = mutation.apply(&self.root);
        if Arc::ptr_eq(&next, &self.root) {
            debug!(op = mutation.name(), target = ?mutation.target_id(), "no-op");
            return false;
        }

        self.commit(next);
        if let Mutation::ReplaceNode { node } = mutation {
            let selected = if node.kind == NodeKind::Form {
                self.root.id()
            } else {
                node.id()
            };
            self.selected = selected.map(str::to_string);
        }
        debug!(op = mutation.name(), version = self.version, "applied");
        true
    }

    /// Commit an edited copy of a node and select it
    pub fn replace(&mut self, updated: Node) -> bool {
        self.apply(&Mutation::ReplaceNode { node: updated })
    }

    /// Accept a root from an external source (importer, reload)
    pub fn set_root(&mut self, root: impl Into<NodeRef>) {
        let root = accept(&root.into());
        self.commit(root);
    }

    fn commit(&mut self, root: NodeRef) {
        self.root = root;
        self.version += 1;
        if let Some(id) = &self.selected {
            if find(&self.root, id).is_none() {
                debug!(selected = %id, "selected node removed");
                self.selected = None;
            }
        }
    }
}

fn accept(root: &NodeRef) -> NodeRef {
    assign_missing_ids(&normalize(root))
}

#[cfg(test)]
mod tests {
    use super::*;
    use formgrid_model::Row;

    fn sample() -> Document {
        let field = Node::new(NodeKind::Field, "Email").with_id("f1").into_ref();
        let section = Node::new(NodeKind::Section, "Contact")
            .with_id("s1")
            .with_rows(vec![Row::single(field)]);
        let tab = Node::new(NodeKind::Tab, "Main")
            .with_id("t1")
            .with_rows(vec![Row::single(section.into_ref())]);
        Document::new(
            Node::new(NodeKind::Form, "Profile")
                .with_id("form")
                .with_tabs(vec![tab.into_ref()]),
        )
    }

    #[test]
    fn test_create_document() {
        let doc = sample();
        assert_eq!(doc.version(), 0);
        assert!(doc.selected().is_none());
        assert_eq!(doc.root().name, "Profile");
    }

    #[test]
    fn test_version_counts_only_changes() {
        let mut doc = sample();

        let noop = Mutation::DeleteNode {
            node_id: "missing".to_string(),
        };
        assert!(!doc.apply(&noop));
        assert_eq!(doc.version(), 0);

        let add = Mutation::AddChild {
            parent_id: "s1".to_string(),
            child_type: NodeKind::Field,
        };
        assert!(doc.apply(&add));
        assert_eq!(doc.version(), 1);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut doc = sample();
        assert!(doc.select(Some("f1")));
        assert_eq!(doc.selected_node().unwrap().name, "Email");

        doc.apply(&Mutation::DeleteNode {
            node_id: "s1".to_string(),
        });
        assert!(doc.selected().is_none());
    }

    #[test]
    fn test_select_unknown_is_ignored() {
        let mut doc = sample();
        assert!(!doc.select(Some("ghost")));
        assert!(doc.select(Some("t1")));
        assert!(doc.select(None));
        assert!(doc.selected().is_none());
    }

    #[test]
    fn test_replace_selects_node() {
        let mut doc = sample();
        let mut edited = Node::clone(&doc.find("f1").unwrap());
        edited.name = "Work Email".to_string();

        assert!(doc.replace(edited));
        assert_eq!(doc.selected(), Some("f1"));
        assert_eq!(doc.find("f1").unwrap().name, "Work Email");
    }

    #[test]
    fn test_json_round_trip() {
        let doc = sample();
        let text = doc.to_json(false).unwrap();
        let back = Document::from_json(&text).unwrap();
        assert_eq!(back.root(), doc.root());

        let exported = doc.to_export_json(true).unwrap();
        assert!(!exported.contains("\"id\""));
    }

    #[test]
    fn test_from_json_rejects_bad_roots() {
        let tab = r#"{"name":"T","type":"TAB","contents":{"rows":[]}}"#;
        assert!(matches!(
            Document::from_json(tab),
            Err(EditorError::NotAForm(NodeKind::Tab))
        ));

        let misplaced = r#"{"name":"F","type":"FORM","tabs":[
            {"name":"T","type":"TAB","contents":{"rows":[{"contents":[{"name":"x","type":"FIELD"}]}]}}
        ]}"#;
        assert!(matches!(
            Document::from_json(misplaced),
            Err(EditorError::InvalidStructure(_))
        ));

        assert!(matches!(Document::from_json("{"), Err(EditorError::Json(_))));
    }
}
