//! # Formgrid Editor
//!
//! Structural editing engine for form layouts.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ import: JSON / spreadsheet → Form tree      │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: mutations on the tree               │
//! │  - add / delete / move / merge / split      │
//! │  - replace (property edits)                 │
//! │  - persistent rebuild, shared subtrees      │
//! │  - empty-row pruning, id backfill           │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ renderer (external): consumes each new root │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **New root per change**: nodes are never edited in place
//! 2. **Shared subtrees**: untouched subtrees keep their `Arc`
//! 3. **No partial edits**: an operation fully applies or returns the input root
//! 4. **Stale ids are fine**: unknown ids are no-ops, not errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use formgrid_editor::{add_child, move_node, Document, Mutation};
//! use formgrid_model::NodeKind;
//!
//! // Engine functions
//! let root = add_child(&root, "tab-1", NodeKind::Section);
//! let root = move_node(&root, "field-3", "section-2");
//!
//! // Or through a document that tracks version and selection
//! let mut doc = Document::from_json(&text)?;
//! doc.apply(&Mutation::SplitToOwnRow { node_id: "field-3".to_string() });
//! println!("{}", doc.to_export_json(true)?);
//! ```

mod document;
mod engine;
mod errors;
mod mutations;

pub use document::Document;
pub use engine::{
    add_child, delete_node, merge_with_previous, move_node, replace_node, split_to_own_row,
};
pub use errors::EditorError;
pub use mutations::Mutation;

// Re-export the model entry points callers need alongside the engine
pub use formgrid_model::{assign_missing_ids, normalize, Node, NodeKind, NodeRef};
