//! # Formgrid Model
//!
//! Layout document tree and the read-side machinery every editor operation
//! builds on.
//!
//! ```text
//! Form
//!  └─ tabs: [Tab]
//!          └─ contents.rows: [Row { contents: [Section] }]
//!                                      └─ contents.rows: [Row { contents: [Field | Subform | Section] }]
//! ```
//!
//! - `node`: the tree types and the containment table
//! - `ids`: backfills missing node ids
//! - `locate`: finds the slot (and path) holding a node
//! - `rebuild`: persistent path rebuild shared by all mutations
//! - `normalize`: prunes empty rows
//! - `export`: id-stripped JSON view
//! - `invariants`: tree checks used by importers, tools and tests

pub mod export;
pub mod ids;
pub mod invariants;
pub mod locate;
pub mod node;
pub mod normalize;
pub mod rebuild;
pub mod visit;

pub use export::{strip_ids, to_export_json, to_export_value};
pub use ids::{
    assign_missing_ids, assign_missing_ids_with, collect_ids, new_id, unused_id, IdGenerator,
};
pub use invariants::{check, is_valid, Violation};
pub use locate::{find, find_path, locate, Located, Location, NodePath};
pub use node::{Container, Node, NodeKind, NodeRef, PropValue, Props, Row, FULL_WIDTH};
pub use normalize::normalize;
pub use rebuild::rebuild_path;
pub use visit::{for_each_node, Visitor};
