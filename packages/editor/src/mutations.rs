//! # Layout Mutations
//!
//! Serializable form of the engine operations, used by scripts and by the
//! `Document` holder.
//!
//! ```json
//! [
//!   { "op": "addChild", "parentId": "t1", "childType": "SECTION" },
//!   { "op": "moveNode", "activeId": "f1", "overId": "s2" },
//!   { "op": "splitToOwnRow", "nodeId": "f3" }
//! ]
//! ```
//!
//! ## Semantics
//!
//! ### Stale ids
//! - A mutation naming an id that no longer exists is a no-op
//! - UI events can race deletions, so this is not an error
//!
//! ### Containment
//! - Requests that would break the containment table are no-ops
//!
//! ### Rows
//! - Added and moved nodes always land in a row of their own
//! - Rows emptied by a mutation disappear in the same step

use crate::engine;
use formgrid_model::{Node, NodeKind, NodeRef};
use serde::{Deserialize, Serialize};

/// Structural edit on a layout document
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "camelCase")]
pub enum Mutation {
    /// Append a new node of `child_type` under `parent_id`
    #[serde(rename_all = "camelCase")]
    AddChild {
        parent_id: String,
        child_type: NodeKind,
    },

    /// Remove a node and its subtree
    #[serde(rename_all = "camelCase")]
    DeleteNode { node_id: String },

    /// Drop `active_id` onto `over_id` (reparent or reorder)
    #[serde(rename_all = "camelCase")]
    MoveNode { active_id: String, over_id: String },

    /// Join a node onto the end of the row above
    #[serde(rename_all = "camelCase")]
    MergeWithPrevious { node_id: String },

    /// Give a node its own row right below its current one
    #[serde(rename_all = "camelCase")]
    SplitToOwnRow { node_id: String },

    /// Commit property edits of a node, matched by id
    ReplaceNode { node: Node },
}

impl Mutation {
    /// Apply to `root`. A no-op returns `root` itself (same `Arc`).
    pub fn apply(&self, root: &NodeRef) -> NodeRef {
        match self {
            Mutation::AddChild {
                parent_id,
                child_type,
            } => engine::add_child(root, parent_id, *child_type),

            Mutation::DeleteNode { node_id } => engine::delete_node(root, node_id),

            Mutation::MoveNode { active_id, over_id } => {
                engine::move_node(root, active_id, over_id)
            }

            Mutation::MergeWithPrevious { node_id } => engine::merge_with_previous(root, node_id),

            Mutation::SplitToOwnRow { node_id } => engine::split_to_own_row(root, node_id),

            Mutation::ReplaceNode { node } => engine::replace_node(root, node.clone()),
        }
    }

    /// Debug name of this mutation
    pub fn name(&self) -> &'static str {
        match self {
            Mutation::AddChild { .. } => "addChild",
            Mutation::DeleteNode { .. } => "deleteNode",
            Mutation::MoveNode { .. } => "moveNode",
            Mutation::MergeWithPrevious { .. } => "mergeWithPrevious",
            Mutation::SplitToOwnRow { .. } => "splitToOwnRow",
            Mutation::ReplaceNode { .. } => "replaceNode",
        }
    }

    /// Id of the node this mutation acts on
    pub fn target_id(&self) -> Option<&str> {
        match self {
            Mutation::AddChild { parent_id, .. } => Some(parent_id),
            Mutation::DeleteNode { node_id }
            | Mutation::MergeWithPrevious { node_id }
            | Mutation::SplitToOwnRow { node_id } => Some(node_id),
            Mutation::MoveNode { active_id, .. } => Some(active_id),
            Mutation::ReplaceNode { node } => node.id(),
        }
    }
}
