//! # JSON Layout Import
//!
//! Turns loosely-shaped layout JSON into a tree the editor can trust.
//!
//! Lenient about content, strict about shape:
//! - unknown or missing `type` becomes `FIELD`
//! - blank names get a positional fallback
//! - non-numeric `width`/`offset` are dropped
//! - nested objects or arrays in open properties are dropped
//! - a row without a `contents` array is an error
//!
//! The result also satisfies the tree invariants: containers exist where
//! required, empty rows are pruned and children the containment table
//! rejects are left out. Ids present in the input are kept unless an earlier
//! node already took them; missing and dropped ids are assigned later, when
//! the tree is handed to the editor.

use crate::error::{ImportError, ImportResult};
use formgrid_model::{Container, Node, NodeKind, PropValue, Props, Row};
use serde_json::{Map, Value};
use std::collections::HashSet;
use tracing::{debug, warn};

pub const DEFAULT_FORM_NAME: &str = "IMPORTED_FORM";

const NODE_KEYS: [&str; 7] = ["id", "name", "type", "width", "offset", "contents", "tabs"];
const CONTAINER_KEYS: [&str; 3] = ["width", "cellWidth", "rows"];

/// Parse and normalize layout JSON text
pub fn parse_form_str(text: &str) -> ImportResult<Node> {
    let value: Value = serde_json::from_str(text)?;
    parse_form(&value)
}

/// Normalize an already parsed JSON document. The root must be a `FORM`.
pub fn parse_form(raw: &Value) -> ImportResult<Node> {
    let record = raw.as_object().ok_or(ImportError::NotAnObject)?;
    if record.get("type").and_then(Value::as_str) != Some("FORM") {
        return Err(ImportError::RootNotForm);
    }

    let mut seen_ids = HashSet::new();
    let mut form = base_node(record, NodeKind::Form, DEFAULT_FORM_NAME, &mut seen_ids);

    let mut tabs = Vec::new();
    if let Some(raw_tabs) = record.get("tabs").and_then(Value::as_array) {
        for (index, raw_tab) in raw_tabs.iter().enumerate() {
            let path = format!("tabs[{}]", index);
            let fallback = format!("Imported Tab {}", index + 1);
            let tab = normalize_node(raw_tab, &fallback, &path, &mut seen_ids)?;
            if tab.kind != NodeKind::Tab {
                warn!(name = %tab.name, kind = %tab.kind, "dropping non-tab entry of form tabs");
                continue;
            }
            tabs.push(tab.into_ref());
        }
    }
    form.tabs = Some(tabs);

    debug!(form = %form.name, tabs = form.tabs().len(), "JSON layout normalized");
    Ok(form)
}

fn normalize_node(
    raw: &Value,
    fallback_name: &str,
    path: &str,
    seen_ids: &mut HashSet<String>,
) -> ImportResult<Node> {
    let record = raw.as_object().ok_or_else(|| ImportError::NodeNotObject {
        path: path.to_string(),
    })?;

    let kind = record
        .get("type")
        .and_then(Value::as_str)
        .and_then(NodeKind::from_name)
        .unwrap_or(NodeKind::Field);

    let mut node = base_node(record, kind, fallback_name, seen_ids);

    if let Some(contents) = record.get("contents").and_then(Value::as_object) {
        if let Some(rows) = contents.get("rows").and_then(Value::as_array) {
            node.container = Some(normalize_container(&node, contents, rows, path, seen_ids)?);
        }
    }

    if kind.has_container() && node.container.is_none() {
        node.container = Some(Container::empty());
    } else if !kind.has_container() && node.container.take().is_some_and(|c| !c.rows.is_empty()) {
        warn!(name = %node.name, kind = %kind, "dropping rows of a node that cannot hold children");
    }

    Ok(node)
}

fn normalize_container(
    owner: &Node,
    contents: &Map<String, Value>,
    rows: &[Value],
    path: &str,
    seen_ids: &mut HashSet<String>,
) -> ImportResult<Container> {
    let mut normalized = Vec::with_capacity(rows.len());

    for (row_index, row) in rows.iter().enumerate() {
        let children = row
            .as_object()
            .and_then(|row| row.get("contents"))
            .and_then(Value::as_array)
            .ok_or_else(|| ImportError::RowMissingContents {
                owner: owner.name.clone(),
                row: row_index + 1,
            })?;

        let mut kept = Vec::with_capacity(children.len());
        for (child_index, child) in children.iter().enumerate() {
            let child_path = format!("{}.rows[{}][{}]", path, row_index, child_index);
            let fallback = format!("Unnamed Node {}.{}", row_index + 1, child_index + 1);
            let child = normalize_node(child, &fallback, &child_path, seen_ids)?;

            if !owner.kind.can_contain(child.kind) {
                warn!(
                    parent = %owner.name,
                    parent_kind = %owner.kind,
                    child = %child.name,
                    child_kind = %child.kind,
                    "dropping child the parent cannot contain"
                );
                continue;
            }
            kept.push(child.into_ref());
        }

        if !kept.is_empty() {
            normalized.push(Row::new(kept));
        }
    }

    Ok(Container {
        width: contents.get("width").and_then(Value::as_number).cloned(),
        cell_width: contents.get("cellWidth").and_then(Value::as_number).cloned(),
        rows: normalized,
        extra: scalar_props(contents, &CONTAINER_KEYS, &owner.name),
    })
}

/// Node scalars shared by the form and every nested node
fn base_node(
    record: &Map<String, Value>,
    kind: NodeKind,
    fallback_name: &str,
    seen_ids: &mut HashSet<String>,
) -> Node {
    let mut node = Node::new(kind, name_or(record, fallback_name));
    node.id = match record.get("id").and_then(Value::as_str) {
        Some(id) if !id.is_empty() => {
            if seen_ids.insert(id.to_string()) {
                Some(id.to_string())
            } else {
                warn!(name = %node.name, id, "dropping repeated id");
                None
            }
        }
        _ => None,
    };
    node.width = record.get("width").and_then(grid_number);
    node.offset = record.get("offset").and_then(grid_number);
    node.extra = scalar_props(record, &NODE_KEYS, &node.name);
    node
}

fn name_or(record: &Map<String, Value>, fallback: &str) -> String {
    record
        .get("name")
        .and_then(Value::as_str)
        .filter(|name| !name.trim().is_empty())
        .unwrap_or(fallback)
        .to_string()
}

/// Integer grid value; fractional numbers are rounded
pub(crate) fn grid_number(value: &Value) -> Option<i64> {
    value
        .as_i64()
        .or_else(|| value.as_f64().map(|number| number.round() as i64))
}

fn scalar_props(record: &Map<String, Value>, reserved: &[&str], owner: &str) -> Props {
    let mut props = Props::new();
    for (key, value) in record {
        if reserved.contains(&key.as_str()) {
            continue;
        }
        match PropValue::from_json(value) {
            Some(prop) => {
                props.insert(key.clone(), prop);
            }
            None => warn!(owner, key = %key, "dropping non-scalar property"),
        }
    }
    props
}
