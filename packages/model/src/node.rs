use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Number;
use std::fmt;
use std::sync::Arc;

use crate::locate::Location;

/// Shared handle to a node. Successive roots share untouched subtrees through it.
pub type NodeRef = Arc<Node>;

/// Open property bag carried verbatim through every mutation
pub type Props = IndexMap<String, PropValue>;

/// Grid span given to freshly created nodes and containers
pub const FULL_WIDTH: i64 = 12;

/// Node variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Form,
    Tab,
    Section,
    Field,
    Subform,
}

impl NodeKind {
    pub const ALL: [NodeKind; 5] = [
        NodeKind::Form,
        NodeKind::Tab,
        NodeKind::Section,
        NodeKind::Field,
        NodeKind::Subform,
    ];

    /// Wire name (`"FORM"`, `"TAB"`, ...)
    pub fn as_str(self) -> &'static str {
        match self {
            NodeKind::Form => "FORM",
            NodeKind::Tab => "TAB",
            NodeKind::Section => "SECTION",
            NodeKind::Field => "FIELD",
            NodeKind::Subform => "SUBFORM",
        }
    }

    /// Parse a wire name. Case-insensitive, surrounding whitespace ignored.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str().eq_ignore_ascii_case(name))
    }

    /// Containment table: may a node of this kind hold `child` directly?
    pub fn can_contain(self, child: NodeKind) -> bool {
        matches!(
            (self, child),
            (NodeKind::Form, NodeKind::Tab)
                | (NodeKind::Tab, NodeKind::Section)
                | (NodeKind::Section, NodeKind::Field)
                | (NodeKind::Section, NodeKind::Subform)
                | (NodeKind::Section, NodeKind::Section)
                | (NodeKind::Subform, NodeKind::Field)
        )
    }

    /// Kinds that accept a dragged node as a new child (reparent targets)
    pub fn is_drop_target(self) -> bool {
        matches!(self, NodeKind::Tab | NodeKind::Section)
    }

    /// Kinds that own a row container
    pub fn has_container(self) -> bool {
        matches!(self, NodeKind::Tab | NodeKind::Section | NodeKind::Subform)
    }

    /// Label given to freshly added nodes
    pub fn placeholder_name(self) -> String {
        format!("New {}", self.as_str())
    }
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Scalar value of an open node property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum PropValue {
    Null,
    Bool(bool),
    Number(Number),
    String(String),
}

impl PropValue {
    /// Convert a JSON value, rejecting arrays and objects
    pub fn from_json(value: &serde_json::Value) -> Option<Self> {
        match value {
            serde_json::Value::Null => Some(PropValue::Null),
            serde_json::Value::Bool(b) => Some(PropValue::Bool(*b)),
            serde_json::Value::Number(n) => Some(PropValue::Number(n.clone())),
            serde_json::Value::String(s) => Some(PropValue::String(s.clone())),
            serde_json::Value::Array(_) | serde_json::Value::Object(_) => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropValue::String(s) => Some(s),
            _ => None,
        }
    }
}

impl From<&str> for PropValue {
    fn from(value: &str) -> Self {
        PropValue::String(value.to_string())
    }
}

impl From<String> for PropValue {
    fn from(value: String) -> Self {
        PropValue::String(value)
    }
}

impl From<bool> for PropValue {
    fn from(value: bool) -> Self {
        PropValue::Bool(value)
    }
}

impl From<i64> for PropValue {
    fn from(value: i64) -> Self {
        PropValue::Number(value.into())
    }
}

impl From<f64> for PropValue {
    fn from(value: f64) -> Self {
        Number::from_f64(value).map_or(PropValue::Null, PropValue::Number)
    }
}

impl fmt::Display for PropValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropValue::Null => f.write_str("null"),
            PropValue::Bool(b) => write!(f, "{}", b),
            PropValue::Number(n) => write!(f, "{}", n),
            PropValue::String(s) => write!(f, "{:?}", s),
        }
    }
}

/// One visual line of siblings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    #[serde(default)]
    pub contents: Vec<NodeRef>,
}

impl Row {
    pub fn new(contents: Vec<NodeRef>) -> Self {
        Self { contents }
    }

    pub fn single(node: NodeRef) -> Self {
        Self {
            contents: vec![node],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.contents.is_empty()
    }

    pub fn len(&self) -> usize {
        self.contents.len()
    }
}

/// Row grouping owned by tabs, sections and subforms
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Container {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<Number>,

    #[serde(rename = "cellWidth", default, skip_serializing_if = "Option::is_none")]
    pub cell_width: Option<Number>,

    #[serde(default)]
    pub rows: Vec<Row>,

    #[serde(flatten)]
    pub extra: Props,
}

impl Container {
    /// Container given to new nodes: full width, unit cells, no rows
    pub fn empty() -> Self {
        Self {
            width: Some(FULL_WIDTH.into()),
            cell_width: Some(1.into()),
            rows: Vec::new(),
            extra: Props::new(),
        }
    }

    pub fn with_rows(rows: Vec<Row>) -> Self {
        Self {
            rows,
            ..Self::empty()
        }
    }

    /// Same hints and properties, different rows
    pub fn with_rows_from(&self, rows: Vec<Row>) -> Self {
        Self {
            width: self.width.clone(),
            cell_width: self.cell_width.clone(),
            rows,
            extra: self.extra.clone(),
        }
    }
}

/// Layout tree node
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(default)]
    pub name: String,

    #[serde(rename = "type")]
    pub kind: NodeKind,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<i64>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,

    #[serde(rename = "contents", default, skip_serializing_if = "Option::is_none")]
    pub container: Option<Container>,

    /// Only meaningful on forms
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tabs: Option<Vec<NodeRef>>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(flatten)]
    pub extra: Props,
}

impl Node {
    /// Bare node: no id, no geometry, no children
    pub fn new(kind: NodeKind, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            width: None,
            offset: None,
            container: None,
            tabs: None,
            id: None,
            extra: Props::new(),
        }
    }

    /// Node as created by the editor's add operation
    pub fn placeholder(kind: NodeKind, id: String) -> Self {
        let mut node = Self::new(kind, kind.placeholder_name())
            .with_id(id)
            .with_width(FULL_WIDTH)
            .with_offset(0);
        if kind.has_container() {
            node.container = Some(Container::empty());
        }
        if kind == NodeKind::Form {
            node.tabs = Some(Vec::new());
        }
        node
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_width(mut self, width: i64) -> Self {
        self.width = Some(width);
        self
    }

    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = Some(offset);
        self
    }

    pub fn with_rows(mut self, rows: Vec<Row>) -> Self {
        self.container = Some(match self.container.take() {
            Some(container) => container.with_rows_from(rows),
            None => Container::with_rows(rows),
        });
        self
    }

    pub fn with_tabs(mut self, tabs: Vec<NodeRef>) -> Self {
        self.tabs = Some(tabs);
        self
    }

    pub fn with_prop(mut self, key: impl Into<String>, value: impl Into<PropValue>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    pub fn into_ref(self) -> NodeRef {
        Arc::new(self)
    }

    pub fn id(&self) -> Option<&str> {
        self.id.as_deref()
    }

    pub fn has_id(&self, id: &str) -> bool {
        self.id.as_deref() == Some(id)
    }

    pub fn tabs(&self) -> &[NodeRef] {
        self.tabs.as_deref().unwrap_or(&[])
    }

    pub fn rows(&self) -> &[Row] {
        self.container
            .as_ref()
            .map(|container| container.rows.as_slice())
            .unwrap_or(&[])
    }

    /// Direct children in traversal order: tabs first, then rows
    pub fn children(&self) -> impl Iterator<Item = &NodeRef> {
        self.tabs()
            .iter()
            .chain(self.rows().iter().flat_map(|row| row.contents.iter()))
    }

    /// Child held in the given slot of this node
    pub fn child(&self, location: Location) -> Option<&NodeRef> {
        match location {
            Location::Tab { index } => self.tabs.as_ref()?.get(index),
            Location::Row {
                row_index,
                slot_index,
            } => self
                .container
                .as_ref()?
                .rows
                .get(row_index)?
                .contents
                .get(slot_index),
        }
    }

    /// Copy with children replaced. Scalars and properties are cloned,
    /// child handles are whatever the caller passes in.
    pub fn with_children(&self, tabs: Option<Vec<NodeRef>>, container: Option<Container>) -> Self {
        Self {
            name: self.name.clone(),
            kind: self.kind,
            width: self.width,
            offset: self.offset,
            container,
            tabs,
            id: self.id.clone(),
            extra: self.extra.clone(),
        }
    }

    /// Put `child` into an existing slot
    pub fn set_child(&mut self, location: Location, child: NodeRef) -> bool {
        let slot = match location {
            Location::Tab { index } => self.tabs.as_mut().and_then(|tabs| tabs.get_mut(index)),
            Location::Row {
                row_index,
                slot_index,
            } => self
                .container
                .as_mut()
                .and_then(|container| container.rows.get_mut(row_index))
                .and_then(|row| row.contents.get_mut(slot_index)),
        };
        match slot {
            Some(slot) => {
                *slot = child;
                true
            }
            None => false,
        }
    }

    /// Take a child out of its slot. An emptied row is left in place so
    /// sibling row indices stay valid until the tree is normalized.
    pub fn take_child(&mut self, location: Location) -> Option<NodeRef> {
        match location {
            Location::Tab { index } => {
                let tabs = self.tabs.as_mut()?;
                (index < tabs.len()).then(|| tabs.remove(index))
            }
            Location::Row {
                row_index,
                slot_index,
            } => {
                let row = self.container.as_mut()?.rows.get_mut(row_index)?;
                (slot_index < row.contents.len()).then(|| row.contents.remove(slot_index))
            }
        }
    }

    /// Row container, created on first use
    pub fn container_mut(&mut self) -> &mut Container {
        self.container.get_or_insert_with(Container::empty)
    }

    /// Append `child` as a new singleton row
    pub fn push_row(&mut self, child: NodeRef) {
        self.container_mut().rows.push(Row::single(child));
    }

    /// Insert `child` as a new singleton row, clamping `index` to the row count
    pub fn insert_row(&mut self, index: usize, child: NodeRef) {
        let rows = &mut self.container_mut().rows;
        let index = index.min(rows.len());
        rows.insert(index, Row::single(child));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_containment_table() {
        assert!(NodeKind::Form.can_contain(NodeKind::Tab));
        assert!(NodeKind::Tab.can_contain(NodeKind::Section));
        assert!(NodeKind::Section.can_contain(NodeKind::Section));
        assert!(NodeKind::Section.can_contain(NodeKind::Subform));
        assert!(NodeKind::Subform.can_contain(NodeKind::Field));

        assert!(!NodeKind::Form.can_contain(NodeKind::Section));
        assert!(!NodeKind::Tab.can_contain(NodeKind::Field));
        assert!(!NodeKind::Subform.can_contain(NodeKind::Section));
        assert!(!NodeKind::Field.can_contain(NodeKind::Field));
    }

    #[test]
    fn test_kind_names() {
        assert_eq!(NodeKind::from_name("section"), Some(NodeKind::Section));
        assert_eq!(NodeKind::from_name(" SUBFORM "), Some(NodeKind::Subform));
        assert_eq!(NodeKind::from_name("BUTTON"), None);
        assert_eq!(NodeKind::Tab.placeholder_name(), "New TAB");
    }

    #[test]
    fn test_node_wire_format() {
        let json = r#"{
            "name": "License",
            "type": "TAB",
            "width": 12,
            "offset": 0,
            "contents": {
                "width": 12,
                "cellWidth": 1,
                "rows": [
                    { "contents": [ { "name": "Email", "type": "FIELD", "width": 3, "id": "f1", "required": true } ] }
                ]
            },
            "id": "t1"
        }"#;

        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(node.kind, NodeKind::Tab);
        assert_eq!(node.id(), Some("t1"));
        assert_eq!(node.rows().len(), 1);

        let field = &node.rows()[0].contents[0];
        assert_eq!(field.width, Some(3));
        assert_eq!(field.offset, None);
        assert_eq!(field.extra.get("required"), Some(&PropValue::Bool(true)));
        assert!(field.container.is_none());
    }

    #[test]
    fn test_extra_properties_round_trip_in_order() {
        let json = r#"{"name":"A","type":"FIELD","zeta":"z","alpha":1.5,"mid":null,"flag":false}"#;
        let node: Node = serde_json::from_str(json).unwrap();

        let keys: Vec<&str> = node.extra.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["zeta", "alpha", "mid", "flag"]);

        let back = serde_json::to_string(&node).unwrap();
        assert_eq!(back, json);
    }

    #[test]
    fn test_container_hints_keep_number_spelling() {
        let json = r#"{"name":"S","type":"SECTION","contents":{"width":12,"cellWidth":0.5,"rows":[]}}"#;
        let node: Node = serde_json::from_str(json).unwrap();
        assert_eq!(serde_json::to_string(&node).unwrap(), json);
    }

    #[test]
    fn test_placeholder_nodes() {
        let tab = Node::placeholder(NodeKind::Tab, "x".to_string());
        assert_eq!(tab.name, "New TAB");
        assert_eq!(tab.width, Some(12));
        assert_eq!(tab.offset, Some(0));
        assert!(tab.container.as_ref().unwrap().rows.is_empty());

        let field = Node::placeholder(NodeKind::Field, "y".to_string());
        assert!(field.container.is_none());
    }

    #[test]
    fn test_take_child_leaves_empty_row() {
        let mut section = Node::new(NodeKind::Section, "S")
            .with_rows(vec![Row::single(Node::new(NodeKind::Field, "A").into_ref())]);

        let taken = section.take_child(Location::Row {
            row_index: 0,
            slot_index: 0,
        });

        assert_eq!(taken.unwrap().name, "A");
        assert_eq!(section.rows().len(), 1);
        assert!(section.rows()[0].is_empty());
    }
}
