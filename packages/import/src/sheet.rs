//! Spreadsheet import
//!
//! Builds a form from header-keyed records, the shape a sheet-to-JSON export
//! produces: one record per field, with columns naming its tab, section,
//! display type and grid placement.

use crate::error::{ImportError, ImportResult};
use crate::json::{grid_number, DEFAULT_FORM_NAME};
use formgrid_model::{Container, Node, NodeKind, NodeRef, Row, FULL_WIDTH};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info};

pub type Record = Map<String, Value>;

pub const DEFAULT_TAB: &str = "Default Tab";
pub const DEFAULT_SECTION: &str = "Default Section";
pub const DEFAULT_FIELD_WIDTH: i64 = 3;

/// Which header holds each piece of field data
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ColumnMapping {
    pub tab_name: String,
    pub section_name: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub width: String,
    pub offset: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            tab_name: "Tab Name".to_string(),
            section_name: "Section Name".to_string(),
            name: "Field Design Name".to_string(),
            kind: "Display Type".to_string(),
            width: "Width".to_string(),
            offset: "Offset".to_string(),
        }
    }
}

/// Counts of what an import would create
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportPreview {
    pub tabs: usize,
    pub sections: usize,
    pub fields: usize,
}

/// Parse sheet JSON text into records
pub fn parse_records(text: &str) -> ImportResult<Vec<Record>> {
    let value: Value = serde_json::from_str(text)?;
    let Value::Array(items) = value else {
        return Err(ImportError::NotARecordList);
    };

    items
        .into_iter()
        .map(|item| match item {
            Value::Object(record) => Ok(record),
            _ => Err(ImportError::NotARecordList),
        })
        .collect()
}

/// Field rows grouped by tab, then section, in first-seen order
type Grouped<'a> = IndexMap<String, IndexMap<String, Vec<&'a Record>>>;

/// Group records by tab and section. Unless `named_only`, records without a
/// field name still open their tab and section.
fn group<'a>(
    records: &'a [Record],
    mapping: &ColumnMapping,
    named_only: bool,
) -> ImportResult<Grouped<'a>> {
    if mapping.name.trim().is_empty() {
        return Err(ImportError::UnmappedColumn("name"));
    }

    let mut tabs: Grouped<'a> = IndexMap::new();

    for record in records {
        if named_only && !is_named(record, mapping) {
            continue;
        }
        let tab = cell_text(record, &mapping.tab_name).unwrap_or_else(|| DEFAULT_TAB.to_string());
        let section = cell_text(record, &mapping.section_name)
            .unwrap_or_else(|| DEFAULT_SECTION.to_string());

        tabs.entry(tab)
            .or_default()
            .entry(section)
            .or_default()
            .push(record);
    }

    Ok(tabs)
}

fn is_named(record: &Record, mapping: &ColumnMapping) -> bool {
    cell_text(record, &mapping.name).is_some()
}

/// Build a form from spreadsheet records
pub fn import_records(
    records: &[Record],
    mapping: &ColumnMapping,
    form_name: Option<&str>,
) -> ImportResult<Node> {
    let grouped = group(records, mapping, false)?;

    let skipped = records.iter().filter(|r| !is_named(r, mapping)).count();
    if skipped > 0 {
        debug!(skipped, "skipped records without a field name");
    }

    let tabs: Vec<NodeRef> = grouped
        .into_iter()
        .map(|(tab_name, sections)| {
            let rows = sections
                .into_iter()
                .map(|(section_name, fields)| {
                    let field_rows = fields
                        .into_iter()
                        .filter(|record| is_named(record, mapping))
                        .map(|record| Row::single(field(record, mapping).into_ref()))
                        .collect();
                    Row::single(band(NodeKind::Section, section_name, field_rows).into_ref())
                })
                .collect();
            band(NodeKind::Tab, tab_name, rows).into_ref()
        })
        .collect();

    let name = form_name
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .unwrap_or(DEFAULT_FORM_NAME);

    info!(form = name, tabs = tabs.len(), "spreadsheet imported");
    Ok(Node::new(NodeKind::Form, name).with_tabs(tabs))
}

/// Count the tabs, sections and fields that named records produce
pub fn preview(records: &[Record], mapping: &ColumnMapping) -> ImportResult<ImportPreview> {
    let grouped = group(records, mapping, true)?;

    Ok(ImportPreview {
        tabs: grouped.len(),
        sections: grouped.values().map(IndexMap::len).sum(),
        fields: grouped
            .values()
            .flat_map(IndexMap::values)
            .map(Vec::len)
            .sum(),
    })
}

fn band(kind: NodeKind, name: String, rows: Vec<Row>) -> Node {
    let mut node = Node::new(kind, name).with_width(FULL_WIDTH).with_offset(0);
    node.container = Some(Container::with_rows(rows));
    node
}

fn field(record: &Record, mapping: &ColumnMapping) -> Node {
    // callers filter out unnamed records
    let name = cell_text(record, &mapping.name).unwrap_or_default();
    let kind = match cell_text(record, &mapping.kind).and_then(|t| NodeKind::from_name(&t)) {
        Some(NodeKind::Subform) => NodeKind::Subform,
        _ => NodeKind::Field,
    };

    let mut node = Node::new(kind, name)
        .with_width(cell_number(record, &mapping.width).unwrap_or(DEFAULT_FIELD_WIDTH))
        .with_offset(cell_number(record, &mapping.offset).unwrap_or(0));
    if kind.has_container() {
        node.container = Some(Container::empty());
    }
    node
}

/// Trimmed cell text; blank cells count as missing
fn cell_text(record: &Record, column: &str) -> Option<String> {
    let text = match record.get(column)? {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => return None,
    };
    (!text.is_empty()).then_some(text)
}

fn cell_number(record: &Record, column: &str) -> Option<i64> {
    match record.get(column)? {
        Value::String(s) => s.trim().parse::<f64>().ok().map(|n| n.round() as i64),
        value => grid_number(value),
    }
}
