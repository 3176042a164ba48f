//! Export view: the document as JSON with every `id` key removed.

use crate::node::Node;
use serde_json::Value;

/// Recursively drop `"id"` keys from objects, descending through arrays
pub fn strip_ids(value: Value) -> Value {
    match value {
        Value::Array(items) => Value::Array(items.into_iter().map(strip_ids).collect()),
        Value::Object(map) => Value::Object(
            map.into_iter()
                .filter(|(key, _)| key != "id")
                .map(|(key, value)| (key, strip_ids(value)))
                .collect(),
        ),
        other => other,
    }
}

pub fn to_export_value(node: &Node) -> Result<Value, serde_json::Error> {
    serde_json::to_value(node).map(strip_ids)
}

pub fn to_export_json(node: &Node, pretty: bool) -> Result<String, serde_json::Error> {
    let value = to_export_value(node)?;
    if pretty {
        serde_json::to_string_pretty(&value)
    } else {
        serde_json::to_string(&value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::{NodeKind, Row};
    use serde_json::json;

    #[test]
    fn test_strip_nested_ids() {
        let value = json!({
            "name": "License",
            "type": "TAB",
            "id": "ussuvub",
            "contents": {
                "rows": [
                    { "contents": [ { "name": "Warning", "type": "SECTION", "id": "vkhw2kp" } ] }
                ]
            }
        });

        let clean = strip_ids(value);
        assert!(!serde_json::to_string(&clean).unwrap().contains("\"id\""));
        assert_eq!(clean["contents"]["rows"][0]["contents"][0]["name"], "Warning");
    }

    #[test]
    fn test_scalars_untouched() {
        assert_eq!(strip_ids(json!("id")), json!("id"));
        assert_eq!(strip_ids(json!([1, {"id": 2, "x": 3}])), json!([1, {"x": 3}]));
    }

    #[test]
    fn test_export_json_has_no_ids() {
        let tab = Node::new(NodeKind::Tab, "tab").with_id("t").with_rows(vec![Row::single(
            Node::new(NodeKind::Section, "s").with_id("s").with_rows(vec![]).into_ref(),
        )]);
        let form = Node::new(NodeKind::Form, "form")
            .with_id("f")
            .with_tabs(vec![tab.into_ref()]);

        let text = to_export_json(&form, true).unwrap();
        assert!(!text.contains("\"id\""));

        let back: Node = serde_json::from_str(&text).unwrap();
        assert_eq!(back.tabs()[0].rows()[0].contents[0].name, "s");
        assert!(back.id.is_none());
    }
}
