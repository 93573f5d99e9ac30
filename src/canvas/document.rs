//! Canvas host backed by a JSON document.
//!
//! A document captures what a plugin host would report at one moment:
//!
//! ```json
//! { "canvasRoot": { "id": "c1", "__class": "ComponentNode", ... },
//!   "selection": [ { "id": "f1", "__class": "FrameNode", "children": [ ... ] } ] }
//! ```
//!
//! Nodes are plain objects. `__class` (or `type`) is the class tag, `children`
//! holds nested nodes, and every other key is an attribute.

use crate::canvas::node::{CanvasHost, RawNode};
use crate::error::CanvasError;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::path::Path;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct JsonNode {
    id: String,
    class_tag: String,
    attrs: Arc<Map<String, Value>>,
}

impl JsonNode {
    pub fn from_value(value: Value) -> Result<Self, CanvasError> {
        let attrs = match value {
            Value::Object(attrs) => attrs,
            other => return Err(CanvasError::Host(format!("node must be an object, got {other}"))),
        };
        let id = match attrs.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => return Err(CanvasError::Host("node without an id".into())),
        };
        let class_tag = attrs
            .get("__class")
            .or_else(|| attrs.get("type"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();
        Ok(Self { id, class_tag, attrs: Arc::new(attrs) })
    }
}

#[async_trait]
impl RawNode for JsonNode {
    fn id(&self) -> &str {
        &self.id
    }

    fn name(&self) -> Option<&str> {
        self.attrs.get("name").and_then(Value::as_str)
    }

    fn class_tag(&self) -> &str {
        &self.class_tag
    }

    fn visible(&self) -> Option<bool> {
        self.attrs.get("visible").and_then(Value::as_bool)
    }

    fn locked(&self) -> Option<bool> {
        self.attrs.get("locked").and_then(Value::as_bool)
    }

    fn attribute(&self, key: &str) -> Option<Value> {
        if key == "children" {
            return None;
        }
        self.attrs.get(key).cloned()
    }

    async fn children(&self) -> Result<Vec<Self>, CanvasError> {
        match self.attrs.get("children") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Array(items)) => items.iter().cloned().map(JsonNode::from_value).collect(),
            Some(other) => Err(CanvasError::Host(format!(
                "children of node {} must be a list, got {other}",
                self.id
            ))),
        }
    }
}

/// One captured canvas state.
#[derive(Debug, Clone, Default)]
pub struct CanvasDocument {
    pub canvas_root: Option<JsonNode>,
    pub selection: Vec<JsonNode>,
}

impl CanvasDocument {
    pub fn from_value(value: Value) -> Result<Self, CanvasError> {
        let Value::Object(mut doc) = value else {
            return Err(CanvasError::Host("canvas document must be an object".into()));
        };
        let canvas_root = match doc.remove("canvasRoot") {
            None | Some(Value::Null) => None,
            Some(root) => Some(JsonNode::from_value(root)?),
        };
        let selection = match doc.remove("selection") {
            None | Some(Value::Null) => Vec::new(),
            Some(Value::Array(nodes)) => {
                nodes.into_iter().map(JsonNode::from_value).collect::<Result<_, _>>()?
            }
            Some(_) => return Err(CanvasError::Host("selection must be a list".into())),
        };
        Ok(Self { canvas_root, selection })
    }

    pub fn from_json(json: &str) -> Result<Self, CanvasError> {
        Self::from_value(serde_json::from_str(json)?)
    }

    pub fn load(path: &Path) -> Result<Self, CanvasError> {
        let json = std::fs::read_to_string(path).map_err(|source| CanvasError::Io {
            context: "failed to read canvas document",
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }
}

#[async_trait]
impl CanvasHost for CanvasDocument {
    type Node = JsonNode;

    async fn selection(&self) -> Result<Vec<JsonNode>, CanvasError> {
        Ok(self.selection.clone())
    }

    async fn canvas_root(&self) -> Result<Option<JsonNode>, CanvasError> {
        Ok(self.canvas_root.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[tokio::test]
    async fn parses_documents() {
        let doc = CanvasDocument::from_json(
            r#"{ "canvasRoot": { "id": "root", "__class": "ComponentNode" },
                 "selection": [ { "id": 7, "type": "FrameNode", "name": "Card",
                                  "children": [ { "id": "t" } ] } ] }"#,
        )
        .unwrap();

        let root = doc.canvas_root().await.unwrap().unwrap();
        assert_eq!(root.class_tag(), "ComponentNode");

        let selection = doc.selection().await.unwrap();
        assert_eq!(selection[0].id(), "7");
        assert_eq!(selection[0].class_tag(), "FrameNode");
        assert_eq!(selection[0].name(), Some("Card"));
        assert_eq!(selection[0].children().await.unwrap().len(), 1);
        assert!(selection[0].attribute("children").is_none());
    }

    #[tokio::test]
    async fn rejects_malformed_nodes() {
        assert!(JsonNode::from_value(json!({ "name": "no id" })).is_err());
        assert!(JsonNode::from_value(json!("text")).is_err());

        let bad_children = JsonNode::from_value(json!({ "id": "x", "children": 3 })).unwrap();
        assert!(matches!(bad_children.children().await, Err(CanvasError::Host(_))));

        assert!(CanvasDocument::from_json(r#"{ "selection": {} }"#).is_err());
        let empty = CanvasDocument::from_json("{}").unwrap();
        assert!(empty.canvas_root.is_none() && empty.selection.is_empty());
    }
}
