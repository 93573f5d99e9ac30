use crate::canvas::classify::{classify, NodeClass, MASTER_TAG};
use crate::canvas::node::RawNode;
use crate::canvas::properties::{ComponentInfo, NodeProperties};
use crate::canvas::structure::{item_structure, StructureNode, MAX_TREE_DEPTH};
use crate::error::CanvasError;
use futures::future::try_join_all;
use serde::{Deserialize, Serialize};

pub const UNNAMED_COMPONENT: &str = "Unnamed Component";

/// One row of the export list, rebuilt on every selection change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportItem {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub class: NodeClass,
    pub node_type: String,
    pub structure: StructureNode,
    pub properties: NodeProperties,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub component_info: Option<ComponentInfo>,
}

#[derive(Debug, Clone, Copy)]
pub struct SnapshotBuilder {
    pub max_depth: usize,
}

impl Default for SnapshotBuilder {
    fn default() -> Self {
        Self { max_depth: MAX_TREE_DEPTH }
    }
}

impl SnapshotBuilder {
    /// Export items for `selection`, in selection order.
    ///
    /// When `editable_root` is a component master it is prepended as its own
    /// item. Any other root is ignored.
    pub async fn build<N: RawNode>(
        &self,
        selection: &[N],
        editable_root: Option<&N>,
    ) -> Result<Vec<ExportItem>, CanvasError> {
        let mut items = Vec::with_capacity(selection.len() + 1);

        let master_root =
            editable_root.filter(|r| classify(r.class_tag()) == NodeClass::ComponentMaster);
        if let Some(root) = master_root {
            items.push(self.master_item(root).await?);
        }

        let selected = try_join_all(selection.iter().map(|node| self.selected_item(node))).await?;
        items.extend(selected);

        tracing::debug!(items = items.len(), "snapshot built");
        Ok(items)
    }

    async fn master_item<N: RawNode>(&self, root: &N) -> Result<ExportItem, CanvasError> {
        let mut structure = item_structure(root, self.max_depth).await?;
        structure.node_type = MASTER_TAG.to_string();
        Ok(ExportItem {
            id: NodeClass::ComponentMaster.item_id(root.id()),
            name: Some(root.name().unwrap_or(UNNAMED_COMPONENT).to_string()),
            class: NodeClass::ComponentMaster,
            node_type: MASTER_TAG.to_string(),
            structure,
            properties: NodeProperties::default(),
            component_info: Some(ComponentInfo::from_node(root)),
        })
    }

    async fn selected_item<N: RawNode>(&self, node: &N) -> Result<ExportItem, CanvasError> {
        let class = classify(node.class_tag());
        let structure = item_structure(node, self.max_depth).await?;
        let properties = NodeProperties::from_node(node);

        let (name, properties, component_info) = match class {
            // masters carry structure only
            NodeClass::ComponentMaster => (
                Some(node.name().unwrap_or(UNNAMED_COMPONENT).to_string()),
                NodeProperties::default(),
                Some(ComponentInfo::from_node(node)),
            ),
            NodeClass::ComponentInstance => (
                Some(node.name().unwrap_or(UNNAMED_COMPONENT).to_string()),
                properties,
                Some(ComponentInfo::from_node(node).with_controls()),
            ),
            NodeClass::Frame => (node.name().map(str::to_string), properties, None),
        };

        Ok(ExportItem {
            id: class.item_id(node.id()),
            name,
            class,
            node_type: node.class_tag().to_string(),
            structure,
            properties,
            component_info,
        })
    }
}

pub async fn build_snapshot<N: RawNode>(
    selection: &[N],
    editable_root: Option<&N>,
) -> Result<Vec<ExportItem>, CanvasError> {
    SnapshotBuilder::default().build(selection, editable_root).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::document::JsonNode;
    use serde_json::{json, Value};

    fn node(value: Value) -> JsonNode {
        JsonNode::from_value(value).unwrap()
    }

    #[tokio::test]
    async fn frame_with_text_and_image_children() {
        let frame = node(json!({
            "id": "f1", "name": "Hero", "__class": "FrameNode", "width": 320, "height": 200,
            "children": [
                { "id": "t1", "__class": "TextNode", "text": "Title" },
                { "id": "i1", "__class": "FrameNode", "backgroundImage": "https://img" }
            ]
        }));

        let items = build_snapshot(&[frame], None).await.unwrap();
        assert_eq!(items.len(), 1);

        let item = &items[0];
        assert_eq!(item.class, NodeClass::Frame);
        assert_eq!(item.id, "frame-f1");
        assert_eq!(item.structure.children.len(), 2);
        assert_eq!(item.structure.children_count, 2);
        assert!(item.component_info.is_none());

        let out = serde_json::to_value(item).unwrap();
        assert!(out["properties"].get("text").is_none());
        assert_eq!(out["properties"]["width"], json!(320));
        assert_eq!(out["type"], json!("frame"));
    }

    #[tokio::test]
    async fn master_root_is_prepended() {
        let root = node(json!({
            "id": "m1", "__class": "ComponentNode", "componentName": "Button",
            "componentIdentifier": "local-module:button", "width": 100,
            "children": [ { "id": "v1", "__class": "FrameNode" } ]
        }));
        let instance = node(json!({
            "id": "i1", "name": "Primary", "__class": "ComponentInstanceNode", "opacity": 0.5
        }));

        let items = build_snapshot(&[instance], Some(&root)).await.unwrap();
        let ids: Vec<&str> = items.iter().map(|i| i.id.as_str()).collect();
        assert_eq!(ids, vec!["component-master-m1", "component-instance-i1"]);

        let master = &items[0];
        assert_eq!(master.name.as_deref(), Some(UNNAMED_COMPONENT));
        assert!(master.properties.is_empty());
        assert_eq!(master.structure.children_count, 1);
        let info = master.component_info.as_ref().unwrap();
        assert_eq!(info.component_name.as_deref(), Some("Button"));
        assert!(info.controls.is_none());

        let inst = &items[1];
        assert_eq!(inst.properties.opacity, Some(json!(0.5)));
        assert!(inst.component_info.as_ref().unwrap().controls.is_some());
    }

    #[tokio::test]
    async fn non_master_root_is_ignored_and_order_kept() {
        let root = node(json!({ "id": "page", "__class": "FrameNode" }));
        let selection: Vec<JsonNode> = (0..5)
            .map(|i| node(json!({ "id": format!("n{i}"), "__class": "FrameNode" })))
            .collect();

        let items = build_snapshot(&selection, Some(&root)).await.unwrap();
        let ids: Vec<String> = items.into_iter().map(|i| i.id).collect();
        assert_eq!(ids, vec!["frame-n0", "frame-n1", "frame-n2", "frame-n3", "frame-n4"]);
    }

    #[tokio::test]
    async fn selected_master_drops_properties() {
        let master = node(json!({
            "id": "m2", "name": "Card", "__class": "ComponentNode", "width": 10, "fontSize": 12
        }));
        let items = build_snapshot(&[master], None).await.unwrap();
        assert_eq!(items[0].class, NodeClass::ComponentMaster);
        assert_eq!(items[0].name.as_deref(), Some("Card"));
        assert_eq!(serde_json::to_value(&items[0].properties).unwrap(), json!({}));
    }

    #[tokio::test]
    async fn one_broken_subtree_fails_the_build() {
        let good = node(json!({ "id": "ok", "children": [] }));
        let bad = node(json!({ "id": "bad", "children": [ { "id": "x", "children": "oops" } ] }));
        let err = build_snapshot(&[good, bad], None).await.unwrap_err();
        assert!(matches!(err, CanvasError::Host(_)));
    }
}
