use crate::canvas::node::RawNode;
use crate::canvas::properties::NodeAppearance;
use crate::error::CanvasError;
use futures::future::{try_join_all, BoxFuture};
use serde::{Deserialize, Serialize};

/// Hosts guarantee a finite acyclic tree but not a shallow one.
pub const MAX_TREE_DEPTH: usize = 256;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StructureNode {
    pub id: String,
    pub name: Option<String>,
    #[serde(rename = "type")]
    pub node_type: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    pub children_count: usize,
    pub children: Vec<StructureNode>,
    /// Only descendants carry appearance; item roots keep theirs in the property bag.
    #[serde(flatten)]
    pub appearance: Option<NodeAppearance>,
}

impl StructureNode {
    pub fn new<N: RawNode>(node: &N, children: Vec<StructureNode>) -> Self {
        Self {
            id: node.id().to_string(),
            name: node.name().map(str::to_string),
            node_type: node.class_tag().to_string(),
            visible: node.visible(),
            locked: node.locked(),
            children_count: children.len(),
            children,
            appearance: None,
        }
    }

    /// Total nodes in this subtree, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(StructureNode::node_count).sum::<usize>()
    }
}

/// Structure of `nodes` and everything below them, in input order.
///
/// Sibling subtrees are fetched concurrently; the first failing child fetch
/// fails the whole extraction. `depth` is the level of `nodes` themselves.
pub fn extract_structure<'a, N: RawNode>(
    nodes: &'a [N],
    depth: usize,
    max_depth: usize,
) -> BoxFuture<'a, Result<Vec<StructureNode>, CanvasError>> {
    Box::pin(async move {
        if nodes.is_empty() {
            return Ok(Vec::new());
        }
        if depth > max_depth {
            return Err(CanvasError::DepthExceeded { limit: max_depth });
        }
        try_join_all(nodes.iter().map(|node| extract_node(node, depth, max_depth))).await
    })
}

async fn extract_node<N: RawNode>(
    node: &N,
    depth: usize,
    max_depth: usize,
) -> Result<StructureNode, CanvasError> {
    let children = node.children().await?;
    let nested = extract_structure(&children, depth + 1, max_depth).await?;
    let mut structure = StructureNode::new(node, nested);
    structure.appearance = Some(NodeAppearance::from_node(node));
    Ok(structure)
}

/// Root record of an export item: the node itself plus its extracted children.
pub async fn item_structure<N: RawNode>(
    node: &N,
    max_depth: usize,
) -> Result<StructureNode, CanvasError> {
    let children = node.children().await?;
    let nested = extract_structure(&children, 1, max_depth).await?;
    Ok(StructureNode::new(node, nested))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::document::JsonNode;
    use serde_json::{json, Value};

    fn node(value: Value) -> JsonNode {
        JsonNode::from_value(value).unwrap()
    }

    fn tree() -> JsonNode {
        node(json!({
            "id": "root", "name": "Hero", "__class": "FrameNode", "visible": true, "locked": false,
            "children": [
                { "id": "a", "__class": "TextNode", "text": "Hello", "fontSize": 24,
                  "children": [] },
                { "id": "b", "__class": "FrameNode", "children": [
                    { "id": "b1", "__class": "SVGNode" },
                    { "id": "b2", "__class": "FrameNode", "children": [ { "id": "b2a" } ] }
                ] },
                { "id": "c", "__class": "FrameNode", "backgroundImage": "https://img" }
            ]
        }))
    }

    fn assert_counts(nodes: &[StructureNode]) {
        for n in nodes {
            assert_eq!(n.children_count, n.children.len(), "node {}", n.id);
            assert_counts(&n.children);
        }
    }

    #[tokio::test]
    async fn preserves_order_and_counts() {
        let root = tree();
        let structure = item_structure(&root, MAX_TREE_DEPTH).await.unwrap();

        let ids: Vec<&str> = structure.children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
        assert_eq!(structure.children[1].children[1].children[0].id, "b2a");
        assert_eq!(structure.node_count(), 7);
        assert_counts(std::slice::from_ref(&structure));
        assert!(structure.appearance.is_none());
        assert_eq!(
            structure.children[0].appearance.as_ref().unwrap().text,
            Some(json!("Hello"))
        );
    }

    #[tokio::test]
    async fn repeated_extraction_is_deep_equal() {
        let root = tree();
        let children = root.children().await.unwrap();
        let first = extract_structure(&children, 1, MAX_TREE_DEPTH).await.unwrap();
        let second = extract_structure(&children, 1, MAX_TREE_DEPTH).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(
            serde_json::to_value(&first).unwrap(),
            serde_json::to_value(&second).unwrap()
        );
    }

    #[tokio::test]
    async fn fails_closed_past_depth_limit() {
        let mut chain = json!({ "id": "leaf" });
        for i in 0..10 {
            chain = json!({ "id": format!("n{i}"), "children": [chain] });
        }
        let root = node(chain);

        let err = item_structure(&root, 5).await.unwrap_err();
        assert!(matches!(err, CanvasError::DepthExceeded { limit: 5 }));

        let ok = item_structure(&root, 10).await.unwrap();
        assert_eq!(ok.node_count(), 11);
    }

    #[tokio::test]
    async fn descendant_json_flattens_appearance() {
        let root = tree();
        let structure = item_structure(&root, MAX_TREE_DEPTH).await.unwrap();
        let out = serde_json::to_value(&structure).unwrap();

        assert_eq!(out["childrenCount"], json!(3));
        assert!(out.get("text").is_none());
        assert_eq!(out["children"][0]["text"], json!("Hello"));
        assert_eq!(out["children"][0]["fontSize"], json!(24));
        assert!(out["children"][2].get("fontSize").is_none());
        assert_eq!(out["children"][2]["backgroundImage"], json!("https://img"));
    }
}
