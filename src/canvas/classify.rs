use serde::{Deserialize, Serialize};
use std::fmt;

pub const MASTER_TAG: &str = "ComponentNode";
pub const INSTANCE_TAG: &str = "ComponentInstanceNode";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeClass {
    ComponentMaster,
    ComponentInstance,
    Frame,
}

impl NodeClass {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeClass::ComponentMaster => "component-master",
            NodeClass::ComponentInstance => "component-instance",
            NodeClass::Frame => "frame",
        }
    }

    pub fn is_component(self) -> bool {
        !matches!(self, NodeClass::Frame)
    }

    /// Export item id: `<class>-<node id>`.
    pub fn item_id(self, node_id: &str) -> String {
        format!("{}-{}", self.as_str(), node_id)
    }
}

impl fmt::Display for NodeClass {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown tags are plain frames.
pub fn classify(class_tag: &str) -> NodeClass {
    match class_tag {
        MASTER_TAG => NodeClass::ComponentMaster,
        INSTANCE_TAG => NodeClass::ComponentInstance,
        _ => NodeClass::Frame,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classifies_known_tags() {
        assert_eq!(classify("ComponentNode"), NodeClass::ComponentMaster);
        assert_eq!(classify("ComponentInstanceNode"), NodeClass::ComponentInstance);
        assert_eq!(classify("Frame"), NodeClass::Frame);
    }

    #[test]
    fn unknown_tags_fall_back_to_frame() {
        for tag in ["", "TextNode", "SVGNode", "componentnode", "ComponentNode "] {
            assert_eq!(classify(tag), NodeClass::Frame, "tag {tag:?}");
        }
    }

    #[test]
    fn item_ids_and_wire_names() {
        assert_eq!(NodeClass::ComponentInstance.item_id("a1"), "component-instance-a1");
        assert_eq!(
            serde_json::to_value(NodeClass::ComponentMaster).unwrap(),
            serde_json::json!("component-master")
        );
        assert!(!NodeClass::Frame.is_component());
    }
}
