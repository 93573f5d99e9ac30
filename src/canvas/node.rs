use crate::error::CanvasError;
use async_trait::async_trait;
use serde_json::Value;

/// Read-only view of a node owned by the design canvas.
///
/// Hosts expose attributes dynamically, so beyond identity everything is read
/// through [`RawNode::attribute`]. Exported attributes go through
/// [`RawNode::value`], which keeps whatever JSON shape the host reports.
#[async_trait]
pub trait RawNode: Send + Sync + Sized {
    fn id(&self) -> &str;
    fn name(&self) -> Option<&str>;
    /// Host class tag, e.g. `FrameNode` or `ComponentInstanceNode`.
    fn class_tag(&self) -> &str;
    fn visible(&self) -> Option<bool>;
    fn locked(&self) -> Option<bool>;
    fn attribute(&self, key: &str) -> Option<Value>;

    async fn children(&self) -> Result<Vec<Self>, CanvasError>;

    /// String attribute; any other shape reads as absent.
    fn string(&self, key: &str) -> Option<String> {
        match self.attribute(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        }
    }

    /// Attribute of any JSON shape except `null`.
    fn value(&self, key: &str) -> Option<Value> {
        self.attribute(key).filter(|v| !v.is_null())
    }
}

/// The canvas the plugin is attached to.
#[async_trait]
pub trait CanvasHost: Send + Sync {
    type Node: RawNode;

    async fn selection(&self) -> Result<Vec<Self::Node>, CanvasError>;

    /// Container currently being edited, `None` on the top-level canvas.
    async fn canvas_root(&self) -> Result<Option<Self::Node>, CanvasError>;
}
