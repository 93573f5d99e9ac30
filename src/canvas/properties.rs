use crate::canvas::node::RawNode;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GradientStop {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Gradient {
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub angle: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    pub stops: Vec<GradientStop>,
}

/// Flatten a host gradient object. Absent (or `null`, or non-object) input
/// stays absent; missing stops become an empty list.
pub fn serialize_gradient(raw: Option<&Value>) -> Option<Gradient> {
    let g = raw?.as_object()?;
    let field = |key: &str| g.get(key).filter(|v| !v.is_null()).cloned();
    let stops = g
        .get("stops")
        .and_then(Value::as_array)
        .map(|stops| {
            stops
                .iter()
                .map(|stop| GradientStop {
                    color: stop.get("color").filter(|c| !c.is_null()).cloned(),
                    position: stop.get("position").filter(|p| !p.is_null()).cloned(),
                })
                .collect()
        })
        .unwrap_or_default();

    Some(Gradient {
        kind: g.get("__class").and_then(Value::as_str).map(str::to_string),
        angle: field("angle"),
        x: field("x"),
        y: field("y"),
        width: field("width"),
        height: field("height"),
        stops,
    })
}

/// Fixed attribute bag exported for instances and frames. Values are copied
/// as the host reports them; a field is omitted only when the node does not
/// carry it (or carries `null`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeProperties {
    // position & size
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Value>,
    // visual
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<Gradient>,
    // border
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_style: Option<Value>,
    // layout
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layout_type: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gap: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_top: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_right: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_bottom: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub padding_left: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub align_items: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub justify_content: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_direction: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flex_wrap: Option<Value>,
    // text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_height: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub letter_spacing: Option<Value>,
    // effects
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub link: Option<Value>,
    // sizing constraints
    #[serde(skip_serializing_if = "Option::is_none")]
    pub aspect_ratio: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min_height: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_height: Option<Value>,
    // pins
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub right: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub bottom: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub left: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_x: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub center_y: Option<Value>,
}

impl NodeProperties {
    pub fn from_node<N: RawNode>(node: &N) -> Self {
        Self {
            x: node.value("x"),
            y: node.value("y"),
            width: node.value("width"),
            height: node.value("height"),
            rotation: node.value("rotation"),
            opacity: node.value("opacity"),
            background_color: node.value("backgroundColor"),
            background_image: node.value("backgroundImage"),
            background_gradient: serialize_gradient(node.value("backgroundGradient").as_ref()),
            border_radius: node.value("borderRadius"),
            border_color: node.value("borderColor"),
            border_width: node.value("borderWidth"),
            border_style: node.value("borderStyle"),
            layout_type: node.value("layoutType"),
            gap: node.value("gap"),
            padding: node.value("padding"),
            padding_top: node.value("paddingTop"),
            padding_right: node.value("paddingRight"),
            padding_bottom: node.value("paddingBottom"),
            padding_left: node.value("paddingLeft"),
            align_items: node.value("alignItems"),
            justify_content: node.value("justifyContent"),
            flex_direction: node.value("flexDirection"),
            flex_wrap: node.value("flexWrap"),
            text: node.value("text"),
            font_size: node.value("fontSize"),
            font_family: node.value("fontFamily"),
            font_weight: node.value("fontWeight"),
            text_align: node.value("textAlign"),
            color: node.value("color"),
            line_height: node.value("lineHeight"),
            letter_spacing: node.value("letterSpacing"),
            shadow: node.value("shadow"),
            blur: node.value("blur"),
            link: node.value("link"),
            aspect_ratio: node.value("aspectRatio"),
            min_width: node.value("minWidth"),
            max_width: node.value("maxWidth"),
            min_height: node.value("minHeight"),
            max_height: node.value("maxHeight"),
            top: node.value("top"),
            right: node.value("right"),
            bottom: node.value("bottom"),
            left: node.value("left"),
            center_x: node.value("centerX"),
            center_y: node.value("centerY"),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Appearance subset captured for every descendant in a structure tree.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeAppearance {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_color: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_image: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub background_gradient: Option<Gradient>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<Value>,
}

impl NodeAppearance {
    pub fn from_node<N: RawNode>(node: &N) -> Self {
        Self {
            x: node.value("x"),
            y: node.value("y"),
            width: node.value("width"),
            height: node.value("height"),
            rotation: node.value("rotation"),
            opacity: node.value("opacity"),
            background_color: node.value("backgroundColor"),
            background_image: node.value("backgroundImage"),
            background_gradient: serialize_gradient(node.value("backgroundGradient").as_ref()),
            border_radius: node.value("borderRadius"),
            text: node.value("text"),
            font_size: node.value("fontSize"),
            font_family: node.value("fontFamily"),
            font_weight: node.value("fontWeight"),
            text_align: node.value("textAlign"),
            color: node.value("color"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentInfo {
    pub identifier: Option<String>,
    #[serde(rename = "insertURL")]
    pub insert_url: Option<String>,
    pub component_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub controls: Option<Map<String, Value>>,
}

impl ComponentInfo {
    pub fn from_node<N: RawNode>(node: &N) -> Self {
        Self {
            identifier: node.string("componentIdentifier"),
            insert_url: node.string("insertURL"),
            component_name: node.string("componentName"),
            controls: None,
        }
    }

    pub fn with_controls(mut self) -> Self {
        self.controls = Some(Map::new());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::canvas::document::JsonNode;
    use serde_json::json;

    fn node(value: Value) -> JsonNode {
        JsonNode::from_value(value).unwrap()
    }

    #[test]
    fn absent_attributes_stay_absent() {
        let props = NodeProperties::from_node(&node(json!({
            "id": "n1", "__class": "FrameNode", "width": 0, "text": ""
        })));
        let out = serde_json::to_value(&props).unwrap();

        assert!(out.get("fontSize").is_none());
        assert_eq!(out["width"], json!(0));
        assert_eq!(out["text"], json!(""));
    }

    #[test]
    fn present_values_pass_through_unchanged() {
        let color = json!({ "r": 255, "g": 0, "b": 0, "a": 1 });
        let props = NodeProperties::from_node(&node(json!({
            "id": "n1", "width": "1fr", "height": 200, "fontSize": "large",
            "backgroundColor": color, "color": 12, "shadow": null
        })));
        let out = serde_json::to_value(&props).unwrap();

        assert_eq!(out["width"], json!("1fr"));
        assert_eq!(out["height"], json!(200));
        assert_eq!(out["height"].to_string(), "200");
        assert_eq!(out["fontSize"], json!("large"));
        assert_eq!(out["backgroundColor"], color);
        assert_eq!(out["color"], json!(12));
        assert!(out.get("shadow").is_none());

        let appearance = NodeAppearance::from_node(&node(json!({ "id": "n2", "width": "1fr", "x": 4 })));
        let out = serde_json::to_value(&appearance).unwrap();
        assert_eq!(out, json!({ "width": "1fr", "x": 4 }));
    }

    #[test]
    fn null_only_bag_is_empty() {
        let props = NodeProperties::from_node(&node(json!({ "id": "n1", "opacity": null })));
        assert!(props.is_empty());
    }

    #[test]
    fn gradient_serialization() {
        assert_eq!(serialize_gradient(None), None);
        assert_eq!(serialize_gradient(Some(&Value::Null)), None);

        let empty = serialize_gradient(Some(&json!({ "__class": "LinearGradient", "angle": 90 })))
            .unwrap();
        assert_eq!(serde_json::to_value(&empty).unwrap()["stops"], json!([]));
        assert_eq!(empty.kind.as_deref(), Some("LinearGradient"));
        assert_eq!(empty.angle, Some(json!(90)));

        let full = serialize_gradient(Some(&json!({
            "__class": "RadialGradient",
            "stops": [{ "color": "#fff", "position": 0 }, { "color": "#000", "position": 1 }]
        })))
        .unwrap();
        assert_eq!(full.stops.len(), 2);
        assert_eq!(full.stops[1].position, Some(json!(1)));
    }

    #[test]
    fn component_info_wire_shape() {
        let info = ComponentInfo::from_node(&node(json!({
            "id": "c", "componentIdentifier": "local-module:abc", "insertURL": null
        })))
        .with_controls();
        let out = serde_json::to_value(&info).unwrap();
        assert_eq!(out["identifier"], json!("local-module:abc"));
        assert_eq!(out["insertURL"], Value::Null);
        assert_eq!(out["controls"], json!({}));
    }
}
