//! Graph edge record.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::node::{props, PropertyMap};

/// Edge type tags used by the identity tracker.
///
/// The graph layer itself treats edge types as arbitrary strings.
pub mod edge_types {
    /// USER → IP usage edge.
    pub const USES_IP: &str = "USES_IP";
    /// USER → FINGERPRINT usage edge.
    pub const USES_FINGERPRINT: &str = "USES_FINGERPRINT";
}

/// A typed directed edge between two nodes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphEdge {
    /// Unique 14-character opaque identifier.
    pub id: String,

    /// Edge type tag (arbitrary string).
    #[serde(rename = "type")]
    pub edge_type: String,

    /// Id of the node this edge originates at.
    pub from_node_id: String,

    /// Id of the node this edge points to.
    pub to_node_id: String,

    /// Property map; tracker edges carry `firstSeen`, `lastSeen`, `count`.
    pub properties: PropertyMap,
}

impl GraphEdge {
    /// Looks up a property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Looks up a string-valued property.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// The edge's `lastSeen` timestamp, if present.
    pub fn last_seen(&self) -> Option<&str> {
        self.property_str(props::LAST_SEEN)
    }

    /// The edge's `firstSeen` timestamp, if present.
    pub fn first_seen(&self) -> Option<&str> {
        self.property_str(props::FIRST_SEEN)
    }

    /// The edge's co-occurrence count; zero when absent or non-numeric.
    pub fn count(&self) -> u64 {
        self.property(props::COUNT).and_then(Value::as_u64).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn edge_serializes_with_type_field() {
        let mut properties = PropertyMap::new();
        properties.insert(props::COUNT.into(), json!(3));
        let edge = GraphEdge {
            id: "e1".to_string(),
            edge_type: edge_types::USES_IP.to_string(),
            from_node_id: "a".to_string(),
            to_node_id: "b".to_string(),
            properties,
        };

        let json = serde_json::to_value(&edge).unwrap();
        assert_eq!(json["type"], "USES_IP");
        assert_eq!(json["fromNodeId"], "a");
        assert_eq!(json["toNodeId"], "b");

        let restored: GraphEdge = serde_json::from_value(json).unwrap();
        assert_eq!(restored, edge);
    }

    #[test]
    fn count_defaults_to_zero() {
        let edge = GraphEdge {
            id: "e1".to_string(),
            edge_type: "X".to_string(),
            from_node_id: "a".to_string(),
            to_node_id: "b".to_string(),
            properties: PropertyMap::new(),
        };
        assert_eq!(edge.count(), 0);
        assert!(edge.last_seen().is_none());
    }
}
