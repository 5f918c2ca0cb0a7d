//! Graph node record and node type tag.

use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Schema-light property map carried by every node and edge.
///
/// Keys are strings, values arbitrary JSON. Insertion order is preserved by
/// `serde_json::Map`, which keeps serialized records stable.
pub type PropertyMap = serde_json::Map<String, Value>;

/// Well-known property keys.
pub mod props {
    /// Node type tag (`USER` | `IP` | `FINGERPRINT`).
    pub const TYPE: &str = "type";
    /// First time this node or edge was observed (ISO-8601 UTC).
    pub const FIRST_SEEN: &str = "firstSeen";
    /// Most recent time this node or edge was observed (ISO-8601 UTC).
    pub const LAST_SEEN: &str = "lastSeen";
    /// Natural key of USER nodes.
    pub const USER_ID: &str = "userId";
    /// Natural key of IP nodes.
    pub const IP: &str = "ip";
    /// Natural key of FINGERPRINT nodes.
    pub const FINGERPRINT: &str = "fingerprint";
    /// UA classification sub-object on FINGERPRINT nodes.
    pub const METADATA: &str = "metadata";
    /// Co-occurrence counter on edges.
    pub const COUNT: &str = "count";
}

/// Type tag of an identity node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NodeType {
    #[serde(rename = "USER")]
    User,
    #[serde(rename = "IP")]
    Ip,
    #[serde(rename = "FINGERPRINT")]
    Fingerprint,
}

impl NodeType {
    /// Returns the persisted tag string.
    #[inline]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Ip => "IP",
            Self::Fingerprint => "FINGERPRINT",
        }
    }

    /// Parses a persisted tag string.
    #[inline]
    pub fn from_str_tag(tag: &str) -> Option<Self> {
        match tag {
            "USER" => Some(Self::User),
            "IP" => Some(Self::Ip),
            "FINGERPRINT" => Some(Self::Fingerprint),
            _ => None,
        }
    }

    /// Returns the property that uniquely identifies nodes of this type
    /// by the tracker's upsert convention.
    #[inline]
    pub fn natural_key_property(&self) -> &'static str {
        match self {
            Self::User => props::USER_ID,
            Self::Ip => props::IP,
            Self::Fingerprint => props::FINGERPRINT,
        }
    }

    /// All node type variants.
    #[inline]
    pub fn all() -> [NodeType; 3] {
        [Self::User, Self::Ip, Self::Fingerprint]
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A node in the identity graph.
///
/// Nodes reference their incident edges by id; edges reference their
/// endpoints by id. Ids are values, not back-pointers, and resolution always
/// goes through the store, so no in-memory reference cycles exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GraphNode {
    /// Unique 14-character opaque identifier.
    pub id: String,

    /// Property map; always includes `type`, `firstSeen`, `lastSeen`, and
    /// the type's natural key.
    pub properties: PropertyMap,

    /// Ids of edges pointing at this node.
    #[serde(default)]
    pub in_edges: Vec<String>,

    /// Ids of edges originating at this node.
    #[serde(default)]
    pub out_edges: Vec<String>,
}

impl GraphNode {
    /// Looks up a property value.
    pub fn property(&self, key: &str) -> Option<&Value> {
        self.properties.get(key)
    }

    /// Looks up a string-valued property.
    pub fn property_str(&self, key: &str) -> Option<&str> {
        self.properties.get(key).and_then(Value::as_str)
    }

    /// The node's type tag, if present and recognized.
    pub fn node_type(&self) -> Option<NodeType> {
        self.property_str(props::TYPE).and_then(NodeType::from_str_tag)
    }

    /// The node's natural-key value, according to its type tag.
    pub fn natural_key(&self) -> Option<&str> {
        self.node_type()
            .and_then(|t| self.property_str(t.natural_key_property()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_node() -> GraphNode {
        let mut properties = PropertyMap::new();
        properties.insert(props::TYPE.into(), json!("USER"));
        properties.insert(props::USER_ID.into(), json!("u1"));
        properties.insert(props::FIRST_SEEN.into(), json!("2024-01-01T00:00:00.000Z"));
        properties.insert(props::LAST_SEEN.into(), json!("2024-01-01T00:00:00.000Z"));
        GraphNode {
            id: "aaaaaaaaaaaaaa".to_string(),
            properties,
            in_edges: vec![],
            out_edges: vec!["e1".to_string()],
        }
    }

    #[test]
    fn node_type_tag_round_trip() {
        for t in NodeType::all() {
            assert_eq!(NodeType::from_str_tag(t.as_str()), Some(t));
        }
        assert_eq!(NodeType::from_str_tag("BROWSER"), None);
    }

    #[test]
    fn natural_key_property_per_type() {
        assert_eq!(NodeType::User.natural_key_property(), "userId");
        assert_eq!(NodeType::Ip.natural_key_property(), "ip");
        assert_eq!(NodeType::Fingerprint.natural_key_property(), "fingerprint");
    }

    #[test]
    fn node_accessors() {
        let node = sample_node();
        assert_eq!(node.node_type(), Some(NodeType::User));
        assert_eq!(node.natural_key(), Some("u1"));
        assert_eq!(node.property_str("missing"), None);
    }

    #[test]
    fn node_serializes_camel_case() {
        let node = sample_node();
        let json = serde_json::to_value(&node).unwrap();
        assert!(json.get("inEdges").is_some());
        assert!(json.get("outEdges").is_some());
        assert!(json.get("in_edges").is_none());

        let restored: GraphNode = serde_json::from_value(json).unwrap();
        assert_eq!(restored, node);
    }

    #[test]
    fn adjacency_defaults_to_empty() {
        let raw = json!({ "id": "n1", "properties": {} });
        let node: GraphNode = serde_json::from_value(raw).unwrap();
        assert!(node.in_edges.is_empty());
        assert!(node.out_edges.is_empty());
    }
}
