//! Filtered connection subgraph for visualization and alerting.

use serde::{Deserialize, Serialize};

use super::identity::{ConnectionStats, DeviceMetadata};
use super::node::NodeType;
use super::risk::RiskLevel;

/// Statistics attached to a projected graph node.
///
/// USER nodes carry only `count` (total IP + fingerprint edges, not clipped
/// by the query window); IP and FINGERPRINT endpoints carry the full stats of
/// the edge that connects them to the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeStats {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_seen: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_seen: Option<String>,
    pub count: u64,
}

impl NodeStats {
    /// Stats for a USER node: edge total only.
    pub fn totals(count: u64) -> Self {
        Self {
            first_seen: None,
            last_seen: None,
            count,
        }
    }
}

impl From<ConnectionStats> for NodeStats {
    fn from(stats: ConnectionStats) -> Self {
        Self {
            first_seen: Some(stats.first_seen),
            last_seen: Some(stats.last_seen),
            count: stats.count,
        }
    }
}

/// One projected node of the connection subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionGraphNode {
    pub id: String,
    #[serde(rename = "type")]
    pub node_type: NodeType,
    /// USER: the userId; IP: the address; FINGERPRINT: the fingerprint.
    pub label: String,
    /// Risk level; USER nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk: Option<RiskLevel>,
    /// Risk score; USER nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub risk_score: Option<u32>,
    /// Device metadata; FINGERPRINT nodes only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<DeviceMetadata>,
    pub stats: NodeStats,
}

/// One projected link of the connection subgraph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionGraphLink {
    pub source: String,
    pub target: String,
    /// `USES_IP` or `USES_FINGERPRINT`.
    #[serde(rename = "type")]
    pub link_type: String,
    pub stats: ConnectionStats,
}

/// Output of `get_connection_graph`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConnectionGraph {
    pub nodes: Vec<ConnectionGraphNode>,
    pub links: Vec<ConnectionGraphLink>,
}
