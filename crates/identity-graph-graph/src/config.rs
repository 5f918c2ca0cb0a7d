//! Graph layer configuration.

use serde::{Deserialize, Serialize};

/// Key namespace prefixes for the graph layer.
///
/// Defaults match the persisted-state contract (`node:`, `edge:`,
/// `index:`); override them only to colocate several graphs in one store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphConfig {
    /// Prefix of node records.
    #[serde(default = "default_node_prefix")]
    pub node_prefix: String,

    /// Prefix of edge records.
    #[serde(default = "default_edge_prefix")]
    pub edge_prefix: String,

    /// Prefix of secondary index rows.
    #[serde(default = "default_index_prefix")]
    pub index_prefix: String,
}

fn default_node_prefix() -> String {
    "node:".to_string()
}

fn default_edge_prefix() -> String {
    "edge:".to_string()
}

fn default_index_prefix() -> String {
    "index:".to_string()
}

impl Default for GraphConfig {
    fn default() -> Self {
        Self {
            node_prefix: default_node_prefix(),
            edge_prefix: default_edge_prefix(),
            index_prefix: default_index_prefix(),
        }
    }
}
