//! The `GraphStore` handle and its record-level I/O helpers.

use std::sync::Arc;

use futures::future::try_join_all;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use identity_graph_core::error::GraphResult;
use identity_graph_core::traits::KeyValueStore;
use identity_graph_core::types::{GraphEdge, GraphNode};

use crate::config::GraphConfig;
use crate::keys;

/// Value stored in one secondary index row.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct IndexEntry {
    pub node_id: String,
    pub value: Value,
}

/// Property graph over a flat ordered key-value store.
///
/// Owns all key layout and index maintenance. Takes its store as a
/// constructor argument and holds no other state; every operation resolves
/// through the store.
pub struct GraphStore {
    pub(crate) store: Arc<dyn KeyValueStore>,
    pub(crate) config: GraphConfig,
}

impl GraphStore {
    /// Creates a graph over the given store with default key prefixes.
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_config(store, GraphConfig::default())
    }

    /// Creates a graph with custom key prefixes.
    pub fn with_config(store: Arc<dyn KeyValueStore>, config: GraphConfig) -> Self {
        Self { store, config }
    }

    /// The active configuration.
    pub fn config(&self) -> &GraphConfig {
        &self.config
    }

    // =========================================================================
    // Record-level I/O
    // =========================================================================

    pub(crate) async fn read_node(&self, node_id: &str) -> GraphResult<Option<GraphNode>> {
        let key = keys::node_key(&self.config, node_id);
        match self.store.get(&key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn write_node(&self, node: &GraphNode) -> GraphResult<()> {
        let key = keys::node_key(&self.config, &node.id);
        let bytes = serde_json::to_vec(node)?;
        self.store.put(&key, bytes).await?;
        Ok(())
    }

    pub(crate) async fn read_edge(&self, edge_id: &str) -> GraphResult<Option<GraphEdge>> {
        let key = keys::edge_key(&self.config, edge_id);
        match self.store.get(&key).await? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    pub(crate) async fn write_edge(&self, edge: &GraphEdge) -> GraphResult<()> {
        let key = keys::edge_key(&self.config, &edge.id);
        let bytes = serde_json::to_vec(edge)?;
        self.store.put(&key, bytes).await?;
        Ok(())
    }

    /// Writes one index row per property of the node. Rows are independent
    /// writes and are issued together.
    pub(crate) async fn write_index_entries(&self, node: &GraphNode) -> GraphResult<()> {
        let mut writes = Vec::with_capacity(node.properties.len());
        for (property, value) in &node.properties {
            let repr = keys::index_value_repr(value);
            let key = keys::index_key(&self.config, property, &repr, &node.id);
            let entry = IndexEntry {
                node_id: node.id.clone(),
                value: value.clone(),
            };
            let bytes = serde_json::to_vec(&entry)?;
            writes.push(async move {
                self.store.put(&key, bytes).await?;
                GraphResult::Ok(())
            });
        }
        try_join_all(writes).await?;
        Ok(())
    }

    /// Deletes the index row of every property of the node.
    pub(crate) async fn delete_index_entries(&self, node: &GraphNode) -> GraphResult<()> {
        let mut deletes = Vec::with_capacity(node.properties.len());
        for (property, value) in &node.properties {
            let repr = keys::index_value_repr(value);
            let key = keys::index_key(&self.config, property, &repr, &node.id);
            deletes.push(async move {
                self.store.delete(&key).await?;
                GraphResult::Ok(())
            });
        }
        try_join_all(deletes).await?;
        Ok(())
    }
}
