//! Node CRUD with secondary index maintenance.
//!
//! Index discipline: `create` writes the node record first, then its index
//! rows; `update` deletes the index rows of *every* current property, merges
//! the delta, rewrites the node, and rewrites every resulting row. Deleting
//! all rows rather than diffing keeps a value change from leaving its old
//! row behind, and property maps are small enough that the extra deletes do
//! not matter.

use tracing::debug;

use identity_graph_core::error::GraphResult;
use identity_graph_core::id::generate_id;
use identity_graph_core::types::{GraphNode, PropertyMap};

use crate::store::GraphStore;

impl GraphStore {
    /// Creates a node with a fresh id and indexes every property.
    ///
    /// Natural-key uniqueness is not verified here; callers that need it
    /// query before creating.
    pub async fn create_node(&self, properties: PropertyMap) -> GraphResult<GraphNode> {
        let node = GraphNode {
            id: generate_id(),
            properties,
            in_edges: Vec::new(),
            out_edges: Vec::new(),
        };

        self.write_node(&node).await?;
        self.write_index_entries(&node).await?;

        debug!(node_id = %node.id, properties = node.properties.len(), "created node");
        Ok(node)
    }

    /// Point read. `Ok(None)` when the node does not exist.
    pub async fn get_node(&self, node_id: &str) -> GraphResult<Option<GraphNode>> {
        self.read_node(node_id).await
    }

    /// Merges `delta` over the node's properties (delta overwrites) and
    /// refreshes every index row. `Ok(None)` when the node does not exist.
    pub async fn update_node(
        &self,
        node_id: &str,
        delta: PropertyMap,
    ) -> GraphResult<Option<GraphNode>> {
        let Some(mut node) = self.read_node(node_id).await? else {
            return Ok(None);
        };

        self.delete_index_entries(&node).await?;
        for (key, value) in delta {
            node.properties.insert(key, value);
        }
        self.write_node(&node).await?;
        self.write_index_entries(&node).await?;

        Ok(Some(node))
    }

    /// Deletes a node, cascading every incident edge off its endpoints and
    /// removing every index row. Returns `false` when the node did not
    /// exist.
    pub async fn delete_node(&self, node_id: &str) -> GraphResult<bool> {
        let Some(node) = self.read_node(node_id).await? else {
            return Ok(false);
        };

        // Cascade sequentially: incident edges can share endpoints, and
        // concurrent adjacency rewrites would lose updates.
        let mut edge_ids: Vec<String> = Vec::new();
        edge_ids.extend(node.in_edges.iter().cloned());
        for id in &node.out_edges {
            if !edge_ids.contains(id) {
                edge_ids.push(id.clone());
            }
        }
        for edge_id in &edge_ids {
            self.delete_edge(edge_id).await?;
        }

        self.delete_index_entries(&node).await?;
        self.store
            .delete(&crate::keys::node_key(&self.config, node_id))
            .await
            .map_err(identity_graph_core::error::GraphError::from)?;

        debug!(node_id, edges = edge_ids.len(), "deleted node");
        Ok(true)
    }
}
