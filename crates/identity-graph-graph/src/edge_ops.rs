//! Edge CRUD with adjacency-list maintenance.
//!
//! Edges carry no secondary indexes; the bookkeeping here is the adjacency
//! lists on both endpoints. Endpoint records are read, amended, and written
//! back without locking; the concurrency stance for lost appends is the
//! caller's (see the tracker's documentation).

use tracing::debug;

use identity_graph_core::error::{GraphError, GraphResult};
use identity_graph_core::id::generate_id;
use identity_graph_core::types::{GraphEdge, PropertyMap};

use crate::keys;
use crate::store::GraphStore;

impl GraphStore {
    /// Creates a typed directed edge between two existing nodes.
    ///
    /// Fails with [`GraphError::EndpointMissing`] when either endpoint does
    /// not resolve. The new edge id is appended to `from.outEdges` and
    /// `to.inEdges`, both endpoint records are rewritten, then the edge
    /// record itself is written.
    pub async fn create_edge(
        &self,
        from_node_id: &str,
        to_node_id: &str,
        edge_type: &str,
        properties: PropertyMap,
    ) -> GraphResult<GraphEdge> {
        let (from, to) = tokio::join!(self.read_node(from_node_id), self.read_node(to_node_id));
        let mut from = from?.ok_or_else(|| GraphError::EndpointMissing {
            node_id: from_node_id.to_string(),
        })?;
        let to = to?.ok_or_else(|| GraphError::EndpointMissing {
            node_id: to_node_id.to_string(),
        })?;

        let edge = GraphEdge {
            id: generate_id(),
            edge_type: edge_type.to_string(),
            from_node_id: from_node_id.to_string(),
            to_node_id: to_node_id.to_string(),
            properties,
        };

        if from_node_id == to_node_id {
            // Self-loop: one record carries both adjacency entries.
            from.out_edges.push(edge.id.clone());
            from.in_edges.push(edge.id.clone());
            self.write_node(&from).await?;
        } else {
            let mut to = to;
            from.out_edges.push(edge.id.clone());
            to.in_edges.push(edge.id.clone());
            self.write_node(&from).await?;
            self.write_node(&to).await?;
        }

        self.write_edge(&edge).await?;

        debug!(edge_id = %edge.id, edge_type, from_node_id, to_node_id, "created edge");
        Ok(edge)
    }

    /// Point read. `Ok(None)` when the edge does not exist.
    pub async fn get_edge(&self, edge_id: &str) -> GraphResult<Option<GraphEdge>> {
        self.read_edge(edge_id).await
    }

    /// Merges `delta` over the edge's properties (delta overwrites).
    /// `Ok(None)` when the edge does not exist.
    pub async fn update_edge(
        &self,
        edge_id: &str,
        delta: PropertyMap,
    ) -> GraphResult<Option<GraphEdge>> {
        let Some(mut edge) = self.read_edge(edge_id).await? else {
            return Ok(None);
        };

        for (key, value) in delta {
            edge.properties.insert(key, value);
        }
        self.write_edge(&edge).await?;

        Ok(Some(edge))
    }

    /// Deletes an edge and removes its id from each endpoint's adjacency
    /// list. Absent endpoints are tolerated silently. Returns `false` when
    /// the edge did not exist.
    pub async fn delete_edge(&self, edge_id: &str) -> GraphResult<bool> {
        let Some(edge) = self.read_edge(edge_id).await? else {
            return Ok(false);
        };

        if edge.from_node_id == edge.to_node_id {
            if let Some(mut node) = self.read_node(&edge.from_node_id).await? {
                node.out_edges.retain(|id| id != edge_id);
                node.in_edges.retain(|id| id != edge_id);
                self.write_node(&node).await?;
            }
        } else {
            let (from, to) = tokio::join!(
                self.read_node(&edge.from_node_id),
                self.read_node(&edge.to_node_id)
            );
            if let Some(mut from) = from? {
                from.out_edges.retain(|id| id != edge_id);
                self.write_node(&from).await?;
            }
            if let Some(mut to) = to? {
                to.in_edges.retain(|id| id != edge_id);
                self.write_node(&to).await?;
            }
        }

        self.store
            .delete(&keys::edge_key(&self.config, edge_id))
            .await
            .map_err(GraphError::from)?;

        debug!(edge_id, "deleted edge");
        Ok(true)
    }
}
