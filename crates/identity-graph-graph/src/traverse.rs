//! Neighborhood queries and bounded breadth-first traversal.

use std::collections::{HashSet, VecDeque};

use futures::future::try_join_all;

use identity_graph_core::error::GraphResult;
use identity_graph_core::types::{GraphEdge, GraphNode};

use crate::store::GraphStore;

/// Default traversal depth bound.
pub const DEFAULT_TRAVERSAL_DEPTH: usize = 3;

/// Edge direction relative to the anchor node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Edges originating at the anchor (`outEdges`).
    Out,
    /// Edges pointing at the anchor (`inEdges`).
    In,
    /// Union of both.
    Both,
}

/// Parameters for [`GraphStore::traverse`].
#[derive(Debug, Clone, PartialEq)]
pub struct TraversalOptions {
    /// Nodes at this depth are yielded but not expanded.
    pub max_depth: usize,
    pub direction: Direction,
    /// Restrict the frontier to edges of this type.
    pub edge_type: Option<String>,
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_TRAVERSAL_DEPTH,
            direction: Direction::Out,
            edge_type: None,
        }
    }
}

impl TraversalOptions {
    /// Builder: depth bound.
    #[must_use]
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Builder: direction.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Builder: edge type filter.
    #[must_use]
    pub fn edge_type(mut self, edge_type: impl Into<String>) -> Self {
        self.edge_type = Some(edge_type.into());
        self
    }
}

impl GraphStore {
    /// Returns the neighbors of a node along edges of the given direction,
    /// optionally restricted to one edge type.
    ///
    /// Absent edges and absent opposite endpoints are dropped silently;
    /// they are acceptable skew from interrupted writes, not errors.
    pub async fn get_connected_nodes(
        &self,
        node_id: &str,
        direction: Direction,
        edge_type: Option<&str>,
    ) -> GraphResult<Vec<GraphNode>> {
        let Some(node) = self.read_node(node_id).await? else {
            return Ok(Vec::new());
        };

        // (edge id, true when the opposite endpoint is the edge's target)
        let mut wanted: Vec<(&String, bool)> = Vec::new();
        if matches!(direction, Direction::Out | Direction::Both) {
            wanted.extend(node.out_edges.iter().map(|id| (id, true)));
        }
        if matches!(direction, Direction::In | Direction::Both) {
            wanted.extend(node.in_edges.iter().map(|id| (id, false)));
        }

        let edges = try_join_all(wanted.iter().map(|(id, _)| self.read_edge(id.as_str()))).await?;

        let mut opposite_ids: Vec<String> = Vec::new();
        for (edge, (_, opposite_is_target)) in edges.into_iter().zip(&wanted) {
            let Some(edge) = edge else { continue };
            if let Some(wanted_type) = edge_type {
                if edge.edge_type != wanted_type {
                    continue;
                }
            }
            let opposite = opposite_endpoint(&edge, *opposite_is_target);
            opposite_ids.push(opposite.to_string());
        }

        let nodes = try_join_all(opposite_ids.iter().map(|id| self.read_node(id))).await?;
        Ok(nodes.into_iter().flatten().collect())
    }

    /// Depth-bounded breadth-first walk from `start_id`.
    ///
    /// Yields each reachable node at most once, in discovery order, starting
    /// with the anchor itself. Nodes at depth `>= max_depth` are yielded but
    /// not expanded. An absent start node yields the empty walk.
    pub async fn traverse(
        &self,
        start_id: &str,
        options: TraversalOptions,
    ) -> GraphResult<Vec<GraphNode>> {
        let Some(start) = self.read_node(start_id).await? else {
            return Ok(Vec::new());
        };

        let mut visited: HashSet<String> = HashSet::new();
        visited.insert(start.id.clone());
        let mut result = vec![start];
        let mut frontier: VecDeque<(String, usize)> = VecDeque::new();
        frontier.push_back((start_id.to_string(), 0));

        while let Some((node_id, depth)) = frontier.pop_front() {
            if depth >= options.max_depth {
                continue;
            }
            let neighbors = self
                .get_connected_nodes(&node_id, options.direction, options.edge_type.as_deref())
                .await?;
            for neighbor in neighbors {
                if visited.insert(neighbor.id.clone()) {
                    frontier.push_back((neighbor.id.clone(), depth + 1));
                    result.push(neighbor);
                }
            }
        }

        Ok(result)
    }
}

fn opposite_endpoint(edge: &GraphEdge, opposite_is_target: bool) -> &str {
    if opposite_is_target {
        &edge.to_node_id
    } else {
        &edge.from_node_id
    }
}
