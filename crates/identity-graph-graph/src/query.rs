//! Index-backed node queries with cursor pagination.

use futures::future::try_join_all;
use serde_json::Value;

use identity_graph_core::error::{GraphError, GraphResult};
use identity_graph_core::types::{GraphNode, NodeType};

use crate::keys;
use crate::store::GraphStore;

/// Default page size when a query does not specify one.
pub const DEFAULT_QUERY_LIMIT: usize = 100;

/// Node query selector.
///
/// Exactly one index prefix is scanned, chosen in this order:
/// - `node_type` set → the `type` index for that tag;
/// - else `property` and `value` both set → that property index;
/// - else the whole index namespace (administrative listing; one row per
///   property, so the same node can appear repeatedly).
#[derive(Debug, Clone, PartialEq)]
pub struct QueryOptions {
    pub node_type: Option<NodeType>,
    pub property: Option<String>,
    pub value: Option<Value>,
    pub limit: usize,
    pub cursor: Option<String>,
}

impl Default for QueryOptions {
    fn default() -> Self {
        Self {
            node_type: None,
            property: None,
            value: None,
            limit: DEFAULT_QUERY_LIMIT,
            cursor: None,
        }
    }
}

impl QueryOptions {
    /// Selector over the `type` index.
    pub fn by_type(node_type: NodeType) -> Self {
        Self {
            node_type: Some(node_type),
            ..Default::default()
        }
    }

    /// Selector over one property index.
    pub fn by_property(property: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            property: Some(property.into()),
            value: Some(value.into()),
            ..Default::default()
        }
    }

    /// Builder: page size.
    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    /// Builder: continuation cursor from a previous page.
    #[must_use]
    pub fn cursor(mut self, cursor: Option<String>) -> Self {
        self.cursor = cursor;
        self
    }
}

/// One page of query results.
#[derive(Debug, Clone, PartialEq)]
pub struct QueryPage {
    /// Resolved nodes, in index-key order.
    pub items: Vec<GraphNode>,
    /// Continuation cursor; present iff `has_more`.
    pub cursor: Option<String>,
    /// True iff further keys existed beyond this page.
    pub has_more: bool,
}

impl GraphStore {
    /// Runs an index query and resolves matching nodes.
    ///
    /// The adapter is asked for `limit + 1` keys; a lookahead key beyond
    /// `limit` means another page exists, and the returned cursor resumes
    /// strictly after the last emitted key, so the lookahead key is not
    /// skipped. Nodes are fetched concurrently; index rows whose node no
    /// longer resolves are skipped (stale rows from a crash-interrupted
    /// delete).
    pub async fn query(&self, options: QueryOptions) -> GraphResult<QueryPage> {
        let prefix = match (&options.node_type, &options.property, &options.value) {
            (Some(node_type), _, _) => {
                keys::index_scan_prefix(&self.config, "type", node_type.as_str())
            }
            (None, Some(property), Some(value)) => {
                keys::index_scan_prefix(&self.config, property, &keys::index_value_repr(value))
            }
            _ => self.config.index_prefix.clone(),
        };

        let page = self
            .store
            .list(&prefix, options.limit + 1, options.cursor.as_deref())
            .await
            .map_err(GraphError::from)?;

        let has_more = page.keys.len() > options.limit;
        let mut keys = page.keys;
        keys.truncate(options.limit);

        let node_ids: Vec<&str> = keys
            .iter()
            .filter_map(|key| keys::node_id_from_index_key(key))
            .collect();
        let fetched = try_join_all(node_ids.iter().map(|id| self.read_node(id))).await?;
        let items: Vec<GraphNode> = fetched.into_iter().flatten().collect();

        let cursor = if has_more { keys.last().cloned() } else { None };
        Ok(QueryPage {
            items,
            cursor,
            has_more,
        })
    }
}
