//! The identity tracker: session ingestion and graph projections.
//!
//! # Concurrency stance
//!
//! `record_connection` issues its three node upserts together, waits for all
//! of them, then issues its two edge upserts together. The edge upserts
//! share the user's adjacency list and run without locking, so a concurrent
//! append can be lost (last writer wins). The loss is accepted: the edge
//! record itself still persists, the next session for that user recreates a
//! duplicate edge instead of corrupting state, and the risk engine
//! aggregates over edges, tolerating duplicates with small upward bias.
//! Deployments that need stronger guarantees serialize writes per user
//! upstream of this tracker.
//!
//! Natural-key uniqueness is likewise a query-before-create discipline, not
//! an enforced constraint; two concurrent first-sightings of a user can
//! create two USER nodes.

use std::collections::HashSet;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use futures::future::join_all;
use serde_json::json;
use tracing::debug;

use identity_graph_core::error::{GraphError, TrackerResult};
use identity_graph_core::time::format_timestamp;
use identity_graph_core::traits::UserAgentClassifier;
use identity_graph_core::types::{
    edge_types, props, ConnectionGraph, ConnectionGraphLink, ConnectionGraphNode, ConnectionStats,
    DeviceMetadata, FingerprintConnection, GraphEdge, GraphNode, IpConnection, NodeStats,
    NodeType, PropertyMap, RiskAssessment, UserConnections,
};
use identity_graph_graph::{GraphStore, QueryOptions};

use crate::config::TrackerConfig;
use crate::risk::{RiskConfig, RiskEngine};

/// Parameters for [`IdentityTracker::get_connection_graph`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionGraphOptions {
    /// Only edges seen within this many hours survive the projection.
    pub hours: i64,
    /// Users scoring below this are dropped.
    pub risk_threshold: u32,
}

impl Default for ConnectionGraphOptions {
    fn default() -> Self {
        Self {
            hours: 24,
            risk_threshold: 0,
        }
    }
}

impl ConnectionGraphOptions {
    /// Builder: window width in hours.
    #[must_use]
    pub fn hours(mut self, hours: i64) -> Self {
        self.hours = hours;
        self
    }

    /// Builder: minimum risk score.
    #[must_use]
    pub fn risk_threshold(mut self, risk_threshold: u32) -> Self {
        self.risk_threshold = risk_threshold;
        self
    }
}

/// Tracks user sessions in the identity graph and scores identity churn.
pub struct IdentityTracker {
    graph: Arc<GraphStore>,
    classifier: Arc<dyn UserAgentClassifier>,
    risk: RiskEngine,
    config: TrackerConfig,
}

impl IdentityTracker {
    /// Creates a tracker with default configuration.
    pub fn new(graph: Arc<GraphStore>, classifier: Arc<dyn UserAgentClassifier>) -> Self {
        Self::with_config(
            graph,
            classifier,
            TrackerConfig::default(),
            RiskConfig::default(),
        )
    }

    /// Creates a tracker with custom tracker and risk configuration.
    pub fn with_config(
        graph: Arc<GraphStore>,
        classifier: Arc<dyn UserAgentClassifier>,
        config: TrackerConfig,
        risk_config: RiskConfig,
    ) -> Self {
        Self {
            graph,
            classifier,
            risk: RiskEngine::with_config(risk_config),
            config,
        }
    }

    // =========================================================================
    // Ingestion
    // =========================================================================

    /// Records one observed session, stamped with the current time.
    pub async fn record_connection(
        &self,
        user_id: &str,
        ip: &str,
        fingerprint: &str,
        user_agent: &str,
    ) -> TrackerResult<()> {
        self.record_connection_at(user_id, ip, fingerprint, user_agent, Utc::now())
            .await
    }

    /// Records one observed session at an explicit instant.
    ///
    /// Upserts the USER, IP, and FINGERPRINT nodes concurrently; once all
    /// three have settled, upserts the `USES_IP` and `USES_FINGERPRINT`
    /// edges concurrently.
    pub async fn record_connection_at(
        &self,
        user_id: &str,
        ip: &str,
        fingerprint: &str,
        user_agent: &str,
        observed_at: DateTime<Utc>,
    ) -> TrackerResult<()> {
        let timestamp = format_timestamp(observed_at);

        let metadata = self.classifier.classify(user_agent).into_metadata();
        let metadata_value =
            serde_json::to_value(metadata).map_err(GraphError::Serialization)?;

        let (user, ip_node, fingerprint_node) = tokio::join!(
            self.upsert_identity_node(NodeType::User, user_id, &timestamp, None),
            self.upsert_identity_node(NodeType::Ip, ip, &timestamp, None),
            self.upsert_identity_node(
                NodeType::Fingerprint,
                fingerprint,
                &timestamp,
                Some(metadata_value),
            ),
        );
        let (user, ip_node, fingerprint_node) = (user?, ip_node?, fingerprint_node?);

        let (ip_edge, fingerprint_edge) = tokio::join!(
            self.upsert_usage_edge(&user.id, &ip_node.id, edge_types::USES_IP, &timestamp),
            self.upsert_usage_edge(
                &user.id,
                &fingerprint_node.id,
                edge_types::USES_FINGERPRINT,
                &timestamp,
            ),
        );
        ip_edge?;
        fingerprint_edge?;

        debug!(user_id, ip, fingerprint, "recorded connection");
        Ok(())
    }

    /// Finds the node with the given natural key, bumping `lastSeen`, or
    /// creates it with `firstSeen = lastSeen = timestamp`.
    async fn upsert_identity_node(
        &self,
        node_type: NodeType,
        key_value: &str,
        timestamp: &str,
        metadata: Option<serde_json::Value>,
    ) -> TrackerResult<GraphNode> {
        let key_property = node_type.natural_key_property();
        let page = self
            .graph
            .query(QueryOptions::by_property(key_property, key_value).limit(1))
            .await?;

        if let Some(existing) = page.items.into_iter().next() {
            let mut delta = PropertyMap::new();
            delta.insert(props::LAST_SEEN.to_string(), json!(timestamp));
            if let Some(updated) = self.graph.update_node(&existing.id, delta).await? {
                return Ok(updated);
            }
            // Deleted between query and update; recreate below.
        }

        let mut properties = PropertyMap::new();
        properties.insert(props::TYPE.to_string(), json!(node_type.as_str()));
        properties.insert(key_property.to_string(), json!(key_value));
        properties.insert(props::FIRST_SEEN.to_string(), json!(timestamp));
        properties.insert(props::LAST_SEEN.to_string(), json!(timestamp));
        if let Some(metadata) = metadata {
            properties.insert(props::METADATA.to_string(), metadata);
        }
        Ok(self.graph.create_node(properties).await?)
    }

    /// Finds the `(edge_type, to)` edge among the user's out-edges, bumping
    /// `lastSeen` and `count`, or creates it with `count = 1`.
    async fn upsert_usage_edge(
        &self,
        from_id: &str,
        to_id: &str,
        edge_type: &str,
        timestamp: &str,
    ) -> TrackerResult<()> {
        let out_edges = match self.graph.get_node(from_id).await? {
            Some(node) => node.out_edges,
            None => Vec::new(),
        };

        let fetched = join_all(out_edges.iter().map(|id| self.graph.get_edge(id))).await;
        for result in fetched {
            let Some(edge) = result? else { continue };
            if edge.edge_type == edge_type && edge.to_node_id == to_id {
                let mut delta = PropertyMap::new();
                delta.insert(props::LAST_SEEN.to_string(), json!(timestamp));
                delta.insert(props::COUNT.to_string(), json!(edge.count() + 1));
                self.graph.update_edge(&edge.id, delta).await?;
                return Ok(());
            }
        }

        let mut properties = PropertyMap::new();
        properties.insert(props::FIRST_SEEN.to_string(), json!(timestamp));
        properties.insert(props::LAST_SEEN.to_string(), json!(timestamp));
        properties.insert(props::COUNT.to_string(), json!(1));
        self.graph
            .create_edge(from_id, to_id, edge_type, properties)
            .await?;
        Ok(())
    }

    // =========================================================================
    // Retrieval
    // =========================================================================

    /// Lists the IPs and fingerprints a user has appeared under, with edge
    /// statistics. Unknown users get the empty listing.
    pub async fn get_user_connections(&self, user_id: &str) -> TrackerResult<UserConnections> {
        let Some(user) = self.find_user(user_id).await? else {
            return Ok(UserConnections::default());
        };

        let (ips, fingerprints) = tokio::join!(
            self.connections_of(&user, edge_types::USES_IP),
            self.connections_of(&user, edge_types::USES_FINGERPRINT),
        );

        Ok(UserConnections {
            ips: ips?.iter().map(project_ip).collect(),
            fingerprints: fingerprints?.iter().map(project_fingerprint).collect(),
        })
    }

    /// Scores a user's recent identity churn as of now.
    pub async fn calculate_user_risk(&self, user_id: &str) -> TrackerResult<RiskAssessment> {
        self.calculate_user_risk_at(user_id, Utc::now()).await
    }

    /// Scores a user's recent identity churn as of an explicit instant.
    /// Unknown users score zero.
    pub async fn calculate_user_risk_at(
        &self,
        user_id: &str,
        now: DateTime<Utc>,
    ) -> TrackerResult<RiskAssessment> {
        let Some(user) = self.find_user(user_id).await? else {
            return Ok(RiskAssessment::none());
        };
        let (ips, fingerprints) = tokio::join!(
            self.connections_of(&user, edge_types::USES_IP),
            self.connections_of(&user, edge_types::USES_FINGERPRINT),
        );
        let ips: Vec<IpConnection> = ips?.iter().map(project_ip).collect();
        let fingerprints: Vec<FingerprintConnection> =
            fingerprints?.iter().map(project_fingerprint).collect();
        Ok(self.risk.assess(&ips, &fingerprints, now))
    }

    /// Projects the filtered connection subgraph as of now.
    pub async fn get_connection_graph(
        &self,
        options: ConnectionGraphOptions,
    ) -> TrackerResult<ConnectionGraph> {
        self.connection_graph_at(options, Utc::now()).await
    }

    /// Projects the filtered connection subgraph as of an explicit instant.
    ///
    /// Enumerates every USER node (following query pagination to
    /// exhaustion), drops users scoring below the threshold and users with
    /// no edge inside the window, then emits one node per surviving user,
    /// one node per recently-used endpoint, and one link per recent edge.
    pub async fn connection_graph_at(
        &self,
        options: ConnectionGraphOptions,
        now: DateTime<Utc>,
    ) -> TrackerResult<ConnectionGraph> {
        let cutoff = format_timestamp(now - Duration::hours(options.hours));

        let mut graph = ConnectionGraph::default();
        let mut seen_nodes: HashSet<String> = HashSet::new();
        let mut seen_links: HashSet<String> = HashSet::new();

        for user in self.all_users().await? {
            let (ips, fingerprints) = tokio::join!(
                self.connections_of(&user, edge_types::USES_IP),
                self.connections_of(&user, edge_types::USES_FINGERPRINT),
            );
            let ips = ips?;
            let fingerprints = fingerprints?;

            let ip_connections: Vec<IpConnection> = ips.iter().map(project_ip).collect();
            let fingerprint_connections: Vec<FingerprintConnection> =
                fingerprints.iter().map(project_fingerprint).collect();
            let assessment = self.risk.assess(&ip_connections, &fingerprint_connections, now);
            if assessment.score < options.risk_threshold {
                continue;
            }

            let recent = |edge: &GraphEdge| {
                edge.last_seen()
                    .is_some_and(|last_seen| last_seen >= cutoff.as_str())
            };
            if !ips.iter().chain(fingerprints.iter()).any(|(e, _)| recent(e)) {
                continue;
            }

            // Total edge count is deliberately not clipped by the window.
            let total_edges = (ips.len() + fingerprints.len()) as u64;
            if seen_nodes.insert(user.id.clone()) {
                graph.nodes.push(ConnectionGraphNode {
                    id: user.id.clone(),
                    node_type: NodeType::User,
                    label: user
                        .property_str(props::USER_ID)
                        .unwrap_or(&user.id)
                        .to_string(),
                    risk: Some(assessment.level),
                    risk_score: Some(assessment.score),
                    metadata: None,
                    stats: NodeStats::totals(total_edges),
                });
            }

            for (edge, endpoint) in ips.iter().chain(fingerprints.iter()) {
                if !recent(edge) {
                    continue;
                }

                if seen_nodes.insert(endpoint.id.clone()) {
                    let node_type = endpoint.node_type().unwrap_or_else(|| {
                        if edge.edge_type == edge_types::USES_IP {
                            NodeType::Ip
                        } else {
                            NodeType::Fingerprint
                        }
                    });
                    graph.nodes.push(ConnectionGraphNode {
                        id: endpoint.id.clone(),
                        node_type,
                        label: endpoint
                            .natural_key()
                            .unwrap_or(&endpoint.id)
                            .to_string(),
                        risk: None,
                        risk_score: None,
                        metadata: node_metadata(endpoint),
                        stats: edge_stats(edge).into(),
                    });
                }

                let link_key = format!("{}-{}", user.id, endpoint.id);
                if seen_links.insert(link_key) {
                    graph.links.push(ConnectionGraphLink {
                        source: user.id.clone(),
                        target: endpoint.id.clone(),
                        link_type: edge.edge_type.clone(),
                        stats: edge_stats(edge),
                    });
                }
            }
        }

        debug!(
            nodes = graph.nodes.len(),
            links = graph.links.len(),
            hours = options.hours,
            "projected connection graph"
        );
        Ok(graph)
    }

    // =========================================================================
    // Lookup helpers
    // =========================================================================

    async fn find_user(&self, user_id: &str) -> TrackerResult<Option<GraphNode>> {
        let page = self
            .graph
            .query(QueryOptions::by_property(props::USER_ID, user_id).limit(1))
            .await?;
        Ok(page.items.into_iter().next())
    }

    /// Enumerates every USER node, following pagination to exhaustion.
    async fn all_users(&self) -> TrackerResult<Vec<GraphNode>> {
        let mut users = Vec::new();
        let mut cursor: Option<String> = None;
        loop {
            let page = self
                .graph
                .query(
                    QueryOptions::by_type(NodeType::User)
                        .limit(self.config.user_batch_size)
                        .cursor(cursor),
                )
                .await?;
            users.extend(page.items);
            if !page.has_more {
                return Ok(users);
            }
            cursor = page.cursor;
        }
    }

    /// Fetches the user's out-edges of one type together with their target
    /// nodes. Edges whose target no longer resolves are dropped.
    async fn connections_of(
        &self,
        user: &GraphNode,
        edge_type: &str,
    ) -> TrackerResult<Vec<(GraphEdge, GraphNode)>> {
        let fetched = join_all(user.out_edges.iter().map(|id| self.graph.get_edge(id))).await;
        let mut edges = Vec::new();
        for result in fetched {
            let Some(edge) = result? else { continue };
            if edge.edge_type == edge_type {
                edges.push(edge);
            }
        }

        let nodes = join_all(edges.iter().map(|e| self.graph.get_node(&e.to_node_id))).await;
        let mut pairs = Vec::with_capacity(edges.len());
        for (edge, node) in edges.into_iter().zip(nodes) {
            if let Some(node) = node? {
                pairs.push((edge, node));
            }
        }
        Ok(pairs)
    }
}

fn edge_stats(edge: &GraphEdge) -> ConnectionStats {
    ConnectionStats {
        first_seen: edge.first_seen().unwrap_or_default().to_string(),
        last_seen: edge.last_seen().unwrap_or_default().to_string(),
        count: edge.count(),
    }
}

fn node_metadata(node: &GraphNode) -> Option<DeviceMetadata> {
    node.property(props::METADATA)
        .cloned()
        .and_then(|value| serde_json::from_value(value).ok())
}

fn project_ip((edge, node): &(GraphEdge, GraphNode)) -> IpConnection {
    IpConnection {
        ip: node.property_str(props::IP).unwrap_or_default().to_string(),
        stats: edge_stats(edge),
    }
}

fn project_fingerprint((edge, node): &(GraphEdge, GraphNode)) -> FingerprintConnection {
    FingerprintConnection {
        fingerprint: node
            .property_str(props::FINGERPRINT)
            .unwrap_or_default()
            .to_string(),
        metadata: node_metadata(node),
        stats: edge_stats(edge),
    }
}
