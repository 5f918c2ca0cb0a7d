//! Core data types for the identity graph.

mod connection_graph;
mod edge;
mod identity;
mod node;
mod risk;

pub use connection_graph::{ConnectionGraph, ConnectionGraphLink, ConnectionGraphNode, NodeStats};
pub use edge::{edge_types, GraphEdge};
pub use identity::{
    ConnectionStats, DeviceMetadata, FingerprintConnection, IpConnection, UaClassification,
    UserConnections,
};
pub use node::{props, GraphNode, NodeType, PropertyMap};
pub use risk::{RiskAssessment, RiskFactor, RiskLevel};
