#![deny(deprecated)]
#![allow(clippy::module_inception)]

//! Identity Graph Core
//!
//! Shared foundation for the identity graph system:
//!
//! - `types`: node/edge records, identity projections, risk types
//! - `error`: unified error hierarchy (`StoreError`, `GraphError`, `TrackerError`)
//! - `traits`: the consumed contracts (`KeyValueStore`, `UserAgentClassifier`)
//! - `stubs`: in-memory implementations of the consumed contracts, for tests
//! - `id`: 14-character opaque identifier generation
//! - `time`: ISO-8601 UTC timestamp formatting with constant precision
//!
//! The graph layer (`identity-graph-graph`) and the tracker
//! (`identity-graph-tracker`) depend only on the traits defined here, never
//! on a concrete store.

pub mod error;
pub mod id;
pub mod stubs;
pub mod time;
pub mod traits;
pub mod types;

pub use error::{
    GraphError, GraphResult, IdentityGraphError, Result, StoreError, StoreResult, TrackerError,
    TrackerResult,
};
pub use id::{generate_id, ID_LENGTH};
pub use time::{format_timestamp, parse_timestamp};
pub use traits::{KeyPage, KeyValueStore, UserAgentClassifier};
pub use types::{
    ConnectionGraph, ConnectionGraphLink, ConnectionGraphNode, ConnectionStats, DeviceMetadata,
    FingerprintConnection, GraphEdge, GraphNode, IpConnection, NodeStats, NodeType, PropertyMap,
    RiskAssessment, RiskFactor, RiskLevel, UaClassification, UserConnections,
};
