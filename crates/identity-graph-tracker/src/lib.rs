#![deny(deprecated)]

//! Identity Tracker + Risk Engine
//!
//! Maintains the tripartite identity graph (USER / IP / FINGERPRINT) from
//! observed sessions and derives per-user behavioral risk from recent edge
//! activity.
//!
//! Ingestion: `(userId, ip, fingerprint, userAgent, timestamp)` → three node
//! upserts, then two edge upserts (`USES_IP`, `USES_FINGERPRINT`) carrying
//! first-seen / last-seen / count statistics.
//!
//! Retrieval: per-user connection listings, a windowed risk assessment, and
//! a filtered connection subgraph for visualization and alerting.

pub mod config;
pub mod risk;
pub mod tracker;

pub use config::TrackerConfig;
pub use risk::{RiskConfig, RiskEngine, MAX_RISK_SCORE};
pub use tracker::{ConnectionGraphOptions, IdentityTracker};
