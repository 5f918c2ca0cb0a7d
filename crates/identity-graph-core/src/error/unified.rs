//! Top-level unified error type.

use thiserror::Error;

use super::sub_errors::{GraphError, StoreError, TrackerError};

/// Top-level error for the identity graph workspace.
///
/// All crate errors convert into this type via `From`, so application
/// boundaries can hold a single error type while each layer keeps its own
/// narrow enum.
#[derive(Debug, Error)]
pub enum IdentityGraphError {
    /// Key-value store adapter error.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    /// Property-graph layer error.
    #[error("graph error: {0}")]
    Graph(#[from] GraphError),

    /// Identity tracker error.
    #[error("tracker error: {0}")]
    Tracker(#[from] TrackerError),
}
