//! Per-concern error enums.

use thiserror::Error;

/// Failures surfaced by the key-value store adapter.
///
/// Host failures map onto these variants and propagate unchanged through the
/// graph and tracker layers; nothing retries them.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The backing store could not be opened.
    #[error("failed to open store at {path}: {message}")]
    OpenFailed { path: String, message: String },

    /// A point read failed at the host.
    #[error("store read failed: {0}")]
    ReadFailed(String),

    /// A put or delete failed at the host.
    #[error("store write failed: {0}")]
    WriteFailed(String),

    /// A prefix listing failed at the host.
    #[error("store list failed: {0}")]
    ListFailed(String),

    /// A cursor was presented with a prefix it was not issued for.
    #[error("cursor {cursor:?} is not valid for prefix {prefix:?}")]
    InvalidCursor { prefix: String, cursor: String },

    /// A required column family is missing (backend-specific).
    #[error("column family not found: {name}")]
    ColumnFamilyNotFound { name: String },
}

/// Failures surfaced by the property-graph layer.
#[derive(Debug, Error)]
pub enum GraphError {
    /// `create_edge` was called with an endpoint that does not exist.
    /// Fatal to the call; surfaces to the caller.
    #[error("edge endpoint missing: {node_id}")]
    EndpointMissing { node_id: String },

    /// A node, edge, or index record failed to (de)serialize.
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Underlying store failure, propagated unchanged.
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Failures surfaced by the identity tracker.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// Graph layer failure, propagated unchanged.
    #[error(transparent)]
    Graph(#[from] GraphError),

    /// A caller-supplied timestamp could not be interpreted.
    ///
    /// Reserved for ingestion boundaries that parse timestamps out of raw
    /// payloads before handing them to the tracker. The risk engine itself
    /// never raises this: it drops unparseable persisted timestamps
    /// silently, since scoring must not fail.
    #[error("invalid timestamp: {0}")]
    InvalidTimestamp(String),
}

impl From<StoreError> for TrackerError {
    fn from(err: StoreError) -> Self {
        TrackerError::Graph(GraphError::Store(err))
    }
}
