//! Error types for the identity graph system.
//!
//! One `thiserror` enum per concern, plus a unified top-level error:
//!
//! - [`StoreError`]: key-value adapter / host store failures
//! - [`GraphError`]: property-graph layer failures
//! - [`TrackerError`]: identity tracker failures
//! - [`IdentityGraphError`]: top-level wrapper with `From` conversions
//!
//! Propagation policy: the graph layer never swallows store failures and the
//! tracker never catches them either. Missing nodes during traversal, query
//! assembly, or edge-deletion endpoint fixup are tolerated silently; they
//! represent acceptable skew, not data loss.

mod sub_errors;
mod unified;

#[cfg(test)]
mod tests;

pub use sub_errors::{GraphError, StoreError, TrackerError};
pub use unified::IdentityGraphError;

/// Result alias over the unified error.
pub type Result<T> = std::result::Result<T, IdentityGraphError>;

/// Result alias for store adapter operations.
pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Result alias for graph layer operations.
pub type GraphResult<T> = std::result::Result<T, GraphError>;

/// Result alias for tracker operations.
pub type TrackerResult<T> = std::result::Result<T, TrackerError>;
