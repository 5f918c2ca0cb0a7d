//! Tracker configuration.

use serde::{Deserialize, Serialize};

/// Tunables for the identity tracker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackerConfig {
    /// Page size used when enumerating USER nodes for the connection graph.
    /// Enumeration follows cursors to exhaustion, so this only bounds page
    /// size, not the user count.
    #[serde(default = "default_user_batch_size")]
    pub user_batch_size: usize,
}

fn default_user_batch_size() -> usize {
    100
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            user_batch_size: default_user_batch_size(),
        }
    }
}
