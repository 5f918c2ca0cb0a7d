//! RocksDB configuration.

use serde::{Deserialize, Serialize};

/// Default shared block cache size (128 MB).
pub const DEFAULT_BLOCK_CACHE_SIZE: usize = 128 * 1024 * 1024;

/// Default cap on open SST files.
pub const DEFAULT_MAX_OPEN_FILES: i32 = 512;

/// Tunables for opening the RocksDB store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RocksDbConfig {
    /// Create the database directory if it does not exist.
    #[serde(default = "default_true")]
    pub create_if_missing: bool,

    /// Maximum number of open SST files.
    #[serde(default = "default_max_open_files")]
    pub max_open_files: i32,

    /// Shared block cache size in bytes.
    #[serde(default = "default_block_cache_size")]
    pub block_cache_size: usize,

    /// Write-ahead log; disable only for bulk loads that can be replayed.
    #[serde(default = "default_true")]
    pub enable_wal: bool,
}

fn default_true() -> bool {
    true
}

fn default_max_open_files() -> i32 {
    DEFAULT_MAX_OPEN_FILES
}

fn default_block_cache_size() -> usize {
    DEFAULT_BLOCK_CACHE_SIZE
}

impl Default for RocksDbConfig {
    fn default() -> Self {
        Self {
            create_if_missing: true,
            max_open_files: DEFAULT_MAX_OPEN_FILES,
            block_cache_size: DEFAULT_BLOCK_CACHE_SIZE,
            enable_wal: true,
        }
    }
}
