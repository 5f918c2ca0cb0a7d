//! Core store struct and the `KeyValueStore` implementation.

use std::path::Path;

use async_trait::async_trait;
use rocksdb::{
    BlockBasedOptions, Cache, ColumnFamily, ColumnFamilyDescriptor, Direction, IteratorMode,
    Options, DB,
};
use tracing::{debug, info};

use identity_graph_core::error::{StoreError, StoreResult};
use identity_graph_core::traits::{KeyPage, KeyValueStore};

use super::config::RocksDbConfig;

/// Column family holding every key-value pair.
const CF_KV: &str = "kv";

/// RocksDB-backed key-value store.
///
/// # Thread Safety
///
/// RocksDB's `DB` is internally thread-safe for concurrent reads and writes,
/// so `&self` methods are safe and the store can be shared via
/// `Arc<RocksDbKeyValueStore>`.
pub struct RocksDbKeyValueStore {
    db: DB,
    /// Shared block cache, kept alive for the DB lifetime.
    #[allow(dead_code)]
    cache: Cache,
    path: String,
}

impl RocksDbKeyValueStore {
    /// Opens (or creates) a store at the given path with default
    /// configuration.
    pub fn open<P: AsRef<Path>>(path: P) -> StoreResult<Self> {
        Self::open_with_config(path, RocksDbConfig::default())
    }

    /// Opens a store with custom configuration.
    pub fn open_with_config<P: AsRef<Path>>(
        path: P,
        config: RocksDbConfig,
    ) -> StoreResult<Self> {
        let path_str = path.as_ref().to_string_lossy().to_string();

        let cache = Cache::new_lru_cache(config.block_cache_size);

        let mut db_opts = Options::default();
        db_opts.create_if_missing(config.create_if_missing);
        db_opts.create_missing_column_families(true);
        db_opts.set_max_open_files(config.max_open_files);
        if !config.enable_wal {
            db_opts.set_manual_wal_flush(true);
        }

        let mut block_opts = BlockBasedOptions::default();
        block_opts.set_block_cache(&cache);
        let mut cf_opts = Options::default();
        cf_opts.set_block_based_table_factory(&block_opts);
        let descriptors = vec![ColumnFamilyDescriptor::new(CF_KV, cf_opts)];

        let db = DB::open_cf_descriptors(&db_opts, &path_str, descriptors).map_err(|e| {
            StoreError::OpenFailed {
                path: path_str.clone(),
                message: e.to_string(),
            }
        })?;

        info!(path = %path_str, "opened rocksdb store");
        Ok(Self {
            db,
            cache,
            path: path_str,
        })
    }

    /// The filesystem path of the store.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Forces buffered writes to disk.
    pub fn flush(&self) -> StoreResult<()> {
        let cf = self.cf()?;
        self.db
            .flush_cf(cf)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }

    fn cf(&self) -> StoreResult<&ColumnFamily> {
        self.db
            .cf_handle(CF_KV)
            .ok_or_else(|| StoreError::ColumnFamilyNotFound {
                name: CF_KV.to_string(),
            })
    }
}

#[async_trait]
impl KeyValueStore for RocksDbKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let cf = self.cf()?;
        self.db
            .get_cf(cf, key.as_bytes())
            .map_err(|e| StoreError::ReadFailed(e.to_string()))
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        let cf = self.cf()?;
        self.db
            .put_cf(cf, key.as_bytes(), value)
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        let cf = self.cf()?;
        self.db
            .delete_cf(cf, key.as_bytes())
            .map_err(|e| StoreError::WriteFailed(e.to_string()))
    }

    async fn list(
        &self,
        prefix: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> StoreResult<KeyPage> {
        if let Some(c) = cursor {
            if !c.starts_with(prefix) {
                return Err(StoreError::InvalidCursor {
                    prefix: prefix.to_string(),
                    cursor: c.to_string(),
                });
            }
        }

        let cf = self.cf()?;
        // Seek to the cursor when resuming (its own key is skipped below),
        // otherwise to the first key with the prefix.
        let start = cursor.unwrap_or(prefix);
        let iter = self.db.iterator_cf(
            cf,
            IteratorMode::From(start.as_bytes(), Direction::Forward),
        );

        let mut keys = Vec::new();
        let mut complete = true;
        for item in iter {
            let (raw_key, _) = item.map_err(|e| StoreError::ListFailed(e.to_string()))?;
            let key = String::from_utf8(raw_key.into_vec())
                .map_err(|e| StoreError::ListFailed(format!("non-utf8 key: {e}")))?;

            if !key.starts_with(prefix) {
                break;
            }
            if let Some(c) = cursor {
                if key.as_str() <= c {
                    continue;
                }
            }
            if keys.len() == limit {
                complete = false;
                break;
            }
            keys.push(key);
        }

        debug!(prefix, returned = keys.len(), complete, "listed keys");
        let cursor = if complete { None } else { keys.last().cloned() };
        Ok(KeyPage {
            keys,
            cursor,
            complete,
        })
    }
}
