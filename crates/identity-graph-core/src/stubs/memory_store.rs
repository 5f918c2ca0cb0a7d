//! In-memory implementation of [`KeyValueStore`].
//!
//! # TEST ONLY
//!
//! No persistence: all data is lost when the store is dropped. Every `list`
//! takes a read lock over the whole map. Suitable for unit tests,
//! integration tests, and benches; production deployments use the RocksDB
//! store from `identity-graph-storage`.
//!
//! A `BTreeMap` keeps keys in lexicographic order, which makes prefix
//! listing a plain range scan.

use std::collections::BTreeMap;
use std::ops::Bound;

use async_trait::async_trait;
use parking_lot::RwLock;
use tracing::trace;

use crate::error::{StoreError, StoreResult};
use crate::traits::{KeyPage, KeyValueStore};

/// Thread-safe in-memory key-value store.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.entries.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.read().is_empty()
    }
}

#[async_trait]
impl KeyValueStore for MemoryKeyValueStore {
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.entries.read().get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()> {
        self.entries.write().insert(key.to_string(), value);
        Ok(())
    }

    async fn delete(&self, key: &str) -> StoreResult<()> {
        self.entries.write().remove(key);
        Ok(())
    }

    async fn list(
        &self,
        prefix: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> StoreResult<KeyPage> {
        // Cursors encode the last key of the previous page; continuation
        // resumes strictly after it.
        let start = match cursor {
            Some(c) if !c.starts_with(prefix) => {
                return Err(StoreError::InvalidCursor {
                    prefix: prefix.to_string(),
                    cursor: c.to_string(),
                });
            }
            Some(c) => Bound::Excluded(c.to_string()),
            None => Bound::Included(prefix.to_string()),
        };

        let entries = self.entries.read();
        let mut keys = Vec::new();
        let mut complete = true;
        for key in entries
            .range::<String, _>((start, Bound::Unbounded))
            .map(|(k, _)| k)
        {
            if !key.starts_with(prefix) {
                break;
            }
            if keys.len() == limit {
                complete = false;
                break;
            }
            keys.push(key.clone());
        }

        trace!(prefix, returned = keys.len(), complete, "listed keys");
        let cursor = if complete { None } else { keys.last().cloned() };
        Ok(KeyPage {
            keys,
            cursor,
            complete,
        })
    }
}
