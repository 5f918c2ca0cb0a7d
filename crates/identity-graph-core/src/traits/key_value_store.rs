//! Key-value store contract.
//!
//! This is the narrow interface the graph layer consumes: point get/put/
//! delete plus prefix-ordered listing with opaque cursors. No atomicity is
//! promised across operations; failures propagate unchanged as
//! [`StoreError`].
//!
//! # Object Safety
//!
//! The trait is object-safe: all methods take `&self`, return concrete
//! types, and implementors must be `Send + Sync`, so higher layers hold an
//! `Arc<dyn KeyValueStore>`.

use async_trait::async_trait;

use crate::error::StoreResult;

/// One page of a prefix listing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KeyPage {
    /// Matching keys in ascending lexicographic order.
    pub keys: Vec<String>,
    /// Continuation cursor; present iff `complete` is false. Opaque to
    /// callers, and only valid with the prefix that produced it.
    pub cursor: Option<String>,
    /// True iff no further keys with the prefix remain.
    pub complete: bool,
}

/// Flat ordered key-value store with prefix listing.
///
/// Keys are UTF-8 strings ordered lexicographically; values are opaque bytes
/// (JSON throughout this system).
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Point read. `Ok(None)` when the key does not exist.
    async fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Writes a value, overwriting any previous one.
    async fn put(&self, key: &str, value: Vec<u8>) -> StoreResult<()>;

    /// Deletes a key. Succeeds whether or not the key existed.
    async fn delete(&self, key: &str) -> StoreResult<()>;

    /// Lists up to `limit` keys with the given prefix in ascending order,
    /// resuming after `cursor` when one is supplied.
    async fn list(
        &self,
        prefix: &str,
        limit: usize,
        cursor: Option<&str>,
    ) -> StoreResult<KeyPage>;
}
