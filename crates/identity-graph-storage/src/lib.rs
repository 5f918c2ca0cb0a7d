#![deny(deprecated)]

//! Identity Graph Storage Layer
//!
//! RocksDB-backed implementation of the `KeyValueStore` contract consumed by
//! the graph layer. Keys live in a single `kv` column family and are
//! iterated in lexicographic order, which is exactly the ordering the
//! contract requires.
//!
//! The in-memory counterpart for tests lives in
//! `identity_graph_core::stubs::MemoryKeyValueStore`.

pub mod rocksdb_store;

pub use rocksdb_store::{
    RocksDbConfig, RocksDbKeyValueStore, DEFAULT_BLOCK_CACHE_SIZE, DEFAULT_MAX_OPEN_FILES,
};
