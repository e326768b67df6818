//! # trail-store
//!
//! Storage layer for the Trail workspace.
//!
//! ## Architecture
//!
//! ```text
//! EntityStore<K, V>        ← Typed entity CRUD with type-safe keys
//!     ↓
//! StorageBackend           ← Generic K/V operations over partitions
//!     ↓
//! InMemoryBackend / ...    ← Actual storage implementation
//! ```
//!
//! Tracked records and their audit logs live in separate partitions of the
//! same backend, which is what allows a record write and its log entry to
//! share one atomic batch.

pub mod entity_store;
pub mod memory;
pub mod storage_trait;

pub use entity_store::EntityStore;
pub use memory::InMemoryBackend;
pub use storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
