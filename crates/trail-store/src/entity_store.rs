//! Type-safe entity storage with generic key types.
//!
//! `EntityStore<K, V>` layers typed CRUD on top of [`StorageBackend`]: keys
//! are strongly typed via [`StorageKey`], values are (de)serialized with
//! serde_json. Implementors only name their backend and partition; the rest
//! is provided.

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use trail_commons::StorageKey;

/// Trait for typed entity storage with type-safe keys and automatic
/// serialization.
///
/// ## Type Parameters
/// - `K`: Key type implementing [`StorageKey`] (RecordId, AuditLogKey, ...)
/// - `V`: Entity type, `Serialize + DeserializeOwned`
///
/// ## Required Methods
/// - `backend()`: the storage backend
/// - `partition()`: partition name for this entity type
pub trait EntityStore<K, V>
where
    K: StorageKey,
    V: Serialize + DeserializeOwned + Send + Sync,
{
    /// Returns a reference to the storage backend.
    fn backend(&self) -> &Arc<dyn StorageBackend>;

    /// Returns the partition name for this entity type.
    ///
    /// Examples: `"table:products"`, `"audit_log:products"`
    fn partition(&self) -> &str;

    /// Serializes an entity to bytes. Default is JSON.
    fn serialize(&self, entity: &V) -> Result<Vec<u8>> {
        serde_json::to_vec(entity).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Deserializes bytes to an entity. Default is JSON.
    fn deserialize(&self, bytes: &[u8]) -> Result<V> {
        serde_json::from_slice(bytes).map_err(|e| StorageError::SerializationError(e.to_string()))
    }

    /// Stores an entity with the given key.
    fn put(&self, key: &K, entity: &V) -> Result<()> {
        let partition = Partition::new(self.partition());
        let value = self.serialize(entity)?;
        self.backend().put(&partition, &key.storage_key(), &value)
    }

    /// Builds the batch operation that would store this entity.
    ///
    /// Lets callers combine writes to several stores into one atomic
    /// [`StorageBackend::batch`] call.
    fn put_operation(&self, key: &K, entity: &V) -> Result<Operation> {
        Ok(Operation::Put {
            partition: Partition::new(self.partition()),
            key: key.storage_key(),
            value: self.serialize(entity)?,
        })
    }

    /// Retrieves an entity by key.
    ///
    /// Returns `Ok(None)` if the key doesn't exist.
    fn get(&self, key: &K) -> Result<Option<V>> {
        let partition = Partition::new(self.partition());
        match self.backend().get(&partition, &key.storage_key())? {
            Some(bytes) => Ok(Some(self.deserialize(&bytes)?)),
            None => Ok(None),
        }
    }

    /// Deletes an entity by key (idempotent).
    fn delete(&self, key: &K) -> Result<()> {
        let partition = Partition::new(self.partition());
        self.backend().delete(&partition, &key.storage_key())
    }

    /// Stores multiple entities atomically in a batch.
    fn batch_put(&self, entries: &[(K, V)]) -> Result<()> {
        let operations: Result<Vec<Operation>> = entries
            .iter()
            .map(|(key, entity)| self.put_operation(key, entity))
            .collect();
        self.backend().batch(operations?)
    }

    /// Scans entities with keys matching the given prefix, in key order.
    fn scan_prefix(&self, prefix: &[u8]) -> Result<Vec<(Vec<u8>, V)>> {
        let partition = Partition::new(self.partition());
        let pairs = self.backend().scan(&partition, Some(prefix), None)?;

        let mut results = Vec::with_capacity(pairs.len());
        for (key_bytes, value_bytes) in pairs {
            results.push((key_bytes, self.deserialize(&value_bytes)?));
        }
        Ok(results)
    }

    /// Scans all entities in the partition, in key order.
    ///
    /// Loads everything into memory; audit log partitions are bounded by the
    /// caller via query limits before this is a concern.
    fn scan_all(&self) -> Result<Vec<(Vec<u8>, V)>> {
        let partition = Partition::new(self.partition());
        let pairs = self.backend().scan(&partition, None, None)?;

        let mut results = Vec::with_capacity(pairs.len());
        for (key_bytes, value_bytes) in pairs {
            results.push((key_bytes, self.deserialize(&value_bytes)?));
        }
        Ok(results)
    }
}
