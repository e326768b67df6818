//! In-memory storage backend.
//!
//! Partition = map namespace: each partition is a `BTreeMap` so scans come
//! back in lexicographic key order, matching what an ordered engine would
//! return. Batches apply under a single write lock, which makes them atomic
//! with respect to every other operation.

use crate::storage_trait::{Operation, Partition, Result, StorageBackend, StorageError};
use parking_lot::RwLock;
use std::any::Any;
use std::collections::{BTreeMap, HashMap};

type PartitionMap = BTreeMap<Vec<u8>, Vec<u8>>;

/// Thread-safe in-memory backend.
///
/// The default engine for tests and embedded use. Data does not survive the
/// process; durability belongs to whichever engine the host configures.
#[derive(Default)]
pub struct InMemoryBackend {
    partitions: RwLock<HashMap<String, PartitionMap>>,
}

impl InMemoryBackend {
    /// Creates an empty backend with no partitions.
    pub fn new() -> Self {
        Self::default()
    }
}

impl StorageBackend for InMemoryBackend {
    fn get(&self, partition: &Partition, key: &[u8]) -> Result<Option<Vec<u8>>> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        Ok(map.get(key).cloned())
    }

    fn put(&self, partition: &Partition, key: &[u8], value: &[u8]) -> Result<()> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        map.insert(key.to_vec(), value.to_vec());
        Ok(())
    }

    fn delete(&self, partition: &Partition, key: &[u8]) -> Result<()> {
        let mut partitions = self.partitions.write();
        let map = partitions
            .get_mut(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;
        map.remove(key);
        Ok(())
    }

    fn batch(&self, operations: Vec<Operation>) -> Result<()> {
        let mut partitions = self.partitions.write();

        // Validate every target partition before touching anything, so a
        // failing batch leaves no partial state behind.
        for op in &operations {
            let name = match op {
                Operation::Put { partition, .. } => partition.name(),
                Operation::Delete { partition, .. } => partition.name(),
            };
            if !partitions.contains_key(name) {
                return Err(StorageError::PartitionNotFound(name.to_string()));
            }
        }

        for op in operations {
            match op {
                Operation::Put {
                    partition,
                    key,
                    value,
                } => {
                    partitions
                        .get_mut(partition.name())
                        .expect("partition checked above")
                        .insert(key, value);
                }
                Operation::Delete { partition, key } => {
                    partitions
                        .get_mut(partition.name())
                        .expect("partition checked above")
                        .remove(&key);
                }
            }
        }
        Ok(())
    }

    fn scan(
        &self,
        partition: &Partition,
        prefix: Option<&[u8]>,
        limit: Option<usize>,
    ) -> Result<Vec<(Vec<u8>, Vec<u8>)>> {
        let partitions = self.partitions.read();
        let map = partitions
            .get(partition.name())
            .ok_or_else(|| StorageError::PartitionNotFound(partition.name().to_string()))?;

        let mut results = Vec::new();
        for (key, value) in map.iter() {
            if let Some(prefix) = prefix {
                if !key.starts_with(prefix) {
                    continue;
                }
            }
            results.push((key.clone(), value.clone()));
            if let Some(limit) = limit {
                if results.len() >= limit {
                    break;
                }
            }
        }
        Ok(results)
    }

    fn partition_exists(&self, partition: &Partition) -> bool {
        self.partitions.read().contains_key(partition.name())
    }

    fn create_partition(&self, partition: &Partition) -> Result<()> {
        let mut partitions = self.partitions.write();
        if !partitions.contains_key(partition.name()) {
            log::debug!("creating in-memory partition '{}'", partition.name());
            partitions.insert(partition.name().to_string(), PartitionMap::new());
        }
        Ok(())
    }

    fn list_partitions(&self) -> Result<Vec<Partition>> {
        Ok(self
            .partitions
            .read()
            .keys()
            .map(|name| Partition::new(name.clone()))
            .collect())
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn backend_with(partition: &str) -> InMemoryBackend {
        let backend = InMemoryBackend::new();
        backend.create_partition(&Partition::new(partition)).unwrap();
        backend
    }

    #[test]
    fn operations_on_missing_partition_fail() {
        let backend = InMemoryBackend::new();
        let p = Partition::new("nope");
        assert!(matches!(
            backend.get(&p, b"k"),
            Err(StorageError::PartitionNotFound(_))
        ));
        assert!(matches!(
            backend.put(&p, b"k", b"v"),
            Err(StorageError::PartitionNotFound(_))
        ));
    }

    #[test]
    fn create_partition_is_idempotent() {
        let backend = backend_with("p");
        backend.put(&Partition::new("p"), b"k", b"v").unwrap();
        backend.create_partition(&Partition::new("p")).unwrap();
        assert_eq!(
            backend.get(&Partition::new("p"), b"k").unwrap(),
            Some(b"v".to_vec())
        );
    }

    #[test]
    fn scan_returns_keys_in_order() {
        let backend = backend_with("p");
        let p = Partition::new("p");
        for key in [b"b".as_slice(), b"a", b"c"] {
            backend.put(&p, key, b"v").unwrap();
        }
        let keys: Vec<_> = backend
            .scan(&p, None, None)
            .unwrap()
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(keys, vec![b"a".to_vec(), b"b".to_vec(), b"c".to_vec()]);
    }

    #[test]
    fn scan_honors_prefix_and_limit() {
        let backend = backend_with("p");
        let p = Partition::new("p");
        for key in ["a1", "a2", "a3", "b1"] {
            backend.put(&p, key.as_bytes(), b"v").unwrap();
        }
        assert_eq!(backend.scan(&p, Some(b"a"), None).unwrap().len(), 3);
        assert_eq!(backend.scan(&p, Some(b"a"), Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn failed_batch_applies_nothing() {
        let backend = backend_with("p");
        let ops = vec![
            Operation::Put {
                partition: Partition::new("p"),
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
            Operation::Put {
                partition: Partition::new("missing"),
                key: b"k".to_vec(),
                value: b"v".to_vec(),
            },
        ];
        assert!(backend.batch(ops).is_err());
        assert_eq!(backend.get(&Partition::new("p"), b"k").unwrap(), None);
    }
}
