//! The [`StorageKey`] trait connecting typed ids to the storage layer.

use crate::ids::{AuditEntryId, RecordId, SessionKey, TableName, UserId};

/// Types usable as keys in a storage partition.
///
/// Keys are byte strings; ordering of entries in a partition follows the
/// lexicographic order of these bytes, which is why composite keys encode
/// their timestamp component with fixed-width padding.
pub trait StorageKey: Send + Sync {
    /// Returns the byte representation used as the storage key.
    fn storage_key(&self) -> Vec<u8>;
}

impl StorageKey for RecordId {
    fn storage_key(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}

impl StorageKey for UserId {
    fn storage_key(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}

impl StorageKey for SessionKey {
    fn storage_key(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}

impl StorageKey for AuditEntryId {
    fn storage_key(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}

impl StorageKey for TableName {
    fn storage_key(&self) -> Vec<u8> {
        self.as_str().as_bytes().to_vec()
    }
}

impl StorageKey for String {
    fn storage_key(&self) -> Vec<u8> {
        self.as_bytes().to_vec()
    }
}
