//! Type-safe key for audit log entries.
//!
//! Combines the record id, a millisecond timestamp and the entry id into a
//! lexicographically sortable key. Scanning a log partition with the record
//! id as prefix yields that record's entries in chronological save order.

use crate::ids::{AuditEntryId, RecordId};
use crate::storage_key::StorageKey;
use std::fmt;

/// Separator between the record id and the time-ordered tail of the key.
///
/// `0x1f` (unit separator) sorts below all printable characters, so a record
/// id is never a prefix of another record's key range.
const SEPARATOR: char = '\u{1f}';

/// Composite key for audit log entries.
///
/// Keys are formatted as `{record_id}\u{1f}{timestamp:020}_{entry_id}` to
/// group entries per record while preserving time order within the group.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct AuditLogKey {
    record_id: RecordId,
    timestamp: i64,
    entry_id: AuditEntryId,
    key: String,
}

impl AuditLogKey {
    /// Creates a new audit log key from its components.
    pub fn new(record_id: RecordId, timestamp: i64, entry_id: AuditEntryId) -> Self {
        let key = format!(
            "{}{}{:020}_{}",
            record_id.as_str(),
            SEPARATOR,
            timestamp,
            entry_id.as_str()
        );
        Self {
            record_id,
            timestamp,
            entry_id,
            key,
        }
    }

    /// Returns the prefix covering every key of the given record.
    pub fn record_prefix(record_id: &RecordId) -> Vec<u8> {
        format!("{}{}", record_id.as_str(), SEPARATOR).into_bytes()
    }

    /// Returns the record id component.
    pub fn record_id(&self) -> &RecordId {
        &self.record_id
    }

    /// Returns the millisecond timestamp component.
    pub fn timestamp(&self) -> i64 {
        self.timestamp
    }

    /// Returns the entry id component.
    pub fn entry_id(&self) -> &AuditEntryId {
        &self.entry_id
    }

    /// Returns the formatted key as a string slice.
    pub fn as_str(&self) -> &str {
        &self.key
    }
}

impl StorageKey for AuditLogKey {
    fn storage_key(&self) -> Vec<u8> {
        self.key.as_bytes().to_vec()
    }
}

impl AsRef<[u8]> for AuditLogKey {
    fn as_ref(&self) -> &[u8] {
        self.key.as_bytes()
    }
}

impl fmt::Display for AuditLogKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_sort_chronologically_within_a_record() {
        let rid = RecordId::new("r1");
        let a = AuditLogKey::new(rid.clone(), 1000, AuditEntryId::new("ae_1000_000001"));
        let b = AuditLogKey::new(rid.clone(), 2000, AuditEntryId::new("ae_2000_000002"));
        assert!(a.as_str() < b.as_str());
    }

    #[test]
    fn record_prefix_matches_only_its_own_keys() {
        let k = AuditLogKey::new(RecordId::new("r1"), 1000, AuditEntryId::new("e"));
        assert!(k.storage_key().starts_with(&AuditLogKey::record_prefix(&RecordId::new("r1"))));
        // "r1" must not capture "r10"
        let other = AuditLogKey::new(RecordId::new("r10"), 1000, AuditEntryId::new("e"));
        assert!(!other
            .storage_key()
            .starts_with(&AuditLogKey::record_prefix(&RecordId::new("r1"))));
    }

    #[test]
    fn same_millisecond_keys_order_by_entry_id() {
        let rid = RecordId::new("r1");
        let first = AuditLogKey::new(rid.clone(), 1000, AuditEntryId::generate(1000));
        let second = AuditLogKey::new(rid, 1000, AuditEntryId::generate(1000));
        assert!(first.as_str() < second.as_str());
    }
}
