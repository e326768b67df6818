//! History manager: the shadow log attached to a tracked table.

use crate::query::AuditLogQuery;
use crate::tracked::TrackedRecord;
use chrono::Utc;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use trail_commons::{
    ActionKind, AuditEntryId, AuditLogEntry, AuditLogKey, RecordId, Snapshot,
};
use trail_session::Identity;
use trail_store::{EntityStore, Operation, Partition, StorageBackend};

/// Typed store over one table's audit log partition.
pub(crate) struct AuditLogStore {
    backend: Arc<dyn StorageBackend>,
    partition: String,
}

impl EntityStore<AuditLogKey, AuditLogEntry> for AuditLogStore {
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &str {
        &self.partition
    }
}

/// Manages the append-only audit log of one tracked record type.
///
/// On every save of the owning type the manager decides whether the save was
/// a creation, a change, or a no-op, and produces the log entry to append for
/// the first two. Entries capture the full post-save snapshot, not a delta.
///
/// Tracking can be switched off temporarily (bulk imports, migrations) via
/// [`disable_tracking`](Self::disable_tracking); the switch only suppresses
/// new entries, it never touches existing ones.
pub struct AuditLogManager<R: TrackedRecord> {
    log_store: AuditLogStore,
    tracking_enabled: AtomicBool,
    _record: PhantomData<fn() -> R>,
}

impl<R: TrackedRecord> AuditLogManager<R> {
    /// Creates the manager and its log partition (`audit_log:{table}`).
    pub fn new(backend: Arc<dyn StorageBackend>) -> Result<Self, trail_store::StorageError> {
        let partition = format!("audit_log:{}", R::table());
        backend.create_partition(&Partition::new(partition.as_str()))?;
        Ok(Self {
            log_store: AuditLogStore { backend, partition },
            tracking_enabled: AtomicBool::new(true),
            _record: PhantomData,
        })
    }

    /// Re-enables entry production after a [`disable_tracking`](Self::disable_tracking).
    pub fn enable_tracking(&self) {
        self.tracking_enabled.store(true, Ordering::Release);
    }

    /// Suppresses entry production until re-enabled.
    pub fn disable_tracking(&self) {
        self.tracking_enabled.store(false, Ordering::Release);
    }

    /// True when saves currently produce log entries.
    pub fn is_tracking(&self) -> bool {
        self.tracking_enabled.load(Ordering::Acquire)
    }

    /// Decides what one save event appends to the log.
    ///
    /// Returns `None` for the idempotent case: an update whose snapshot is
    /// identical to the prior state.
    pub(crate) fn prepare_entry(
        &self,
        record_id: RecordId,
        prior: Option<&Snapshot>,
        current: &Snapshot,
        identity: Option<&Identity>,
    ) -> Option<(AuditLogKey, AuditLogEntry)> {
        let action = match prior {
            None => ActionKind::Created,
            Some(prior) if prior.same_as(current) => return None,
            Some(_) => ActionKind::Changed,
        };

        let timestamp = Utc::now().timestamp_millis();
        let entry_id = AuditEntryId::generate(timestamp);
        let key = AuditLogKey::new(record_id.clone(), timestamp, entry_id.clone());
        let entry = AuditLogEntry {
            entry_id,
            record_id,
            timestamp,
            actor: identity.and_then(|i| i.user.clone()),
            session_key: identity.and_then(|i| i.session_key.clone()),
            action,
            snapshot: current.clone(),
        };
        log::debug!(
            "audit[{}]: {} entry for record '{}'",
            self.log_store.partition,
            action,
            entry.record_id
        );
        Some((key, entry))
    }

    /// Batch operation appending one prepared entry.
    pub(crate) fn put_operation(
        &self,
        key: &AuditLogKey,
        entry: &AuditLogEntry,
    ) -> Result<Operation, trail_store::StorageError> {
        self.log_store.put_operation(key, entry)
    }

    /// Writes one prepared entry outside a batch (best-effort mode).
    pub(crate) fn put_entry(
        &self,
        key: &AuditLogKey,
        entry: &AuditLogEntry,
    ) -> Result<(), trail_store::StorageError> {
        self.log_store.put(key, entry)
    }

    /// All entries for one record, in chronological save order.
    pub fn entries_for(
        &self,
        record_id: &RecordId,
    ) -> Result<Vec<AuditLogEntry>, trail_store::StorageError> {
        let prefix = AuditLogKey::record_prefix(record_id);
        Ok(self
            .log_store
            .scan_prefix(&prefix)?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect())
    }

    /// Every entry in the table's log, grouped by record and chronological
    /// within each record.
    pub fn all_entries(&self) -> Result<Vec<AuditLogEntry>, trail_store::StorageError> {
        Ok(self
            .log_store
            .scan_all()?
            .into_iter()
            .map(|(_, entry)| entry)
            .collect())
    }

    /// Starts a filterable query over this table's log.
    pub fn query(&self) -> AuditLogQuery<'_> {
        AuditLogQuery::new(&self.log_store)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::{Deserialize, Serialize};
    use trail_commons::{SessionKey, UserId};
    use trail_store::InMemoryBackend;

    #[derive(Debug, Clone, Serialize, Deserialize)]
    struct Note {
        id: String,
        body: String,
    }

    impl TrackedRecord for Note {
        type Key = RecordId;

        fn table() -> trail_commons::TableName {
            trail_commons::TableName::new("notes")
        }

        fn key(&self) -> RecordId {
            RecordId::new(&self.id)
        }
    }

    fn manager() -> AuditLogManager<Note> {
        let backend: Arc<dyn StorageBackend> = Arc::new(InMemoryBackend::new());
        AuditLogManager::new(backend).unwrap()
    }

    fn snapshot(body: &str) -> Snapshot {
        Snapshot::of(&Note {
            id: "n1".to_string(),
            body: body.to_string(),
        })
        .unwrap()
    }

    #[test]
    fn first_save_prepares_created_entry() {
        let manager = manager();
        let current = snapshot("hello");
        let identity = Identity::new(UserId::new("u1"), SessionKey::new("s1"));

        let (_, entry) = manager
            .prepare_entry(RecordId::new("n1"), None, &current, Some(&identity))
            .unwrap();
        assert_eq!(entry.action, ActionKind::Created);
        assert_eq!(entry.actor, Some(UserId::new("u1")));
        assert_eq!(entry.snapshot, current);
    }

    #[test]
    fn unchanged_update_prepares_nothing() {
        let manager = manager();
        let current = snapshot("hello");
        assert!(manager
            .prepare_entry(RecordId::new("n1"), Some(&current.clone()), &current, None)
            .is_none());
    }

    #[test]
    fn changed_update_prepares_changed_entry_with_full_snapshot() {
        let manager = manager();
        let prior = snapshot("hello");
        let current = snapshot("goodbye");

        let (_, entry) = manager
            .prepare_entry(RecordId::new("n1"), Some(&prior), &current, None)
            .unwrap();
        assert_eq!(entry.action, ActionKind::Changed);
        assert!(entry.is_anonymous());
        // Full post-save state, not a delta.
        assert_eq!(entry.snapshot.len(), 2);
    }

    #[test]
    fn disable_tracking_is_observable() {
        let manager = manager();
        assert!(manager.is_tracking());
        manager.disable_tracking();
        assert!(!manager.is_tracking());
        manager.enable_tracking();
        assert!(manager.is_tracking());
    }

    #[test]
    fn entries_for_returns_chronological_order() {
        let manager = manager();
        let rid = RecordId::new("n1");

        for body in ["a", "b", "c"] {
            let current = snapshot(body);
            let prior = manager
                .entries_for(&rid)
                .unwrap()
                .last()
                .map(|e| e.snapshot.clone());
            let (key, entry) = manager
                .prepare_entry(rid.clone(), prior.as_ref(), &current, None)
                .unwrap();
            manager.put_entry(&key, &entry).unwrap();
        }

        let entries = manager.entries_for(&rid).unwrap();
        assert_eq!(entries.len(), 3);
        assert_eq!(entries[0].action, ActionKind::Created);
        assert_eq!(entries[1].action, ActionKind::Changed);
        assert!(entries.windows(2).all(|w| w[0].timestamp <= w[1].timestamp));
        assert_eq!(entries[2].snapshot.get("body"), Some(&serde_json::json!("c")));
    }
}
