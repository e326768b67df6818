//! Filterable queries over a table's audit log.

use crate::manager::AuditLogStore;
use trail_commons::{ActionKind, AuditLogEntry, AuditLogKey, RecordId, UserId};
use trail_store::EntityStore;

/// Builder-style query over one table's log entries.
///
/// Obtained from [`crate::AuditLogManager::query`]. Filters combine with
/// logical AND; results come back in chronological save order unless
/// [`descending`](Self::descending) is set. Per-record queries scan only that
/// record's key range.
///
/// ```rust,ignore
/// let changes = store.audit_log().unwrap()
///     .query()
///     .for_record(RecordId::new("p1"))
///     .action(ActionKind::Changed)
///     .limit(10)
///     .execute()?;
/// ```
pub struct AuditLogQuery<'a> {
    store: &'a AuditLogStore,
    record: Option<RecordId>,
    action: Option<ActionKind>,
    actor: Option<UserId>,
    since: Option<i64>,
    limit: Option<usize>,
    descending: bool,
}

impl<'a> AuditLogQuery<'a> {
    pub(crate) fn new(store: &'a AuditLogStore) -> Self {
        Self {
            store,
            record: None,
            action: None,
            actor: None,
            since: None,
            limit: None,
            descending: false,
        }
    }

    /// Restrict to entries of one record.
    pub fn for_record(mut self, record_id: RecordId) -> Self {
        self.record = Some(record_id);
        self
    }

    /// Restrict to one action kind.
    pub fn action(mut self, action: ActionKind) -> Self {
        self.action = Some(action);
        self
    }

    /// Restrict to entries written by one acting user.
    pub fn actor(mut self, actor: UserId) -> Self {
        self.actor = Some(actor);
        self
    }

    /// Restrict to entries at or after the given millisecond timestamp.
    pub fn since(mut self, timestamp_ms: i64) -> Self {
        self.since = Some(timestamp_ms);
        self
    }

    /// Cap the number of returned entries (applied after ordering).
    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Newest entries first.
    pub fn descending(mut self) -> Self {
        self.descending = true;
        self
    }

    /// Runs the query.
    pub fn execute(self) -> Result<Vec<AuditLogEntry>, trail_store::StorageError> {
        let scanned = match &self.record {
            Some(record_id) => self
                .store
                .scan_prefix(&AuditLogKey::record_prefix(record_id))?,
            None => self.store.scan_all()?,
        };

        let mut entries: Vec<AuditLogEntry> = scanned
            .into_iter()
            .map(|(_, entry)| entry)
            .filter(|entry| {
                self.action.map_or(true, |action| entry.action == action)
                    && self
                        .actor
                        .as_ref()
                        .map_or(true, |actor| entry.actor.as_ref() == Some(actor))
                    && self.since.map_or(true, |since| entry.timestamp >= since)
            })
            .collect();

        // Cross-record scans come back in key order; normalize to time order.
        entries.sort_by(|a, b| {
            (a.timestamp, a.entry_id.as_str()).cmp(&(b.timestamp, b.entry_id.as_str()))
        });
        if self.descending {
            entries.reverse();
        }
        if let Some(limit) = self.limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }
}
