//! Audit log entry model.

use crate::ids::{AuditEntryId, RecordId, SessionKey, UserId};
use crate::models::{ActionKind, Snapshot};
use serde::{Deserialize, Serialize};

/// One immutable row in a table's audit log.
///
/// Captures the full post-save state of a tracked record together with the
/// acting identity. Entries are append-only; nothing in the system mutates or
/// deletes them, and they survive deletion of the record they reference.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditLogEntry {
    /// Unique entry identifier.
    pub entry_id: AuditEntryId,
    /// Weak back-reference to the tracked record.
    pub record_id: RecordId,
    /// Millisecond timestamp of the save.
    pub timestamp: i64,
    /// Acting user, when a request identity was in scope.
    pub actor: Option<UserId>,
    /// Session key of the acting request, when one existed.
    pub session_key: Option<SessionKey>,
    /// Whether this save created the record or changed it.
    pub action: ActionKind,
    /// Full field values as persisted by this save.
    pub snapshot: Snapshot,
}

impl AuditLogEntry {
    /// True when the entry was written outside any request identity.
    pub fn is_anonymous(&self) -> bool {
        self.actor.is_none()
    }
}
