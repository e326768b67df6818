//! Shared data models for change tracking.

pub mod action_kind;
pub mod audit_entry;
pub mod audit_log_key;
pub mod snapshot;

pub use action_kind::ActionKind;
pub use audit_entry::AuditLogEntry;
pub use audit_log_key::AuditLogKey;
pub use snapshot::Snapshot;
