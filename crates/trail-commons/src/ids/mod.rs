//! Type-safe identifier wrappers.
//!
//! One file per id type. Wrappers exist so a `UserId` can never be passed
//! where a `RecordId` or `TableName` is expected.

pub mod audit_entry_id;
pub mod record_id;
pub mod session_key;
pub mod table_name;
pub mod user_id;

pub use audit_entry_id::AuditEntryId;
pub use record_id::RecordId;
pub use session_key::SessionKey;
pub use table_name::TableName;
pub use user_id::UserId;
