//! The trait a record type implements to become trackable.

use serde::de::DeserializeOwned;
use serde::Serialize;
use trail_commons::{RecordId, StorageKey, TableName};
use trail_session::Identity;

/// A persisted entity opting into attribution and/or history.
///
/// The serialized form of the record defines its tracked fields: snapshots
/// and diffs are computed from the JSON object it serializes to, so whatever
/// serde sees is what the audit log captures.
///
/// ## Example
///
/// ```rust,ignore
/// #[derive(Serialize, Deserialize)]
/// struct Product {
///     id: String,
///     name: String,
///     #[serde(flatten)]
///     attribution: Attribution,
/// }
///
/// impl TrackedRecord for Product {
///     type Key = RecordId;
///
///     fn table() -> TableName {
///         TableName::new("products")
///     }
///
///     fn key(&self) -> RecordId {
///         RecordId::new(&self.id)
///     }
///
///     fn apply_attribution(&mut self, identity: &Identity, is_create: bool) {
///         self.attribution.record_save(identity, is_create);
///     }
/// }
/// ```
pub trait TrackedRecord: Serialize + DeserializeOwned + Send + Sync {
    /// Typed storage key for this record type.
    type Key: StorageKey + Send + Sync;

    /// Table name; also names the shadow log partition.
    fn table() -> TableName;

    /// Storage key of this instance.
    fn key(&self) -> Self::Key;

    /// Record id used as the log entries' back-reference.
    fn record_id(&self) -> RecordId {
        RecordId::from_key_bytes(&self.key().storage_key())
    }

    /// Attribution hook, called once per save when attribution is enabled
    /// and an identity is in scope. Default is a no-op; types embedding an
    /// [`crate::Attribution`] forward to
    /// [`crate::Attribution::record_save`].
    fn apply_attribution(&mut self, _identity: &Identity, _is_create: bool) {}
}
