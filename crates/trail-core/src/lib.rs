//! # trail-core
//!
//! Change tracking and attribution for records persisted through
//! `trail-store`.
//!
//! Two independent opt-ins, combinable per record type:
//!
//! - **Attribution**: embed an [`Attribution`] struct and forward the
//!   [`TrackedRecord::apply_attribution`] hook to it. Every save stamps
//!   `modified_*` (and `created_*` on first save) from the identity in scope.
//! - **History**: build the record's [`TrackedStore`] `with_history()`. Every
//!   effective save appends one immutable [`AuditLogEntry`] snapshot to the
//!   table's shadow log partition; saves that change nothing append nothing.
//!
//! ## Save pipeline
//!
//! ```text
//! save() → resolve identity → fetch prior state → apply attribution
//!        → snapshot + diff → created / changed / no-op
//!        → persist record (+ log entry, atomically by default)
//! ```
//!
//! Identity resolution is explicit-first: `save_as` takes the identity as a
//! parameter; `save` is the convenience wrapper reading the context-scoped
//! store that the request middleware fills.

pub mod attribution;
pub mod error;
pub mod manager;
pub mod query;
pub mod registry;
pub mod store;
pub mod tracked;

pub use attribution::{Attributed, Attribution};
pub use error::{AuditError, Result};
pub use manager::AuditLogManager;
pub use query::AuditLogQuery;
pub use registry::{AuditRegistry, TrackingMode};
pub use store::{SaveOutcome, TrackedStore, TrackedStoreBuilder};
pub use tracked::TrackedRecord;

pub use trail_commons::{ActionKind, AuditLogEntry, AuditLogKey, Snapshot};
