//! # trail-commons
//!
//! Shared building blocks for the Trail workspace:
//! - Type-safe identifier wrappers ([`UserId`], [`SessionKey`], [`RecordId`],
//!   [`AuditEntryId`], [`TableName`])
//! - The [`StorageKey`] trait connecting ids to the storage layer
//! - Shared models ([`ActionKind`], [`Snapshot`], [`AuditLogEntry`],
//!   [`AuditLogKey`])
//! - The shared [`CommonError`] type and [`AuditConfig`]
//!
//! This crate sits at the bottom of the dependency graph; everything else in
//! the workspace depends on it.

pub mod config;
pub mod errors;
pub mod ids;
pub mod models;
pub mod storage_key;

pub use config::AuditConfig;
pub use errors::{CommonError, Result};
pub use ids::{AuditEntryId, RecordId, SessionKey, TableName, UserId};
pub use models::{ActionKind, AuditLogEntry, AuditLogKey, Snapshot};
pub use storage_key::StorageKey;
