//! Error type for tracking operations.

use thiserror::Error;

/// Result alias over [`AuditError`].
pub type Result<T> = std::result::Result<T, AuditError>;

/// Errors surfaced by save, diff and log operations.
///
/// A failed log write is deliberately a hard error: swallowing it would
/// silently lose audit data.
#[derive(Debug, Error)]
pub enum AuditError {
    #[error("storage error: {0}")]
    Storage(#[from] trail_store::StorageError),

    #[error(transparent)]
    Common(#[from] trail_commons::CommonError),
}
