//! Type-safe wrapper for audit log entry identifiers.
//!
//! Generated ids combine the millisecond timestamp with a process-wide
//! monotonic counter, so ids produced within the same millisecond still sort
//! in generation order.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};

static SEQUENCE: AtomicU64 = AtomicU64::new(0);

/// Identifier of a single audit log entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct AuditEntryId(String);

impl AuditEntryId {
    /// Creates an AuditEntryId from an existing string.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generates a fresh id for the given millisecond timestamp.
    ///
    /// The counter component keeps same-millisecond ids unique and ordered.
    pub fn generate(timestamp_ms: i64) -> Self {
        let seq = SEQUENCE.fetch_add(1, Ordering::Relaxed) % 1_000_000;
        Self(format!("ae_{}_{:06}", timestamp_ms, seq))
    }

    /// Returns the entry id as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for AuditEntryId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for AuditEntryId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for AuditEntryId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl AsRef<str> for AuditEntryId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_ids_are_unique_and_ordered_within_a_millisecond() {
        let a = AuditEntryId::generate(1730000000000);
        let b = AuditEntryId::generate(1730000000000);
        assert_ne!(a, b);
        assert!(a.as_str() < b.as_str());
    }
}
