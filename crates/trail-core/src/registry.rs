//! Process-wide registry of tracked tables.
//!
//! Populated by [`crate::TrackedStoreBuilder::build`]; read-only for
//! everything else. Exists for introspection (which tables are tracked, and
//! how), not for dispatch; stores hold their own managers directly.

use dashmap::DashMap;
use once_cell::sync::Lazy;
use trail_commons::TableName;

/// How a table participates in change tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TrackingMode {
    /// Attribution fields are stamped on save.
    pub attribution: bool,
    /// Saves append to a shadow audit log.
    pub history: bool,
}

static REGISTRY: Lazy<DashMap<TableName, TrackingMode>> = Lazy::new(DashMap::new);

/// Registry facade over the process-wide table map.
pub struct AuditRegistry;

impl AuditRegistry {
    /// Records (or updates) a table's tracking mode.
    pub fn register(table: TableName, mode: TrackingMode) {
        REGISTRY.insert(table, mode);
    }

    /// Returns the tracking mode of a table, if it is registered.
    pub fn tracking_mode(table: &TableName) -> Option<TrackingMode> {
        REGISTRY.get(table).map(|entry| *entry.value())
    }

    /// Snapshot of every registered table and its mode.
    pub fn tracked_tables() -> Vec<(TableName, TrackingMode)> {
        REGISTRY
            .iter()
            .map(|entry| (entry.key().clone(), *entry.value()))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn register_and_look_up() {
        let table = TableName::new("registry_test_table");
        AuditRegistry::register(
            table.clone(),
            TrackingMode {
                attribution: true,
                history: false,
            },
        );

        let mode = AuditRegistry::tracking_mode(&table).unwrap();
        assert!(mode.attribution);
        assert!(!mode.history);
        assert!(AuditRegistry::tracked_tables()
            .iter()
            .any(|(t, _)| t == &table));
    }

    #[test]
    fn unknown_table_is_absent() {
        assert!(AuditRegistry::tracking_mode(&TableName::new("never_registered")).is_none());
    }
}
