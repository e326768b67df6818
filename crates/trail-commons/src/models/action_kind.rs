//! Action kind recorded on each audit log entry.

use serde::{Deserialize, Serialize};
use std::fmt;

/// What a save event did to the tracked record.
///
/// Deletions are intentionally absent: the audit trail ends at the last
/// `Changed` entry and entries outlive the record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ActionKind {
    /// First persistence of the record.
    Created,
    /// A subsequent save with at least one field differing.
    Changed,
}

impl ActionKind {
    /// Returns the wire/display name of the action.
    pub fn as_str(&self) -> &'static str {
        match self {
            ActionKind::Created => "created",
            ActionKind::Changed => "changed",
        }
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ActionKind::Created).unwrap(),
            "\"created\""
        );
        assert_eq!(
            serde_json::from_str::<ActionKind>("\"changed\"").unwrap(),
            ActionKind::Changed
        );
    }
}
