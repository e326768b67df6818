//! Full-state field snapshots and field-level diffing.
//!
//! A snapshot is an ordered field-name → JSON value map taken from the
//! serialized form of a tracked record. Log entries store the entire
//! snapshot, not a delta; the diff is only used to decide whether an update
//! produced a log entry at all.

use crate::errors::{CommonError, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;

/// Ordered map of field name to field value at one save event.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Snapshot {
    values: BTreeMap<String, Value>,
}

impl Snapshot {
    /// Creates a snapshot from an existing field map.
    pub fn new(values: BTreeMap<String, Value>) -> Self {
        Self { values }
    }

    /// Takes a snapshot of any serializable record.
    ///
    /// The record must serialize to a JSON object; anything else is rejected
    /// because a non-object has no fields to track.
    pub fn of<T: Serialize>(record: &T) -> Result<Self> {
        let value = serde_json::to_value(record)
            .map_err(|e| CommonError::Serialization(e.to_string()))?;
        match value {
            Value::Object(map) => Ok(Self {
                values: map.into_iter().collect(),
            }),
            other => Err(CommonError::InvalidInput(format!(
                "tracked records must serialize to an object, got {}",
                type_name(&other)
            ))),
        }
    }

    /// Returns a field value by name.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.values.get(field)
    }

    /// Returns the names of fields whose value differs from `other`.
    ///
    /// Fields present in only one of the two snapshots count as changed.
    pub fn changed_fields(&self, other: &Snapshot) -> Vec<String> {
        let mut changed = Vec::new();
        for (name, value) in &self.values {
            if other.values.get(name) != Some(value) {
                changed.push(name.clone());
            }
        }
        for name in other.values.keys() {
            if !self.values.contains_key(name) {
                changed.push(name.clone());
            }
        }
        changed
    }

    /// True when both snapshots hold identical field values.
    pub fn same_as(&self, other: &Snapshot) -> bool {
        self.values == other.values
    }

    /// Number of fields in the snapshot.
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// True when the snapshot has no fields.
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterates over (field, value) pairs in field-name order.
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.values.iter()
    }
}

fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
