//! Tracked stores: the save pipeline tying attribution, diffing and the
//! audit log together.

use crate::error::Result;
use crate::manager::AuditLogManager;
use crate::registry::{AuditRegistry, TrackingMode};
use crate::tracked::TrackedRecord;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;
use trail_commons::{AuditConfig, Snapshot};
use trail_session::{CurrentIdentity, Identity};
use trail_store::{EntityStore, Partition, StorageBackend};

/// What a save actually did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// First persistence of the record.
    Created,
    /// At least one field differed from the prior state.
    Changed,
    /// Nothing differed; nothing was written.
    Unchanged,
}

impl fmt::Display for SaveOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SaveOutcome::Created => "created",
            SaveOutcome::Changed => "changed",
            SaveOutcome::Unchanged => "unchanged",
        })
    }
}

/// Plain typed store over the record partition. Never exposed directly:
/// every write has to go through the tracked save pipeline.
struct RecordStore<R: TrackedRecord> {
    backend: Arc<dyn StorageBackend>,
    partition: String,
    _record: PhantomData<fn() -> R>,
}

impl<R> EntityStore<R::Key, R> for RecordStore<R>
where
    R: TrackedRecord + Serialize + DeserializeOwned + Send + Sync,
{
    fn backend(&self) -> &Arc<dyn StorageBackend> {
        &self.backend
    }

    fn partition(&self) -> &str {
        &self.partition
    }
}

/// Composes a [`TrackedStore`] from its parts.
///
/// This is the declarative attachment point: the builder augments the base
/// record type description with attribution and/or a paired shadow log, and
/// registers the result in the [`AuditRegistry`].
pub struct TrackedStoreBuilder<R: TrackedRecord> {
    backend: Arc<dyn StorageBackend>,
    attribution: bool,
    history: bool,
    config: AuditConfig,
    _record: PhantomData<fn() -> R>,
}

impl<R: TrackedRecord> TrackedStoreBuilder<R> {
    pub fn new(backend: Arc<dyn StorageBackend>) -> Self {
        Self {
            backend,
            attribution: false,
            history: false,
            config: AuditConfig::default(),
            _record: PhantomData,
        }
    }

    /// Stamp attribution fields on save (the record type must override
    /// [`TrackedRecord::apply_attribution`]).
    pub fn with_attribution(mut self) -> Self {
        self.attribution = true;
        self
    }

    /// Pair the store with a shadow audit log.
    pub fn with_history(mut self) -> Self {
        self.history = true;
        self
    }

    /// Apply an [`AuditConfig`] (kill switch, write-mode).
    pub fn with_config(mut self, config: AuditConfig) -> Self {
        self.config = config;
        self
    }

    /// Creates the partitions and the store.
    pub fn build(self) -> Result<TrackedStore<R>> {
        let table = R::table();
        let partition = format!("table:{}", table);
        self.backend
            .create_partition(&Partition::new(partition.as_str()))?;

        let disabled = self.config.disabled;
        if disabled && (self.attribution || self.history) {
            log::warn!(
                "audit log disabled by configuration; table '{}' will not be tracked",
                table
            );
        }
        let attribution = self.attribution && !disabled;
        let history = if self.history && !disabled {
            Some(AuditLogManager::new(self.backend.clone())?)
        } else {
            None
        };

        AuditRegistry::register(
            table,
            TrackingMode {
                attribution,
                history: history.is_some(),
            },
        );

        Ok(TrackedStore {
            records: RecordStore {
                backend: self.backend.clone(),
                partition,
                _record: PhantomData,
            },
            backend: self.backend,
            attribution,
            atomic_log_writes: self.config.atomic_log_writes,
            history,
        })
    }
}

/// Store for one tracked record type.
///
/// All persistence of the type goes through [`save`](Self::save) /
/// [`save_as`](Self::save_as), which is what upholds the invariant that
/// every effective save of a history-enabled record appends exactly one log
/// entry.
pub struct TrackedStore<R: TrackedRecord> {
    records: RecordStore<R>,
    backend: Arc<dyn StorageBackend>,
    attribution: bool,
    atomic_log_writes: bool,
    history: Option<AuditLogManager<R>>,
}

impl<R: TrackedRecord> TrackedStore<R> {
    /// Starts building a store for `R` on the given backend.
    pub fn builder(backend: Arc<dyn StorageBackend>) -> TrackedStoreBuilder<R> {
        TrackedStoreBuilder::new(backend)
    }

    /// Saves under the identity currently in scope (request middleware or an
    /// explicit [`CurrentIdentity`] scope). Outside any scope the save
    /// proceeds without attribution and with an anonymous log entry.
    pub fn save(&self, record: &mut R) -> Result<SaveOutcome> {
        let identity = CurrentIdentity::get();
        self.save_as(identity.as_ref(), record)
    }

    /// Saves under an explicitly passed identity.
    ///
    /// This is the primary entry point; [`save`](Self::save) is the ambient
    /// convenience wrapper over it.
    pub fn save_as(&self, identity: Option<&Identity>, record: &mut R) -> Result<SaveOutcome> {
        let key = record.key();
        let record_id = record.record_id();

        let prior = self.records.get(&key)?;
        let is_create = prior.is_none();

        if self.attribution {
            if let Some(identity) = identity {
                record.apply_attribution(identity, is_create);
            }
        }

        let current = Snapshot::of(record)?;
        let prior_snapshot = match &prior {
            Some(prior) => Some(Snapshot::of(prior)?),
            None => None,
        };

        if let Some(prior_snapshot) = &prior_snapshot {
            if prior_snapshot.same_as(&current) {
                log::debug!("save of '{}' changed nothing; skipping", record_id);
                return Ok(SaveOutcome::Unchanged);
            }
        }

        let log_write = match &self.history {
            Some(manager) if manager.is_tracking() => {
                manager.prepare_entry(record_id, prior_snapshot.as_ref(), &current, identity)
            }
            _ => None,
        };

        if self.atomic_log_writes {
            // Record and log entry share one unit of work: a failed log
            // write also aborts the record write.
            let mut operations = vec![self.records.put_operation(&key, record)?];
            if let (Some(manager), Some((log_key, entry))) = (&self.history, &log_write) {
                operations.push(manager.put_operation(log_key, entry)?);
            }
            self.backend.batch(operations)?;
        } else {
            self.records.put(&key, record)?;
            if let (Some(manager), Some((log_key, entry))) = (&self.history, &log_write) {
                manager.put_entry(log_key, entry)?;
            }
        }

        Ok(if is_create {
            SaveOutcome::Created
        } else {
            SaveOutcome::Changed
        })
    }

    /// Fetches a record by key.
    pub fn get(&self, key: &R::Key) -> Result<Option<R>> {
        Ok(self.records.get(key)?)
    }

    /// Deletes a record.
    ///
    /// Writes no log entry; the record's audit trail ends at its last entry
    /// and existing entries are retained.
    pub fn delete(&self, key: &R::Key) -> Result<()> {
        Ok(self.records.delete(key)?)
    }

    /// All records in the table.
    pub fn scan_all(&self) -> Result<Vec<R>> {
        Ok(self
            .records
            .scan_all()?
            .into_iter()
            .map(|(_, record)| record)
            .collect())
    }

    /// The paired history manager, when built `with_history()`.
    pub fn audit_log(&self) -> Option<&AuditLogManager<R>> {
        self.history.as_ref()
    }
}
