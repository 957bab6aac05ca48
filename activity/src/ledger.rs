use std::collections::HashSet;
use std::sync::Arc;

use chrono::SubsecRound;
use serde::Serialize;
use uuid::Uuid;

use crate::clock::Clock;
use crate::clock::SystemClock;
use crate::codec;
use crate::config::LedgerConfig;
use crate::error::LedgerError;
use crate::filter::FilterCriteria;
use crate::notify::LedgerEvent;
use crate::notify::SubscriptionId;
use crate::notify::Subscribers;
use crate::store::KeyValueStore;
use crate::types::ActivityRecord;
use crate::types::ActivityType;
use crate::types::Details;

/// Capped, newest-first log of inventory mutations.
///
/// Build one per process and share it by reference (usually `Arc<Ledger>`).
/// A ledger built with [`Ledger::detached`] has nowhere to persist: reads
/// return nothing and writes are no-ops, mirroring a page rendered outside
/// the browser.
///
/// The plain operations (`record`, `list`, `clear`, ...) never fail; they log
/// and degrade. The `try_` variants report the underlying error instead.
pub struct Ledger {
    storage: Option<Arc<dyn KeyValueStore>>,
    config: LedgerConfig,
    clock: Arc<dyn Clock>,
    subscribers: Subscribers,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CompactReport {
    /// Records found in storage.
    pub read: usize,
    /// Records left after dropping duplicates and enforcing the cap.
    pub kept: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct LedgerStats {
    pub total: usize,
    pub create: usize,
    pub update: usize,
    pub delete: usize,
}

impl Ledger {
    pub fn new(storage: Arc<dyn KeyValueStore>, config: LedgerConfig) -> Self {
        Self {
            storage: Some(storage),
            config: config.normalized(),
            clock: Arc::new(SystemClock),
            subscribers: Subscribers::default(),
        }
    }

    pub fn detached(config: LedgerConfig) -> Self {
        Self {
            storage: None,
            config: config.normalized(),
            clock: Arc::new(SystemClock),
            subscribers: Subscribers::default(),
        }
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn config(&self) -> &LedgerConfig {
        &self.config
    }

    pub fn is_attached(&self) -> bool {
        self.storage.is_some()
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&LedgerEvent) + Send + Sync + 'static,
    {
        self.subscribers.subscribe(callback)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.subscribers.unsubscribe(id)
    }

    /// Append a record for a completed mutation.
    ///
    /// Returns `None` when nothing could be persisted.
    pub fn record(
        &self,
        kind: ActivityType,
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        details: Option<Details>,
    ) -> Option<ActivityRecord> {
        match self.try_record(kind, item_id, item_name, details) {
            Ok(record) => Some(record),
            Err(err) => {
                degraded("record", &err);
                None
            }
        }
    }

    pub fn try_record(
        &self,
        kind: ActivityType,
        item_id: impl Into<String>,
        item_name: impl Into<String>,
        details: Option<Details>,
    ) -> Result<ActivityRecord, LedgerError> {
        let storage = self.storage()?;
        let mut records = self.load_for_write(storage)?;
        let record = ActivityRecord {
            id: Uuid::new_v4().to_string(),
            kind,
            item_id: item_id.into(),
            item_name: item_name.into(),
            details: details.unwrap_or_default(),
            timestamp: self.clock.now().trunc_subsecs(3),
            user: self.config.user.clone(),
        };
        records.insert(0, record.clone());
        self.persist(storage, records)?;
        tracing::debug!(
            "activity ledger: recorded {} of {} ({})",
            record.kind,
            record.item_name,
            record.item_id
        );
        self.subscribers
            .emit(&LedgerEvent::RecordAdded(record.clone()));
        Ok(record)
    }

    /// Every retained record, newest first.
    pub fn list(&self) -> Vec<ActivityRecord> {
        self.try_list().unwrap_or_else(|err| {
            degraded("list", &err);
            Vec::new()
        })
    }

    pub fn try_list(&self) -> Result<Vec<ActivityRecord>, LedgerError> {
        let storage = self.storage()?;
        let mut records = self.read_raw(storage)?;
        records.truncate(self.config.capacity);
        Ok(records)
    }

    pub fn recent(&self, limit: usize) -> Vec<ActivityRecord> {
        let mut records = self.list();
        records.truncate(limit);
        records
    }

    pub fn filter(&self, criteria: &FilterCriteria) -> Vec<ActivityRecord> {
        criteria.apply(self.list())
    }

    /// Drop every record. Irreversible.
    pub fn clear(&self) {
        if let Err(err) = self.try_clear() {
            degraded("clear", &err);
        }
    }

    pub fn try_clear(&self) -> Result<(), LedgerError> {
        let storage = self.storage()?;
        storage.remove(&self.config.storage_key)?;
        tracing::debug!("activity ledger: cleared");
        self.subscribers.emit(&LedgerEvent::Cleared);
        Ok(())
    }

    /// Merge `incoming` (typically a previous export) into the ledger.
    ///
    /// Records whose id is already present are skipped. The merged list is
    /// re-ordered newest first and capped; the return value counts incoming
    /// records that survived.
    pub fn import(&self, incoming: Vec<ActivityRecord>) -> Result<usize, LedgerError> {
        let storage = self.storage()?;
        let mut records = self.load_for_write(storage)?;
        let mut known: HashSet<String> = records.iter().map(|r| r.id.clone()).collect();
        let mut fresh = HashSet::new();
        for record in incoming {
            if known.insert(record.id.clone()) {
                fresh.insert(record.id.clone());
                records.push(record);
            }
        }
        if fresh.is_empty() {
            return Ok(0);
        }
        // Stable: equal timestamps keep the stored records ahead of imports.
        records.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        records.truncate(self.config.capacity);
        let added = records.iter().filter(|r| fresh.contains(&r.id)).count();
        self.persist(storage, records)?;
        tracing::debug!("activity ledger: imported {added} records");
        if added > 0 {
            self.subscribers.emit(&LedgerEvent::Imported { added });
        }
        Ok(added)
    }

    /// Rewrite the stored list without duplicate ids and within capacity.
    ///
    /// Unlike the read path, unreadable data is reported rather than
    /// discarded.
    pub fn compact(&self) -> Result<CompactReport, LedgerError> {
        let storage = self.storage()?;
        let records = self.read_raw(storage)?;
        let read = records.len();
        let mut seen = HashSet::new();
        let mut kept: Vec<ActivityRecord> = records
            .into_iter()
            .filter(|r| seen.insert(r.id.clone()))
            .collect();
        kept.truncate(self.config.capacity);
        let report = CompactReport {
            read,
            kept: kept.len(),
        };
        self.persist(storage, kept)?;
        Ok(report)
    }

    pub fn stats(&self) -> LedgerStats {
        self.list()
            .iter()
            .fold(LedgerStats::default(), |mut stats, record| {
                stats.total += 1;
                match record.kind {
                    ActivityType::Create => stats.create += 1,
                    ActivityType::Update => stats.update += 1,
                    ActivityType::Delete => stats.delete += 1,
                }
                stats
            })
    }

    fn storage(&self) -> Result<&dyn KeyValueStore, LedgerError> {
        self.storage.as_deref().ok_or(LedgerError::Detached)
    }

    fn read_raw(&self, storage: &dyn KeyValueStore) -> Result<Vec<ActivityRecord>, LedgerError> {
        match storage.get(&self.config.storage_key)? {
            Some(raw) => codec::decode(&raw).map_err(LedgerError::Corrupt),
            None => Ok(Vec::new()),
        }
    }

    /// Current list for a write; an unreadable list is replaced.
    fn load_for_write(
        &self,
        storage: &dyn KeyValueStore,
    ) -> Result<Vec<ActivityRecord>, LedgerError> {
        match self.read_raw(storage) {
            Ok(records) => Ok(records),
            Err(LedgerError::Corrupt(err)) => {
                tracing::warn!("activity ledger: discarding unreadable log: {err}");
                Ok(Vec::new())
            }
            Err(err) => Err(err),
        }
    }

    fn persist(
        &self,
        storage: &dyn KeyValueStore,
        mut records: Vec<ActivityRecord>,
    ) -> Result<(), LedgerError> {
        records.truncate(self.config.capacity);
        let raw = codec::encode(&records).map_err(LedgerError::Encode)?;
        storage.set(&self.config.storage_key, &raw)?;
        Ok(())
    }
}

fn degraded(op: &str, err: &LedgerError) {
    match err {
        LedgerError::Detached => tracing::debug!("activity ledger: {op} skipped: {err}"),
        _ => tracing::warn!("activity ledger: {op} failed: {err}"),
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("attached", &self.is_attached())
            .field("config", &self.config)
            .field("subscribers", &self.subscribers)
            .finish()
    }
}
