//! In-memory settlement registry
//!
//! Authoritative store for settlement records. Transitions mutate under the
//! map's entry lock, so at most one transition is in flight per ID and the
//! history of every record stays a total order. Reads are clone-on-read
//! snapshots: a caller never observes a half-applied transition, and fees
//! and net amount can never be seen out of sync.

use crate::record::SettlementRecord;
use crate::types::{SettlementId, SettlementStatus};
use crate::{Error, Result};
use chrono::Utc;
use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use std::sync::atomic::{AtomicU64, Ordering};

/// In-memory collection of settlement records
///
/// Records are never deleted; rejected attempts are kept for audit.
#[derive(Debug, Default)]
pub struct SettlementRegistry {
    records: DashMap<SettlementId, SettlementRecord>,
    sequence: AtomicU64,
}

impl SettlementRegistry {
    /// Create empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Allocate the next settlement ID for the given year
    pub fn next_id(&self, year: i32) -> SettlementId {
        let sequence = self.sequence.fetch_add(1, Ordering::SeqCst) + 1;
        SettlementId::from_parts(year, sequence)
    }

    /// Insert a newly created record
    ///
    /// IDs are unique for the lifetime of the process; reusing one is a bug
    /// in the caller and is rejected without touching the stored record.
    pub fn insert(&self, record: SettlementRecord) -> Result<()> {
        match self.records.entry(record.id.clone()) {
            Entry::Occupied(entry) => Err(Error::Validation(format!(
                "duplicate settlement id {}",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                entry.insert(record);
                Ok(())
            }
        }
    }

    /// Get a snapshot copy of a record
    pub fn get(&self, id: &SettlementId) -> Option<SettlementRecord> {
        self.records.get(id).map(|entry| entry.value().clone())
    }

    /// Snapshot of all records, in creation order
    ///
    /// Ordered by the numeric ID sequence, not the ID text; lexicographic
    /// order would diverge from creation order once the sequence outgrows
    /// its padding width.
    pub fn snapshot(&self) -> Vec<SettlementRecord> {
        let mut records: Vec<SettlementRecord> = self
            .records
            .iter()
            .map(|entry| entry.value().clone())
            .collect();
        records.sort_by(|a, b| {
            a.id.sequence()
                .cmp(&b.id.sequence())
                .then_with(|| a.id.as_str().cmp(b.id.as_str()))
        });
        records
    }

    /// Advance a record exactly one step along the legal path
    ///
    /// The mutation happens under the entry lock; concurrent transition
    /// attempts on the same ID are serialized. On error the stored record
    /// is unchanged.
    pub fn transition(
        &self,
        id: &SettlementId,
        target: SettlementStatus,
    ) -> Result<SettlementRecord> {
        let mut entry = self
            .records
            .get_mut(id)
            .ok_or_else(|| Error::SettlementNotFound(id.to_string()))?;

        entry.transition(target, Utc::now())?;
        Ok(entry.value().clone())
    }

    /// Number of records (including rejected ones)
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the registry is empty
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
