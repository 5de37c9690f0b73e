//! Dedup maintenance job.
//!
//! Administrative and out-of-band: the append path never invokes it. The
//! job removes later rows that repeat an earlier identical movement, while
//! a barcode's most recent row is always retained so the ledger's
//! current-state view never changes.

use std::collections::{HashMap, HashSet};
use std::sync::Mutex;

use tracing::info;

use scanledger_core::{RecordId, ScanMode};

use crate::ledger_store::{LedgerStore, LedgerStoreError};

/// Summary of one maintenance pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DedupReport {
    pub scanned: usize,
    pub removed: usize,
}

impl DedupReport {
    pub fn message(&self) -> String {
        format!(
            "removed {} duplicate row(s), {} scanned",
            self.removed, self.scanned
        )
    }
}

/// Removes redundant ledger rows.
///
/// Redundant: an earlier row for the same barcode records the exact same
/// movement (same mode and distributor). Running the job twice in a row
/// with no intervening appends is a no-op the second time.
pub struct DedupJob<S> {
    store: S,
    // One pass at a time.
    running: Mutex<()>,
}

impl<S> DedupJob<S>
where
    S: LedgerStore,
{
    pub fn new(store: S) -> Self {
        Self {
            store,
            running: Mutex::new(()),
        }
    }

    /// Run one maintenance pass.
    ///
    /// The removal set is computed from a single full-scan snapshot and
    /// names concrete row ids, so appends that land mid-pass are never
    /// touched.
    pub fn run(&self) -> Result<DedupReport, LedgerStoreError> {
        let _guard = self
            .running
            .lock()
            .map_err(|_| LedgerStoreError::Storage("dedup lock poisoned".to_string()))?;

        let records = self.store.all_records()?;
        let scanned = records.len();

        let mut latest: HashMap<&str, RecordId> = HashMap::new();
        for record in &records {
            latest.insert(record.barcode.as_str(), record.record_id);
        }

        let mut seen: HashSet<(&str, ScanMode, Option<&str>)> = HashSet::new();
        let mut redundant: Vec<RecordId> = Vec::new();
        for record in &records {
            let key = (
                record.barcode.as_str(),
                record.mode,
                record.distributor.as_ref().map(|d| d.name.as_str()),
            );
            let is_latest = latest.get(record.barcode.as_str()) == Some(&record.record_id);
            if seen.contains(&key) && !is_latest {
                redundant.push(record.record_id);
            } else {
                seen.insert(key);
            }
        }

        if redundant.is_empty() {
            return Ok(DedupReport { scanned, removed: 0 });
        }

        let removed = self.store.remove(&redundant)?;
        info!(scanned, removed, "dedup pass complete");

        Ok(DedupReport { scanned, removed })
    }
}
