use std::collections::HashSet;
use std::sync::RwLock;

use scanledger_core::{Barcode, ExpectedHead, LedgerRecord, RecordId, UncommittedRecord};

use super::r#trait::{LedgerStore, LedgerStoreError};

/// In-memory append-only ledger.
///
/// Intended for tests/dev. Not optimized for performance.
#[derive(Debug, Default)]
pub struct InMemoryLedgerStore {
    inner: RwLock<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<LedgerRecord>,
    last_sequence: u64,
}

impl Inner {
    fn head_for(&self, barcode: &Barcode) -> Option<u64> {
        self.records
            .iter()
            .rev()
            .find(|r| &r.barcode == barcode)
            .map(|r| r.sequence)
    }
}

impl InMemoryLedgerStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl LedgerStore for InMemoryLedgerStore {
    fn append(
        &self,
        record: UncommittedRecord,
        expected: ExpectedHead,
    ) -> Result<LedgerRecord, LedgerStoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        // Head check and append happen under the same write lock.
        let head = inner.head_for(&record.barcode);
        if !expected.matches(head) {
            return Err(LedgerStoreError::Concurrency(format!(
                "expected {expected:?}, found {head:?} for '{}'",
                record.barcode
            )));
        }

        let committed = LedgerRecord {
            record_id: record.record_id,
            barcode: record.barcode,
            mode: record.mode,
            distributor: record.distributor,
            recorded_at: record.recorded_at,
            sequence: inner.last_sequence + 1,
        };
        inner.last_sequence += 1;
        inner.records.push(committed.clone());

        Ok(committed)
    }

    fn latest_for(&self, barcode: &Barcode) -> Result<Option<LedgerRecord>, LedgerStoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        Ok(inner
            .records
            .iter()
            .rev()
            .find(|r| &r.barcode == barcode)
            .cloned())
    }

    fn all_records(&self) -> Result<Vec<LedgerRecord>, LedgerStoreError> {
        let inner = self
            .inner
            .read()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        Ok(inner.records.clone())
    }

    fn remove(&self, record_ids: &[RecordId]) -> Result<usize, LedgerStoreError> {
        let mut inner = self
            .inner
            .write()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        let doomed: HashSet<RecordId> = record_ids.iter().copied().collect();
        let before = inner.records.len();
        inner.records.retain(|r| !doomed.contains(&r.record_id));

        Ok(before - inner.records.len())
    }
}
