use std::sync::Arc;

use thiserror::Error;

use scanledger_core::{Barcode, ExpectedHead, LedgerRecord, RecordId, UncommittedRecord};

/// Ledger storage operation error.
///
/// Infrastructure failures only. Business rejections (unknown barcode,
/// duplicate movement) are modeled as outcomes by the append service, not
/// as errors here.
#[derive(Debug, Error)]
pub enum LedgerStoreError {
    /// Another writer moved the barcode's head between read and append.
    #[error("concurrent append detected: {0}")]
    Concurrency(String),

    /// The backing medium failed to persist or read rows.
    #[error("storage failure: {0}")]
    Storage(String),
}

/// Append-only movement ledger.
///
/// Append order is the sole ordering signal. Implementations assign a
/// monotonically increasing `sequence` to each committed row so that
/// `latest_for` stays well-defined under concurrent appends.
pub trait LedgerStore: Send + Sync {
    /// Append one row, checking the caller's observed head for the barcode.
    ///
    /// The head check and the append must be atomic: two concurrent appends
    /// carrying the same expectation for the same barcode cannot both
    /// succeed. A well-formed row only fails on a durability error, which is
    /// fatal to the calling append invocation.
    fn append(
        &self,
        record: UncommittedRecord,
        expected: ExpectedHead,
    ) -> Result<LedgerRecord, LedgerStoreError>;

    /// Most recently appended row for a barcode, if any.
    fn latest_for(&self, barcode: &Barcode) -> Result<Option<LedgerRecord>, LedgerStoreError>;

    /// Full scan in append order.
    fn all_records(&self) -> Result<Vec<LedgerRecord>, LedgerStoreError>;

    /// Remove rows by id, returning how many were actually removed.
    ///
    /// Only the dedup maintenance job calls this; ids unknown to the store
    /// are ignored.
    fn remove(&self, record_ids: &[RecordId]) -> Result<usize, LedgerStoreError>;
}

impl<S> LedgerStore for Arc<S>
where
    S: LedgerStore + ?Sized,
{
    fn append(
        &self,
        record: UncommittedRecord,
        expected: ExpectedHead,
    ) -> Result<LedgerRecord, LedgerStoreError> {
        (**self).append(record, expected)
    }

    fn latest_for(&self, barcode: &Barcode) -> Result<Option<LedgerRecord>, LedgerStoreError> {
        (**self).latest_for(barcode)
    }

    fn all_records(&self) -> Result<Vec<LedgerRecord>, LedgerStoreError> {
        (**self).all_records()
    }

    fn remove(&self, record_ids: &[RecordId]) -> Result<usize, LedgerStoreError> {
        (**self).remove(record_ids)
    }
}
