use std::collections::HashSet;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;
use std::sync::Mutex;

use scanledger_core::{Barcode, ExpectedHead, LedgerRecord, RecordId, UncommittedRecord};

use super::r#trait::{LedgerStore, LedgerStoreError};

/// Durable flat-file ledger: one JSON row per line, in append order.
///
/// Rows are kept in memory as well; the file is the source of truth on
/// restart. A single mutex covers both, which also serializes same-barcode
/// appends and maintenance passes against each other.
#[derive(Debug)]
pub struct JsonlLedgerStore {
    path: PathBuf,
    inner: Mutex<Inner>,
}

#[derive(Debug, Default)]
struct Inner {
    records: Vec<LedgerRecord>,
    last_sequence: u64,
}

fn storage_err(context: &str, err: impl core::fmt::Display) -> LedgerStoreError {
    LedgerStoreError::Storage(format!("{context}: {err}"))
}

impl JsonlLedgerStore {
    /// Open a ledger file, loading any existing rows.
    ///
    /// A missing file is an empty ledger; a malformed row is a hard error
    /// rather than silent data loss.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, LedgerStoreError> {
        let path = path.into();
        let mut inner = Inner::default();

        match std::fs::read_to_string(&path) {
            Ok(contents) => {
                for (idx, line) in contents.lines().enumerate() {
                    if line.trim().is_empty() {
                        continue;
                    }
                    let record: LedgerRecord = serde_json::from_str(line).map_err(|e| {
                        storage_err(&format!("corrupt ledger row at line {}", idx + 1), e)
                    })?;
                    inner.last_sequence = inner.last_sequence.max(record.sequence);
                    inner.records.push(record);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => return Err(storage_err("failed to read ledger file", e)),
        }

        Ok(Self {
            path,
            inner: Mutex::new(inner),
        })
    }

    fn append_line(&self, record: &LedgerRecord) -> Result<(), LedgerStoreError> {
        let mut line = serde_json::to_string(record)
            .map_err(|e| storage_err("failed to encode ledger row", e))?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| storage_err("failed to open ledger file", e))?;
        file.write_all(line.as_bytes())
            .map_err(|e| storage_err("failed to append ledger row", e))?;
        file.sync_data()
            .map_err(|e| storage_err("failed to sync ledger file", e))?;

        Ok(())
    }

    /// Rewrite the whole file via a temp file + rename, so a crash mid-write
    /// never truncates the ledger.
    fn rewrite(&self, records: &[LedgerRecord]) -> Result<(), LedgerStoreError> {
        let mut buf = String::new();
        for record in records {
            buf.push_str(
                &serde_json::to_string(record)
                    .map_err(|e| storage_err("failed to encode ledger row", e))?,
            );
            buf.push('\n');
        }

        let tmp = self.path.with_extension("jsonl.tmp");
        std::fs::write(&tmp, buf).map_err(|e| storage_err("failed to write ledger file", e))?;
        std::fs::rename(&tmp, &self.path)
            .map_err(|e| storage_err("failed to replace ledger file", e))?;

        Ok(())
    }
}

impl LedgerStore for JsonlLedgerStore {
    fn append(
        &self,
        record: UncommittedRecord,
        expected: ExpectedHead,
    ) -> Result<LedgerRecord, LedgerStoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        let head = inner
            .records
            .iter()
            .rev()
            .find(|r| r.barcode == record.barcode)
            .map(|r| r.sequence);
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

        // Durable step first; memory only reflects rows the file has.
        self.append_line(&committed)?;
        inner.last_sequence += 1;
        inner.records.push(committed.clone());

        Ok(committed)
    }

    fn latest_for(&self, barcode: &Barcode) -> Result<Option<LedgerRecord>, LedgerStoreError> {
        let inner = self
            .inner
            .lock()
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
            .lock()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        Ok(inner.records.clone())
    }

    fn remove(&self, record_ids: &[RecordId]) -> Result<usize, LedgerStoreError> {
        let mut inner = self
            .inner
            .lock()
            .map_err(|_| LedgerStoreError::Storage("ledger lock poisoned".to_string()))?;

        let doomed: HashSet<RecordId> = record_ids.iter().copied().collect();
        let kept: Vec<LedgerRecord> = inner
            .records
            .iter()
            .filter(|r| !doomed.contains(&r.record_id))
            .cloned()
            .collect();
        let removed = inner.records.len() - kept.len();

        if removed > 0 {
            self.rewrite(&kept)?;
            inner.records = kept;
        }

        Ok(removed)
    }
}
