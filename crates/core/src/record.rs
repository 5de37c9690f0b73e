//! Persisted ledger rows.

use chrono::{DateTime, Utc};
use core::str::FromStr;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::scan::{Barcode, Distributor, ScanMode, ValidatedScan};

/// Identifier of a single ledger row.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(Uuid);

impl RecordId {
    /// Create a new identifier.
    ///
    /// Uses UUIDv7 (time-ordered). Prefer passing IDs explicitly in tests
    /// for determinism.
    pub fn new() -> Self {
        Self(Uuid::now_v7())
    }

    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for RecordId {
    fn default() -> Self {
        Self::new()
    }
}

impl core::fmt::Display for RecordId {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        core::fmt::Display::fmt(&self.0, f)
    }
}

impl FromStr for RecordId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self(Uuid::from_str(s)?))
    }
}

/// A movement ready to be appended (not yet assigned a sequence number).
///
/// The store assigns sequence numbers during append; everything else,
/// including the append timestamp, is fixed by the caller beforehand.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UncommittedRecord {
    pub record_id: RecordId,
    pub barcode: Barcode,
    pub mode: ScanMode,
    pub distributor: Option<Distributor>,
    pub recorded_at: DateTime<Utc>,
}

impl UncommittedRecord {
    /// Build a row from a validated scan, stamping the append time.
    pub fn from_scan(scan: &ValidatedScan, recorded_at: DateTime<Utc>) -> Self {
        Self {
            record_id: RecordId::new(),
            barcode: scan.barcode().clone(),
            mode: scan.mode(),
            distributor: scan.distributor().cloned(),
            recorded_at,
        }
    }
}

/// A committed ledger row (assigned a sequence number).
///
/// Rows are never mutated in place. Append order is the sole ordering
/// signal; `sequence` is its explicit form, so "latest row for a barcode"
/// stays well-defined under concurrent appends.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerRecord {
    pub record_id: RecordId,
    pub barcode: Barcode,
    pub mode: ScanMode,
    pub distributor: Option<Distributor>,
    pub recorded_at: DateTime<Utc>,
    /// Monotonically increasing position in the ledger.
    pub sequence: u64,
}

impl LedgerRecord {
    /// Movement equality used by the maintenance job: the same barcode moved
    /// the same way to the same distributor, regardless of when.
    pub fn same_movement(&self, other: &LedgerRecord) -> bool {
        self.barcode == other.barcode
            && self.mode == other.mode
            && self.distributor == other.distributor
    }
}
