//! `scanledger-core` — domain foundation for the scan ledger.
//!
//! This crate contains **pure domain** types (no transport or storage concerns).

pub mod error;
pub mod head;
pub mod outcome;
pub mod record;
pub mod scan;

pub use error::ValidationError;
pub use head::ExpectedHead;
pub use outcome::ScanOutcome;
pub use record::{LedgerRecord, RecordId, UncommittedRecord};
pub use scan::{Barcode, Distributor, ScanEvent, ScanMode, ValidatedScan};
