//! Append service: the single state-changing operation of the ledger.

use chrono::Utc;
use thiserror::Error;
use tracing::{debug, info, warn};

use scanledger_core::{ExpectedHead, LedgerRecord, UncommittedRecord, ValidatedScan};

use crate::catalog::{BarcodeCatalog, CatalogError};
use crate::ledger_store::{LedgerStore, LedgerStoreError};

/// Result of one append decision.
///
/// `NotFound` and `Duplicate` are business rejections, not faults: the
/// ledger made a decision and wrote nothing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AppendOutcome {
    /// The movement was recorded.
    Recorded(LedgerRecord),
    /// The barcode is unknown to the reference catalog.
    NotFound,
    /// The ledger already shows the barcode in the requested state.
    Duplicate,
}

/// Append operation failure (infrastructure, never a business rejection).
#[derive(Debug, Error)]
pub enum AppendError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error(transparent)]
    Store(#[from] LedgerStoreError),
}

// How often to re-read and re-decide when a concurrent writer moves a
// barcode's head mid-decision.
const MAX_HEAD_RETRIES: usize = 3;

/// Decides accept/duplicate/not-found for validated scans and appends the
/// accepted ones.
pub struct AppendService<C, S> {
    catalog: C,
    store: S,
}

impl<C, S> AppendService<C, S>
where
    C: BarcodeCatalog,
    S: LedgerStore,
{
    pub fn new(catalog: C, store: S) -> Self {
        Self { catalog, store }
    }

    /// Record one validated scan.
    ///
    /// Read-only until the final head-checked append; a rejected scan leaves
    /// the ledger untouched. Appends for different barcodes never contend;
    /// same-barcode races are resolved by the store's head check, after
    /// which the decision is re-made against the fresh head.
    pub fn append(&self, scan: &ValidatedScan) -> Result<AppendOutcome, AppendError> {
        if !self.catalog.contains(scan.barcode())? {
            debug!(barcode = %scan.barcode(), "barcode not in catalog");
            return Ok(AppendOutcome::NotFound);
        }

        let mut conflict = String::new();
        for _ in 0..MAX_HEAD_RETRIES {
            let head = self.store.latest_for(scan.barcode())?;

            if let Some(latest) = &head {
                if latest.mode == scan.mode() {
                    debug!(
                        barcode = %scan.barcode(),
                        mode = %scan.mode(),
                        "duplicate scan rejected"
                    );
                    return Ok(AppendOutcome::Duplicate);
                }
            }

            let expected = ExpectedHead::from_head(head.map(|r| r.sequence));
            let record = UncommittedRecord::from_scan(scan, Utc::now());
            match self.store.append(record, expected) {
                Ok(committed) => {
                    info!(
                        barcode = %committed.barcode,
                        mode = %committed.mode,
                        sequence = committed.sequence,
                        "movement recorded"
                    );
                    return Ok(AppendOutcome::Recorded(committed));
                }
                Err(LedgerStoreError::Concurrency(msg)) => {
                    debug!(barcode = %scan.barcode(), "head moved, re-deciding");
                    conflict = msg;
                }
                Err(e) => return Err(e.into()),
            }
        }

        warn!(barcode = %scan.barcode(), "append retries exhausted");
        Err(AppendError::Store(LedgerStoreError::Concurrency(conflict)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use scanledger_core::{Distributor, ScanEvent, ScanMode};

    use crate::catalog::InMemoryCatalog;
    use crate::ledger_store::InMemoryLedgerStore;

    fn service(
        known: &[&str],
    ) -> (
        AppendService<Arc<InMemoryCatalog>, Arc<InMemoryLedgerStore>>,
        Arc<InMemoryLedgerStore>,
    ) {
        let catalog = Arc::new(InMemoryCatalog::with_barcodes(known.iter().copied()));
        let store = Arc::new(InMemoryLedgerStore::new());
        (AppendService::new(catalog, store.clone()), store)
    }

    fn scan(barcode: &str, mode: ScanMode, distributor: Option<&str>) -> ValidatedScan {
        ScanEvent {
            barcode: barcode.to_string(),
            mode,
            distributor: distributor.map(Distributor::new),
        }
        .validate()
        .unwrap()
    }

    #[test]
    fn first_scan_is_recorded_then_repeated_scan_is_duplicate() {
        let (service, store) = service(&["123"]);

        let outcome = service.append(&scan("123", ScanMode::In, None)).unwrap();
        assert!(matches!(outcome, AppendOutcome::Recorded(_)));
        assert_eq!(store.all_records().unwrap().len(), 1);

        let outcome = service.append(&scan("123", ScanMode::In, None)).unwrap();
        assert_eq!(outcome, AppendOutcome::Duplicate);
        assert_eq!(store.all_records().unwrap().len(), 1);
    }

    #[test]
    fn unknown_barcode_is_not_found_and_writes_nothing() {
        let (service, store) = service(&["123"]);

        let outcome = service.append(&scan("999", ScanMode::In, None)).unwrap();
        assert_eq!(outcome, AppendOutcome::NotFound);
        assert!(store.all_records().unwrap().is_empty());
    }

    #[test]
    fn mode_change_is_not_a_duplicate() {
        let (service, store) = service(&["123"]);

        service.append(&scan("123", ScanMode::In, None)).unwrap();
        let outcome = service
            .append(&scan("123", ScanMode::Out, Some("Acme Foods")))
            .unwrap();

        assert!(matches!(outcome, AppendOutcome::Recorded(_)));
        assert_eq!(store.all_records().unwrap().len(), 2);

        let latest = store
            .latest_for(&scanledger_core::Barcode::parse("123").unwrap())
            .unwrap()
            .unwrap();
        assert_eq!(latest.mode, ScanMode::Out);
        assert_eq!(latest.distributor.unwrap().name, "Acme Foods");
    }

    #[test]
    fn duplicate_check_ignores_distributor() {
        let (service, store) = service(&["123"]);

        service
            .append(&scan("123", ScanMode::Out, Some("Acme Foods")))
            .unwrap();
        let outcome = service
            .append(&scan("123", ScanMode::Out, Some("Globex")))
            .unwrap();

        // Already out; a different distributor does not make it a new state.
        assert_eq!(outcome, AppendOutcome::Duplicate);
        assert_eq!(store.all_records().unwrap().len(), 1);
    }

    #[test]
    fn each_accepted_scan_adds_exactly_one_row() {
        let (service, store) = service(&["123"]);

        for (i, mode) in [ScanMode::In, ScanMode::Out, ScanMode::In].into_iter().enumerate() {
            let distributor = matches!(mode, ScanMode::Out).then_some("Acme Foods");
            service.append(&scan("123", mode, distributor)).unwrap();
            assert_eq!(store.all_records().unwrap().len(), i + 1);
        }
    }

    #[test]
    fn racing_identical_scans_record_exactly_one_row() {
        let (service, store) = service(&["123"]);
        let service = Arc::new(service);

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let service = service.clone();
                std::thread::spawn(move || {
                    service.append(&scan("123", ScanMode::In, None)).unwrap()
                })
            })
            .collect();

        let outcomes: Vec<AppendOutcome> =
            handles.into_iter().map(|h| h.join().unwrap()).collect();

        let recorded = outcomes
            .iter()
            .filter(|o| matches!(o, AppendOutcome::Recorded(_)))
            .count();
        assert_eq!(recorded, 1);
        assert_eq!(store.all_records().unwrap().len(), 1);
    }
}
