//! Infrastructure wiring for the HTTP layer.

use std::path::Path;
use std::sync::Arc;

use tracing::{info, warn};

use scanledger_infra::append::AppendService;
use scanledger_infra::catalog::{BarcodeCatalog, InMemoryCatalog};
use scanledger_infra::dedup::DedupJob;
use scanledger_infra::ledger_store::{InMemoryLedgerStore, JsonlLedgerStore, LedgerStore};

type DynCatalog = Arc<dyn BarcodeCatalog>;
type DynStore = Arc<dyn LedgerStore>;

/// Services shared by all request handlers.
pub struct AppServices {
    append: AppendService<DynCatalog, DynStore>,
    dedup: DedupJob<DynStore>,
}

impl AppServices {
    pub fn append(&self) -> &AppendService<DynCatalog, DynStore> {
        &self.append
    }

    pub fn dedup(&self) -> &DedupJob<DynStore> {
        &self.dedup
    }
}

/// Wire services from explicit parts (tests, embedders).
pub fn build_with(catalog: DynCatalog, store: DynStore) -> AppServices {
    AppServices {
        append: AppendService::new(catalog, store.clone()),
        dedup: DedupJob::new(store),
    }
}

/// Wire services from environment configuration.
///
/// `SCANLEDGER_LEDGER_PATH` selects the durable flat-file ledger; unset
/// means the in-memory store (dev/tests). `SCANLEDGER_CATALOG_PATH` seeds
/// the catalog from a JSON array of known barcodes.
pub fn build_services() -> anyhow::Result<AppServices> {
    let store: DynStore = match std::env::var("SCANLEDGER_LEDGER_PATH") {
        Ok(path) => {
            info!(%path, "using flat-file ledger");
            Arc::new(JsonlLedgerStore::open(&path)?)
        }
        Err(_) => {
            warn!("SCANLEDGER_LEDGER_PATH not set; ledger is in-memory only");
            Arc::new(InMemoryLedgerStore::new())
        }
    };

    let catalog: DynCatalog = match std::env::var("SCANLEDGER_CATALOG_PATH") {
        Ok(path) => {
            info!(%path, "loading barcode catalog");
            Arc::new(InMemoryCatalog::from_json_file(Path::new(&path))?)
        }
        Err(_) => {
            warn!("SCANLEDGER_CATALOG_PATH not set; starting with an empty catalog");
            Arc::new(InMemoryCatalog::new())
        }
    };

    Ok(build_with(catalog, store))
}
