//! Reference catalog of known barcodes.
//!
//! The catalog is consulted on every append but owned elsewhere; the ledger
//! only needs a membership check.

use std::collections::HashSet;
use std::path::Path;
use std::sync::{Arc, RwLock};

use thiserror::Error;

use scanledger_core::Barcode;

/// Catalog operation error.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A membership check could not be answered.
    #[error("catalog lookup failed: {0}")]
    Lookup(String),

    /// The catalog source could not be loaded.
    #[error("catalog load failed: {0}")]
    Load(String),
}

/// Membership check against the reference catalog.
pub trait BarcodeCatalog: Send + Sync {
    fn contains(&self, barcode: &Barcode) -> Result<bool, CatalogError>;
}

impl<C> BarcodeCatalog for Arc<C>
where
    C: BarcodeCatalog + ?Sized,
{
    fn contains(&self, barcode: &Barcode) -> Result<bool, CatalogError> {
        (**self).contains(barcode)
    }
}

/// Catalog backed by an in-memory set of known barcodes.
#[derive(Debug, Default)]
pub struct InMemoryCatalog {
    barcodes: RwLock<HashSet<String>>,
}

impl InMemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_barcodes<I, S>(barcodes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            barcodes: RwLock::new(barcodes.into_iter().map(Into::into).collect()),
        }
    }

    /// Seed the catalog from a JSON array of barcode strings.
    pub fn from_json_file(path: &Path) -> Result<Self, CatalogError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CatalogError::Load(format!("failed to read {}: {e}", path.display())))?;
        let barcodes: Vec<String> = serde_json::from_str(&raw)
            .map_err(|e| CatalogError::Load(format!("failed to parse {}: {e}", path.display())))?;

        Ok(Self::with_barcodes(barcodes))
    }

    pub fn insert(&self, barcode: impl Into<String>) {
        if let Ok(mut set) = self.barcodes.write() {
            set.insert(barcode.into());
        }
    }
}

impl BarcodeCatalog for InMemoryCatalog {
    fn contains(&self, barcode: &Barcode) -> Result<bool, CatalogError> {
        let set = self
            .barcodes
            .read()
            .map_err(|_| CatalogError::Lookup("catalog lock poisoned".to_string()))?;

        Ok(set.contains(barcode.as_str()))
    }
}
