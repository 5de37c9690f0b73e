//! Domain error model.

use thiserror::Error;

/// Boundary validation failure.
///
/// Raised before a scan leaves the client; a failed validation never
/// produces a ledger request. Keep this focused on the shape of a single
/// scan. Storage and transport failures live in their own layers.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// The scanned barcode is empty or otherwise unusable.
    #[error("invalid barcode: {0}")]
    InvalidBarcode(String),

    /// An outbound scan was submitted without a distributor name.
    #[error("distributor name is required for outbound scans")]
    MissingDistributor,
}

impl ValidationError {
    pub fn invalid_barcode(msg: impl Into<String>) -> Self {
        Self::InvalidBarcode(msg.into())
    }
}
