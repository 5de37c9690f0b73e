//! Wire shapes shared with the ledger service.

use serde::{Deserialize, Serialize};

use scanledger_core::{Distributor, ScanMode, ScanOutcome, ValidatedScan};

/// Body of an append request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AppendRequest {
    pub barcode: String,
    pub mode: ScanMode,
    pub distributor: Option<Distributor>,
}

impl AppendRequest {
    pub fn from_scan(scan: &ValidatedScan) -> Self {
        Self {
            barcode: scan.barcode().as_str().to_string(),
            mode: scan.mode(),
            distributor: scan.distributor().cloned(),
        }
    }
}

/// Body of an append response.
///
/// The flags are optional on the wire; absent means false.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub not_found: bool,
    #[serde(default)]
    pub duplicate: bool,
}

impl AppendResponse {
    /// Collapse the wire flags into a tagged outcome.
    ///
    /// Flags take precedence over `success`, so even a confused reply maps
    /// to exactly one variant.
    pub fn into_outcome(self) -> ScanOutcome {
        let fallback = if self.success {
            "recorded"
        } else if self.not_found {
            "barcode not recognized"
        } else if self.duplicate {
            "duplicate entry"
        } else {
            "failed to save barcode"
        };
        let message = if self.message.is_empty() {
            fallback.to_string()
        } else {
            self.message
        };

        if self.not_found {
            ScanOutcome::NotFound { message }
        } else if self.duplicate {
            ScanOutcome::Duplicate { message }
        } else if self.success {
            ScanOutcome::Recorded { message }
        } else {
            ScanOutcome::Failed { message }
        }
    }
}

/// Body of a maintenance (dedup) response.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct MaintenanceResponse {
    pub success: bool,
    #[serde(default)]
    pub message: String,
}
