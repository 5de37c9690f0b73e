use serde::{Deserialize, Serialize};

use scanledger_core::{Distributor, LedgerRecord, ScanEvent, ScanMode};

// -------------------------
// Request DTOs
// -------------------------

#[derive(Debug, Deserialize)]
pub struct AppendRequest {
    pub barcode: String,
    pub mode: ScanMode,
    #[serde(default)]
    pub distributor: Option<Distributor>,
}

impl AppendRequest {
    pub fn into_event(self) -> ScanEvent {
        ScanEvent {
            barcode: self.barcode,
            mode: self.mode,
            distributor: self.distributor,
        }
    }
}

// -------------------------
// Response DTOs
// -------------------------

fn is_false(v: &bool) -> bool {
    !*v
}

/// Append reply. Business rejections still answer 200; the flags tell the
/// client which rejection it was, and are omitted when false.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AppendResponse {
    pub success: bool,
    pub message: String,
    #[serde(skip_serializing_if = "is_false")]
    pub not_found: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub duplicate: bool,
}

impl AppendResponse {
    pub fn recorded(record: &LedgerRecord) -> Self {
        Self {
            success: true,
            message: format!("recorded {} {}", record.barcode, record.mode),
            not_found: false,
            duplicate: false,
        }
    }

    pub fn not_found() -> Self {
        Self {
            success: false,
            message: "barcode not recognized".to_string(),
            not_found: true,
            duplicate: false,
        }
    }

    pub fn duplicate() -> Self {
        Self {
            success: false,
            message: "duplicate entry".to_string(),
            not_found: false,
            duplicate: true,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct MaintenanceResponse {
    pub success: bool,
    pub message: String,
}
