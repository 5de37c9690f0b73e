//! Tagged outcome of submitting a scan.

/// What became of one append attempt, as seen by the scanning client.
///
/// `NotFound` and `Duplicate` are expected, recoverable rejections: the
/// ledger made a decision and wrote nothing. `Failed` means the outcome
/// could not be determined (transport fault, unparseable reply); callers
/// must be able to tell the two apart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    /// The movement was recorded in the ledger.
    Recorded { message: String },
    /// The barcode is unknown to the reference catalog.
    NotFound { message: String },
    /// The ledger already shows the barcode in the requested state.
    Duplicate { message: String },
    /// No definitive ledger decision was reached.
    Failed { message: String },
}

impl ScanOutcome {
    pub fn is_recorded(&self) -> bool {
        matches!(self, ScanOutcome::Recorded { .. })
    }

    pub fn message(&self) -> &str {
        match self {
            ScanOutcome::Recorded { message }
            | ScanOutcome::NotFound { message }
            | ScanOutcome::Duplicate { message }
            | ScanOutcome::Failed { message } => message,
        }
    }
}
