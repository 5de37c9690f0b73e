//! Optimistic concurrency over a barcode's ledger head.

/// Expectation about the most recent row for a barcode at append time.
///
/// The append service decides accept/duplicate against the head it read;
/// carrying that head into the append lets the store reject the write if
/// another writer moved it in between. Two simultaneous appends for the
/// same barcode can therefore never both succeed.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum ExpectedHead {
    /// No row recorded for the barcode yet.
    Absent,
    /// The barcode's latest row sits at this sequence.
    At(u64),
}

impl ExpectedHead {
    pub fn matches(self, actual: Option<u64>) -> bool {
        match (self, actual) {
            (ExpectedHead::Absent, None) => true,
            (ExpectedHead::At(expected), Some(current)) => expected == current,
            _ => false,
        }
    }

    /// Expectation matching an observed head.
    pub fn from_head(head: Option<u64>) -> Self {
        match head {
            Some(sequence) => Self::At(sequence),
            None => Self::Absent,
        }
    }
}
