//! Scan events and their boundary validation.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Direction of an inventory movement.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScanMode {
    /// Stock received into the warehouse.
    In,
    /// Stock shipped out to a distributor.
    Out,
}

impl ScanMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            ScanMode::In => "in",
            ScanMode::Out => "out",
        }
    }
}

impl core::fmt::Display for ScanMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Distributor receiving outbound stock.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Distributor {
    pub name: String,
}

impl Distributor {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

/// Non-empty barcode identifier.
///
/// The ledger addresses rows by barcode; an empty or whitespace-only capture
/// must never reach the store.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Barcode(String);

impl Barcode {
    /// Parse a raw scanner capture into a barcode.
    ///
    /// Trims surrounding whitespace; fails on empty input.
    pub fn parse(raw: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::invalid_barcode("barcode is empty"));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl core::fmt::Display for Barcode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Barcode {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A scan exactly as captured at the client boundary (not yet validated).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanEvent {
    pub barcode: String,
    pub mode: ScanMode,
    #[serde(default)]
    pub distributor: Option<Distributor>,
}

impl ScanEvent {
    /// Validate the captured scan before it leaves the client boundary.
    ///
    /// Outbound scans must name a distributor. On success the event passes
    /// through unchanged; validation has no side effects.
    pub fn validate(self) -> Result<ValidatedScan, ValidationError> {
        let barcode = Barcode::parse(self.barcode)?;

        let distributor = match (self.mode, self.distributor) {
            (ScanMode::Out, None) => return Err(ValidationError::MissingDistributor),
            (ScanMode::Out, Some(d)) if d.name.trim().is_empty() => {
                return Err(ValidationError::MissingDistributor);
            }
            (_, d) => d,
        };

        Ok(ValidatedScan {
            barcode,
            mode: self.mode,
            distributor,
        })
    }
}

/// A scan that passed boundary validation.
///
/// Fields are private: the only way to obtain one is through
/// [`ScanEvent::validate`], so downstream layers can rely on the invariants.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidatedScan {
    barcode: Barcode,
    mode: ScanMode,
    distributor: Option<Distributor>,
}

impl ValidatedScan {
    pub fn barcode(&self) -> &Barcode {
        &self.barcode
    }

    pub fn mode(&self) -> ScanMode {
        self.mode
    }

    pub fn distributor(&self) -> Option<&Distributor> {
        self.distributor.as_ref()
    }
}
