//! `scanledger-client` — HTTP transport adapter for the scan ledger.
//!
//! Speaks the service's wire contract: one URL-style target, `POST` to
//! append, `GET` for the reachability probe, `GET` with an `action` query
//! parameter for maintenance. Only validated scans can reach the wire; the
//! type system enforces that the validator ran first.
//!
//! Transport and parse failures surface as `ScanOutcome::Failed` (after a
//! `warn` log), so callers always receive a definitive outcome and the
//! client never panics on a broken connection. The client performs no
//! retries; a transport failure is terminal for that call.

pub mod wire;

use thiserror::Error;
use tracing::warn;

use scanledger_core::{ScanOutcome, ValidatedScan};

use crate::wire::{AppendRequest, AppendResponse, MaintenanceResponse};

/// Transport-layer failure.
///
/// Distinguishes "could not reach or complete the exchange" from "the reply
/// was not the expected shape"; both mean no ledger decision was obtained.
#[derive(Debug, Error)]
pub enum ClientError {
    #[error("request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("invalid response from server: {0}")]
    MalformedResponse(String),
}

/// Result of a maintenance trigger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceOutcome {
    pub success: bool,
    pub message: String,
}

/// Client for the scan ledger service.
pub struct LedgerClient {
    http: reqwest::Client,
    base_url: String,
}

impl LedgerClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// Idempotent, side-effect-free reachability check.
    pub async fn probe(&self) -> bool {
        match self.http.get(&self.base_url).send().await {
            Ok(res) if res.status().is_success() => true,
            Ok(res) => {
                warn!(status = %res.status(), "ledger probe failed");
                false
            }
            Err(e) => {
                warn!(error = %e, "ledger unreachable");
                false
            }
        }
    }

    /// Submit one validated scan for appending.
    pub async fn append(&self, scan: &ValidatedScan) -> ScanOutcome {
        match self.try_append(scan).await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(barcode = %scan.barcode(), error = %e, "append reached no ledger decision");
                ScanOutcome::Failed {
                    message: format!("failed to reach ledger: {e}"),
                }
            }
        }
    }

    /// Like [`LedgerClient::append`], surfacing the transport error instead
    /// of folding it into the outcome.
    pub async fn try_append(&self, scan: &ValidatedScan) -> Result<ScanOutcome, ClientError> {
        let body = AppendRequest::from_scan(scan);
        let res = self
            .http
            .post(&self.base_url)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;

        let text = res.text().await?;
        let reply: AppendResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(reply.into_outcome())
    }

    /// Trigger a dedup maintenance pass.
    pub async fn remove_duplicates(&self) -> MaintenanceOutcome {
        match self.try_remove_duplicates().await {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(error = %e, "maintenance reached no ledger decision");
                MaintenanceOutcome {
                    success: false,
                    message: format!("failed to reach ledger: {e}"),
                }
            }
        }
    }

    /// Like [`LedgerClient::remove_duplicates`], surfacing the transport
    /// error instead of folding it into the outcome.
    pub async fn try_remove_duplicates(&self) -> Result<MaintenanceOutcome, ClientError> {
        let res = self
            .http
            .get(&self.base_url)
            .query(&[("action", "removeDuplicates")])
            .send()
            .await?
            .error_for_status()?;

        let text = res.text().await?;
        let reply: MaintenanceResponse = serde_json::from_str(&text)
            .map_err(|e| ClientError::MalformedResponse(e.to_string()))?;

        Ok(MaintenanceOutcome {
            success: reply.success,
            message: reply.message,
        })
    }
}
