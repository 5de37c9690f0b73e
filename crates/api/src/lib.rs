//! `scanledger-api` — HTTP transport for the scan ledger.

pub mod app;
pub mod telemetry;
