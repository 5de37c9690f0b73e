//! Append-only ledger boundary.
//!
//! This module defines the storage abstraction for the movement ledger
//! without making any assumptions about the backing medium. Rows are
//! appended by the append service and removed only by the dedup job.

pub mod in_memory;
pub mod jsonl;
pub mod r#trait;

pub use in_memory::InMemoryLedgerStore;
pub use jsonl::JsonlLedgerStore;
pub use r#trait::{LedgerStore, LedgerStoreError};
