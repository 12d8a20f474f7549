//! # Receipt Store Contract
//!
//! Durable, append-only persistence of issued receipts.
//!
//! ## Backends
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReceiptStore (trait)                                                   │
//! │       │                                                                 │
//! │       ├── JsonFileReceiptStore  one JSON array, rewritten per append    │
//! │       └── ReceiptRepository     SQLite `receipts` table, one INSERT     │
//! │                                                                         │
//! │  Both: list() in storage order, [] when nothing was ever stored         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The coordinator only calls `append` after the receipt's document was
//! generated, so every stored record has a matching artifact.

use async_trait::async_trait;
use tillslip_core::Receipt;

use crate::error::DbResult;

/// Append-only receipt persistence.
#[async_trait]
pub trait ReceiptStore: Send + Sync {
    /// All stored receipts in storage order.
    ///
    /// Returns an empty list when nothing has been stored yet, including
    /// when the backing file or table does not exist.
    async fn list(&self) -> DbResult<Vec<Receipt>>;

    /// Durably records one receipt.
    async fn append(&self, receipt: &Receipt) -> DbResult<()>;

    /// Looks up a receipt by id.
    async fn find(&self, id: &str) -> DbResult<Option<Receipt>> {
        Ok(self.list().await?.into_iter().find(|r| r.id == id))
    }
}

// =============================================================================
// Test Fixtures
// =============================================================================
