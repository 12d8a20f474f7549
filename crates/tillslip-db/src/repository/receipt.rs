//! # Receipt Repository
//!
//! SQLite-backed `ReceiptStore`.
//!
//! ```text
//! receipts
//! ┌──────┬──────────┬────────────────┬─────┬─────────────────────────────┐
//! │ seq  │ id       │ receipt_number │ ... │ payload (full receipt JSON) │
//! ├──────┼──────────┼────────────────┼─────┼─────────────────────────────┤
//! │ 1    │ 5f2b...  │ RCT-2024...    │     │ {"id":"5f2b...",...}        │
//! │ 2    │ 91c0...  │ RCT-2024...    │     │ {"id":"91c0...",...}        │
//! └──────┴──────────┴────────────────┴─────┴─────────────────────────────┘
//! ```
//!
//! `seq` is AUTOINCREMENT, so ordering by it returns storage order. The
//! scalar columns exist for indexing; `payload` is the source of truth.

use async_trait::async_trait;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::store::ReceiptStore;
use tillslip_core::Receipt;

#[derive(Debug, sqlx::FromRow)]
struct PayloadRow {
    id: String,
    payload: String,
}

fn decode(row: PayloadRow) -> DbResult<Receipt> {
    serde_json::from_str(&row.payload)
        .map_err(|e| DbError::invalid_record("Receipt", &row.id, e.to_string()))
}

/// Append-only receipt table.
#[derive(Debug, Clone)]
pub struct ReceiptRepository {
    pool: SqlitePool,
}

impl ReceiptRepository {
    pub fn new(pool: SqlitePool) -> Self {
        ReceiptRepository { pool }
    }

    /// Number of stored receipts.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM receipts")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

#[async_trait]
impl ReceiptStore for ReceiptRepository {
    async fn list(&self) -> DbResult<Vec<Receipt>> {
        let rows = sqlx::query_as::<_, PayloadRow>("SELECT id, payload FROM receipts ORDER BY seq")
            .fetch_all(&self.pool)
            .await?;

        debug!(count = rows.len(), "Loaded receipts");
        rows.into_iter().map(decode).collect()
    }

    async fn append(&self, receipt: &Receipt) -> DbResult<()> {
        let payload = serde_json::to_string(receipt)?;

        sqlx::query(
            r#"
            INSERT INTO receipts (
                id, receipt_number, customer_id, purchase_date,
                total_cents, is_tax_invoice, payload, created_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(&receipt.id)
        .bind(&receipt.receipt_number)
        .bind(&receipt.customer_id)
        .bind(receipt.purchase_date)
        .bind(receipt.total.cents())
        .bind(receipt.is_tax_invoice)
        .bind(payload)
        .bind(receipt.created_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match DbError::from(e) {
            DbError::UniqueViolation { field, .. } => DbError::duplicate(field, &receipt.id),
            other => other,
        })?;

        info!(receipt_id = %receipt.id, "Receipt appended to SQLite store");
        Ok(())
    }

    async fn find(&self, id: &str) -> DbResult<Option<Receipt>> {
        let row = sqlx::query_as::<_, PayloadRow>("SELECT id, payload FROM receipts WHERE id = ?1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        row.map(decode).transpose()
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};
    use crate::store::fixtures;

    #[tokio::test]
    async fn test_empty_store_lists_nothing() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        assert!(db.receipts().list().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_append_preserves_storage_order() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.receipts();

        // ids deliberately out of lexical order
        for id in ["zz", "aa", "mm"] {
            store.append(&fixtures::receipt(id)).await.unwrap();
        }

        let ids: Vec<String> = store.list().await.unwrap().into_iter().map(|r| r.id).collect();
        assert_eq!(ids, vec!["zz", "aa", "mm"]);
        assert_eq!(store.count().await.unwrap(), 3);
    }

    #[tokio::test]
    async fn test_find_round_trips_payload() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.receipts();
        let receipt = fixtures::receipt("5f2b8c1e-0000-4000-8000-000000000000");

        store.append(&receipt).await.unwrap();

        assert_eq!(store.find(&receipt.id).await.unwrap(), Some(receipt));
        assert_eq!(store.find("nope").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_duplicate_id_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.receipts();

        store.append(&fixtures::receipt("dup")).await.unwrap();
        let err = store.append(&fixtures::receipt("dup")).await.unwrap_err();

        assert!(matches!(err, DbError::UniqueViolation { ref value, .. } if value == "dup"));
        assert_eq!(store.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_append_after_close_fails() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let store = db.receipts();
        db.close().await;

        assert!(store.append(&fixtures::receipt("late")).await.is_err());
    }
}
