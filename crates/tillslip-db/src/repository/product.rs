//! # Product Repository
//!
//! The SQLite product catalog.
//!
//! ## Key Operations
//! - Lookup by id (the `ProductCatalog` contract)
//! - Upsert for seeding and catalog maintenance
//! - Listing by name
//!
//! Prices are stored as integer cents in `unit_price_cents`; a stored row
//! with a negative price is rejected on read as an invalid record.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::lookup::ProductCatalog;
use tillslip_core::validation::{validate_required, validate_unit_price};
use tillslip_core::{Money, Product};

/// Raw `products` row.
#[derive(Debug, sqlx::FromRow)]
struct ProductRow {
    id: String,
    name: String,
    description: Option<String>,
    unit_price_cents: i64,
    gst_applicable: bool,
}

impl TryFrom<ProductRow> for Product {
    type Error = DbError;

    fn try_from(row: ProductRow) -> Result<Self, Self::Error> {
        let unit_price = Money::from_cents(row.unit_price_cents);
        validate_unit_price(unit_price)
            .map_err(|e| DbError::invalid_record("Product", &row.id, e.to_string()))?;

        Ok(Product {
            id: row.id,
            name: row.name,
            description: row.description,
            unit_price,
            gst_applicable: row.gst_applicable,
        })
    }
}

/// Repository for product database operations.
///
/// ## Usage
/// ```rust,ignore
/// let repo = ProductRepository::new(pool);
///
/// repo.upsert(&product).await?;
/// let product = repo.get_by_id("p-1").await?;
/// ```
#[derive(Debug, Clone)]
pub struct ProductRepository {
    pool: SqlitePool,
}

impl ProductRepository {
    /// Creates a new ProductRepository.
    pub fn new(pool: SqlitePool) -> Self {
        ProductRepository { pool }
    }

    /// Gets a product by its ID.
    ///
    /// ## Returns
    /// * `Ok(Some(Product))` - Product found
    /// * `Ok(None)` - Product not found
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        let row = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, unit_price_cents, gst_applicable
            FROM products
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Product::try_from).transpose()
    }

    /// Lists all products ordered by name.
    pub async fn list(&self) -> DbResult<Vec<Product>> {
        let rows = sqlx::query_as::<_, ProductRow>(
            r#"
            SELECT id, name, description, unit_price_cents, gst_applicable
            FROM products
            ORDER BY name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Product::try_from).collect()
    }

    /// Inserts a product or replaces the existing row with the same id.
    ///
    /// Issued receipts are unaffected: they hold their own copy of the
    /// name, price and GST flag.
    ///
    /// ## Errors
    /// * `DbError::InvalidRecord` - empty name or negative price
    pub async fn upsert(&self, product: &Product) -> DbResult<()> {
        debug!(id = %product.id, "Upserting product");

        validate_required("name", &product.name)
            .and_then(|_| validate_unit_price(product.unit_price))
            .map_err(|e| DbError::invalid_record("Product", &product.id, e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO products (
                id, name, description, unit_price_cents, gst_applicable, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                description = excluded.description,
                unit_price_cents = excluded.unit_price_cents,
                gst_applicable = excluded.gst_applicable,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&product.id)
        .bind(&product.name)
        .bind(&product.description)
        .bind(product.unit_price.cents())
        .bind(product.gst_applicable)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl ProductCatalog for ProductRepository {
    async fn product_by_id(&self, id: &str) -> DbResult<Option<Product>> {
        self.get_by_id(id).await
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
