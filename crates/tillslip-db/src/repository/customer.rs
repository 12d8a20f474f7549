//! # Customer Repository
//!
//! SQLite customer directory. `customer_type` is stored as its lowercase
//! token; an unknown token in a stored row is reported as an invalid record
//! rather than silently defaulted.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::lookup::CustomerDirectory;
use tillslip_core::{Customer, CustomerType};

#[derive(Debug, sqlx::FromRow)]
struct CustomerRow {
    id: String,
    customer_type: String,
    first_name: Option<String>,
    last_name: Option<String>,
    business_name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
    business_number: Option<String>,
}

impl TryFrom<CustomerRow> for Customer {
    type Error = DbError;

    fn try_from(row: CustomerRow) -> Result<Self, Self::Error> {
        let customer_type = CustomerType::parse(&row.customer_type).ok_or_else(|| {
            DbError::invalid_record(
                "Customer",
                &row.id,
                format!("unknown customer type '{}'", row.customer_type),
            )
        })?;

        Ok(Customer {
            id: row.id,
            customer_type,
            first_name: row.first_name,
            last_name: row.last_name,
            business_name: row.business_name,
            email: row.email,
            phone: row.phone,
            address: row.address,
            business_number: row.business_number,
        })
    }
}

/// Repository for customer database operations.
#[derive(Debug, Clone)]
pub struct CustomerRepository {
    pool: SqlitePool,
}

impl CustomerRepository {
    pub fn new(pool: SqlitePool) -> Self {
        CustomerRepository { pool }
    }

    /// Gets a customer by id. `Ok(None)` when no such customer exists.
    pub async fn get_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        let row = sqlx::query_as::<_, CustomerRow>(
            r#"
            SELECT
                id, customer_type, first_name, last_name, business_name,
                email, phone, address, business_number
            FROM customers
            WHERE id = ?1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        row.map(Customer::try_from).transpose()
    }

    /// Inserts a customer or replaces the existing row with the same id.
    ///
    /// ## Errors
    /// * `DbError::InvalidRecord` - the customer has no printable name
    pub async fn upsert(&self, customer: &Customer) -> DbResult<()> {
        debug!(id = %customer.id, "Upserting customer");

        if customer.display_name().is_empty() {
            return Err(DbError::invalid_record(
                "Customer",
                &customer.id,
                "customer has no name",
            ));
        }

        sqlx::query(
            r#"
            INSERT INTO customers (
                id, customer_type, first_name, last_name, business_name,
                email, phone, address, business_number, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            ON CONFLICT(id) DO UPDATE SET
                customer_type = excluded.customer_type,
                first_name = excluded.first_name,
                last_name = excluded.last_name,
                business_name = excluded.business_name,
                email = excluded.email,
                phone = excluded.phone,
                address = excluded.address,
                business_number = excluded.business_number,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(&customer.id)
        .bind(customer.customer_type.as_str())
        .bind(&customer.first_name)
        .bind(&customer.last_name)
        .bind(&customer.business_name)
        .bind(&customer.email)
        .bind(&customer.phone)
        .bind(&customer.address)
        .bind(&customer.business_number)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl CustomerDirectory for CustomerRepository {
    async fn customer_by_id(&self, id: &str) -> DbResult<Option<Customer>> {
        self.get_by_id(id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pool::{Database, DbConfig};

    fn business() -> Customer {
        Customer {
            id: "c-42".to_string(),
            customer_type: CustomerType::Business,
            first_name: None,
            last_name: None,
            business_name: Some("Harbour Joinery".to_string()),
            email: Some("accounts@harbour.example".to_string()),
            phone: None,
            address: Some("4 Wharf Rd".to_string()),
            business_number: Some("98 765 432 109".to_string()),
        }
    }

    #[tokio::test]
    async fn test_upsert_and_lookup() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let repo = db.customers();

        repo.upsert(&business()).await.unwrap();

        let found = repo.customer_by_id("c-42").await.unwrap().unwrap();
        assert_eq!(found, business());
        assert!(repo.customer_by_id("c-0").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_unknown_type_is_invalid_record() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();

        // Bypass the CHECK constraint to simulate a row written by older software
        sqlx::query("PRAGMA ignore_check_constraints = ON")
            .execute(db.pool())
            .await
            .unwrap();
        sqlx::query(
            "INSERT INTO customers (id, customer_type, first_name, updated_at) \
             VALUES ('c-x', 'partner', 'Zed', '2024-01-01T00:00:00Z')",
        )
        .execute(db.pool())
        .await
        .unwrap();

        let err = db.customers().get_by_id("c-x").await.unwrap_err();
        assert!(matches!(err, DbError::InvalidRecord { .. }));
    }

    #[tokio::test]
    async fn test_nameless_customer_rejected() {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let mut customer = business();
        customer.business_name = None;

        assert!(db.customers().upsert(&customer).await.is_err());
    }
}
