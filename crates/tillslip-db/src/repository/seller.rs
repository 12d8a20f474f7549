//! # Seller Profile Repository
//!
//! The singleton seller profile, stored as row `id = 1`.

use async_trait::async_trait;
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::debug;

use crate::error::{DbError, DbResult};
use crate::lookup::SellerProfileSource;
use tillslip_core::validation::validate_required;
use tillslip_core::SellerProfile;

const SINGLETON_ID: i64 = 1;

#[derive(Debug, sqlx::FromRow)]
struct SellerRow {
    name: String,
    address: String,
    business_number: String,
    email: String,
    phone: Option<String>,
    logo_path: Option<String>,
}

impl From<SellerRow> for SellerProfile {
    fn from(row: SellerRow) -> Self {
        SellerProfile {
            name: row.name,
            address: row.address,
            business_number: row.business_number,
            email: row.email,
            phone: row.phone,
            logo_path: row.logo_path,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SellerProfileRepository {
    pool: SqlitePool,
}

impl SellerProfileRepository {
    pub fn new(pool: SqlitePool) -> Self {
        SellerProfileRepository { pool }
    }

    /// The current profile, or `None` if it was never configured.
    pub async fn get(&self) -> DbResult<Option<SellerProfile>> {
        let row = sqlx::query_as::<_, SellerRow>(
            r#"
            SELECT name, address, business_number, email, phone, logo_path
            FROM seller_profile
            WHERE id = ?1
            "#,
        )
        .bind(SINGLETON_ID)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(SellerProfile::from))
    }

    /// Stores the profile, replacing any previous one.
    ///
    /// ## Errors
    /// * `DbError::InvalidRecord` - name, address, ABN or email is blank
    pub async fn upsert(&self, profile: &SellerProfile) -> DbResult<()> {
        debug!(name = %profile.name, "Saving seller profile");

        validate_required("name", &profile.name)
            .and_then(|_| validate_required("address", &profile.address))
            .and_then(|_| validate_required("business_number", &profile.business_number))
            .and_then(|_| validate_required("email", &profile.email))
            .map_err(|e| DbError::invalid_record("SellerProfile", "1", e.to_string()))?;

        sqlx::query(
            r#"
            INSERT INTO seller_profile (
                id, name, address, business_number, email, phone, logo_path, updated_at
            ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                address = excluded.address,
                business_number = excluded.business_number,
                email = excluded.email,
                phone = excluded.phone,
                logo_path = excluded.logo_path,
                updated_at = excluded.updated_at
            "#,
        )
        .bind(SINGLETON_ID)
        .bind(&profile.name)
        .bind(&profile.address)
        .bind(&profile.business_number)
        .bind(&profile.email)
        .bind(&profile.phone)
        .bind(&profile.logo_path)
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }
}

#[async_trait]
impl SellerProfileSource for SellerProfileRepository {
    async fn seller_profile(&self) -> DbResult<Option<SellerProfile>> {
        self.get().await
    }
}
