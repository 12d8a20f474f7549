//! # Receipt Types
//!
//! The receipt record and everything it owns.
//!
//! ## Snapshot Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Point-in-time copies                                 │
//! │                                                                         │
//! │  Product ───copy name/price/GST flag──► LineItem                        │
//! │  Customer ──copy all fields but id────► CustomerSnapshot                │
//! │  SellerProfile ──copy all fields──────► SellerSnapshot                  │
//! │                                                                         │
//! │  The snapshot types are separate value types with no way back to the   │
//! │  live records. Editing a product, customer or the seller profile after │
//! │  issue never changes a stored receipt or its document.                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::types::{display_name, Customer, CustomerType, Product, SellerProfile};

// =============================================================================
// Request
// =============================================================================

/// One requested product/quantity pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineRequest {
    pub product_id: String,
    pub quantity: i64,
}

impl LineRequest {
    pub fn new(product_id: impl Into<String>, quantity: i64) -> Self {
        LineRequest {
            product_id: product_id.into(),
            quantity,
        }
    }
}

/// A request to issue a receipt.
///
/// `apply_tax` defaults to `true` and `force_tax_invoice` to `false` when
/// omitted from JSON input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReceiptRequest {
    pub customer_id: String,
    pub date: NaiveDate,
    pub line_requests: Vec<LineRequest>,
    #[serde(default = "default_apply_tax")]
    pub apply_tax: bool,
    #[serde(default)]
    pub force_tax_invoice: bool,
}

fn default_apply_tax() -> bool {
    true
}

// =============================================================================
// Line Item
// =============================================================================

/// A resolved product/quantity pairing, frozen at creation time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
    pub product_id: String,
    /// Product name at time of sale (frozen).
    pub name: String,
    /// Product description at time of sale (frozen).
    pub description: Option<String>,
    pub quantity: i64,
    /// Unit price at time of sale (frozen).
    pub unit_price: Money,
    /// `unit_price × quantity`.
    pub line_total: Money,
    /// GST flag copied from the product at resolution time.
    pub gst_applicable: bool,
    /// GST charged on this line (zero when tax is not applied).
    pub tax: Money,
}

impl LineItem {
    /// Builds a line from the product's current state. `tax` starts at zero
    /// and is filled in by the tax policy.
    ///
    /// Fails with [`CoreError::AmountOutOfRange`] when `unit_price × quantity`
    /// does not fit in i64 cents.
    pub fn from_product(product: &Product, quantity: i64) -> CoreResult<Self> {
        let line_total = product
            .unit_price
            .checked_multiply_quantity(quantity)
            .ok_or_else(|| CoreError::AmountOutOfRange {
                product_id: product.id.clone(),
            })?;

        Ok(LineItem {
            product_id: product.id.clone(),
            name: product.name.clone(),
            description: product.description.clone(),
            quantity,
            unit_price: product.unit_price,
            line_total,
            gst_applicable: product.gst_applicable,
            tax: Money::zero(),
        })
    }
}

// =============================================================================
// Snapshots
// =============================================================================

/// Customer data as it was when the receipt was issued.
///
/// Excludes the customer id, which the receipt records separately.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct CustomerSnapshot {
    pub customer_type: CustomerType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_number: Option<String>,
}

impl CustomerSnapshot {
    pub fn display_name(&self) -> String {
        display_name(
            self.customer_type,
            self.business_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

impl From<&Customer> for CustomerSnapshot {
    fn from(customer: &Customer) -> Self {
        CustomerSnapshot {
            customer_type: customer.customer_type,
            first_name: customer.first_name.clone(),
            last_name: customer.last_name.clone(),
            business_name: customer.business_name.clone(),
            email: customer.email.clone(),
            phone: customer.phone.clone(),
            address: customer.address.clone(),
            business_number: customer.business_number.clone(),
        }
    }
}

/// Seller profile as it was when the receipt was issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SellerSnapshot {
    pub name: String,
    pub address: String,
    pub business_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub logo_path: Option<String>,
}

impl From<&SellerProfile> for SellerSnapshot {
    fn from(profile: &SellerProfile) -> Self {
        SellerSnapshot {
            name: profile.name.clone(),
            address: profile.address.clone(),
            business_number: profile.business_number.clone(),
            email: profile.email.clone(),
            phone: profile.phone.clone(),
            logo_path: profile.logo_path.clone(),
        }
    }
}

// =============================================================================
// Receipt
// =============================================================================

/// An issued receipt (root entity). Read-only once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    /// UUID v4, generated at creation and never reused.
    pub id: String,
    /// Human-readable number printed on the document.
    pub receipt_number: String,
    pub customer_id: String,
    #[ts(as = "String")]
    pub purchase_date: NaiveDate,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    pub line_items: Vec<LineItem>,
    pub subtotal: Money,
    pub tax_amount: Money,
    pub total: Money,
    /// Whether GST was applied to this transaction at all.
    pub apply_tax: bool,
    pub is_tax_invoice: bool,
    pub seller_snapshot: SellerSnapshot,
    pub customer_snapshot: CustomerSnapshot,
}

impl Receipt {
    /// Whether the document carries the GST column and GST total line.
    pub fn shows_tax(&self) -> bool {
        self.tax_amount.is_positive() || self.is_tax_invoice
    }
}

/// Builds the printed receipt number: `RCT-YYYYMMDD-XXXXXXXX`, where the
/// suffix is the first eight hex digits of the receipt id.
///
/// ## Example
/// ```rust
/// use chrono::NaiveDate;
/// use tillslip_core::receipt::receipt_number;
///
/// let date = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
/// let number = receipt_number(date, "5f2b8c1e-0000-4000-8000-000000000000");
/// assert_eq!(number, "RCT-20240309-5F2B8C1E");
/// ```
pub fn receipt_number(date: NaiveDate, receipt_id: &str) -> String {
    let suffix: String = receipt_id
        .chars()
        .filter(|c| c.is_ascii_hexdigit())
        .take(8)
        .collect::<String>()
        .to_ascii_uppercase();
    format!("RCT-{}-{}", date.format("%Y%m%d"), suffix)
}

// =============================================================================
// Unit Tests
// =============================================================================
