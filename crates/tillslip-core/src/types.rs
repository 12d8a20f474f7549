//! # Domain Types
//!
//! Entities owned by collaborators and referenced (never mutated) by the
//! receipt engine.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │    Product      │   │    Customer     │   │  SellerProfile  │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id             │   │  id             │   │  name           │       │
//! │  │  name           │   │  customer_type  │   │  address        │       │
//! │  │  unit_price     │   │  names / ABN    │   │  ABN, email     │       │
//! │  │  gst_applicable │   │  contact fields │   │  phone?, logo?  │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │        catalog              customers            singleton              │
//! │                                                                         │
//! │  ┌─────────────────┐                                                    │
//! │  │    TaxRate      │   basis points: 1000 = 10% GST                     │
//! │  └─────────────────┘                                                    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;
use ts_rs::TS;

use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so the standard GST rate of 10% is 1000 bps.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Standard GST rate (10%).
    pub const GST: TaxRate = TaxRate(1000);

    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Creates a tax rate from a percentage (for configuration input).
    pub fn from_percentage(pct: f64) -> Self {
        TaxRate((pct * 100.0).round() as u32)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Returns the rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// Zero tax rate.
    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    /// Checks if tax rate is zero.
    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl Default for TaxRate {
    fn default() -> Self {
        TaxRate::GST
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}%", self.percentage())
        }
    }
}

// =============================================================================
// Product
// =============================================================================

/// A product in the catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Catalog identifier.
    pub id: String,

    /// Display name printed on the receipt.
    pub name: String,

    /// Optional longer description.
    pub description: Option<String>,

    /// Current unit price (non-negative).
    pub unit_price: Money,

    /// Whether GST applies to this product.
    pub gst_applicable: bool,
}

// =============================================================================
// Customer
// =============================================================================

/// Whether a customer is a person or a business.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "lowercase")]
pub enum CustomerType {
    Individual,
    Business,
}

impl Default for CustomerType {
    fn default() -> Self {
        CustomerType::Individual
    }
}

impl CustomerType {
    /// Storage token (`individual` / `business`).
    pub fn as_str(&self) -> &'static str {
        match self {
            CustomerType::Individual => "individual",
            CustomerType::Business => "business",
        }
    }

    /// Parses the storage token; unknown tokens yield `None`.
    pub fn parse(token: &str) -> Option<Self> {
        match token.trim().to_ascii_lowercase().as_str() {
            "individual" => Some(CustomerType::Individual),
            "business" => Some(CustomerType::Business),
            _ => None,
        }
    }
}

/// A customer record.
///
/// Individuals use `first_name` / `last_name`; businesses use
/// `business_name` and usually a `business_number` (ABN).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub customer_type: CustomerType,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub business_name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub address: Option<String>,
    pub business_number: Option<String>,
}

impl Customer {
    /// Name printed in the "To" block.
    pub fn display_name(&self) -> String {
        display_name(
            self.customer_type,
            self.business_name.as_deref(),
            self.first_name.as_deref(),
            self.last_name.as_deref(),
        )
    }
}

/// Shared by `Customer` and `CustomerSnapshot`.
pub(crate) fn display_name(
    customer_type: CustomerType,
    business_name: Option<&str>,
    first_name: Option<&str>,
    last_name: Option<&str>,
) -> String {
    if customer_type == CustomerType::Business {
        if let Some(name) = business_name.map(str::trim).filter(|n| !n.is_empty()) {
            return name.to_string();
        }
    }

    [first_name, last_name]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ")
}

// =============================================================================
// Seller Profile
// =============================================================================

/// The business issuing receipts. Singleton owned outside the engine.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct SellerProfile {
    pub name: String,
    pub address: String,
    pub business_number: String,
    pub email: String,
    pub phone: Option<String>,
    pub logo_path: Option<String>,
}

// =============================================================================
// Unit Tests
// =============================================================================
