//! # tillslip-core: Pure Business Logic for Tillslip
//!
//! Everything about a receipt that can be decided without touching a disk:
//! amounts, GST, the tax-invoice rule, the receipt record itself and the
//! checks a request must pass before any lookup happens.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Tillslip Architecture                            │
//! │                                                                         │
//! │  apps/issuer ──► tillslip-engine (assemble → render → persist)          │
//! │                        │                 │              │               │
//! │                        ▼                 ▼              ▼               │
//! │  ┌──────────────────────────────┐  tillslip-render  tillslip-db         │
//! │  │ ★ tillslip-core (THIS CRATE) │                                       │
//! │  │  money · types · receipt     │  ◄── used by every crate above        │
//! │  │  tax · validation · error    │                                       │
//! │  │  NO I/O • PURE FUNCTIONS     │                                       │
//! │  └──────────────────────────────┘                                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Money type with integer cents
//! - [`types`] - Collaborator-owned entities (Product, Customer, SellerProfile)
//! - [`receipt`] - Receipt, line items, snapshots, requests
//! - [`tax`] - GST policy and tax-invoice classification
//! - [`validation`] - Request and field validation
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use tillslip_core::money::Money;
//! use tillslip_core::tax::TaxPolicy;
//!
//! let policy = TaxPolicy::default(); // 10% GST, $82.50 threshold
//! assert!(policy.is_tax_invoice(Money::from_cents(11000), true, false));
//! assert!(!policy.is_tax_invoice(Money::from_cents(11000), false, true));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod error;
pub mod money;
pub mod receipt;
pub mod tax;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use receipt::{
    CustomerSnapshot, LineItem, LineRequest, Receipt, ReceiptRequest, SellerSnapshot,
};
pub use tax::{TaxConfig, TaxPolicy, Totals};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Largest quantity accepted on a single line.
///
/// Keeps `unit_price × quantity` far away from i64 overflow for any
/// realistic price.
pub const MAX_LINE_QUANTITY: i64 = 1_000_000;
