//! # Validation Module
//!
//! Input checks that run before any lookup or side effect.
//!
//! ## Validation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  ReceiptRequest                                                         │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  validate_line_requests ← THIS MODULE (pure)                            │
//! │       ├── no lines?          → EmptyLineItems                           │
//! │       └── qty < 1 (or huge)? → InvalidQuantity { product_id }           │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  Assembler lookups (customer, products, seller) in tillslip-engine      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use crate::error::{CoreError, ValidationError};
use crate::money::Money;
use crate::receipt::LineRequest;
use crate::MAX_LINE_QUANTITY;

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Request Validators
// =============================================================================

/// Checks the request's line list: non-empty, every quantity in range.
///
/// Reports the first offending line.
///
/// ## Example
/// ```rust
/// use tillslip_core::receipt::LineRequest;
/// use tillslip_core::validation::validate_line_requests;
/// use tillslip_core::CoreError;
///
/// assert_eq!(validate_line_requests(&[]), Err(CoreError::EmptyLineItems));
/// assert!(validate_line_requests(&[LineRequest::new("p-1", 2)]).is_ok());
/// ```
pub fn validate_line_requests(lines: &[LineRequest]) -> Result<(), CoreError> {
    if lines.is_empty() {
        return Err(CoreError::EmptyLineItems);
    }

    if let Some(bad) = lines.iter().find(|l| validate_quantity(l.quantity).is_err()) {
        return Err(CoreError::InvalidQuantity {
            product_id: bad.product_id.clone(),
            quantity: bad.quantity,
        });
    }

    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a line quantity.
///
/// ## Rules
/// - Must be at least 1
/// - Must not exceed MAX_LINE_QUANTITY, which keeps `price × qty` far from
///   i64 overflow
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_LINE_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_LINE_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a catalog unit price.
///
/// ## Rules
/// - Must be non-negative (free items are allowed)
///
/// ## Example
/// ```rust
/// use tillslip_core::money::Money;
/// use tillslip_core::validation::validate_unit_price;
///
/// assert!(validate_unit_price(Money::from_cents(0)).is_ok());
/// assert!(validate_unit_price(Money::from_cents(-100)).is_err());
/// ```
pub fn validate_unit_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::OutOfRange {
            field: "unit_price".to_string(),
            min: 0,
            max: i64::MAX,
        });
    }

    Ok(())
}

/// Validates a tax rate in basis points (0% to 100%).
pub fn validate_tax_rate_bps(bps: u32) -> ValidationResult<()> {
    if bps > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax_rate".to_string(),
            min: 0,
            max: 10000,
        });
    }

    Ok(())
}

/// Validates that a required text field is present.
pub fn validate_required(field: &str, value: &str) -> ValidationResult<()> {
    if value.trim().is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================
