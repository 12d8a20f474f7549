//! # Error Types
//!
//! Domain-specific error types for tillslip-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  tillslip-core (this file)                                              │
//! │  ├── CoreError        - Receipt request validation failures             │
//! │  └── ValidationError  - Field-level input failures                      │
//! │                                                                         │
//! │  tillslip-db          DbError       - Store / lookup failures           │
//! │  tillslip-render      RenderError   - Stream or layout failures         │
//! │  tillslip-engine      ReceiptError  - What the caller sees              │
//! │                                                                         │
//! │  Flow: CoreError → ReceiptError → outcome                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every `CoreError` is raised before any side effect.

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Receipt request validation errors, in the order they are checked.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// The request contained no line items.
    #[error("Receipt must contain at least one line item")]
    EmptyLineItems,

    /// A line's quantity was below one.
    #[error("Invalid quantity {quantity} for product {product_id}: must be at least 1")]
    InvalidQuantity { product_id: String, quantity: i64 },

    /// No customer with the requested id.
    #[error("Customer not found: {0}")]
    CustomerNotFound(String),

    /// One or more product ids did not resolve. Lists every miss.
    #[error("Products not found: {}", .0.join(", "))]
    ProductsNotFound(Vec<String>),

    /// The seller profile could not be loaded.
    #[error("Seller profile is unavailable")]
    SellerProfileUnavailable,

    /// A collaborator failed while looking something up.
    #[error("Lookup failed: {0}")]
    Lookup(String),

    /// A line total, subtotal or total does not fit in i64 cents.
    #[error("Amount out of range for product {product_id}")]
    AmountOutOfRange { product_id: String },
}

impl CoreError {
    /// True for "the thing you asked for does not exist" failures.
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            CoreError::CustomerNotFound(_)
                | CoreError::ProductsNotFound(_)
                | CoreError::SellerProfileUnavailable
        )
    }
}

// =============================================================================
// Validation Error
// =============================================================================

/// Field-level input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Invalid format (e.g., invalid amount, invalid date).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::InvalidQuantity {
            product_id: "p-9".to_string(),
            quantity: 0,
        };
        assert_eq!(
            err.to_string(),
            "Invalid quantity 0 for product p-9: must be at least 1"
        );

        let err = CoreError::ProductsNotFound(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(err.to_string(), "Products not found: a, b");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "customer_id".to_string(),
        };
        assert_eq!(err.to_string(), "customer_id is required");
    }

    #[test]
    fn test_not_found_classification() {
        let overflow = CoreError::AmountOutOfRange {
            product_id: "p-9".to_string(),
        };
        assert_eq!(overflow.to_string(), "Amount out of range for product p-9");
        assert!(!overflow.is_not_found());
        assert!(CoreError::SellerProfileUnavailable.is_not_found());
    }
}
