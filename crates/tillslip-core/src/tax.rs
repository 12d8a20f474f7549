//! # GST Policy
//!
//! Per-line tax, receipt totals and the tax-invoice decision.
//!
//! ## Classification
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  apply_tax? ──no──► RECEIPT   (force flag ignored)                      │
//! │      │                                                                  │
//! │     yes                                                                 │
//! │      │                                                                  │
//! │  total >= threshold  OR  force? ──yes──► TAX INVOICE                    │
//! │      │                                                                  │
//! │      no ──► RECEIPT                                                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Configuration is passed in explicitly; nothing here reads the
//! environment.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::error::{CoreError, CoreResult};
use crate::money::Money;
use crate::receipt::LineItem;
use crate::types::TaxRate;

/// Default threshold at or above which a tax invoice is required ($82.50).
pub const DEFAULT_TAX_INVOICE_THRESHOLD: Money = Money::from_cents(8250);

// =============================================================================
// Configuration
// =============================================================================

/// Rate and threshold used by [`TaxPolicy`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaxConfig {
    pub rate: TaxRate,
    pub tax_invoice_threshold: Money,
}

impl Default for TaxConfig {
    fn default() -> Self {
        TaxConfig {
            rate: TaxRate::GST,
            tax_invoice_threshold: DEFAULT_TAX_INVOICE_THRESHOLD,
        }
    }
}

// =============================================================================
// Totals
// =============================================================================

/// Aggregated receipt amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Totals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

// =============================================================================
// Policy
// =============================================================================

/// Pure GST calculations for one configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TaxPolicy {
    config: TaxConfig,
}

impl TaxPolicy {
    pub fn new(config: TaxConfig) -> Self {
        TaxPolicy { config }
    }

    pub fn config(&self) -> &TaxConfig {
        &self.config
    }

    /// GST for one line: zero unless tax is applied and the line is
    /// GST-applicable, otherwise `round_half_up(unit_price × qty × rate)`.
    pub fn line_tax(&self, line: &LineItem, apply_tax: bool) -> Money {
        if !apply_tax || !line.gst_applicable {
            return Money::zero();
        }

        line.line_total.calculate_tax(self.config.rate)
    }

    /// Subtotal, GST and total for a set of lines.
    ///
    /// Every component is already a whole number of cents, so the sums need
    /// no further rounding. A running sum that leaves i64 fails with
    /// [`CoreError::AmountOutOfRange`] naming the line that pushed it over.
    pub fn aggregate(&self, lines: &[LineItem], apply_tax: bool) -> CoreResult<Totals> {
        let mut totals = Totals {
            subtotal: Money::zero(),
            tax: Money::zero(),
            total: Money::zero(),
        };

        for line in lines {
            let out_of_range = || CoreError::AmountOutOfRange {
                product_id: line.product_id.clone(),
            };

            totals.subtotal = totals
                .subtotal
                .checked_add(line.line_total)
                .ok_or_else(out_of_range)?;
            totals.tax = totals
                .tax
                .checked_add(self.line_tax(line, apply_tax))
                .ok_or_else(out_of_range)?;
            totals.total = totals
                .subtotal
                .checked_add(totals.tax)
                .ok_or_else(out_of_range)?;
        }

        Ok(totals)
    }

    /// Whether the document must be labelled a tax invoice.
    ///
    /// `force` only matters when tax is applied.
    pub fn is_tax_invoice(&self, total: Money, apply_tax: bool, force: bool) -> bool {
        if !apply_tax {
            return false;
        }

        total >= self.config.tax_invoice_threshold || force
    }

    /// Fills in each line's `tax` field and returns the totals.
    pub fn apply(&self, lines: &mut [LineItem], apply_tax: bool) -> CoreResult<Totals> {
        for line in lines.iter_mut() {
            line.tax = self.line_tax(line, apply_tax);
        }
        self.aggregate(lines, apply_tax)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn line(unit_cents: i64, quantity: i64, gst_applicable: bool) -> LineItem {
        LineItem {
            product_id: format!("p-{}", unit_cents),
            name: "Item".to_string(),
            description: None,
            quantity,
            unit_price: Money::from_cents(unit_cents),
            line_total: Money::from_cents(unit_cents * quantity),
            gst_applicable,
            tax: Money::zero(),
        }
    }

    fn policy() -> TaxPolicy {
        TaxPolicy::default()
    }

    #[test]
    fn test_single_line_without_tax() {
        let lines = vec![line(700, 2, true)];
        let totals = policy().aggregate(&lines, false).unwrap();

        assert_eq!(totals.subtotal.cents(), 1400);
        assert_eq!(totals.tax.cents(), 0);
        assert_eq!(totals.total.cents(), 1400);
        assert!(!policy().is_tax_invoice(totals.total, false, false));
    }

    #[test]
    fn test_mixed_lines_below_threshold() {
        let lines = vec![line(350, 10, true), line(700, 5, false)];
        let totals = policy().aggregate(&lines, true).unwrap();

        assert_eq!(totals.subtotal.cents(), 7000);
        assert_eq!(totals.tax.cents(), 350);
        assert_eq!(totals.total.cents(), 7350);
        assert!(!policy().is_tax_invoice(totals.total, true, false));
    }

    #[test]
    fn test_above_threshold_is_tax_invoice() {
        let lines = vec![line(10000, 1, true)];
        let totals = policy().aggregate(&lines, true).unwrap();

        assert_eq!(totals.subtotal.cents(), 10000);
        assert_eq!(totals.tax.cents(), 1000);
        assert_eq!(totals.total.cents(), 11000);
        assert!(policy().is_tax_invoice(totals.total, true, false));
    }

    #[test]
    fn test_forced_tax_invoice_below_threshold() {
        let lines = vec![line(350, 1, true)];
        let totals = policy().aggregate(&lines, true).unwrap();

        assert_eq!(totals.total.cents(), 385);
        assert!(policy().is_tax_invoice(totals.total, true, true));
    }

    #[test]
    fn test_force_ignored_when_tax_not_applied() {
        let lines = vec![line(350, 1, true)];
        let totals = policy().aggregate(&lines, false).unwrap();

        assert_eq!(totals.tax.cents(), 0);
        assert_eq!(totals.total.cents(), 350);
        assert!(!policy().is_tax_invoice(totals.total, false, true));
        assert!(!policy().is_tax_invoice(Money::from_cents(1_000_000), false, true));
    }

    #[test]
    fn test_threshold_is_inclusive() {
        assert!(policy().is_tax_invoice(Money::from_cents(8250), true, false));
        assert!(!policy().is_tax_invoice(Money::from_cents(8249), true, false));
    }

    #[test]
    fn test_tax_is_sum_of_rounded_lines() {
        // 0.5c of GST on each line rounds up to 1c per line, not 1c overall
        let lines = vec![line(5, 1, true), line(5, 1, true)];
        let totals = policy().aggregate(&lines, true).unwrap();
        assert_eq!(totals.tax.cents(), 2);
        assert_eq!(totals.total.cents(), 12);
    }

    #[test]
    fn test_apply_sets_line_tax() {
        let mut lines = vec![line(350, 10, true), line(700, 5, false)];
        let totals = policy().apply(&mut lines, true).unwrap();

        assert_eq!(lines[0].tax.cents(), 350);
        assert_eq!(lines[1].tax.cents(), 0);
        assert_eq!(totals.tax.cents(), 350);
    }

    #[test]
    fn test_custom_configuration() {
        let policy = TaxPolicy::new(TaxConfig {
            rate: TaxRate::from_bps(1500),
            tax_invoice_threshold: Money::from_cents(1000),
        });
        let totals = policy.aggregate(&[line(1000, 1, true)], true).unwrap();

        assert_eq!(totals.tax.cents(), 150);
        assert!(policy.is_tax_invoice(totals.total, true, false));
    }

    #[test]
    fn test_subtotal_overflow_names_line() {
        let half = i64::MAX / 2 + 1;
        let mut big = line(half, 1, false);
        big.product_id = "p-a".to_string();
        let mut bigger = line(half, 1, false);
        bigger.product_id = "p-b".to_string();

        assert_eq!(
            policy().aggregate(&[big, bigger], false),
            Err(CoreError::AmountOutOfRange {
                product_id: "p-b".to_string()
            })
        );
    }

    #[test]
    fn test_total_overflow_from_tax() {
        // the subtotal fits; adding 10% GST does not
        let lines = vec![line(i64::MAX - 10, 1, true)];

        assert!(policy().aggregate(&lines, false).is_ok());
        assert!(matches!(
            policy().aggregate(&lines, true),
            Err(CoreError::AmountOutOfRange { .. })
        ));
    }
}
