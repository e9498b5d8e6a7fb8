//! # Line-Item Calculator
//!
//! Pure, deterministic bill math. Everything is integer cents.
//!
//! ## Calculation Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Line 1: 100.00 × 2  ──►  200.00 ─┐                                    │
//! │  Line 2:  50.00 × 1  ──►   50.00 ─┼──► subtotal  250.00                │
//! │                                    │                                     │
//! │                                    ├──► tax (10%, half-up)   25.00      │
//! │                                    │                                     │
//! │                                    └──► total   275.00                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use crate::money::Money;
use crate::BILL_TAX_RATE;

/// Subtotal, tax and grand total of a bill.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct BillTotals {
    pub subtotal: Money,
    pub tax: Money,
    pub total: Money,
}

/// Line total = unit price × quantity.
///
/// Zero when the price is absent or the quantity is not positive.
///
/// ```rust
/// use bookshop_core::calculator::compute_line_total;
/// use bookshop_core::money::Money;
///
/// assert_eq!(compute_line_total(Some(Money::from_cents(1250)), 4).cents(), 5000);
/// assert!(compute_line_total(None, 4).is_zero());
/// assert!(compute_line_total(Some(Money::from_cents(1250)), 0).is_zero());
/// ```
pub fn compute_line_total(unit_price: Option<Money>, quantity: i64) -> Money {
    match unit_price {
        Some(price) if quantity > 0 => price.multiply_quantity(quantity),
        _ => Money::zero(),
    }
}

/// Sums line totals and applies the shop's tax rate.
pub fn compute_bill_totals<I>(line_totals: I) -> BillTotals
where
    I: IntoIterator<Item = Money>,
{
    let subtotal: Money = line_totals.into_iter().sum();
    let tax = subtotal.calculate_tax(BILL_TAX_RATE);

    BillTotals {
        subtotal,
        tax,
        total: subtotal + tax,
    }
}
