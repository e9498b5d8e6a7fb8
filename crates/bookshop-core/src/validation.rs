//! # Validation Module
//!
//! Input validation for bills and catalog entries.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: HTTP handler (bookshop-api)                                  │
//! │  ├── JSON shape (deserialization)                                      │
//! │  └── Decimal parsing of prices                                         │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: THIS MODULE: business rules, before any write                │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 3: Database (SQLite)                                            │
//! │  ├── CHECK (stock >= 0), CHECK (quantity > 0)                          │
//! │  ├── UNIQUE (bill_no), UNIQUE (reference_no)                           │
//! │  └── Foreign key constraints                                           │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use bookshop_core::validation::{validate_draft, validate_quantity};
//! use bookshop_core::{BillDraft, Money};
//!
//! validate_quantity(5).unwrap();
//!
//! let draft = BillDraft::new(3, "Asha")
//!     .with_line(1, "Dune", "REF-0001", Money::from_cents(1999), 2);
//! validate_draft(&draft).unwrap();
//! ```

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::Money;
use crate::types::{BillDraft, BillLine};
use crate::{MAX_BILL_ITEMS, MAX_ITEM_QUANTITY, MAX_UNIT_PRICE};

/// Result type for validation operations.
pub type ValidationResult<T> = Result<T, ValidationError>;

/// Upper bound for a single restock delivery.
pub const MAX_RESTOCK_QUANTITY: i64 = 100_000;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a book reference number.
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Letters, digits, hyphens and underscores only
///
/// ```rust
/// use bookshop_core::validation::validate_reference;
///
/// assert!(validate_reference("REF-0042").is_ok());
/// assert!(validate_reference("").is_err());
/// assert!(validate_reference("REF 42").is_err());
/// ```
pub fn validate_reference(reference: &str) -> ValidationResult<()> {
    let reference = reference.trim();

    if reference.is_empty() {
        return Err(ValidationError::Required {
            field: "reference_no".to_string(),
        });
    }

    if reference.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "reference_no".to_string(),
            max: 50,
        });
    }

    if !reference
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "reference_no".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a book title (catalog entry or bill snapshot).
pub fn validate_title(title: &str) -> ValidationResult<()> {
    let title = title.trim();

    if title.is_empty() {
        return Err(ValidationError::Required {
            field: "title".to_string(),
        });
    }

    if title.len() > 255 {
        return Err(ValidationError::TooLong {
            field: "title".to_string(),
            max: 255,
        });
    }

    Ok(())
}

/// Validates the cashier identity stamped on a bill.
pub fn validate_cashier(cashier_id: i64, cashier_name: &str) -> ValidationResult<()> {
    if cashier_id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "cashier_id".to_string(),
        });
    }

    if cashier_name.trim().is_empty() {
        return Err(ValidationError::Required {
            field: "cashier_name".to_string(),
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
/// - At least 1
/// - At most [`MAX_ITEM_QUANTITY`]
pub fn validate_quantity(quantity: i64) -> ValidationResult<()> {
    if !(1..=MAX_ITEM_QUANTITY).contains(&quantity) {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a restock quantity.
pub fn validate_restock_quantity(quantity: i64) -> ValidationResult<()> {
    if quantity <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if quantity > MAX_RESTOCK_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_RESTOCK_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a unit price in cents.
///
/// ## Rules
/// - Free books are allowed
/// - At most [`MAX_UNIT_PRICE`]
pub fn validate_price(price: Money) -> ValidationResult<()> {
    if price.is_negative() || price > MAX_UNIT_PRICE {
        return Err(ValidationError::OutOfRange {
            field: "price".to_string(),
            min: 0,
            max: MAX_UNIT_PRICE.cents(),
        });
    }

    Ok(())
}

// =============================================================================
// Bill Validators
// =============================================================================

/// Validates one cart line.
pub fn validate_line(line: &BillLine) -> ValidationResult<()> {
    if line.book_id <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "book_id".to_string(),
        });
    }
    validate_title(&line.title)?;
    validate_price(line.unit_price)?;
    validate_quantity(line.quantity)
}

/// Validates a whole draft before anything is written.
pub fn validate_draft(draft: &BillDraft) -> CoreResult<()> {
    validate_cashier(draft.cashier_id, &draft.cashier_name)?;

    if draft.lines.is_empty() {
        return Err(ValidationError::Required {
            field: "items".to_string(),
        }
        .into());
    }

    if draft.lines.len() > MAX_BILL_ITEMS {
        return Err(CoreError::BillTooLarge {
            max: MAX_BILL_ITEMS,
        });
    }

    if let Some(bill_no) = &draft.bill_no {
        if bill_no.trim().is_empty() {
            return Err(ValidationError::Required {
                field: "bill_no".to_string(),
            }
            .into());
        }
    }

    for line in &draft.lines {
        validate_line(line)?;
    }

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> BillDraft {
        BillDraft::new(3, "Asha")
            .with_line(1, "Dune", "REF-0001", Money::from_cents(10_000), 2)
            .with_line(2, "Emma", "REF-0002", Money::from_cents(5_000), 1)
    }

    #[test]
    fn test_valid_draft() {
        assert!(validate_draft(&draft()).is_ok());
    }

    #[test]
    fn test_empty_items_rejected() {
        let mut d = draft();
        d.lines.clear();
        let err = validate_draft(&d).unwrap_err();
        assert_eq!(err.to_string(), "Validation error: items is required");
    }

    #[test]
    fn test_too_many_lines_rejected() {
        let mut d = draft();
        let line = d.lines[0].clone();
        d.lines = vec![line; MAX_BILL_ITEMS + 1];
        assert!(matches!(
            validate_draft(&d),
            Err(CoreError::BillTooLarge { max: MAX_BILL_ITEMS })
        ));
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(MAX_ITEM_QUANTITY).is_ok());
        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(MAX_ITEM_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_bad_line_rejected() {
        let mut d = draft();
        d.lines[1].quantity = 0;
        assert!(validate_draft(&d).is_err());

        let mut d = draft();
        d.lines[0].unit_price = Money::from_cents(-1);
        assert!(validate_draft(&d).is_err());

        let mut d = draft();
        d.lines[0].title = "   ".to_string();
        assert!(validate_draft(&d).is_err());

        let mut d = draft();
        d.lines[0].book_id = 0;
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn test_cashier_rules() {
        assert!(validate_cashier(1, "Asha").is_ok());
        assert!(validate_cashier(0, "Asha").is_err());
        assert!(validate_cashier(1, "").is_err());
    }

    #[test]
    fn test_blank_supplied_bill_no_rejected() {
        let d = draft().with_bill_no(" ");
        assert!(validate_draft(&d).is_err());
    }

    #[test]
    fn test_restock_quantity() {
        assert!(validate_restock_quantity(10).is_ok());
        assert!(validate_restock_quantity(0).is_err());
        assert!(validate_restock_quantity(MAX_RESTOCK_QUANTITY + 1).is_err());
    }

    #[test]
    fn test_free_book_allowed() {
        assert!(validate_price(Money::zero()).is_ok());
    }

    #[test]
    fn test_price_ceiling() {
        assert!(validate_price(MAX_UNIT_PRICE).is_ok());
        assert!(validate_price(Money::from_cents(MAX_UNIT_PRICE.cents() + 1)).is_err());

        let mut d = draft();
        d.lines[0].unit_price = Money::parse_decimal("50000000000000000").unwrap();
        d.lines[0].quantity = 2;
        let err = validate_draft(&d).unwrap_err();
        assert!(matches!(
            err,
            CoreError::Validation(ValidationError::OutOfRange { ref field, .. }) if field == "price"
        ));
    }

    #[test]
    fn test_largest_bill_fits_in_cents() {
        let line = MAX_UNIT_PRICE.cents().checked_mul(MAX_ITEM_QUANTITY);
        let bill = line.and_then(|cents| cents.checked_mul(MAX_BILL_ITEMS as i64));
        assert!(bill.is_some());
    }
}
