//! # Domain Types
//!
//! Core domain types used throughout the bookshop POS.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │      Book       │   │      Bill       │   │    BillItem     │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  id (i64)       │   │  id (i64)       │   │  bill_id (FK)   │       │
//! │  │  reference_no   │   │  bill_no        │   │  book_id (weak) │       │
//! │  │  price_cents    │   │  total_cents    │   │  *_snapshot     │       │
//! │  │  stock          │   │  payment_status │   │  quantity       │       │
//! │  └─────────────────┘   └─────────────────┘   └─────────────────┘       │
//! │                                                                         │
//! │  ┌─────────────────┐   ┌─────────────────┐   ┌─────────────────┐       │
//! │  │   BookStatus    │   │  PaymentStatus  │   │ PaymentMethod   │       │
//! │  │  ─────────────  │   │  ─────────────  │   │  ─────────────  │       │
//! │  │  active         │   │  PENDING        │   │  CASH           │       │
//! │  │  inactive       │   │  COMPLETED      │   │  CARD           │       │
//! │  │  out_of_stock   │   │  CANCELLED      │   └─────────────────┘       │
//! │  └─────────────────┘   └─────────────────┘                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Dual-Key Identity
//! - `id`: integer assigned by the store on insert, used for relations
//! - Business ID: `reference_no` for books, `bill_no` for bills

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use ts_rs::TS;

use crate::calculator::{compute_bill_totals, compute_line_total};
use crate::error::ValidationError;
use crate::money::Money;

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate represented in basis points (bps).
///
/// 1 basis point = 0.01%, so 1000 bps = 10%.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TaxRate(u32);

impl TaxRate {
    /// Creates a tax rate from basis points.
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Returns the rate in basis points.
    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }
}

// =============================================================================
// Book
// =============================================================================

/// Catalog status of a book.
///
/// ```text
///   active ──stock hits 0──► out_of_stock ──restock──► active
///
///   inactive: set by an admin, never changed by billing or restock
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "snake_case"))]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum BookStatus {
    Active,
    Inactive,
    OutOfStock,
}

impl Default for BookStatus {
    fn default() -> Self {
        BookStatus::Active
    }
}

/// A book in the catalog.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Book {
    pub id: i64,

    /// Display title, copied into bill items at sale time.
    pub title: String,

    pub author: Option<String>,

    /// Business identifier printed on the label and scanned at the counter.
    pub reference_no: String,

    /// Unit price in cents.
    pub price_cents: i64,

    /// Units on hand. Never negative.
    pub stock: i64,

    pub status: BookStatus,

    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,

    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
}

impl Book {
    /// Returns the price as a Money type.
    #[inline]
    pub fn price(&self) -> Money {
        Money::from_cents(self.price_cents)
    }

    /// Checks if `quantity` units could be sold right now.
    pub fn can_sell(&self, quantity: i64) -> bool {
        self.status != BookStatus::Inactive && self.stock >= quantity
    }
}

// =============================================================================
// Payment Method
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentMethod {
    /// Cash at the counter.
    Cash,
    /// Card on the external terminal.
    Card,
}

impl PaymentMethod {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "CASH",
            PaymentMethod::Card => "CARD",
        }
    }
}

impl Default for PaymentMethod {
    fn default() -> Self {
        PaymentMethod::Cash
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "CASH" => Ok(PaymentMethod::Cash),
            "CARD" => Ok(PaymentMethod::Card),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_method".to_string(),
                allowed: vec!["CASH".to_string(), "CARD".to_string()],
            }),
        }
    }
}

// =============================================================================
// Payment Status
// =============================================================================

/// Payment status of a bill.
///
/// ## Transitions
/// ```text
///   PENDING ───► COMPLETED ───► CANCELLED
///      │                            ▲
///      └────────────────────────────┘
/// ```
/// Anything else (including staying put) is rejected.
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum PaymentStatus {
    Pending,
    Completed,
    Cancelled,
}

impl PaymentStatus {
    pub const fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "PENDING",
            PaymentStatus::Completed => "COMPLETED",
            PaymentStatus::Cancelled => "CANCELLED",
        }
    }

    /// Checks whether a bill in this status may move to `next`.
    pub const fn can_transition_to(&self, next: PaymentStatus) -> bool {
        matches!(
            (self, next),
            (PaymentStatus::Pending, PaymentStatus::Completed)
                | (PaymentStatus::Pending, PaymentStatus::Cancelled)
                | (PaymentStatus::Completed, PaymentStatus::Cancelled)
        )
    }
}

/// A counter sale is paid on the spot.
impl Default for PaymentStatus {
    fn default() -> Self {
        PaymentStatus::Completed
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "PENDING" => Ok(PaymentStatus::Pending),
            "COMPLETED" => Ok(PaymentStatus::Completed),
            "CANCELLED" => Ok(PaymentStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "payment_status".to_string(),
                allowed: vec![
                    "PENDING".to_string(),
                    "COMPLETED".to_string(),
                    "CANCELLED".to_string(),
                ],
            }),
        }
    }
}

// =============================================================================
// Bill
// =============================================================================

/// A persisted sales transaction header, with its items.
///
/// Totals are stored, not derived on read. [`Bill::set_items`] keeps them
/// consistent whenever the item collection is assigned:
/// `subtotal = Σ item.total_price`, `tax = 10% half-up`, `total = subtotal + tax`.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct Bill {
    pub id: i64,
    pub bill_no: String,
    pub cashier_id: i64,
    pub cashier_name: String,
    pub subtotal_cents: i64,
    pub tax_cents: i64,
    pub total_cents: i64,
    pub payment_method: PaymentMethod,
    pub payment_status: PaymentStatus,
    /// Local calendar date the bill was rung up on.
    #[ts(as = "String")]
    pub bill_date: NaiveDate,
    #[ts(as = "String")]
    pub bill_time: NaiveTime,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
    #[ts(as = "String")]
    pub updated_at: DateTime<Utc>,
    /// Loaded separately from `bill_items`.
    #[cfg_attr(feature = "sqlx", sqlx(skip))]
    #[serde(default)]
    pub items: Vec<BillItem>,
}

impl Bill {
    #[inline]
    pub fn subtotal(&self) -> Money {
        Money::from_cents(self.subtotal_cents)
    }

    #[inline]
    pub fn tax(&self) -> Money {
        Money::from_cents(self.tax_cents)
    }

    #[inline]
    pub fn total(&self) -> Money {
        Money::from_cents(self.total_cents)
    }

    /// Replaces the items and recomputes subtotal, tax and total.
    pub fn set_items(&mut self, items: Vec<BillItem>) {
        let totals = compute_bill_totals(items.iter().map(BillItem::total_price));
        self.subtotal_cents = totals.subtotal.cents();
        self.tax_cents = totals.tax.cents();
        self.total_cents = totals.total.cents();
        self.items = items;
    }
}

// =============================================================================
// Bill Item
// =============================================================================

/// A line item in a bill.
/// Uses snapshot pattern to freeze book data at time of sale.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct BillItem {
    pub id: i64,
    pub bill_id: i64,
    pub book_id: i64,
    /// Title at time of sale (frozen).
    pub book_title: String,
    /// Reference number at time of sale (frozen).
    pub book_reference: String,
    /// Unit price in cents at time of sale (frozen).
    pub unit_price_cents: i64,
    pub quantity: i64,
    /// unit_price × quantity
    pub total_price_cents: i64,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

impl BillItem {
    /// Builds an unsaved item (`id` and `bill_id` are 0) from a cart line.
    pub fn from_line(line: &BillLine, created_at: DateTime<Utc>) -> Self {
        BillItem {
            id: 0,
            bill_id: 0,
            book_id: line.book_id,
            book_title: line.title.clone(),
            book_reference: line.reference_no.clone(),
            unit_price_cents: line.unit_price.cents(),
            quantity: line.quantity,
            total_price_cents: compute_line_total(Some(line.unit_price), line.quantity).cents(),
            created_at,
        }
    }

    #[inline]
    pub fn unit_price(&self) -> Money {
        Money::from_cents(self.unit_price_cents)
    }

    #[inline]
    pub fn total_price(&self) -> Money {
        Money::from_cents(self.total_price_cents)
    }

    /// Sets the quantity and recomputes the line total.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = quantity;
        self.recompute_total();
    }

    /// Sets the unit price and recomputes the line total.
    pub fn set_unit_price(&mut self, unit_price: Money) {
        self.unit_price_cents = unit_price.cents();
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total_price_cents = compute_line_total(Some(self.unit_price()), self.quantity).cents();
    }
}

// =============================================================================
// Bill Draft
// =============================================================================

/// One cart line as submitted by the cashier.
///
/// Title, reference and price are the snapshot the frontend took from the
/// catalog when the book was scanned. They are trusted as given.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillLine {
    pub book_id: i64,
    pub title: String,
    pub reference_no: String,
    pub unit_price: Money,
    pub quantity: i64,
}

/// Everything needed to create a bill. Nothing here has touched the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BillDraft {
    pub cashier_id: i64,
    pub cashier_name: String,
    #[serde(default)]
    pub payment_method: PaymentMethod,
    /// Defaults to `COMPLETED` when absent.
    #[serde(default)]
    pub payment_status: Option<PaymentStatus>,
    /// Generated when absent.
    #[serde(default)]
    pub bill_no: Option<String>,
    pub lines: Vec<BillLine>,
}

impl BillDraft {
    pub fn new(cashier_id: i64, cashier_name: impl Into<String>) -> Self {
        BillDraft {
            cashier_id,
            cashier_name: cashier_name.into(),
            payment_method: PaymentMethod::default(),
            payment_status: None,
            bill_no: None,
            lines: Vec::new(),
        }
    }

    pub fn with_payment_method(mut self, method: PaymentMethod) -> Self {
        self.payment_method = method;
        self
    }

    pub fn with_payment_status(mut self, status: PaymentStatus) -> Self {
        self.payment_status = Some(status);
        self
    }

    pub fn with_bill_no(mut self, bill_no: impl Into<String>) -> Self {
        self.bill_no = Some(bill_no.into());
        self
    }

    pub fn with_line(
        mut self,
        book_id: i64,
        title: impl Into<String>,
        reference_no: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        self.lines.push(BillLine {
            book_id,
            title: title.into(),
            reference_no: reference_no.into(),
            unit_price,
            quantity,
        });
        self
    }
}

// =============================================================================
// Billing Policy
// =============================================================================

/// What the bill transaction does when a line cannot be covered by stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct BillingPolicy {
    /// `false` (default): the whole bill is rolled back.
    /// `true`: the line is logged and the bill still commits, stock untouched.
    pub allow_backorder: bool,
}

// =============================================================================
// Stock Movement
// =============================================================================

#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(feature = "sqlx", sqlx(rename_all = "UPPERCASE"))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "UPPERCASE")]
pub enum StockReason {
    Sale,
    Restock,
}

/// One applied change to a book's stock.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
#[ts(export)]
#[serde(rename_all = "camelCase")]
pub struct StockMovement {
    pub id: i64,
    pub book_id: i64,
    /// Set for sales, absent for restocks.
    pub bill_id: Option<i64>,
    /// Negative for sales.
    pub delta: i64,
    pub stock_after: i64,
    pub reason: StockReason,
    #[ts(as = "String")]
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample_item(price: i64, qty: i64) -> BillItem {
        let line = BillLine {
            book_id: 1,
            title: "Dune".to_string(),
            reference_no: "REF-0001".to_string(),
            unit_price: Money::from_cents(price),
            quantity: qty,
        };
        BillItem::from_line(&line, Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap())
    }

    fn empty_bill() -> Bill {
        let now = Utc.with_ymd_and_hms(2026, 3, 1, 9, 0, 0).unwrap();
        Bill {
            id: 0,
            bill_no: "BILL202603010001".to_string(),
            cashier_id: 3,
            cashier_name: "Asha".to_string(),
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            payment_method: PaymentMethod::Cash,
            payment_status: PaymentStatus::Completed,
            bill_date: now.date_naive(),
            bill_time: now.time(),
            created_at: now,
            updated_at: now,
            items: Vec::new(),
        }
    }

    #[test]
    fn test_item_total_follows_quantity_and_price() {
        let mut item = sample_item(1999, 2);
        assert_eq!(item.total_price_cents, 3998);

        item.set_quantity(3);
        assert_eq!(item.total_price_cents, 5997);

        item.set_unit_price(Money::from_cents(1000));
        assert_eq!(item.total_price_cents, 3000);
    }

    #[test]
    fn test_set_items_recomputes_totals() {
        let mut bill = empty_bill();
        bill.set_items(vec![sample_item(10_000, 2), sample_item(5_000, 1)]);

        assert_eq!(bill.subtotal_cents, 25_000);
        assert_eq!(bill.tax_cents, 2_500);
        assert_eq!(bill.total_cents, 27_500);

        bill.set_items(Vec::new());
        assert_eq!(bill.total(), Money::zero());
    }

    #[test]
    fn test_payment_status_transitions() {
        use PaymentStatus::*;

        assert!(Pending.can_transition_to(Completed));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Completed.can_transition_to(Cancelled));

        assert!(!Completed.can_transition_to(Pending));
        assert!(!Cancelled.can_transition_to(Completed));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Completed.can_transition_to(Completed));
    }

    #[test]
    fn test_defaults() {
        assert_eq!(PaymentStatus::default(), PaymentStatus::Completed);
        assert_eq!(PaymentMethod::default(), PaymentMethod::Cash);
        assert!(!BillingPolicy::default().allow_backorder);
    }

    #[test]
    fn test_payment_method_parse() {
        assert_eq!("CASH".parse::<PaymentMethod>().unwrap(), PaymentMethod::Cash);
        assert_eq!("card".parse::<PaymentMethod>().unwrap(), PaymentMethod::Card);
        assert!("CHEQUE".parse::<PaymentMethod>().is_err());
    }

    #[test]
    fn test_wire_format() {
        assert_eq!(
            serde_json::to_string(&PaymentStatus::Cancelled).unwrap(),
            "\"CANCELLED\""
        );
        assert_eq!(
            serde_json::to_string(&BookStatus::OutOfStock).unwrap(),
            "\"out_of_stock\""
        );
    }

    #[test]
    fn test_book_can_sell() {
        let now = Utc::now();
        let mut book = Book {
            id: 1,
            title: "Dune".to_string(),
            author: None,
            reference_no: "REF-0001".to_string(),
            price_cents: 1000,
            stock: 2,
            status: BookStatus::Active,
            created_at: now,
            updated_at: now,
        };
        assert!(book.can_sell(2));
        assert!(!book.can_sell(3));

        book.status = BookStatus::Inactive;
        assert!(!book.can_sell(1));
    }
}
