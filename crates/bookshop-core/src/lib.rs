//! # bookshop-core: Pure Business Logic for the Bookshop POS
//!
//! This crate holds the billing rules of the bookshop point of sale as pure
//! functions with zero I/O dependencies.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                       Bookshop POS Architecture                         │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                Cashier / Admin web frontend                     │   │
//! │  │        Scan book ──► Cart ──► Pay ──► Printed bill              │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ HTTP / JSON                            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                    bookshop-api (axum)                          │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ bookshop-core (THIS CRATE) ★                      │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐ ┌───────────┐ ┌────────────┐ ┌────────────┐    │   │
//! │  │   │   types   │ │   money   │ │ calculator │ │ validation │    │   │
//! │  │   │ Bill,Book │ │   Money   │ │  totals    │ │   rules    │    │   │
//! │  │   └───────────┘ └───────────┘ └────────────┘ └────────────┘    │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │                  bookshop-db (Database Layer)                   │   │
//! │  │       Stock ledger, bill transactions, bill numbers             │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Domain types (Book, Bill, BillItem, statuses)
//! - [`money`] - Money type with integer cents (no floating point!)
//! - [`calculator`] - Line totals and bill totals
//! - [`bill_number`] - Human-readable bill number formats
//! - [`error`] - Domain error types
//! - [`validation`] - Business rule validation
//!
//! ## Example Usage
//!
//! ```rust
//! use bookshop_core::calculator::compute_bill_totals;
//! use bookshop_core::money::Money;
//!
//! let lines = [
//!     (Money::from_cents(10_000), 2), // 100.00 × 2
//!     (Money::from_cents(5_000), 1),  //  50.00 × 1
//! ];
//! let totals = compute_bill_totals(lines.iter().map(|(p, q)| p.multiply_quantity(*q)));
//!
//! assert_eq!(totals.subtotal.to_string(), "250.00");
//! assert_eq!(totals.tax.to_string(), "25.00");
//! assert_eq!(totals.total.to_string(), "275.00");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill_number;
pub mod calculator;
pub mod error;
pub mod money;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use error::{CoreError, CoreResult, ValidationError};
pub use money::Money;
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Sales tax applied to every bill: 10% (1000 basis points).
///
/// The rate is fixed for the whole shop; books carry no per-item rate.
pub const BILL_TAX_RATE: TaxRate = TaxRate::from_bps(1000);

/// Maximum number of lines allowed in a single bill.
///
/// ## Business Reason
/// Prevents runaway carts and keeps a bill printable on one receipt roll.
pub const MAX_BILL_ITEMS: usize = 100;

/// Maximum quantity of a single line.
///
/// ## Business Reason
/// Catches scanner/keyboard slips (typing 1000 instead of 10).
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Highest unit price a line or catalog entry may carry: 10,000,000.00.
///
/// A full bill at this price and quantity stays far inside `i64` cents.
pub const MAX_UNIT_PRICE: Money = Money::from_cents(1_000_000_000);
