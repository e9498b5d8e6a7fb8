//! # Error Types
//!
//! Domain-specific error types for bookshop-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  bookshop-core errors (this file)                                      │
//! │  ├── CoreError        - Business rule failures                         │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  bookshop-db errors (separate crate)                                   │
//! │  └── DbError          - Database operation failures                    │
//! │                                                                         │
//! │  bookshop-api errors (in app)                                          │
//! │  └── ApiError         - What the HTTP client sees                      │
//! │                                                                         │
//! │  Flow: ValidationError → CoreError → DbError → ApiError → Client       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Every variant carries the ids and references needed to act on it in a log
//! line (book id, reference, bill id).

use thiserror::Error;

use crate::types::PaymentStatus;

// =============================================================================
// Core Error
// =============================================================================

/// A bill or status change the business rules refuse.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Insufficient stock to complete a bill line.
    ///
    /// ## When This Occurs
    /// The conditional decrement `stock >= quantity` matched no row while
    /// the bill was being written.
    ///
    /// ```text
    /// Scan 5 × "Clean Code" (REF-0042)
    ///      │
    ///      ▼
    /// decrement: stock=2, requested=5 → no row updated
    ///      │
    ///      ▼
    /// InsufficientStock { book_id: 42, reference: "REF-0042", requested: 5 }
    ///      │
    ///      ▼
    /// Whole bill rolled back
    /// ```
    #[error("Insufficient stock for book {book_id} ({reference}): requested {requested}")]
    InsufficientStock {
        book_id: i64,
        reference: String,
        requested: i64,
    },

    /// Requested payment status change is not allowed.
    #[error("Bill {bill_id} cannot move from {from:?} to {to:?}")]
    InvalidBillStatus {
        bill_id: i64,
        from: PaymentStatus,
        to: PaymentStatus,
    },

    /// Bill has more lines than allowed.
    #[error("Bill cannot have more than {max} items")]
    BillTooLarge { max: usize },

    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A request that can be rejected before anything is written.
///
/// The message of each variant is shown to the cashier as is.
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("{field} is required")]
    Required { field: String },

    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Inclusive bounds.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Unparseable text, e.g. `"9.999"` or `"abc"` for a price.
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// An enum value outside its vocabulary (`CHEQUE` for a payment method).
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

// =============================================================================
// Result Type Alias
// =============================================================================

pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================
