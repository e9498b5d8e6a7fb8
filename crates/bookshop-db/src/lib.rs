//! # bookshop-db: Database Layer for the Bookshop POS
//!
//! This crate owns every write to the bookshop database and the transaction
//! boundary around each bill. It uses SQLite with sqlx.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookshop POS Data Flow                           │
//! │                                                                         │
//! │  POST /api/bills (bookshop-api)                                        │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                  bookshop-db (THIS CRATE)                       │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────────┐    ┌───────────────┐    ┌──────────────┐  │   │
//! │  │   │   Database    │    │  Repositories │    │  Migrations  │  │   │
//! │  │   │   (pool.rs)   │    │               │    │  (embedded)  │  │   │
//! │  │   │               │◄───│ BillRepo      │    │ 001_initial  │  │   │
//! │  │   │ SqlitePool    │    │ BookRepo      │    │              │  │   │
//! │  │   └───────────────┘    └───────┬───────┘    └──────────────┘  │   │
//! │  │                                │                                │   │
//! │  │                ┌───────────────┴───────────────┐                │   │
//! │  │                ▼                               ▼                │   │
//! │  │        ┌──────────────┐               ┌──────────────┐         │   │
//! │  │        │  ledger.rs   │               │bill_number.rs│         │   │
//! │  │        │ stock deltas │               │ BILL numbers │         │   │
//! │  │        └──────────────┘               └──────────────┘         │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  SQLite (WAL, foreign keys on)                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//!
//! - [`pool`] - Connection pool creation and configuration
//! - [`migrations`] - Embedded database migrations
//! - [`error`] - Database error types
//! - [`repository`] - Book and bill repositories
//! - [`ledger`] - Conditional stock changes and movement records
//! - [`bill_number`] - Bill number generation with fallbacks
//!
//! ## Usage
//!
//! ```rust,ignore
//! use bookshop_db::{Database, DbConfig};
//! use bookshop_core::{BillDraft, Money};
//!
//! let db = Database::new(DbConfig::new("./data/bookshop.db")).await?;
//!
//! let draft = BillDraft::new(3, "Asha")
//!     .with_line(1, "Dune", "REF-0001", Money::from_cents(10_000), 2);
//! let bill = db.bills().create_bill(draft).await?;
//! println!("{} {}", bill.bill_no, bill.total());
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod bill_number;
pub mod error;
pub mod ledger;
pub mod migrations;
pub mod pool;
pub mod repository;

// =============================================================================
// Re-exports
// =============================================================================

pub use error::{DbError, DbResult};
pub use ledger::StockOutcome;
pub use pool::{Database, DbConfig};

// Repository re-exports for convenience
pub use repository::bill::BillRepository;
pub use repository::book::{BookRepository, NewBook};
