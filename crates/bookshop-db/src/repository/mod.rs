//! # Repository Module
//!
//! Database repository implementations for the bookshop POS.
//!
//! ## Repository Pattern
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Repository Pattern                                   │
//! │                                                                         │
//! │  HTTP handler                                                          │
//! │       │                                                                 │
//! │       │  db.bills().create_bill(draft)                                 │
//! │       ▼                                                                 │
//! │  BillRepository                      BookRepository                    │
//! │  ├── create_bill(draft)              ├── get_by_id / get_by_reference  │
//! │  ├── update_payment_status           ├── insert / set_status           │
//! │  ├── get_by_id / get_by_bill_no      ├── restock                       │
//! │  └── list_* / count*                 └── list_* / count_active         │
//! │       │                                   │                             │
//! │       └────────► ledger, bill_number ◄────┘                             │
//! │                        │                                                │
//! │                        ▼                                                │
//! │                  SQLite Database                                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Available Repositories
//!
//! - [`BookRepository`](book::BookRepository) - Catalog and restock
//! - [`BillRepository`](bill::BillRepository) - Billing transaction and bill queries

pub mod bill;
pub mod book;
