//! # Store Errors
//!
//! What can go wrong below the repositories, sorted by what the caller can do
//! about it.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  sqlx::Error / MigrateError              CoreError                      │
//! │       │  (constraint kind, pool state)       │  (validation, stock,     │
//! │       │                                      │   status transitions)    │
//! │       ▼                                      ▼                          │
//! │  DbError ─────────────────────────────► DbError::Core                   │
//! │       │                                                                 │
//! │       ▼                                                                 │
//! │  bookshop-api: ApiError {status, message}                              │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! A `DbError` returned from inside the bill transaction means the transaction
//! was rolled back.

use bookshop_core::{CoreError, ValidationError};
use sqlx::error::ErrorKind;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    /// No row with this key.
    #[error("{entity} {id} does not exist")]
    NotFound { entity: String, id: String },

    /// A UNIQUE column already holds this value: a bill number that was
    /// issued twice, or a book reference that is already catalogued.
    #[error("{field} '{value}' is already taken")]
    UniqueViolation { field: String, value: String },

    /// A bill item or stock movement points at a missing book or bill.
    #[error("Referenced row is missing: {message}")]
    ForeignKeyViolation { message: String },

    #[error("Cannot open database: {0}")]
    ConnectionFailed(String),

    #[error("Cannot apply migrations: {0}")]
    MigrationFailed(String),

    /// Any other statement failure, CHECK constraints included.
    #[error("Statement failed: {0}")]
    QueryFailed(String),

    /// Every connection stayed busy past the acquire timeout.
    #[error("No database connection available")]
    PoolExhausted,

    /// Business rule or validation failure raised inside a repository.
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error("Unexpected database error: {0}")]
    Internal(String),
}

impl DbError {
    pub fn not_found(entity: impl Into<String>, id: impl ToString) -> Self {
        DbError::NotFound {
            entity: entity.into(),
            id: id.to_string(),
        }
    }

    pub fn duplicate(field: impl Into<String>, value: impl Into<String>) -> Self {
        DbError::UniqueViolation {
            field: field.into(),
            value: value.into(),
        }
    }
}

impl From<ValidationError> for DbError {
    fn from(err: ValidationError) -> Self {
        DbError::Core(CoreError::Validation(err))
    }
}

/// Column named by a SQLite constraint message,
/// e.g. `"UNIQUE constraint failed: bills.bill_no"` gives `"bill_no"`.
fn constraint_column(message: &str) -> String {
    message
        .rsplit(": ")
        .next()
        .and_then(|target| target.split(", ").next())
        .map(|column| column.rsplit('.').next().unwrap_or(column))
        .unwrap_or("unknown")
        .to_string()
}

impl From<sqlx::Error> for DbError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::RowNotFound => DbError::not_found("Row", "?"),
            sqlx::Error::Database(db_err) => match db_err.kind() {
                ErrorKind::UniqueViolation => DbError::UniqueViolation {
                    field: constraint_column(db_err.message()),
                    value: String::new(),
                },
                ErrorKind::ForeignKeyViolation => DbError::ForeignKeyViolation {
                    message: db_err.message().to_string(),
                },
                _ => DbError::QueryFailed(db_err.message().to_string()),
            },
            sqlx::Error::PoolTimedOut => DbError::PoolExhausted,
            sqlx::Error::PoolClosed => DbError::ConnectionFailed("pool closed".to_string()),
            sqlx::Error::Io(e) => DbError::ConnectionFailed(e.to_string()),
            other => DbError::Internal(other.to_string()),
        }
    }
}

impl From<sqlx::migrate::MigrateError> for DbError {
    fn from(err: sqlx::migrate::MigrateError) -> Self {
        DbError::MigrationFailed(err.to_string())
    }
}

pub type DbResult<T> = Result<T, DbError>;
