//! # Book Repository
//!
//! Catalog lookups and the restock entry point.
//!
//! Billing reads nothing from here: bill lines carry their own snapshot.
//! The catalog is where the frontend takes that snapshot from, and where the
//! stock ledger's effects become visible.

use bookshop_core::validation::{validate_price, validate_reference, validate_restock_quantity, validate_title};
use bookshop_core::{Book, BookStatus, Money, StockMovement};
use chrono::Utc;
use sqlx::SqlitePool;
use tracing::{debug, info};

use crate::error::{DbError, DbResult};
use crate::ledger;

const BOOK_COLUMNS: &str =
    "id, title, author, reference_no, price_cents, stock, status, created_at, updated_at";

/// A catalog entry that hasn't been stored yet.
#[derive(Debug, Clone)]
pub struct NewBook {
    pub title: String,
    pub author: Option<String>,
    pub reference_no: String,
    pub price: Money,
    pub stock: i64,
}

/// Repository for book database operations.
#[derive(Debug, Clone)]
pub struct BookRepository {
    pool: SqlitePool,
}

impl BookRepository {
    /// Creates a new BookRepository.
    pub fn new(pool: SqlitePool) -> Self {
        BookRepository { pool }
    }

    /// Gets a book by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {BOOK_COLUMNS} FROM books WHERE id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;

        Ok(book)
    }

    /// Gets a book by its reference number (the scanned label).
    pub async fn get_by_reference(&self, reference_no: &str) -> DbResult<Option<Book>> {
        let book = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE reference_no = ?"
        ))
        .bind(reference_no.trim())
        .fetch_optional(&self.pool)
        .await?;

        Ok(book)
    }

    /// Inserts a new book.
    ///
    /// Status starts as `active`, or `out_of_stock` when stocked with zero.
    pub async fn insert(&self, new: NewBook) -> DbResult<Book> {
        validate_title(&new.title)?;
        validate_reference(&new.reference_no)?;
        validate_price(new.price)?;
        if new.stock < 0 {
            return Err(bookshop_core::ValidationError::OutOfRange {
                field: "stock".to_string(),
                min: 0,
                max: i64::MAX,
            }
            .into());
        }

        let now = Utc::now();
        let reference_no = new.reference_no.trim().to_string();
        let status = if new.stock == 0 {
            BookStatus::OutOfStock
        } else {
            BookStatus::Active
        };

        debug!(reference_no = %reference_no, stock = new.stock, "Inserting book");

        let result = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (title, author, reference_no, price_cents, stock, status, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?)
            RETURNING {BOOK_COLUMNS}
            "#
        ))
        .bind(new.title.trim())
        .bind(new.author.as_deref())
        .bind(&reference_no)
        .bind(new.price.cents())
        .bind(new.stock)
        .bind(status)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await;

        match result {
            Ok(book) => Ok(book),
            Err(e) => match DbError::from(e) {
                DbError::UniqueViolation { field, .. } => Err(DbError::duplicate(field, reference_no)),
                other => Err(other),
            },
        }
    }

    /// Sets the catalog status of a book (admin action).
    pub async fn set_status(&self, id: i64, status: BookStatus) -> DbResult<()> {
        debug!(id, status = ?status, "Setting book status");

        let result = sqlx::query("UPDATE books SET status = ?, updated_at = ? WHERE id = ?")
            .bind(status)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(DbError::not_found("Book", id));
        }

        Ok(())
    }

    /// Adds stock from a delivery and returns the updated book.
    ///
    /// Runs in its own transaction: the stock change and its movement row
    /// land together.
    pub async fn restock(&self, id: i64, quantity: i64) -> DbResult<Book> {
        validate_restock_quantity(quantity)?;

        let mut tx = self.pool.begin().await?;
        let stock = ledger::restock(&mut *tx, id, quantity, Utc::now()).await?;
        tx.commit().await?;

        info!(book_id = id, quantity, stock, "Book restocked");

        self.get_by_id(id)
            .await?
            .ok_or_else(|| DbError::not_found("Book", id))
    }

    /// Books that have sold out, most recently changed first.
    pub async fn list_out_of_stock(&self) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {BOOK_COLUMNS} FROM books WHERE status = 'out_of_stock' ORDER BY updated_at DESC, id"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Active books with `1..=threshold` copies left, scarcest first.
    pub async fn list_low_stock(&self, threshold: i64) -> DbResult<Vec<Book>> {
        let books = sqlx::query_as::<_, Book>(&format!(
            r#"
            SELECT {BOOK_COLUMNS} FROM books
            WHERE status = 'active' AND stock > 0 AND stock <= ?
            ORDER BY stock, id
            "#
        ))
        .bind(threshold)
        .fetch_all(&self.pool)
        .await?;

        Ok(books)
    }

    /// Counts books currently on sale.
    pub async fn count_active(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM books WHERE status = 'active'")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Stock history of a book, newest first.
    pub async fn movements(&self, book_id: i64, limit: i64) -> DbResult<Vec<StockMovement>> {
        let movements = sqlx::query_as::<_, StockMovement>(
            r#"
            SELECT id, book_id, bill_id, delta, stock_after, reason, created_at
            FROM stock_movements
            WHERE book_id = ?
            ORDER BY id DESC
            LIMIT ?
            "#,
        )
        .bind(book_id)
        .bind(limit)
        .fetch_all(&self.pool)
        .await?;

        Ok(movements)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bookshop_core::{CoreError, StockReason};

    fn new_book(reference_no: &str, stock: i64) -> NewBook {
        NewBook {
            title: format!("Book {reference_no}"),
            author: None,
            reference_no: reference_no.to_string(),
            price: Money::from_cents(1_500),
            stock,
        }
    }

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_insert_and_lookup() {
        let db = setup().await;
        let books = db.books();

        let book = books.insert(new_book("REF-0001", 4)).await.unwrap();
        assert!(book.id > 0);
        assert_eq!(book.status, BookStatus::Active);
        assert_eq!(book.price(), Money::from_cents(1_500));

        let by_ref = books.get_by_reference("REF-0001").await.unwrap().unwrap();
        assert_eq!(by_ref.id, book.id);
        assert!(books.get_by_id(book.id + 1).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_zero_stock_insert_is_out_of_stock() {
        let db = setup().await;
        let book = db.books().insert(new_book("REF-0002", 0)).await.unwrap();
        assert_eq!(book.status, BookStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_duplicate_reference_rejected() {
        let db = setup().await;
        db.books().insert(new_book("REF-0001", 1)).await.unwrap();

        let err = db.books().insert(new_book("REF-0001", 1)).await.unwrap_err();
        match err {
            DbError::UniqueViolation { value, .. } => assert_eq!(value, "REF-0001"),
            other => panic!("expected UniqueViolation, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_invalid_book_rejected() {
        let db = setup().await;
        let mut bad = new_book("REF 1", 1);
        assert!(matches!(
            db.books().insert(bad.clone()).await,
            Err(DbError::Core(CoreError::Validation(_)))
        ));

        bad.reference_no = "REF-1".to_string();
        bad.stock = -1;
        assert!(db.books().insert(bad).await.is_err());
    }

    #[tokio::test]
    async fn test_restock_reactivates_sold_out_book() {
        let db = setup().await;
        let book = db.books().insert(new_book("REF-0001", 0)).await.unwrap();

        let book = db.books().restock(book.id, 6).await.unwrap();
        assert_eq!(book.stock, 6);
        assert_eq!(book.status, BookStatus::Active);

        let movements = db.books().movements(book.id, 10).await.unwrap();
        assert_eq!(movements.len(), 1);
        assert_eq!(movements[0].reason, StockReason::Restock);
        assert_eq!(movements[0].bill_id, None);
    }

    #[tokio::test]
    async fn test_restock_keeps_inactive_book_inactive() {
        let db = setup().await;
        let book = db.books().insert(new_book("REF-0001", 0)).await.unwrap();
        db.books().set_status(book.id, BookStatus::Inactive).await.unwrap();

        let book = db.books().restock(book.id, 3).await.unwrap();
        assert_eq!(book.stock, 3);
        assert_eq!(book.status, BookStatus::Inactive);
    }

    #[tokio::test]
    async fn test_restock_validation_and_missing_book() {
        let db = setup().await;
        assert!(matches!(
            db.books().restock(1, 0).await,
            Err(DbError::Core(_))
        ));
        assert!(matches!(
            db.books().restock(42, 1).await,
            Err(DbError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_stock_listings_and_counts() {
        let db = setup().await;
        let books = db.books();
        books.insert(new_book("REF-0001", 0)).await.unwrap();
        books.insert(new_book("REF-0002", 2)).await.unwrap();
        books.insert(new_book("REF-0003", 5)).await.unwrap();
        let hidden = books.insert(new_book("REF-0004", 1)).await.unwrap();
        books.set_status(hidden.id, BookStatus::Inactive).await.unwrap();

        let sold_out = books.list_out_of_stock().await.unwrap();
        assert_eq!(sold_out.len(), 1);
        assert_eq!(sold_out[0].reference_no, "REF-0001");

        let low: Vec<String> = books
            .list_low_stock(3)
            .await
            .unwrap()
            .into_iter()
            .map(|b| b.reference_no)
            .collect();
        assert_eq!(low, vec!["REF-0002".to_string()]);

        assert_eq!(books.count_active().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_set_status_missing_book() {
        let db = setup().await;
        assert!(matches!(
            db.books().set_status(7, BookStatus::Inactive).await,
            Err(DbError::NotFound { .. })
        ));
    }
}
