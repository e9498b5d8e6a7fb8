//! # Stock Ledger
//!
//! The only code that changes `books.stock`. Stock is never overwritten,
//! only moved by a delta inside a conditional update, and every applied delta
//! leaves a `stock_movements` row behind.
//!
//! ```text
//!   sale                                     restock
//!   ────                                     ───────
//!   UPDATE books                             UPDATE books
//!     SET stock = stock - q                    SET stock = stock + q,
//!   WHERE id = ? AND stock >= q                    out_of_stock → active
//!        │                                          │
//!        ├── no row  → InsufficientStock            └── no row → NotFound
//!        │
//!        ├── stock 0 → status = out_of_stock
//!        │
//!        └── stock_movements (delta = -q, SALE)
//! ```
//!
//! Functions take the caller's connection so that they join the caller's
//! transaction. Concurrent decrements of the same book serialize on SQLite's
//! write lock.

use bookshop_core::StockReason;
use chrono::{DateTime, Utc};
use sqlx::SqliteConnection;
use tracing::debug;

use crate::error::{DbError, DbResult};

/// Result of a conditional stock decrement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StockOutcome {
    /// Stock was taken; `remaining` is what is left on the shelf.
    Sold { remaining: i64 },
    /// Not enough stock (or no such book). Nothing was changed.
    InsufficientStock,
}

/// Takes `quantity` units of a book off the shelf for a sale.
pub async fn decrement_stock(
    conn: &mut SqliteConnection,
    book_id: i64,
    quantity: i64,
    bill_id: Option<i64>,
    now: DateTime<Utc>,
) -> DbResult<StockOutcome> {
    let remaining: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE books
        SET stock = stock - ?, updated_at = ?
        WHERE id = ? AND stock >= ?
        RETURNING stock
        "#,
    )
    .bind(quantity)
    .bind(now)
    .bind(book_id)
    .bind(quantity)
    .fetch_optional(&mut *conn)
    .await?;

    let Some(remaining) = remaining else {
        debug!(book_id, quantity, "Stock decrement refused");
        return Ok(StockOutcome::InsufficientStock);
    };

    if remaining == 0 {
        // Inactive books stay inactive
        sqlx::query("UPDATE books SET status = 'out_of_stock' WHERE id = ? AND status = 'active'")
            .bind(book_id)
            .execute(&mut *conn)
            .await?;
    }

    record_movement(conn, book_id, bill_id, -quantity, remaining, StockReason::Sale, now).await?;

    debug!(book_id, quantity, remaining, "Stock decremented");
    Ok(StockOutcome::Sold { remaining })
}

/// Puts `quantity` units back on the shelf. Returns the new stock level.
///
/// `out_of_stock` becomes `active`; `inactive` is left alone.
pub async fn restock(
    conn: &mut SqliteConnection,
    book_id: i64,
    quantity: i64,
    now: DateTime<Utc>,
) -> DbResult<i64> {
    let stock: Option<i64> = sqlx::query_scalar(
        r#"
        UPDATE books
        SET stock = stock + ?,
            status = CASE WHEN status = 'out_of_stock' THEN 'active' ELSE status END,
            updated_at = ?
        WHERE id = ?
        RETURNING stock
        "#,
    )
    .bind(quantity)
    .bind(now)
    .bind(book_id)
    .fetch_optional(&mut *conn)
    .await?;

    let stock = stock.ok_or_else(|| DbError::not_found("Book", book_id))?;

    record_movement(conn, book_id, None, quantity, stock, StockReason::Restock, now).await?;

    debug!(book_id, quantity, stock, "Book restocked");
    Ok(stock)
}

async fn record_movement(
    conn: &mut SqliteConnection,
    book_id: i64,
    bill_id: Option<i64>,
    delta: i64,
    stock_after: i64,
    reason: StockReason,
    now: DateTime<Utc>,
) -> DbResult<()> {
    sqlx::query(
        r#"
        INSERT INTO stock_movements (book_id, bill_id, delta, stock_after, reason, created_at)
        VALUES (?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(book_id)
    .bind(bill_id)
    .bind(delta)
    .bind(stock_after)
    .bind(reason)
    .bind(now)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repository::book::NewBook;
    use crate::{Database, DbConfig};
    use bookshop_core::{BookStatus, Money};

    async fn setup_with_book(stock: i64) -> (Database, i64) {
        let db = Database::new(DbConfig::in_memory()).await.unwrap();
        let book = db
            .books()
            .insert(NewBook {
                title: "Dune".to_string(),
                author: Some("Frank Herbert".to_string()),
                reference_no: "REF-0001".to_string(),
                price: Money::from_cents(10_000),
                stock,
            })
            .await
            .unwrap();
        (db, book.id)
    }

    #[tokio::test]
    async fn test_partial_sale_keeps_book_active() {
        let (db, id) = setup_with_book(5).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let outcome = decrement_stock(&mut conn, id, 2, None, Utc::now()).await.unwrap();
        drop(conn);

        assert_eq!(outcome, StockOutcome::Sold { remaining: 3 });
        let book = db.books().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(book.stock, 3);
        assert_eq!(book.status, BookStatus::Active);
    }

    #[tokio::test]
    async fn test_selling_last_copy_marks_out_of_stock() {
        let (db, id) = setup_with_book(5).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let outcome = decrement_stock(&mut conn, id, 5, None, Utc::now()).await.unwrap();
        drop(conn);

        assert_eq!(outcome, StockOutcome::Sold { remaining: 0 });
        let book = db.books().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(book.stock, 0);
        assert_eq!(book.status, BookStatus::OutOfStock);
    }

    #[tokio::test]
    async fn test_insufficient_stock_changes_nothing() {
        let (db, id) = setup_with_book(2).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let outcome = decrement_stock(&mut conn, id, 5, None, Utc::now()).await.unwrap();
        drop(conn);

        assert_eq!(outcome, StockOutcome::InsufficientStock);
        let book = db.books().get_by_id(id).await.unwrap().unwrap();
        assert_eq!(book.stock, 2);
        assert!(db.books().movements(id, 10).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unknown_book_is_insufficient() {
        let (db, _) = setup_with_book(2).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let outcome = decrement_stock(&mut conn, 9_999, 1, None, Utc::now()).await.unwrap();
        assert_eq!(outcome, StockOutcome::InsufficientStock);
    }

    #[tokio::test]
    async fn test_movements_record_deltas() {
        let (db, id) = setup_with_book(5).await;
        let mut conn = db.pool().acquire().await.unwrap();

        decrement_stock(&mut conn, id, 5, None, Utc::now()).await.unwrap();
        restock(&mut conn, id, 4, Utc::now()).await.unwrap();
        drop(conn);

        let movements = db.books().movements(id, 10).await.unwrap();
        assert_eq!(movements.len(), 2);
        // Newest first
        assert_eq!(movements[0].delta, 4);
        assert_eq!(movements[0].stock_after, 4);
        assert_eq!(movements[0].reason, StockReason::Restock);
        assert_eq!(movements[1].delta, -5);
        assert_eq!(movements[1].stock_after, 0);
        assert_eq!(movements[1].reason, StockReason::Sale);
    }

    #[tokio::test]
    async fn test_restock_unknown_book() {
        let (db, _) = setup_with_book(1).await;
        let mut conn = db.pool().acquire().await.unwrap();

        let err = restock(&mut conn, 9_999, 3, Utc::now()).await.unwrap_err();
        assert!(matches!(err, DbError::NotFound { .. }));
    }
}
