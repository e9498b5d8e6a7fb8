//! # Bill Number Generator
//!
//! Picks the next human-readable bill number. Never fails: each source is
//! tried in strict order and the last one cannot error.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  1. bill_sequences upsert (atomic per-day counter)                     │
//! │        INSERT .. ON CONFLICT(bill_date) DO UPDATE .. RETURNING         │
//! │        → BILL{YYYYMMDD}{NNNN}                                           │
//! │                  │ error                                               │
//! │                  ▼                                                      │
//! │  2. COUNT(bills WHERE bill_date = today) + 1                           │
//! │        → BILL{YYYYMMDD}{NNNN}   (not atomic with the insert)           │
//! │                  │ error                                               │
//! │                  ▼                                                      │
//! │  3. BILL{epoch millis}                                                 │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! All queries run on the caller's connection, normally the bill
//! transaction, so the counter increment commits or rolls back with the bill.
//! SQLite keeps a transaction usable after a failed statement, which is what
//! lets the fallbacks run inside it.
//!
//! The counter never drops below the day's bill count, so numbers issued by
//! the count fallback are not handed out again once the sequence recovers.

use bookshop_core::bill_number::{format_bill_number, timestamp_bill_number};
use chrono::{DateTime, Local, NaiveDate};
use sqlx::SqliteConnection;
use tracing::{debug, warn};

use crate::error::DbResult;

/// Returns the next bill number for `now`'s local calendar date.
pub async fn generate_bill_number(conn: &mut SqliteConnection, now: DateTime<Local>) -> String {
    let today = now.date_naive();

    match next_sequence_value(conn, today).await {
        Ok(value) => {
            let bill_no = format_bill_number(today, value);
            debug!(bill_no = %bill_no, "Bill number from sequence");
            return bill_no;
        }
        Err(e) => {
            warn!(error = %e, "Bill sequence unavailable, falling back to daily count");
        }
    }

    generate_bill_number_fallback(conn, now).await
}

/// Count-based number, then timestamp-based as the last resort.
///
/// Two calls on the same day with no bill inserted in between return the
/// same number; the `bill_no` UNIQUE constraint catches the collision.
pub async fn generate_bill_number_fallback(
    conn: &mut SqliteConnection,
    now: DateTime<Local>,
) -> String {
    let today = now.date_naive();

    match count_bills_on(conn, today).await {
        Ok(count) => format_bill_number(today, count + 1),
        Err(e) => {
            warn!(error = %e, "Daily bill count failed, using timestamp bill number");
            timestamp_bill_number(now.timestamp_millis())
        }
    }
}

/// Atomically bumps and returns the counter for `date`.
///
/// Starts at 1 on an empty day, otherwise at least one past the number of
/// bills already stored for `date`.
pub async fn next_sequence_value(conn: &mut SqliteConnection, date: NaiveDate) -> DbResult<i64> {
    let value: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bill_sequences (bill_date, last_value)
        VALUES (?1, (SELECT COUNT(*) FROM bills WHERE bill_date = ?1) + 1)
        ON CONFLICT (bill_date) DO UPDATE
            SET last_value = MAX(last_value + 1, excluded.last_value)
        RETURNING last_value
        "#,
    )
    .bind(date)
    .fetch_one(&mut *conn)
    .await?;

    Ok(value)
}

async fn count_bills_on(conn: &mut SqliteConnection, date: NaiveDate) -> DbResult<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE bill_date = ?")
        .bind(date)
        .fetch_one(&mut *conn)
        .await?;

    Ok(count)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Database, DbConfig};
    use bookshop_core::bill_number::is_sequenced_bill_number;
    use chrono::TimeZone;

    fn morning() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 1, 9, 30, 0).unwrap()
    }

    async fn setup() -> Database {
        Database::new(DbConfig::in_memory()).await.unwrap()
    }

    #[tokio::test]
    async fn test_sequence_is_consecutive() {
        let db = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        let first = generate_bill_number(&mut conn, morning()).await;
        let second = generate_bill_number(&mut conn, morning()).await;

        assert_eq!(first, "BILL202603010001");
        assert_eq!(second, "BILL202603010002");
    }

    #[tokio::test]
    async fn test_sequence_restarts_each_day() {
        let db = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        generate_bill_number(&mut conn, morning()).await;
        let next_day = Local.with_ymd_and_hms(2026, 3, 2, 8, 0, 0).unwrap();

        assert_eq!(
            generate_bill_number(&mut conn, next_day).await,
            "BILL202603020001"
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_daily_count() {
        let db = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        sqlx::query("DROP TABLE bill_sequences")
            .execute(&mut *conn)
            .await
            .unwrap();

        let first = generate_bill_number(&mut conn, morning()).await;
        let second = generate_bill_number(&mut conn, morning()).await;

        assert_eq!(first, "BILL202603010001");
        // No bill inserted in between: same number
        assert_eq!(first, second);
        assert!(is_sequenced_bill_number(&first));
    }

    async fn insert_bill(conn: &mut SqliteConnection, bill_no: &str, date: &str) {
        sqlx::query(
            r#"
            INSERT INTO bills (bill_no, cashier_id, cashier_name, subtotal_cents,
                tax_cents, total_cents, payment_method, payment_status,
                bill_date, bill_time, created_at, updated_at)
            VALUES (?, 1, 'Asha', 0, 0, 0, 'CASH', 'COMPLETED', ?, '09:00:00', '', '')
            "#,
        )
        .bind(bill_no)
        .bind(date)
        .execute(&mut *conn)
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_daily_count_sees_existing_bills() {
        let db = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        for (no, date) in [("A1", "2026-03-01"), ("A2", "2026-03-01"), ("B1", "2026-02-28")] {
            insert_bill(&mut conn, no, date).await;
        }

        let bill_no = generate_bill_number_fallback(&mut conn, morning()).await;
        assert_eq!(bill_no, "BILL202603010003");
    }

    #[tokio::test]
    async fn test_sequence_skips_count_numbered_bills() {
        let db = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        // Bills numbered by counting before the counter row existed
        insert_bill(&mut conn, "BILL202603010001", "2026-03-01").await;
        insert_bill(&mut conn, "BILL202603010002", "2026-03-01").await;
        assert_eq!(
            generate_bill_number(&mut conn, morning()).await,
            "BILL202603010003"
        );

        // Counter row now lags behind bills the fallback numbered
        insert_bill(&mut conn, "BILL202603010003", "2026-03-01").await;
        insert_bill(&mut conn, "BILL202603010004", "2026-03-01").await;
        insert_bill(&mut conn, "BILL202603010005", "2026-03-01").await;
        assert_eq!(
            generate_bill_number(&mut conn, morning()).await,
            "BILL202603010006"
        );
        assert_eq!(
            generate_bill_number(&mut conn, morning()).await,
            "BILL202603010007"
        );
    }

    #[tokio::test]
    async fn test_falls_back_to_timestamp() {
        let db = setup().await;
        let mut conn = db.pool().acquire().await.unwrap();

        sqlx::query("DROP TABLE bill_sequences")
            .execute(&mut *conn)
            .await
            .unwrap();
        sqlx::query("DROP TABLE bills")
            .execute(&mut *conn)
            .await
            .unwrap();

        let now = morning();
        let bill_no = generate_bill_number(&mut conn, now).await;

        assert_eq!(bill_no, format!("BILL{}", now.timestamp_millis()));
        assert!(!is_sequenced_bill_number(&bill_no));
    }
}
