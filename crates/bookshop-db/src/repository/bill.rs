//! # Bill Repository
//!
//! Bill creation (the billing transaction) and bill read queries.
//!
//! ## Billing Transaction
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  create_bill(draft)                                                     │
//! │                                                                         │
//! │  validate_draft ──✗──► Err (nothing written)                           │
//! │       │                                                                 │
//! │  BEGIN ─────────────────────────────────────────────────────────┐      │
//! │       │                                                          │      │
//! │  bill_no = draft.bill_no or generate_bill_number(tx)             │      │
//! │       │                                                          │      │
//! │  totals = calculator(lines)                                      │      │
//! │       │                                                          │      │
//! │  INSERT bills ──► id                                             │ any  │
//! │       │                                                          │ error│
//! │  for each line, in order:                                        │  ──► │ ROLLBACK
//! │       INSERT bill_items                                          │      │
//! │       decrement_stock ── InsufficientStock ──► Err               │      │
//! │                          (or warn + continue with backorder)     │      │
//! │       │                                                          │      │
//! │  COMMIT ◄────────────────────────────────────────────────────────┘      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! After commit a bill only ever changes its payment status.

use bookshop_core::validation::validate_draft;
use bookshop_core::{Bill, BillDraft, BillItem, BillingPolicy, CoreError, PaymentStatus};
use chrono::{DateTime, Local, NaiveDate, Utc};
use sqlx::{SqliteConnection, SqlitePool};
use tracing::{debug, error, info, warn};

use crate::bill_number::generate_bill_number;
use crate::error::{DbError, DbResult};
use crate::ledger::{decrement_stock, StockOutcome};

const BILL_COLUMNS: &str = "id, bill_no, cashier_id, cashier_name, subtotal_cents, tax_cents, \
     total_cents, payment_method, payment_status, bill_date, bill_time, created_at, updated_at";

const ITEM_COLUMNS: &str = "id, bill_id, book_id, book_title, book_reference, unit_price_cents, \
     quantity, total_price_cents, created_at";

/// Repository for bill database operations.
#[derive(Debug, Clone)]
pub struct BillRepository {
    pool: SqlitePool,
    policy: BillingPolicy,
}

impl BillRepository {
    /// Creates a new BillRepository with the default (strict) policy.
    pub fn new(pool: SqlitePool) -> Self {
        BillRepository {
            pool,
            policy: BillingPolicy::default(),
        }
    }

    /// Uses `policy` for bills created through this repository.
    pub fn with_policy(mut self, policy: BillingPolicy) -> Self {
        self.policy = policy;
        self
    }

    // =========================================================================
    // Billing Transaction
    // =========================================================================

    /// Creates a bill stamped with the current local date and time.
    pub async fn create_bill(&self, draft: BillDraft) -> DbResult<Bill> {
        self.create_bill_at(draft, Local::now()).await
    }

    /// Creates a bill as of `now`.
    ///
    /// Everything commits or nothing does. The returned bill carries its
    /// store-assigned id, its number and its items with their ids.
    pub async fn create_bill_at(&self, draft: BillDraft, now: DateTime<Local>) -> DbResult<Bill> {
        validate_draft(&draft)?;

        let mut tx = self.pool.begin().await?;

        match self.write_bill(&mut *tx, draft, now).await {
            Ok(bill) => {
                tx.commit().await?;
                info!(
                    bill_id = bill.id,
                    bill_no = %bill.bill_no,
                    items = bill.items.len(),
                    total = %bill.total(),
                    "Bill created"
                );
                Ok(bill)
            }
            Err(e) => {
                error!(error = %e, "Bill creation failed, rolling back");
                if let Err(rollback_err) = tx.rollback().await {
                    warn!(error = %rollback_err, "Rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn write_bill(
        &self,
        conn: &mut SqliteConnection,
        draft: BillDraft,
        now: DateTime<Local>,
    ) -> DbResult<Bill> {
        let bill_no = match draft.bill_no.as_deref() {
            Some(bill_no) => bill_no.trim().to_string(),
            None => generate_bill_number(conn, now).await,
        };

        let created_at = now.with_timezone(&Utc);
        let items: Vec<BillItem> = draft
            .lines
            .iter()
            .map(|line| BillItem::from_line(line, created_at))
            .collect();

        let mut bill = Bill {
            id: 0,
            bill_no,
            cashier_id: draft.cashier_id,
            cashier_name: draft.cashier_name.trim().to_string(),
            subtotal_cents: 0,
            tax_cents: 0,
            total_cents: 0,
            payment_method: draft.payment_method,
            payment_status: draft.payment_status.unwrap_or_default(),
            bill_date: now.date_naive(),
            bill_time: now.time(),
            created_at,
            updated_at: created_at,
            items: Vec::new(),
        };
        bill.set_items(items);

        debug!(bill_no = %bill.bill_no, cashier_id = bill.cashier_id, "Inserting bill");
        bill.id = insert_header(conn, &bill).await?;

        for item in bill.items.iter_mut() {
            item.bill_id = bill.id;
            item.id = insert_item(conn, item).await?;

            match decrement_stock(conn, item.book_id, item.quantity, Some(bill.id), created_at).await? {
                StockOutcome::Sold { remaining } => {
                    debug!(book_id = item.book_id, remaining, "Line stocked");
                }
                StockOutcome::InsufficientStock if self.policy.allow_backorder => {
                    warn!(
                        book_id = item.book_id,
                        reference = %item.book_reference,
                        requested = item.quantity,
                        "Insufficient stock, line backordered"
                    );
                }
                StockOutcome::InsufficientStock => {
                    return Err(CoreError::InsufficientStock {
                        book_id: item.book_id,
                        reference: item.book_reference.clone(),
                        requested: item.quantity,
                    }
                    .into());
                }
            }
        }

        Ok(bill)
    }

    // =========================================================================
    // Payment Status
    // =========================================================================

    /// Moves a bill to `next` if the transition is allowed.
    ///
    /// Cancelling does not put stock back.
    pub async fn update_payment_status(&self, bill_id: i64, next: PaymentStatus) -> DbResult<Bill> {
        let mut tx = self.pool.begin().await?;

        let current: Option<PaymentStatus> =
            sqlx::query_scalar("SELECT payment_status FROM bills WHERE id = ?")
                .bind(bill_id)
                .fetch_optional(&mut *tx)
                .await?;
        let current = current.ok_or_else(|| DbError::not_found("Bill", bill_id))?;

        if !current.can_transition_to(next) {
            return Err(CoreError::InvalidBillStatus {
                bill_id,
                from: current,
                to: next,
            }
            .into());
        }

        sqlx::query("UPDATE bills SET payment_status = ?, updated_at = ? WHERE id = ? AND payment_status = ?")
            .bind(next)
            .bind(Utc::now())
            .bind(bill_id)
            .bind(current)
            .execute(&mut *tx)
            .await?;

        let mut bill = fetch_bill(&mut *tx, BillKey::Id(bill_id))
            .await?
            .ok_or_else(|| DbError::not_found("Bill", bill_id))?;
        bill.items = fetch_items(&mut *tx, bill_id).await?;

        tx.commit().await?;

        info!(bill_id, from = %current, to = %next, "Bill payment status changed");
        Ok(bill)
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// Gets a bill with its items by ID.
    pub async fn get_by_id(&self, id: i64) -> DbResult<Option<Bill>> {
        let mut conn = self.pool.acquire().await?;
        let Some(mut bill) = fetch_bill(&mut *conn, BillKey::Id(id)).await? else {
            return Ok(None);
        };
        bill.items = fetch_items(&mut *conn, bill.id).await?;
        Ok(Some(bill))
    }

    /// Gets a bill with its items by bill number.
    pub async fn get_by_bill_no(&self, bill_no: &str) -> DbResult<Option<Bill>> {
        let mut conn = self.pool.acquire().await?;
        let Some(mut bill) = fetch_bill(&mut *conn, BillKey::BillNo(bill_no.trim())).await? else {
            return Ok(None);
        };
        bill.items = fetch_items(&mut *conn, bill.id).await?;
        Ok(Some(bill))
    }

    /// Items of a bill, in the order they were rung up.
    pub async fn get_items(&self, bill_id: i64) -> DbResult<Vec<BillItem>> {
        let mut conn = self.pool.acquire().await?;
        fetch_items(&mut *conn, bill_id).await
    }

    /// Most recent bills first, with items.
    pub async fn list_recent(&self, limit: i64, offset: i64) -> DbResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?"
        );
        let mut conn = self.pool.acquire().await?;
        let bills = sqlx::query_as::<_, Bill>(&sql)
            .bind(limit)
            .bind(offset)
            .fetch_all(&mut *conn)
            .await?;

        with_items(&mut *conn, bills).await
    }

    /// Most recent bills of one cashier, with items.
    pub async fn list_by_cashier(&self, cashier_id: i64, limit: i64) -> DbResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE cashier_id = ? \
             ORDER BY created_at DESC, id DESC LIMIT ?"
        );
        let mut conn = self.pool.acquire().await?;
        let bills = sqlx::query_as::<_, Bill>(&sql)
            .bind(cashier_id)
            .bind(limit)
            .fetch_all(&mut *conn)
            .await?;

        with_items(&mut *conn, bills).await
    }

    /// One cashier's bills for a calendar day, with items.
    pub async fn list_today_by_cashier(&self, cashier_id: i64, today: NaiveDate) -> DbResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE cashier_id = ? AND bill_date = ? \
             ORDER BY created_at DESC, id DESC"
        );
        let mut conn = self.pool.acquire().await?;
        let bills = sqlx::query_as::<_, Bill>(&sql)
            .bind(cashier_id)
            .bind(today)
            .fetch_all(&mut *conn)
            .await?;

        with_items(&mut *conn, bills).await
    }

    /// Bills whose bill date is within `[from, to]`, with items.
    pub async fn list_by_date_range(&self, from: NaiveDate, to: NaiveDate) -> DbResult<Vec<Bill>> {
        let sql = format!(
            "SELECT {BILL_COLUMNS} FROM bills WHERE bill_date BETWEEN ? AND ? \
             ORDER BY created_at DESC, id DESC"
        );
        let mut conn = self.pool.acquire().await?;
        let bills = sqlx::query_as::<_, Bill>(&sql)
            .bind(from)
            .bind(to)
            .fetch_all(&mut *conn)
            .await?;

        with_items(&mut *conn, bills).await
    }

    /// Counts all bills.
    pub async fn count(&self) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills")
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }

    /// Counts one cashier's bills.
    pub async fn count_by_cashier(&self, cashier_id: i64) -> DbResult<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM bills WHERE cashier_id = ?")
            .bind(cashier_id)
            .fetch_one(&self.pool)
            .await?;

        Ok(count)
    }
}

// =============================================================================
// Connection-level helpers
// =============================================================================

async fn insert_header(conn: &mut SqliteConnection, bill: &Bill) -> DbResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bills (
            bill_no, cashier_id, cashier_name,
            subtotal_cents, tax_cents, total_cents,
            payment_method, payment_status,
            bill_date, bill_time, created_at, updated_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(&bill.bill_no)
    .bind(bill.cashier_id)
    .bind(&bill.cashier_name)
    .bind(bill.subtotal_cents)
    .bind(bill.tax_cents)
    .bind(bill.total_cents)
    .bind(bill.payment_method)
    .bind(bill.payment_status)
    .bind(bill.bill_date)
    .bind(bill.bill_time)
    .bind(bill.created_at)
    .bind(bill.updated_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

async fn insert_item(conn: &mut SqliteConnection, item: &BillItem) -> DbResult<i64> {
    let id: i64 = sqlx::query_scalar(
        r#"
        INSERT INTO bill_items (
            bill_id, book_id, book_title, book_reference,
            unit_price_cents, quantity, total_price_cents, created_at
        ) VALUES (?, ?, ?, ?, ?, ?, ?, ?)
        RETURNING id
        "#,
    )
    .bind(item.bill_id)
    .bind(item.book_id)
    .bind(&item.book_title)
    .bind(&item.book_reference)
    .bind(item.unit_price_cents)
    .bind(item.quantity)
    .bind(item.total_price_cents)
    .bind(item.created_at)
    .fetch_one(&mut *conn)
    .await?;

    Ok(id)
}

enum BillKey<'k> {
    Id(i64),
    BillNo(&'k str),
}

async fn fetch_bill(conn: &mut SqliteConnection, key: BillKey<'_>) -> DbResult<Option<Bill>> {
    let bill = match key {
        BillKey::Id(id) => {
            sqlx::query_as::<_, Bill>(&format!("SELECT {BILL_COLUMNS} FROM bills WHERE id = ?"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?
        }
        BillKey::BillNo(bill_no) => {
            sqlx::query_as::<_, Bill>(&format!("SELECT {BILL_COLUMNS} FROM bills WHERE bill_no = ?"))
                .bind(bill_no)
                .fetch_optional(&mut *conn)
                .await?
        }
    };

    Ok(bill)
}

async fn fetch_items(conn: &mut SqliteConnection, bill_id: i64) -> DbResult<Vec<BillItem>> {
    let sql = format!("SELECT {ITEM_COLUMNS} FROM bill_items WHERE bill_id = ? ORDER BY id");
    let items = sqlx::query_as::<_, BillItem>(&sql)
        .bind(bill_id)
        .fetch_all(&mut *conn)
        .await?;

    Ok(items)
}

async fn with_items(conn: &mut SqliteConnection, mut bills: Vec<Bill>) -> DbResult<Vec<Bill>> {
    for bill in bills.iter_mut() {
        bill.items = fetch_items(conn, bill.id).await?;
    }
    Ok(bills)
}

// =============================================================================
// Unit Tests
// =============================================================================
