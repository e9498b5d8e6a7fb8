//! HTTP handlers for bill endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    Json,
};
use bookshop_core::{Bill, BillDraft, Money, PaymentMethod, PaymentStatus, ValidationError};
use chrono::{Local, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::debug;

use super::Success;
use crate::cashier::CurrentCashier;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

/// Page size cap for the all-bills listing.
pub const MAX_LIST_LIMIT: i64 = 100;

/// How many of their own bills a cashier sees.
pub const MY_BILLS_LIMIT: i64 = 50;

// =============================================================================
// Request / Response Bodies
// =============================================================================

/// Cart as submitted by the cashier screen.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBillRequest {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub payment_method: Option<String>,
}

/// One cart line with the catalog snapshot taken at scan time.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    pub id: i64,
    pub title: String,
    pub reference_no: String,
    pub price: PriceInput,
    pub quantity: i64,
}

/// The screen sends prices either as `"100.00"` or as `100`.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum PriceInput {
    Text(String),
    Number(serde_json::Number),
}

impl PriceInput {
    pub fn to_money(&self) -> Result<Money, ValidationError> {
        match self {
            PriceInput::Text(s) => Money::parse_decimal(s),
            PriceInput::Number(n) => Money::parse_decimal(&n.to_string()),
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BillCreated {
    pub message: String,
    pub bill_no: String,
    pub total_amount: String,
}

#[derive(Debug, Serialize)]
pub struct BillList {
    pub bills: Vec<Bill>,
}

#[derive(Debug, Serialize)]
pub struct BillDetail {
    pub bill: Bill,
}

#[derive(Debug, Serialize)]
pub struct BillCounts {
    pub total: i64,
    pub mine: i64,
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: NaiveDate,
    pub to: NaiveDate,
}

#[derive(Debug, Deserialize)]
pub struct StatusRequest {
    pub status: String,
}

/// Turns the submitted cart into a draft for `cashier`.
pub fn build_draft(cashier: &CurrentCashier, request: CreateBillRequest) -> ApiResult<BillDraft> {
    let payment_method = match request.payment_method.as_deref().map(str::trim) {
        None | Some("") => PaymentMethod::default(),
        Some(method) => method.parse::<PaymentMethod>()?,
    };

    let mut draft =
        BillDraft::new(cashier.id, cashier.name.clone()).with_payment_method(payment_method);

    for item in request.items {
        let price = item.price.to_money()?;
        draft = draft.with_line(item.id, item.title, item.reference_no, price, item.quantity);
    }

    Ok(draft)
}

// =============================================================================
// Handlers
// =============================================================================

/// Create a bill from the cart
pub async fn create_bill(
    State(state): State<AppState>,
    cashier: CurrentCashier,
    payload: Result<Json<CreateBillRequest>, JsonRejection>,
) -> ApiResult<Json<Success<BillCreated>>> {
    let Json(request) = payload?;
    let draft = build_draft(&cashier, request)?;

    debug!(cashier_id = cashier.id, lines = draft.lines.len(), "Creating bill");

    let bill = state
        .bills()
        .create_bill(draft)
        .await
        .map_err(ApiError::from_bill_error)?;

    Ok(Json(Success::new(BillCreated {
        message: "Bill created successfully".to_string(),
        bill_no: bill.bill_no.clone(),
        total_amount: bill.total().to_string(),
    })))
}

/// List recent bills
pub async fn list_bills(
    State(state): State<AppState>,
    _cashier: CurrentCashier,
    query: Result<Query<ListQuery>, QueryRejection>,
) -> ApiResult<Json<Success<BillList>>> {
    let Query(query) = query?;
    let limit = query.limit.unwrap_or(MAX_LIST_LIMIT).clamp(1, MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let bills = state.bills().list_recent(limit, offset).await?;
    Ok(Json(Success::new(BillList { bills })))
}

/// List the calling cashier's recent bills
pub async fn list_my_bills(
    State(state): State<AppState>,
    cashier: CurrentCashier,
) -> ApiResult<Json<Success<BillList>>> {
    let bills = state
        .bills()
        .list_by_cashier(cashier.id, MY_BILLS_LIMIT)
        .await?;
    Ok(Json(Success::new(BillList { bills })))
}

/// List the calling cashier's bills for today
pub async fn list_today_bills(
    State(state): State<AppState>,
    cashier: CurrentCashier,
) -> ApiResult<Json<Success<BillList>>> {
    let today = Local::now().date_naive();
    let bills = state
        .bills()
        .list_today_by_cashier(cashier.id, today)
        .await?;
    Ok(Json(Success::new(BillList { bills })))
}

/// List bills whose bill date falls within `[from, to]`
pub async fn list_bills_in_range(
    State(state): State<AppState>,
    _cashier: CurrentCashier,
    query: Result<Query<RangeQuery>, QueryRejection>,
) -> ApiResult<Json<Success<BillList>>> {
    let Query(range) = query?;
    if range.from > range.to {
        return Err(ApiError::bad_request("from must not be after to"));
    }

    let bills = state
        .bills()
        .list_by_date_range(range.from, range.to)
        .await?;
    Ok(Json(Success::new(BillList { bills })))
}

/// Count all bills and the calling cashier's bills
pub async fn count_bills(
    State(state): State<AppState>,
    cashier: CurrentCashier,
) -> ApiResult<Json<Success<BillCounts>>> {
    let bills = state.bills();
    let total = bills.count().await?;
    let mine = bills.count_by_cashier(cashier.id).await?;
    Ok(Json(Success::new(BillCounts { total, mine })))
}

/// Get a bill with its items by bill number
pub async fn get_bill(
    State(state): State<AppState>,
    _cashier: CurrentCashier,
    bill_no: Result<Path<String>, PathRejection>,
) -> ApiResult<Json<Success<BillDetail>>> {
    let Path(bill_no) = bill_no?;
    let bill = state
        .bills()
        .get_by_bill_no(&bill_no)
        .await?
        .ok_or_else(|| ApiError::not_found("Bill"))?;
    Ok(Json(Success::new(BillDetail { bill })))
}

/// Move a bill to another payment status
pub async fn update_bill_status(
    State(state): State<AppState>,
    cashier: CurrentCashier,
    bill_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StatusRequest>, JsonRejection>,
) -> ApiResult<Json<Success<BillDetail>>> {
    let Path(bill_id) = bill_id?;
    let Json(request) = payload?;
    let next: PaymentStatus = request.status.parse()?;

    debug!(bill_id, status = %next, cashier_id = cashier.id, "Updating bill status");

    let bill = state.bills().update_payment_status(bill_id, next).await?;
    Ok(Json(Success::new(BillDetail { bill })))
}
