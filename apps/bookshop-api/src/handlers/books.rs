//! HTTP handlers for book endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    Json,
};
use bookshop_core::Book;
use serde::{Deserialize, Serialize};

use super::Success;
use crate::cashier::CurrentCashier;
use crate::error::{ApiError, ApiResult};
use crate::AppState;

#[derive(Debug, Serialize)]
pub struct BookDetail {
    pub book: Book,
}

#[derive(Debug, Deserialize)]
pub struct RestockRequest {
    pub quantity: i64,
}

/// Get a book by id
pub async fn get_book(
    State(state): State<AppState>,
    _cashier: CurrentCashier,
    id: Result<Path<i64>, PathRejection>,
) -> ApiResult<Json<Success<BookDetail>>> {
    let Path(id) = id?;
    let book = state
        .db
        .books()
        .get_by_id(id)
        .await?
        .ok_or_else(|| ApiError::not_found("Book"))?;
    Ok(Json(Success::new(BookDetail { book })))
}

/// Add delivered copies to a book's stock
pub async fn restock_book(
    State(state): State<AppState>,
    cashier: CurrentCashier,
    id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<RestockRequest>, JsonRejection>,
) -> ApiResult<Json<Success<BookDetail>>> {
    let Path(id) = id?;
    let Json(request) = payload?;

    tracing::info!(book_id = id, quantity = request.quantity, cashier_id = cashier.id, "Restocking book");

    let book = state.db.books().restock(id, request.quantity).await?;
    Ok(Json(Success::new(BookDetail { book })))
}
