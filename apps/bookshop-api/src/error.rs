//! # API Error Handling
//!
//! Every failure a handler returns becomes `{success:false, message}`.
//!
//! ## Status Mapping
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  Source                                   Status   Message              │
//! │  ───────────────────────────────────────  ───────  ──────────────────── │
//! │  ValidationError / BillTooLarge           400      validation message   │
//! │  Missing cashier headers                  401      what is missing      │
//! │  DbError::NotFound                        404      "<Entity> not found" │
//! │  CoreError::InsufficientStock             409      names the reference  │
//! │  CoreError::InvalidBillStatus             409      the transition       │
//! │  Any store failure                        500      generic, logged      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Store error text goes to the log with `error!` and never into a response.

use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use bookshop_core::{CoreError, ValidationError};
use bookshop_db::DbError;
use serde::Serialize;

/// Generic message for store failures on read endpoints.
pub const REQUEST_FAILED: &str = "Request failed";

/// Generic message for store failures while creating a bill.
pub const BILL_CREATE_FAILED: &str = "Failed to create bill";

/// JSON body of every failure response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub success: bool,
    pub message: String,
}

/// An error ready to be sent to the client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    pub status: StatusCode,
    pub message: String,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        ApiError {
            status,
            message: message.into(),
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(StatusCode::UNAUTHORIZED, message)
    }

    pub fn not_found(entity: &str) -> Self {
        Self::new(StatusCode::NOT_FOUND, format!("{entity} not found"))
    }

    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(StatusCode::CONFLICT, message)
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, message)
    }

    /// Maps a store error, using `fallback` as the message for 500s.
    pub fn from_db(err: DbError, fallback: &str) -> Self {
        match err {
            DbError::Core(core) => core.into(),
            DbError::NotFound { entity, id } => {
                tracing::debug!(entity = %entity, id = %id, "Entity not found");
                ApiError::not_found(&entity)
            }
            other => {
                tracing::error!(error = %other, "Store operation failed");
                ApiError::internal(fallback)
            }
        }
    }

    /// Maps a failure of the bill transaction.
    pub fn from_bill_error(err: DbError) -> Self {
        Self::from_db(err, BILL_CREATE_FAILED)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            success: false,
            message: self.message,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<DbError> for ApiError {
    fn from(err: DbError) -> Self {
        ApiError::from_db(err, REQUEST_FAILED)
    }
}

impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::Validation(e) => e.into(),
            CoreError::BillTooLarge { .. } => ApiError::bad_request(err.to_string()),
            CoreError::InsufficientStock { ref reference, .. } => {
                tracing::warn!(error = %err, "Bill rejected");
                ApiError::conflict(format!("Insufficient stock for {reference}"))
            }
            CoreError::InvalidBillStatus { from, to, .. } => {
                ApiError::conflict(format!("Bill cannot move from {from} to {to}"))
            }
        }
    }
}

impl From<ValidationError> for ApiError {
    fn from(err: ValidationError) -> Self {
        ApiError::bad_request(err.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::bad_request(rejection.body_text())
    }
}
