//! # Bookshop API
//!
//! HTTP request layer for the bookshop POS.
//!
//! ## Request Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Bookshop API                                     │
//! │                                                                         │
//! │  Cashier UI                                                            │
//! │     │  POST /api/bills  {items, paymentMethod}                         │
//! │     │  X-Cashier-Id / X-Cashier-Name (set by the session layer)        │
//! │     ▼                                                                   │
//! │  Router (TraceLayer, CorsLayer)                                        │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  handlers::bills::create_bill                                          │
//! │     │  CurrentCashier + body → BillDraft                               │
//! │     ▼                                                                   │
//! │  BillRepository::create_bill  (one SQLite transaction)                 │
//! │     │                                                                   │
//! │     ▼                                                                   │
//! │  {success:true, message, billNo, totalAmount}                          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod cashier;
pub mod config;
pub mod error;
pub mod handlers;

use axum::{
    routing::{get, post},
    Router,
};
use bookshop_core::BillingPolicy;
use bookshop_db::{BillRepository, Database};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use cashier::CurrentCashier;
pub use config::{ApiConfig, ConfigError};
pub use error::{ApiError, ApiResult};

/// Shared application state.
#[derive(Debug, Clone)]
pub struct AppState {
    pub db: Database,
    pub policy: BillingPolicy,
}

impl AppState {
    pub fn new(db: Database, policy: BillingPolicy) -> Self {
        AppState { db, policy }
    }

    /// Bill repository carrying the configured billing policy.
    pub fn bills(&self) -> BillRepository {
        self.db.bills().with_policy(self.policy)
    }
}

/// Builds the application router.
pub fn create_app(state: AppState) -> Router {
    let bill_routes = Router::new()
        .route(
            "/",
            post(handlers::bills::create_bill).get(handlers::bills::list_bills),
        )
        .route("/mine", get(handlers::bills::list_my_bills))
        .route("/today", get(handlers::bills::list_today_bills))
        .route("/range", get(handlers::bills::list_bills_in_range))
        .route("/count", get(handlers::bills::count_bills))
        .route("/:bill", get(handlers::bills::get_bill))
        .route("/:bill/status", post(handlers::bills::update_bill_status));

    let book_routes = Router::new()
        .route("/:id", get(handlers::books::get_book))
        .route("/:id/restock", post(handlers::books::restock_book));

    Router::new()
        .route("/health", get(handlers::health::health_check))
        .nest("/api/bills", bill_routes)
        .nest("/api/books", book_routes)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
