//! Cashier identity.
//!
//! Login and sessions live upstream. The session layer forwards the signed-in
//! cashier in two headers, which handlers read through [`CurrentCashier`].

use axum::{extract::FromRequestParts, http::request::Parts};

use crate::error::ApiError;

pub const CASHIER_ID_HEADER: &str = "x-cashier-id";
pub const CASHIER_NAME_HEADER: &str = "x-cashier-name";

/// The cashier making the request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CurrentCashier {
    pub id: i64,
    pub name: String,
}

#[axum::async_trait]
impl<S> FromRequestParts<S> for CurrentCashier
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::trim)
                .filter(|v| !v.is_empty())
        };

        let id = header(CASHIER_ID_HEADER)
            .ok_or_else(|| ApiError::unauthorized("Not signed in"))?
            .parse::<i64>()
            .ok()
            .filter(|id| *id > 0)
            .ok_or_else(|| ApiError::unauthorized("Invalid cashier id"))?;

        let name = header(CASHIER_NAME_HEADER)
            .ok_or_else(|| ApiError::unauthorized("Not signed in"))?
            .to_string();

        Ok(CurrentCashier { id, name })
    }
}
