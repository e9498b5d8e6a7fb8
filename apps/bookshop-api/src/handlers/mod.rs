//! HTTP handlers, one module per resource.

pub mod bills;
pub mod books;
pub mod health;

use serde::Serialize;

/// Envelope for successful responses that carry a payload.
#[derive(Debug, Serialize)]
pub struct Success<T> {
    pub success: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T> Success<T> {
    pub fn new(data: T) -> Self {
        Success {
            success: true,
            data,
        }
    }
}
