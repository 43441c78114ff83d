//! HTTP request handlers organized by domain
//!
//! Each submodule contains handlers for a specific API area.

pub mod categories;
pub mod expenses;
pub mod stats;
pub mod users;

// Re-export all handlers for use in router
pub use categories::*;
pub use expenses::*;
pub use stats::*;
pub use users::*;

use axum::{body::Bytes, extract::FromRequestParts, Json};
use chrono::{NaiveDate, Utc};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::AppError;

/// `Path` whose rejection is answered with a JSON `{"error": ...}` body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Path), rejection(AppError))]
pub struct ApiPath<T>(pub T);

/// `Query` whose rejection is answered with a JSON `{"error": ...}` body
#[derive(FromRequestParts)]
#[from_request(via(axum::extract::Query), rejection(AppError))]
pub struct ApiQuery<T>(pub T);

/// GET /api/health - Liveness check
pub async fn health() -> Json<Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

/// Parse a JSON request body, mapping any failure to a 400
pub(crate) fn parse_json<T: DeserializeOwned>(body: &Bytes) -> Result<T, AppError> {
    serde_json::from_slice(body).map_err(|e| AppError::bad_request(&format!("Invalid JSON: {}", e)))
}

/// Parse an optional `YYYY-MM-DD` parameter, defaulting to today (UTC)
pub(crate) fn reference_date(param: Option<&str>) -> Result<NaiveDate, AppError> {
    match param {
        Some(s) => NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::bad_request(&format!("Invalid date '{}' (expected YYYY-MM-DD)", s))),
        None => Ok(today()),
    }
}

pub(crate) fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Latest date a new or edited expense may carry right now
pub(crate) fn latest_expense_date() -> NaiveDate {
    outlay_core::models::latest_expense_date(Utc::now())
}
