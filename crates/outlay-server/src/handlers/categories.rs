//! Category handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Deserialize;

use super::parse_json;
use crate::{AppError, AppState};
use outlay_core::models::Category;

#[derive(Debug, Deserialize)]
pub struct CreateCategoryRequest {
    pub name: String,
}

/// GET /api/categories - List all categories
pub async fn list_categories(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<Category>>, AppError> {
    Ok(Json(state.db.list_categories()?))
}

/// POST /api/categories - Create a category
pub async fn create_category(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Category>), AppError> {
    let req: CreateCategoryRequest = parse_json(&body)?;
    let category = state.db.create_category(&req.name)?;
    Ok((StatusCode::CREATED, Json(category)))
}
