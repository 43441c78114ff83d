//! User handlers

use std::sync::Arc;

use axum::{body::Bytes, extract::State, http::StatusCode, Json};
use serde::Deserialize;
use tracing::info;

use super::parse_json;
use crate::{AppError, AppState};
use outlay_core::models::User;

/// Request body for creating a user
#[derive(Debug, Deserialize)]
pub struct CreateUserRequest {
    pub name: String,
}

/// GET /api/users - List all users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
) -> Result<Json<Vec<User>>, AppError> {
    Ok(Json(state.db.list_users()?))
}

/// POST /api/users - Create a user
pub async fn create_user(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<User>), AppError> {
    let req: CreateUserRequest = parse_json(&body)?;
    let user = state.db.create_user(&req.name)?;
    info!(user_id = user.id, "Created user");
    Ok((StatusCode::CREATED, Json(user)))
}
