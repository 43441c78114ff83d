//! Spending statistics handlers
//!
//! The `/:user_id` routes read the user's records from the database; `POST
//! /api/stats/compute` runs the same engine over records supplied in the
//! request body (a client that already holds its expenses).

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    Json,
};
use serde::Deserialize;

use super::{parse_json, reference_date, ApiPath, ApiQuery};
use crate::{AppError, AppState, MAX_TOP_DAYS_LIMIT};
use outlay_core::models::RawExpenseRecord;
use outlay_core::{
    daily_totals_for_user, month_over_month_for_user, prediction_for_user, statistics_for_user,
    top_days_for_user, DailyTotal, MonthOverMonthChange, Prediction, RecordSnapshot,
    StatisticsReport, TopSpendingDays, DEFAULT_TOP_DAYS_LIMIT,
};

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    /// Number of top days to return
    pub limit: Option<i64>,
    /// Reference date (YYYY-MM-DD); defaults to today
    pub date: Option<String>,
}

/// Request body for computing statistics over supplied records
#[derive(Debug, Deserialize)]
pub struct ComputeStatsRequest {
    pub user_id: i64,
    #[serde(default)]
    pub records: Vec<RawExpenseRecord>,
    pub reference_date: Option<String>,
    pub limit: Option<i64>,
}

/// Clamp a requested top-days limit into `1..=MAX_TOP_DAYS_LIMIT`
pub(crate) fn clamp_limit(limit: Option<i64>) -> usize {
    limit
        .unwrap_or(DEFAULT_TOP_DAYS_LIMIT as i64)
        .clamp(1, MAX_TOP_DAYS_LIMIT) as usize
}

fn check_user_id(user_id: i64) -> Result<(), AppError> {
    if user_id <= 0 {
        return Err(AppError::bad_request("user_id must be a positive integer"));
    }
    Ok(())
}

/// GET /api/stats/top-days/:user_id - Highest-spending days
pub async fn top_spending_days(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<StatsQuery>,
) -> Result<Json<TopSpendingDays>, AppError> {
    check_user_id(user_id)?;
    let limit = clamp_limit(params.limit);
    Ok(Json(top_days_for_user(&state.db, user_id, limit)?))
}

/// GET /api/stats/monthly-change/:user_id - Reference month vs the month before
pub async fn monthly_change(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<StatsQuery>,
) -> Result<Json<MonthOverMonthChange>, AppError> {
    check_user_id(user_id)?;
    let date = reference_date(params.date.as_deref())?;
    Ok(Json(month_over_month_for_user(&state.db, user_id, date)?))
}

/// GET /api/stats/prediction/:user_id - Next month estimate
pub async fn prediction(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<StatsQuery>,
) -> Result<Json<Prediction>, AppError> {
    check_user_id(user_id)?;
    let date = reference_date(params.date.as_deref())?;
    Ok(Json(prediction_for_user(&state.db, user_id, date)?))
}

/// GET /api/stats/daily/:user_id - Spending per day, oldest first
pub async fn daily_totals(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
) -> Result<Json<Vec<DailyTotal>>, AppError> {
    check_user_id(user_id)?;
    Ok(Json(daily_totals_for_user(&state.db, user_id)?))
}

/// GET /api/stats/report/:user_id - All statistics at once
pub async fn statistics_report(
    State(state): State<Arc<AppState>>,
    ApiPath(user_id): ApiPath<i64>,
    ApiQuery(params): ApiQuery<StatsQuery>,
) -> Result<Json<StatisticsReport>, AppError> {
    check_user_id(user_id)?;
    let date = reference_date(params.date.as_deref())?;
    let limit = clamp_limit(params.limit);
    Ok(Json(statistics_for_user(&state.db, user_id, date, limit)?))
}

/// POST /api/stats/compute - All statistics over records supplied by the client
pub async fn compute_statistics(body: Bytes) -> Result<Json<StatisticsReport>, AppError> {
    let req: ComputeStatsRequest = parse_json(&body)?;
    check_user_id(req.user_id)?;
    let date = reference_date(req.reference_date.as_deref())?;
    let limit = clamp_limit(req.limit);

    let snapshot = RecordSnapshot::from_raw(req.records)?;
    Ok(Json(statistics_for_user(&snapshot, req.user_id, date, limit)?))
}
