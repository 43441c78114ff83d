//! Expense handlers

use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use tracing::info;

use super::{latest_expense_date, parse_json, ApiPath, ApiQuery};
use crate::{AppError, AppState, MessageResponse};
use outlay_core::db::ExpenseFilter;
use outlay_core::models::{Expense, ExpenseUpdate, FieldError, NewExpense, SortField, SortOrder};

/// Maximum expenses returned by one listing
const MAX_LIST_LIMIT: i64 = 1000;

#[derive(Debug, Deserialize)]
pub struct ExpenseQuery {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub limit: Option<i64>,
}

/// Request body for creating an expense
///
/// Every field is optional here so missing values can be reported per field
/// rather than as a single deserialization failure.
#[derive(Debug, Default, Deserialize)]
pub struct CreateExpenseRequest {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

/// Request body for updating an expense (all fields optional)
#[derive(Debug, Default, Deserialize)]
pub struct UpdateExpenseRequest {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Option<f64>,
    pub date: Option<String>,
    pub description: Option<String>,
}

fn parse_query_date(field: &str, value: Option<&str>) -> Result<Option<NaiveDate>, AppError> {
    value
        .map(|s| {
            NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map_err(|_| {
                AppError::bad_request(&format!("Invalid {} date '{}' (expected YYYY-MM-DD)", field, s))
            })
        })
        .transpose()
}

fn parse_body_date(errors: &mut Vec<FieldError>, value: Option<&str>) -> Option<NaiveDate> {
    let s = value?;
    match NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            errors.push(FieldError::new("date", "Must be a valid date (YYYY-MM-DD)"));
            None
        }
    }
}

impl CreateExpenseRequest {
    fn into_new_expense(self) -> Result<NewExpense, Vec<FieldError>> {
        let mut errors = Vec::new();
        if self.user_id.is_none() {
            errors.push(FieldError::new("user_id", "Required"));
        }
        if self.category_id.is_none() {
            errors.push(FieldError::new("category_id", "Required"));
        }
        if self.amount.is_none() {
            errors.push(FieldError::new("amount", "Required"));
        }
        if self.date.is_none() {
            errors.push(FieldError::new("date", "Required"));
        }
        let date = parse_body_date(&mut errors, self.date.as_deref());

        match (self.user_id, self.category_id, self.amount, date) {
            (Some(user_id), Some(category_id), Some(amount), Some(date)) if errors.is_empty() => {
                Ok(NewExpense {
                    user_id,
                    category_id,
                    amount,
                    date,
                    description: self.description,
                })
            }
            _ => Err(errors),
        }
    }
}

impl UpdateExpenseRequest {
    fn into_update(self) -> Result<ExpenseUpdate, Vec<FieldError>> {
        let mut errors = Vec::new();
        let date = parse_body_date(&mut errors, self.date.as_deref());
        if !errors.is_empty() {
            return Err(errors);
        }

        Ok(ExpenseUpdate {
            user_id: self.user_id,
            category_id: self.category_id,
            amount: self.amount,
            date,
            description: self.description,
        })
    }
}

/// GET /api/expenses - List expenses with optional filters
pub async fn list_expenses(
    State(state): State<Arc<AppState>>,
    ApiQuery(params): ApiQuery<ExpenseQuery>,
) -> Result<Json<Vec<Expense>>, AppError> {
    let from = parse_query_date("from", params.from.as_deref())?;
    let to = parse_query_date("to", params.to.as_deref())?;

    let sort: SortField = match params.sort.as_deref() {
        Some(s) => s
            .parse::<SortField>()
            .map_err(|e| AppError::bad_request(&e))?,
        None => SortField::default(),
    };
    let order: SortOrder = match params.order.as_deref() {
        Some(s) => s
            .parse::<SortOrder>()
            .map_err(|e| AppError::bad_request(&e))?,
        None => SortOrder::default(),
    };

    // Input validation: clamp limit
    let limit = params.limit.map(|l| l.clamp(1, MAX_LIST_LIMIT) as usize);

    let filter = ExpenseFilter::new()
        .user_id(params.user_id)
        .category_id(params.category_id)
        .date_range(from, to)
        .sort(sort, order)
        .limit(limit);

    Ok(Json(state.db.list_expenses(&filter)?))
}

/// POST /api/expenses - Create an expense
pub async fn create_expense(
    State(state): State<Arc<AppState>>,
    body: Bytes,
) -> Result<(StatusCode, Json<Expense>), AppError> {
    let req: CreateExpenseRequest = parse_json(&body)?;
    let expense = req.into_new_expense().map_err(AppError::validation)?;
    expense.validate(latest_expense_date()).map_err(AppError::validation)?;

    let id = state.db.insert_expense(&expense)?;
    info!(id, user_id = expense.user_id, "Created expense");

    let created = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::internal("Expense not found after creation"))?;

    Ok((StatusCode::CREATED, Json(created)))
}

/// GET /api/expenses/:id - Get a single expense
pub async fn get_expense(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<Expense>, AppError> {
    let expense = state
        .db
        .get_expense(id)?
        .ok_or_else(|| AppError::not_found(&format!("Expense {} not found", id)))?;

    Ok(Json(expense))
}

/// PUT /api/expenses/:id - Update an expense (partial)
pub async fn update_expense(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
    body: Bytes,
) -> Result<Json<Expense>, AppError> {
    let req: UpdateExpenseRequest = parse_json(&body)?;
    let update = req.into_update().map_err(AppError::validation)?;
    if update.is_empty() {
        return Err(AppError::bad_request("No fields to update"));
    }
    update.validate(latest_expense_date()).map_err(AppError::validation)?;

    let expense = state.db.update_expense(id, &update)?;
    info!(id, "Updated expense");

    Ok(Json(expense))
}

/// DELETE /api/expenses/:id - Delete an expense
pub async fn delete_expense(
    State(state): State<Arc<AppState>>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, AppError> {
    state.db.delete_expense(id)?;
    info!(id, "Deleted expense");

    Ok(Json(MessageResponse {
        message: "Expense deleted".to_string(),
    }))
}
