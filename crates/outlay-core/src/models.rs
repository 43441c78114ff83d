//! Domain models for Outlay

use chrono::{DateTime, Duration, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// A person whose expenses are tracked
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// An expense category
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

/// A stored expense, joined with its user and category names
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Expense {
    pub id: i64,
    pub user_id: i64,
    pub user_name: Option<String>,
    pub category_id: i64,
    pub category_name: Option<String>,
    pub amount: f64,
    pub date: NaiveDate,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// A single field validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: &str, message: &str) -> Self {
        Self {
            field: field.to_string(),
            message: message.to_string(),
        }
    }
}

/// Input for creating an expense
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewExpense {
    pub user_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default)]
    pub description: Option<String>,
}

impl NewExpense {
    /// Check field invariants; `today` is the latest allowed date (see
    /// [`latest_expense_date`])
    pub fn validate(&self, today: NaiveDate) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        check_id(&mut errors, "user_id", self.user_id);
        check_id(&mut errors, "category_id", self.category_id);
        check_amount(&mut errors, self.amount);
        check_date(&mut errors, self.date, today);

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Partial update for an expense; `None` fields are left untouched
///
/// A blank `description` clears the stored description.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExpenseUpdate {
    pub user_id: Option<i64>,
    pub category_id: Option<i64>,
    pub amount: Option<f64>,
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
}

impl ExpenseUpdate {
    pub fn validate(&self, today: NaiveDate) -> std::result::Result<(), Vec<FieldError>> {
        let mut errors = Vec::new();
        if let Some(id) = self.user_id {
            check_id(&mut errors, "user_id", id);
        }
        if let Some(id) = self.category_id {
            check_id(&mut errors, "category_id", id);
        }
        if let Some(amount) = self.amount {
            check_amount(&mut errors, amount);
        }
        if let Some(date) = self.date {
            check_date(&mut errors, date, today);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn is_empty(&self) -> bool {
        self.user_id.is_none()
            && self.category_id.is_none()
            && self.amount.is_none()
            && self.date.is_none()
            && self.description.is_none()
    }
}

fn check_id(errors: &mut Vec<FieldError>, field: &str, id: i64) {
    if id <= 0 {
        errors.push(FieldError::new(field, "Must be a positive integer"));
    }
}

fn check_amount(errors: &mut Vec<FieldError>, amount: f64) {
    if !amount.is_finite() || amount <= 0.0 {
        errors.push(FieldError::new("amount", "Must be a positive number"));
    }
}

/// Furthest-ahead civil time offset in use (UTC+14, Line Islands)
pub const MAX_UTC_OFFSET_HOURS: i64 = 14;

/// The latest date an expense may carry at instant `now`
///
/// This is the calendar date somewhere on Earth is already on, so a user
/// east of UTC can record their local today before UTC midnight.
pub fn latest_expense_date(now: DateTime<Utc>) -> NaiveDate {
    (now + Duration::hours(MAX_UTC_OFFSET_HOURS)).date_naive()
}

fn check_date(errors: &mut Vec<FieldError>, date: NaiveDate, today: NaiveDate) {
    if date > today {
        errors.push(FieldError::new("date", "Future dates are not allowed"));
    }
}

/// Sort field for expense listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortField {
    #[default]
    Date,
    Amount,
}

impl SortField {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Date => "date",
            Self::Amount => "amount",
        }
    }
}

impl std::str::FromStr for SortField {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "date" => Ok(Self::Date),
            "amount" => Ok(Self::Amount),
            _ => Err(format!("Unknown sort field: {} (valid: date, amount)", s)),
        }
    }
}

/// Sort direction for expense listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    pub fn as_sql(&self) -> &'static str {
        match self {
            Self::Asc => "ASC",
            Self::Desc => "DESC",
        }
    }
}

impl std::str::FromStr for SortOrder {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            _ => Err(format!("Unknown sort order: {} (valid: asc, desc)", s)),
        }
    }
}

/// An expense as seen by the statistics engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpenseRecord {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub date: NaiveDate,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// An expense record whose date has not been parsed yet
///
/// This is the shape records arrive in from SQLite rows and client snapshots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RawExpenseRecord {
    pub id: i64,
    pub user_id: i64,
    pub category_id: i64,
    pub amount: f64,
    pub date: String,
    #[serde(default)]
    pub description: Option<String>,
}

impl TryFrom<RawExpenseRecord> for ExpenseRecord {
    type Error = Error;

    fn try_from(raw: RawExpenseRecord) -> Result<Self> {
        let date = parse_record_date(&raw.date).ok_or_else(|| {
            Error::malformed(raw.id, format!("unparseable date '{}'", raw.date))
        })?;

        Ok(ExpenseRecord {
            id: raw.id,
            user_id: raw.user_id,
            category_id: raw.category_id,
            amount: raw.amount,
            date,
            description: raw.description,
        })
    }
}

/// Parse a record date: `YYYY-MM-DD`, optionally followed by a time part
/// (`2024-01-15T00:00:00.000Z`, `2024-01-15 10:30:00`) which is discarded.
pub fn parse_record_date(s: &str) -> Option<NaiveDate> {
    let s = s.trim();
    let day = match s.find(|c| c == 'T' || c == ' ') {
        Some(idx) => &s[..idx],
        None => s,
    };
    NaiveDate::parse_from_str(day, "%Y-%m-%d").ok()
}
