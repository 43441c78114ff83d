//! Outlay Core Library
//!
//! Shared functionality for the Outlay expense tracker:
//! - Database access and migrations
//! - Spending statistics engine (top days, month-over-month change, prediction)
//! - Record sources that feed the engine from storage or client snapshots

pub mod db;
pub mod error;
pub mod models;
pub mod source;
pub mod stats;

pub use db::{Database, ExpenseFilter, DEFAULT_CATEGORIES};
pub use error::{Error, Result};
pub use source::{
    daily_totals_for_user, month_over_month_for_user, prediction_for_user, statistics_for_user,
    top_days_for_user, RecordSnapshot, RecordSource,
};
pub use stats::{
    compute_statistics, daily_totals, month_over_month_change, monthly_totals,
    predict_next_month, top_spending_days, Confidence, DailyTotal, MonthKey,
    MonthOverMonthChange, MonthlyTotal, Prediction, StatisticsReport, TopSpendingDays,
    DEFAULT_TOP_DAYS_LIMIT,
};
