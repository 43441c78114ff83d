//! Where expense records come from
//!
//! The statistics engine never talks to storage directly. Anything that can
//! produce one user's records implements [`RecordSource`]: the SQLite
//! [`Database`] on the server, or a [`RecordSnapshot`] holding records a client
//! already has in memory. The `*_for_user` functions run the same engine over
//! either, so both paths produce identical numbers for identical records.

use std::path::Path;

use chrono::NaiveDate;
use tracing::debug;

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{ExpenseRecord, RawExpenseRecord};
use crate::stats::{
    self, MonthOverMonthChange, Prediction, StatisticsReport, TopSpendingDays,
};

/// Supplies the expense records of a single user
pub trait RecordSource {
    fn fetch_records_for_user(&self, user_id: i64) -> Result<Vec<ExpenseRecord>>;
}

impl RecordSource for Database {
    fn fetch_records_for_user(&self, user_id: i64) -> Result<Vec<ExpenseRecord>> {
        Database::fetch_records_for_user(self, user_id)
    }
}

/// Records supplied by the caller rather than read from storage
#[derive(Debug, Clone, Default)]
pub struct RecordSnapshot {
    records: Vec<ExpenseRecord>,
}

impl RecordSnapshot {
    pub fn new(records: Vec<ExpenseRecord>) -> Self {
        Self { records }
    }

    /// Parse raw records, failing on the first unparseable date
    pub fn from_raw(raw: Vec<RawExpenseRecord>) -> Result<Self> {
        let records = raw
            .into_iter()
            .map(ExpenseRecord::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(Self { records })
    }

    /// Load a JSON array of raw records from a file
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let raw: Vec<RawExpenseRecord> = serde_json::from_str(&content)?;
        Self::from_raw(raw)
    }

    pub fn records(&self) -> &[ExpenseRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordSource for RecordSnapshot {
    /// A snapshot is expected to hold one user's records; any record for
    /// another user rejects the request instead of being dropped.
    fn fetch_records_for_user(&self, user_id: i64) -> Result<Vec<ExpenseRecord>> {
        if let Some(stray) = self.records.iter().find(|r| r.user_id != user_id) {
            return Err(Error::InvalidUserScope {
                expected: user_id,
                found: stray.user_id,
            });
        }
        Ok(self.records.clone())
    }
}

fn fetch<S: RecordSource + ?Sized>(source: &S, user_id: i64) -> Result<Vec<ExpenseRecord>> {
    let records = source.fetch_records_for_user(user_id)?;
    debug!(user_id, records = records.len(), "Fetched records");
    Ok(records)
}

/// Top spending days for a user
pub fn top_days_for_user<S: RecordSource + ?Sized>(
    source: &S,
    user_id: i64,
    limit: usize,
) -> Result<TopSpendingDays> {
    let records = fetch(source, user_id)?;
    Ok(stats::top_spending_days(&records, limit)?.into())
}

/// Month-over-month change for a user
pub fn month_over_month_for_user<S: RecordSource + ?Sized>(
    source: &S,
    user_id: i64,
    reference_date: NaiveDate,
) -> Result<MonthOverMonthChange> {
    let records = fetch(source, user_id)?;
    stats::month_over_month_change(&records, reference_date)
}

/// Next-month prediction for a user
pub fn prediction_for_user<S: RecordSource + ?Sized>(
    source: &S,
    user_id: i64,
    reference_date: NaiveDate,
) -> Result<Prediction> {
    let records = fetch(source, user_id)?;
    stats::predict_next_month(&records, reference_date)
}

/// Daily totals for a user, oldest first
pub fn daily_totals_for_user<S: RecordSource + ?Sized>(
    source: &S,
    user_id: i64,
) -> Result<Vec<stats::DailyTotal>> {
    let records = fetch(source, user_id)?;
    stats::daily_totals(&records)
}

/// Every statistic for a user
pub fn statistics_for_user<S: RecordSource + ?Sized>(
    source: &S,
    user_id: i64,
    reference_date: NaiveDate,
    limit: usize,
) -> Result<StatisticsReport> {
    let records = fetch(source, user_id)?;
    let mut report = stats::compute_statistics(&records, reference_date, limit)?;
    report.user_id = Some(user_id);
    Ok(report)
}
