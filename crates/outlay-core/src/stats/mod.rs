//! Spending statistics engine
//!
//! Pure functions over one user's expense records:
//! - Top spending days
//! - Month-over-month change
//! - Next-month prediction (3-month moving average)
//!
//! Every operation validates the snapshot first (finite, non-negative amounts
//! and a single `user_id`) and aggregates records in `(date, id)` order, so the
//! same records always produce bit-identical totals regardless of the order
//! they were fetched in. The reference date is always passed in; nothing here
//! reads the clock.

pub mod period;
pub mod types;

use chrono::NaiveDate;

use crate::error::{Error, Result};
use crate::models::ExpenseRecord;

pub use period::MonthKey;
pub use types::{
    Confidence, DailyTotal, MonthOverMonthChange, MonthRef, MonthlyTotal, Prediction,
    StatisticsReport, TopSpendingDays, DEFAULT_TOP_DAYS_LIMIT, INSUFFICIENT_CHANGE_MESSAGE,
    NO_PREDICTION_MESSAGE, NO_SPENDING_DATA_MESSAGE, PREDICTION_WINDOW_MONTHS, SINGLE_MONTH_NOTE,
};

/// Check a snapshot and return the user it belongs to (`None` when empty)
pub fn validate_snapshot(records: &[ExpenseRecord]) -> Result<Option<i64>> {
    let mut user_id: Option<i64> = None;

    for record in records {
        if !record.amount.is_finite() {
            return Err(Error::malformed(record.id, "amount is not a finite number"));
        }
        if record.amount < 0.0 {
            return Err(Error::malformed(record.id, "amount is negative"));
        }

        match user_id {
            None => user_id = Some(record.user_id),
            Some(expected) if expected != record.user_id => {
                return Err(Error::InvalidUserScope {
                    expected,
                    found: record.user_id,
                });
            }
            Some(_) => {}
        }
    }

    Ok(user_id)
}

/// Validated records in canonical `(date, id)` order
///
/// Amounts are non-negative, so every daily, monthly and windowed sum is
/// bounded by the running grand total. A grand total that overflows to
/// infinity is rejected here, naming the record that pushed it over.
fn canonical(records: &[ExpenseRecord]) -> Result<Vec<&ExpenseRecord>> {
    validate_snapshot(records)?;
    let mut ordered: Vec<&ExpenseRecord> = records.iter().collect();
    ordered.sort_by(|a, b| a.date.cmp(&b.date).then(a.id.cmp(&b.id)));

    let mut running = 0.0_f64;
    for record in &ordered {
        running += record.amount;
        if !running.is_finite() {
            return Err(Error::malformed(
                record.id,
                "total spending overflows a finite amount",
            ));
        }
    }

    Ok(ordered)
}

fn daily_from(ordered: &[&ExpenseRecord]) -> Vec<DailyTotal> {
    period::totals_by_day(ordered)
        .into_iter()
        .map(|(date, total_amount)| DailyTotal { date, total_amount })
        .collect()
}

/// Spending per day, oldest first
pub fn daily_totals(records: &[ExpenseRecord]) -> Result<Vec<DailyTotal>> {
    let ordered = canonical(records)?;
    Ok(daily_from(&ordered))
}

/// Spending per calendar month, oldest first
pub fn monthly_totals(records: &[ExpenseRecord]) -> Result<Vec<MonthlyTotal>> {
    let ordered = canonical(records)?;
    Ok(period::totals_by_month(&ordered)
        .into_iter()
        .map(|(key, total)| MonthlyTotal::new(key, total))
        .collect())
}

fn top_days_from(ordered: &[&ExpenseRecord], limit: usize) -> Vec<DailyTotal> {
    let mut days = daily_from(ordered);
    // Highest total first; equal totals keep the earlier date first
    days.sort_by(|a, b| {
        b.total_amount
            .total_cmp(&a.total_amount)
            .then(a.date.cmp(&b.date))
    });
    days.truncate(limit);
    days
}

/// The `limit` days with the highest total spending
///
/// Ties are broken by date, earlier first. An empty snapshot yields an empty
/// list; callers attach [`NO_SPENDING_DATA_MESSAGE`].
pub fn top_spending_days(records: &[ExpenseRecord], limit: usize) -> Result<Vec<DailyTotal>> {
    let ordered = canonical(records)?;
    Ok(top_days_from(&ordered, limit))
}

fn change_from(ordered: &[&ExpenseRecord], reference_date: NaiveDate) -> MonthOverMonthChange {
    let monthly = period::totals_by_month(ordered);
    let current = MonthKey::from_date(reference_date);
    let previous = current.previous();

    let current_total = monthly.get(&current).copied().unwrap_or(0.0);
    let previous_total = monthly.get(&previous).copied().unwrap_or(0.0);

    // A tiny previous total can still push the ratio past f64::MAX
    let percentage_change = (previous_total != 0.0)
        .then(|| (current_total - previous_total) / previous_total * 100.0)
        .filter(|pct| pct.is_finite());
    let message = percentage_change
        .is_none()
        .then(|| INSUFFICIENT_CHANGE_MESSAGE.to_string());

    MonthOverMonthChange {
        current_month: current.into(),
        previous_month: previous.into(),
        current_total,
        previous_total,
        percentage_change,
        message,
    }
}

/// Compare spending in the month containing `reference_date` with the month
/// before it. The change is undefined (`None`) when the previous month is 0.
pub fn month_over_month_change(
    records: &[ExpenseRecord],
    reference_date: NaiveDate,
) -> Result<MonthOverMonthChange> {
    let ordered = canonical(records)?;
    Ok(change_from(&ordered, reference_date))
}

fn prediction_from(ordered: &[&ExpenseRecord], reference_date: NaiveDate) -> Prediction {
    let monthly = period::totals_by_month(ordered);
    let current = MonthKey::from_date(reference_date);
    let window_start = current.offset(-PREDICTION_WINDOW_MONTHS);

    // The in-progress month is excluded; empty months are skipped, not zeroed
    let basis: Vec<MonthlyTotal> = monthly
        .range(window_start..current)
        .map(|(key, total)| MonthlyTotal::new(*key, *total))
        .collect();

    let months_analyzed = basis.len();
    let confidence = Confidence::from_months_analyzed(months_analyzed);

    if months_analyzed == 0 {
        return Prediction {
            predicted_amount: None,
            confidence,
            months_analyzed,
            basis,
            note: None,
            message: Some(NO_PREDICTION_MESSAGE.to_string()),
        };
    }

    let sum: f64 = basis.iter().map(|m| m.total_amount).sum();
    let note = (months_analyzed == 1).then(|| SINGLE_MONTH_NOTE.to_string());

    Prediction {
        predicted_amount: Some(sum / months_analyzed as f64),
        confidence,
        months_analyzed,
        basis,
        note,
        message: None,
    }
}

/// Predict next month's spending as the plain average of the complete months
/// (up to three) before the month containing `reference_date`.
///
/// This is a naive moving average, not a forecast model.
pub fn predict_next_month(
    records: &[ExpenseRecord],
    reference_date: NaiveDate,
) -> Result<Prediction> {
    let ordered = canonical(records)?;
    Ok(prediction_from(&ordered, reference_date))
}

/// All statistics in one pass over a validated snapshot
pub fn compute_statistics(
    records: &[ExpenseRecord],
    reference_date: NaiveDate,
    limit: usize,
) -> Result<StatisticsReport> {
    let ordered = canonical(records)?;
    let user_id = ordered.first().map(|r| r.user_id);

    Ok(StatisticsReport {
        user_id,
        reference_date,
        top_days: top_days_from(&ordered, limit).into(),
        month_over_month: change_from(&ordered, reference_date),
        prediction: prediction_from(&ordered, reference_date),
        daily: daily_from(&ordered),
    })
}
