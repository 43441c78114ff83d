//! Calendar month arithmetic and period grouping
//!
//! Months are represented as an absolute count since year 0
//! (`year * 12 + month - 1`), so stepping backwards across a year boundary is
//! plain integer subtraction.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{Datelike, NaiveDate};

use crate::models::ExpenseRecord;

/// Absolute month index
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey(i32);

impl MonthKey {
    /// Build from a year and a 1-based month
    pub fn new(year: i32, month: u32) -> Self {
        debug_assert!((1..=12).contains(&month));
        MonthKey(year * 12 + month as i32 - 1)
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self::new(date.year(), date.month())
    }

    pub fn index(self) -> i32 {
        self.0
    }

    pub fn year(self) -> i32 {
        self.0.div_euclid(12)
    }

    /// 1-based month (1 = January)
    pub fn month(self) -> u32 {
        (self.0.rem_euclid(12) + 1) as u32
    }

    /// Shift by a signed number of months
    pub fn offset(self, months: i32) -> Self {
        MonthKey(self.0 + months)
    }

    pub fn previous(self) -> Self {
        self.offset(-1)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year(), self.month())
    }
}

/// Sum amounts per key, visiting records in the order given
pub(crate) fn group_totals<K, F>(records: &[&ExpenseRecord], key: F) -> BTreeMap<K, f64>
where
    K: Ord,
    F: Fn(&ExpenseRecord) -> K,
{
    let mut totals = BTreeMap::new();
    for record in records {
        *totals.entry(key(*record)).or_insert(0.0) += record.amount;
    }
    totals
}

pub(crate) fn totals_by_day(records: &[&ExpenseRecord]) -> BTreeMap<NaiveDate, f64> {
    group_totals(records, |r| r.date)
}

pub(crate) fn totals_by_month(records: &[&ExpenseRecord]) -> BTreeMap<MonthKey, f64> {
    group_totals(records, |r| MonthKey::from_date(r.date))
}
