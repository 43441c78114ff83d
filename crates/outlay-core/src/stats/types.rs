//! Result types produced by the statistics engine

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::period::MonthKey;

/// Number of days returned by a top-days query when no limit is given
pub const DEFAULT_TOP_DAYS_LIMIT: usize = 3;

/// Number of complete months averaged by the prediction
pub const PREDICTION_WINDOW_MONTHS: i32 = 3;

pub const NO_SPENDING_DATA_MESSAGE: &str = "No spending data available for this user";
pub const INSUFFICIENT_CHANGE_MESSAGE: &str =
    "Insufficient data to calculate month-over-month change";
pub const NO_PREDICTION_MESSAGE: &str = "Not enough data to generate prediction";
pub const SINGLE_MONTH_NOTE: &str = "Prediction based on only 1 month of data";

/// Total spending on one calendar day
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyTotal {
    pub date: NaiveDate,
    pub total_amount: f64,
}

/// Total spending in one calendar month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyTotal {
    pub year: i32,
    pub month: u32,
    pub total_amount: f64,
}

impl MonthlyTotal {
    pub(crate) fn new(key: MonthKey, total_amount: f64) -> Self {
        Self {
            year: key.year(),
            month: key.month(),
            total_amount,
        }
    }
}

/// A calendar month reference
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MonthRef {
    pub year: i32,
    pub month: u32,
}

impl From<MonthKey> for MonthRef {
    fn from(key: MonthKey) -> Self {
        Self {
            year: key.year(),
            month: key.month(),
        }
    }
}

/// Top spending days, with a "no data" message when empty
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TopSpendingDays {
    pub data: Vec<DailyTotal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl From<Vec<DailyTotal>> for TopSpendingDays {
    fn from(data: Vec<DailyTotal>) -> Self {
        let message = data
            .is_empty()
            .then(|| NO_SPENDING_DATA_MESSAGE.to_string());
        Self { data, message }
    }
}

/// Spending in the reference month compared with the month before it
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthOverMonthChange {
    pub current_month: MonthRef,
    pub previous_month: MonthRef,
    pub current_total: f64,
    pub previous_total: f64,
    /// `None` when the previous month has no spending (ratio undefined)
    pub percentage_change: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// How many complete months backed a prediction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    None,
    Low,
    Medium,
    High,
}

impl Confidence {
    pub fn from_months_analyzed(months: usize) -> Self {
        match months {
            0 => Confidence::None,
            1 => Confidence::Low,
            2 => Confidence::Medium,
            _ => Confidence::High,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Confidence::None => "none",
            Confidence::Low => "low",
            Confidence::Medium => "medium",
            Confidence::High => "high",
        }
    }

    /// Human-readable explanation shown next to the label
    pub fn description(&self) -> &'static str {
        match self {
            Confidence::None => "Not enough historical data to generate a reliable prediction.",
            Confidence::Low => "Based on only 1 month of data; may not be accurate.",
            Confidence::Medium => "Based on 2 months of data; trends are starting to form.",
            Confidence::High => "Based on a solid 3-month spending history.",
        }
    }
}

impl fmt::Display for Confidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Confidence {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "none" => Ok(Confidence::None),
            "low" => Ok(Confidence::Low),
            "medium" => Ok(Confidence::Medium),
            "high" => Ok(Confidence::High),
            _ => Err(format!("Unknown confidence: {}", s)),
        }
    }
}

/// Next-month spending estimate: the unweighted mean of up to three
/// complete months preceding the reference month.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    /// `None` when no prior month has data
    pub predicted_amount: Option<f64>,
    pub confidence: Confidence,
    pub months_analyzed: usize,
    /// Monthly totals that were averaged, oldest first
    pub basis: Vec<MonthlyTotal>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

/// Every statistic for one user and reference date
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatisticsReport {
    pub user_id: Option<i64>,
    pub reference_date: NaiveDate,
    pub top_days: TopSpendingDays,
    pub month_over_month: MonthOverMonthChange,
    pub prediction: Prediction,
    /// Daily totals, oldest first
    pub daily: Vec<DailyTotal>,
}
