//! Spending statistics command

use std::path::Path;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use outlay_core::{statistics_for_user, RecordSnapshot, StatisticsReport};
use outlay_server::MAX_TOP_DAYS_LIMIT;

use super::{format_currency, open_db, today};

/// Render a percentage change with one decimal and an explicit sign
pub fn format_percent(change: f64) -> String {
    format!("{:+.1}%", change)
}

/// Build the statistics report from the database or, when given, a JSON
/// snapshot file of raw records
pub fn load_report(
    db_path: &Path,
    user_id: i64,
    date: Option<NaiveDate>,
    limit: usize,
    snapshot: Option<&Path>,
) -> Result<StatisticsReport> {
    let reference = date.unwrap_or_else(today);
    let limit = limit.clamp(1, MAX_TOP_DAYS_LIMIT as usize);

    let report = match snapshot {
        Some(path) => {
            let snapshot = RecordSnapshot::from_json_file(path)
                .with_context(|| format!("Failed to load snapshot {}", path.display()))?;
            statistics_for_user(&snapshot, user_id, reference, limit)?
        }
        None => {
            let db = open_db(db_path)?;
            statistics_for_user(&db, user_id, reference, limit)?
        }
    };

    Ok(report)
}

pub fn cmd_stats(
    db_path: &Path,
    user_id: i64,
    date: Option<NaiveDate>,
    limit: usize,
    snapshot: Option<&Path>,
    json: bool,
) -> Result<()> {
    let report = load_report(db_path, user_id, date, limit, snapshot)?;

    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", render_report(&report));
    }

    Ok(())
}

/// Human-readable report text
pub fn render_report(report: &StatisticsReport) -> String {
    let mut out = String::new();
    let mut line = |s: String| {
        out.push_str(&s);
        out.push('\n');
    };

    line(String::new());
    line(format!(
        "📊 Spending statistics (as of {})",
        report.reference_date
    ));
    line("   ─────────────────────────────────────────".to_string());

    line(String::new());
    line("🔥 Top spending days".to_string());
    if let Some(message) = &report.top_days.message {
        line(format!("   {}", message));
    }
    for (rank, day) in report.top_days.data.iter().enumerate() {
        line(format!(
            "   {}. {} │ {:>10}",
            rank + 1,
            day.date,
            format_currency(day.total_amount)
        ));
    }

    let change = &report.month_over_month;
    line(String::new());
    line("📅 Month over month".to_string());
    line(format!(
        "   {:04}-{:02}: {}",
        change.current_month.year,
        change.current_month.month,
        format_currency(change.current_total)
    ));
    line(format!(
        "   {:04}-{:02}: {}",
        change.previous_month.year,
        change.previous_month.month,
        format_currency(change.previous_total)
    ));
    match change.percentage_change {
        Some(pct) => line(format!("   Change: {}", format_percent(pct))),
        None => {
            if let Some(message) = &change.message {
                line(format!("   {}", message));
            }
        }
    }

    let prediction = &report.prediction;
    line(String::new());
    line("🔮 Next month prediction".to_string());
    match prediction.predicted_amount {
        Some(amount) => line(format!(
            "   {} (confidence: {}, {} month{} analyzed)",
            format_currency(amount),
            prediction.confidence,
            prediction.months_analyzed,
            if prediction.months_analyzed == 1 { "" } else { "s" }
        )),
        None => {
            if let Some(message) = &prediction.message {
                line(format!("   {}", message));
            }
        }
    }
    if let Some(note) = &prediction.note {
        line(format!("   ⚠️  {}", note));
    }
    line(format!("   {}", prediction.confidence.description()));

    out
}
