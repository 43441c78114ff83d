//! Expense command implementations

use anyhow::{bail, Result};
use outlay_core::db::{Database, ExpenseFilter};
use outlay_core::models::{ExpenseUpdate, FieldError, NewExpense};

use super::{format_currency, latest_expense_date, truncate};

/// Turn field validation failures into one readable error
fn validation_error(errors: Vec<FieldError>) -> anyhow::Error {
    let details: Vec<String> = errors
        .iter()
        .map(|e| format!("{}: {}", e.field, e.message))
        .collect();
    anyhow::anyhow!("Invalid expense ({})", details.join("; "))
}

pub fn cmd_expenses_list(db: &Database, filter: &ExpenseFilter, limit: usize) -> Result<()> {
    let filter = filter.clone().limit(Some(limit));
    let expenses = db.list_expenses(&filter)?;

    if expenses.is_empty() {
        println!("No expenses found. Record one with:");
        println!("  outlay expenses add --user 1 --category 1 --amount 12.50");
        return Ok(());
    }

    println!();
    println!("📝 Expenses");
    println!("   ─────────────────────────────────────────────────────────────");

    for expense in expenses {
        println!(
            "   [{}] {} │ {:>10} │ {:<10} │ {:<12} │ {}",
            expense.id,
            expense.date,
            format_currency(expense.amount),
            truncate(expense.user_name.as_deref().unwrap_or("?"), 10),
            truncate(expense.category_name.as_deref().unwrap_or("?"), 12),
            truncate(expense.description.as_deref().unwrap_or(""), 30)
        );
    }

    Ok(())
}

pub fn cmd_expenses_add(db: &Database, expense: NewExpense) -> Result<()> {
    expense.validate(latest_expense_date()).map_err(validation_error)?;

    let id = db.insert_expense(&expense)?;
    println!(
        "✅ Recorded expense [{}] {} on {}",
        id,
        format_currency(expense.amount),
        expense.date
    );
    Ok(())
}

pub fn cmd_expenses_edit(db: &Database, id: i64, update: ExpenseUpdate) -> Result<()> {
    if update.is_empty() {
        bail!("Nothing to change. Pass at least one of --user, --category, --amount, --date, --description");
    }
    update.validate(latest_expense_date()).map_err(validation_error)?;

    let expense = db.update_expense(id, &update)?;
    println!(
        "✅ Updated expense [{}] {} on {}",
        expense.id,
        format_currency(expense.amount),
        expense.date
    );
    Ok(())
}

pub fn cmd_expenses_delete(db: &Database, id: i64) -> Result<()> {
    db.delete_expense(id)?;
    println!("🗑️  Deleted expense [{}]", id);
    Ok(())
}
