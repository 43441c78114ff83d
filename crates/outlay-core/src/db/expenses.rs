//! Expense operations

use rusqlite::{params, OptionalExtension, Row};
use tracing::debug;

use super::{constraint_error, parse_datetime, Database, ExpenseFilter};
use crate::error::{Error, Result};
use crate::models::{parse_record_date, Expense, ExpenseUpdate, NewExpense};

const EXPENSE_SELECT: &str = "SELECT e.id, e.user_id, u.name, e.category_id, c.name, \
     e.amount, e.date, e.description, e.created_at \
     FROM expenses e \
     LEFT JOIN users u ON e.user_id = u.id \
     LEFT JOIN categories c ON e.category_id = c.id";

/// Row as stored; the date is parsed after the query so a bad value can be
/// reported against its expense id
struct ExpenseRow {
    id: i64,
    user_id: i64,
    user_name: Option<String>,
    category_id: i64,
    category_name: Option<String>,
    amount: f64,
    date: String,
    description: Option<String>,
    created_at: String,
}

impl ExpenseRow {
    fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
        Ok(Self {
            id: row.get(0)?,
            user_id: row.get(1)?,
            user_name: row.get(2)?,
            category_id: row.get(3)?,
            category_name: row.get(4)?,
            amount: row.get(5)?,
            date: row.get(6)?,
            description: row.get(7)?,
            created_at: row.get(8)?,
        })
    }

    fn into_expense(self) -> Result<Expense> {
        let date = parse_record_date(&self.date).ok_or_else(|| {
            Error::malformed(self.id, format!("unparseable date '{}'", self.date))
        })?;

        Ok(Expense {
            id: self.id,
            user_id: self.user_id,
            user_name: self.user_name,
            category_id: self.category_id,
            category_name: self.category_name,
            amount: self.amount,
            date,
            description: self.description,
            created_at: parse_datetime(&self.created_at),
        })
    }
}

/// Blank descriptions are stored as NULL
fn stored_description(description: Option<&str>) -> Option<String> {
    description
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .map(str::to_string)
}

impl Database {
    /// Insert an expense and return its ID
    ///
    /// Unknown user or category ids surface as `InvalidData`.
    pub fn insert_expense(&self, expense: &NewExpense) -> Result<i64> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO expenses (user_id, category_id, amount, date, description) \
             VALUES (?, ?, ?, ?, ?)",
            params![
                expense.user_id,
                expense.category_id,
                expense.amount,
                expense.date.to_string(),
                stored_description(expense.description.as_deref()),
            ],
        )
        .map_err(|e| constraint_error(e, "Invalid expense"))?;

        let id = conn.last_insert_rowid();
        debug!(id, user_id = expense.user_id, "Inserted expense");
        Ok(id)
    }

    /// Get an expense by ID
    pub fn get_expense(&self, id: i64) -> Result<Option<Expense>> {
        let conn = self.conn()?;
        let row = conn
            .query_row(
                &format!("{} WHERE e.id = ?", EXPENSE_SELECT),
                params![id],
                ExpenseRow::from_row,
            )
            .optional()?;

        row.map(ExpenseRow::into_expense).transpose()
    }

    /// List expenses matching a filter
    pub fn list_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>> {
        let built = filter.build();
        let sql = format!(
            "{} {} {} {}",
            EXPENSE_SELECT, built.where_clause, built.order_clause, built.limit_clause
        );

        let conn = self.conn()?;
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(built.params_refs().as_slice(), ExpenseRow::from_row)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        rows.into_iter().map(ExpenseRow::into_expense).collect()
    }

    /// Apply a partial update and return the updated expense
    pub fn update_expense(&self, id: i64, update: &ExpenseUpdate) -> Result<Expense> {
        let mut sets: Vec<&str> = Vec::new();
        let mut values: Vec<Box<dyn rusqlite::ToSql>> = Vec::new();

        if let Some(user_id) = update.user_id {
            sets.push("user_id = ?");
            values.push(Box::new(user_id));
        }
        if let Some(category_id) = update.category_id {
            sets.push("category_id = ?");
            values.push(Box::new(category_id));
        }
        if let Some(amount) = update.amount {
            sets.push("amount = ?");
            values.push(Box::new(amount));
        }
        if let Some(date) = update.date {
            sets.push("date = ?");
            values.push(Box::new(date.to_string()));
        }
        if let Some(ref description) = update.description {
            sets.push("description = ?");
            values.push(Box::new(stored_description(Some(description))));
        }

        if !sets.is_empty() {
            values.push(Box::new(id));
            let sql = format!("UPDATE expenses SET {} WHERE id = ?", sets.join(", "));
            let refs: Vec<&dyn rusqlite::ToSql> = values.iter().map(|v| v.as_ref()).collect();

            let conn = self.conn()?;
            let changed = conn
                .execute(&sql, refs.as_slice())
                .map_err(|e| constraint_error(e, "Invalid expense update"))?;
            if changed == 0 {
                return Err(Error::NotFound(format!("Expense {}", id)));
            }
            debug!(id, fields = sets.len(), "Updated expense");
        }

        self.get_expense(id)?
            .ok_or_else(|| Error::NotFound(format!("Expense {}", id)))
    }

    /// Delete an expense
    pub fn delete_expense(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM expenses WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("Expense {}", id)));
        }
        debug!(id, "Deleted expense");
        Ok(())
    }
}
