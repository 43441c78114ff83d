//! Per-user record snapshots for the statistics engine

use rusqlite::params;

use super::Database;
use crate::error::Result;
use crate::models::{ExpenseRecord, RawExpenseRecord};

impl Database {
    /// All expense records belonging to one user
    ///
    /// A stored date that cannot be parsed fails the whole fetch with
    /// `MalformedRecord` naming the offending expense.
    pub fn fetch_records_for_user(&self, user_id: i64) -> Result<Vec<ExpenseRecord>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare(
            "SELECT id, user_id, category_id, amount, date, description \
             FROM expenses WHERE user_id = ? ORDER BY date, id",
        )?;

        let raw = stmt
            .query_map(params![user_id], |row| {
                Ok(RawExpenseRecord {
                    id: row.get(0)?,
                    user_id: row.get(1)?,
                    category_id: row.get(2)?,
                    amount: row.get(3)?,
                    date: row.get(4)?,
                    description: row.get(5)?,
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        raw.into_iter().map(ExpenseRecord::try_from).collect()
    }
}
