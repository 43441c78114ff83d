//! Database access layer with connection pooling and migrations
//!
//! This module is organized by domain:
//! - `users` - People whose spending is tracked
//! - `categories` - Expense categories and the default set
//! - `expenses` - Expense CRUD and filtered listings
//! - `records` - Per-user record snapshots for the statistics engine

use chrono::{DateTime, Utc};
use r2d2::{Pool, PooledConnection};
use r2d2_sqlite::SqliteConnectionManager;
use tracing::{debug, info};

use crate::error::{Error, Result};

mod categories;
mod expense_filter;
mod expenses;
mod records;
mod users;

pub use categories::DEFAULT_CATEGORIES;
pub use expense_filter::{ExpenseFilter, FilterResult};

pub type DbPool = Pool<SqliteConnectionManager>;
pub type DbConn = PooledConnection<SqliteConnectionManager>;

/// Parse a SQLite datetime string into a DateTime<Utc>
pub(crate) fn parse_datetime(s: &str) -> DateTime<Utc> {
    // SQLite stores as "YYYY-MM-DD HH:MM:SS" format
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|dt| dt.and_utc())
        .unwrap_or_else(|_| Utc::now())
}

/// Map constraint failures onto domain errors
///
/// UNIQUE violations become `Conflict` named by `context`; foreign key and CHECK violations
/// become `InvalidData`. Anything else stays a database error.
pub(crate) fn constraint_error(err: rusqlite::Error, context: &str) -> Error {
    if let rusqlite::Error::SqliteFailure(ref failure, ref msg) = err {
        if failure.code == rusqlite::ErrorCode::ConstraintViolation {
            let detail = msg.clone().unwrap_or_else(|| failure.to_string());
            return if failure.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE {
                Error::Conflict(context.to_string())
            } else {
                Error::InvalidData(format!("{}: {}", context, detail))
            };
        }
    }
    Error::Database(err)
}

/// Database wrapper with connection pooling
#[derive(Clone)]
pub struct Database {
    pool: DbPool,
    /// Path to the database file
    db_path: String,
}

impl Database {
    /// Open (or create) the database at `path` and bring the schema up to date
    pub fn new(path: &str) -> Result<Self> {
        // foreign_keys is a per-connection setting, so apply it to every
        // connection the pool hands out
        let manager = SqliteConnectionManager::file(path).with_init(|conn| {
            conn.execute_batch("PRAGMA foreign_keys = ON;")?;
            Ok(())
        });
        let pool = Pool::builder().max_size(10).build(manager)?;

        let db = Self {
            pool,
            db_path: path.to_string(),
        };
        db.run_migrations()?;
        debug!(path, "Database opened");

        Ok(db)
    }

    /// Get the path to the database file
    pub fn path(&self) -> &str {
        &self.db_path
    }

    /// Create a throwaway database (for testing)
    ///
    /// Uses a unique temporary file rather than `:memory:` because every pooled
    /// connection to `:memory:` would see its own empty database.
    pub fn in_memory() -> Result<Self> {
        use std::sync::atomic::{AtomicU64, Ordering};
        static COUNTER: AtomicU64 = AtomicU64::new(0);

        let id = COUNTER.fetch_add(1, Ordering::SeqCst);
        let path = std::env::temp_dir().join(format!(
            "outlay_test_{}_{}.db",
            std::process::id(),
            id
        ));

        // Remove any existing file
        let _ = std::fs::remove_file(&path);

        Self::new(&path.to_string_lossy())
    }

    /// Get a connection from the pool
    pub fn conn(&self) -> Result<DbConn> {
        Ok(self.pool.get()?)
    }

    /// Create tables and indexes if they don't exist
    fn run_migrations(&self) -> Result<()> {
        let conn = self.conn()?;

        conn.execute_batch(
            r#"
            -- WAL mode: readers don't block writers
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;

            CREATE TABLE IF NOT EXISTS users (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE TABLE IF NOT EXISTS categories (
                id INTEGER PRIMARY KEY,
                name TEXT NOT NULL UNIQUE,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            -- Dates are stored as YYYY-MM-DD text, so they sort chronologically
            CREATE TABLE IF NOT EXISTS expenses (
                id INTEGER PRIMARY KEY,
                user_id INTEGER NOT NULL REFERENCES users(id),
                category_id INTEGER NOT NULL REFERENCES categories(id),
                amount REAL NOT NULL CHECK (amount > 0),
                date TEXT NOT NULL,
                description TEXT,
                created_at DATETIME DEFAULT CURRENT_TIMESTAMP
            );

            CREATE INDEX IF NOT EXISTS idx_expenses_user ON expenses(user_id);
            CREATE INDEX IF NOT EXISTS idx_expenses_date ON expenses(date);
            CREATE INDEX IF NOT EXISTS idx_expenses_category ON expenses(category_id);
            "#,
        )?;

        info!("Database migrations complete");
        Ok(())
    }
}

#[cfg(test)]
mod tests;
