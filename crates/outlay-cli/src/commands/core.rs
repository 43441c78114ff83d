//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Shared utility to open the database
//! - `today` - The reference date used when none is given
//! - `latest_expense_date` - Upper bound for expense dates
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use outlay_core::db::Database;

/// Open (creating if needed) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    Database::new(&db_path.to_string_lossy())
        .with_context(|| format!("Failed to open database at {}", db_path.display()))
}

/// Today's date in UTC
pub fn today() -> NaiveDate {
    Utc::now().date_naive()
}

/// Latest date a new or edited expense may carry right now
pub fn latest_expense_date() -> NaiveDate {
    outlay_core::models::latest_expense_date(Utc::now())
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;

    let added = db
        .seed_default_categories()
        .context("Failed to seed default categories")?;
    println!("   Seeded {} default categories", added);

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Add a user: outlay users add <name>");
    println!("  2. Record spending: outlay expenses add --user 1 --category 1 --amount 12.50");
    println!("  3. Start web UI: outlay serve");

    Ok(())
}
