//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use outlay_core::models::{SortField, SortOrder};

/// Outlay - Track expenses and see where the money goes
#[derive(Parser)]
#[command(name = "outlay")]
#[command(about = "Self-hosted expense tracker with spending statistics", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "outlay.db", global = true)]
    pub db: PathBuf,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and default categories
    Init,

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Directory of static files to serve (web UI)
        #[arg(long)]
        static_dir: Option<PathBuf>,
    },

    /// List or add users
    Users {
        #[command(subcommand)]
        action: Option<UsersAction>,
    },

    /// List or add categories
    Categories {
        #[command(subcommand)]
        action: Option<CategoriesAction>,
    },

    /// Manage expenses
    Expenses {
        #[command(subcommand)]
        action: Option<ExpensesAction>,
    },

    /// Show spending statistics for a user
    Stats {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Reference date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Number of top spending days to show
        #[arg(short, long, default_value = "3")]
        limit: usize,

        /// Read records from a JSON file instead of the database
        #[arg(long)]
        snapshot: Option<PathBuf>,

        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
}

#[derive(Subcommand)]
pub enum UsersAction {
    /// List users (default)
    List,
    /// Add a user
    Add {
        /// User name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum CategoriesAction {
    /// List categories (default)
    List,
    /// Add a category
    Add {
        /// Category name
        name: String,
    },
}

#[derive(Subcommand)]
pub enum ExpensesAction {
    /// List expenses
    List {
        /// Filter by user ID
        #[arg(short, long)]
        user: Option<i64>,

        /// Filter by category ID
        #[arg(short, long)]
        category: Option<i64>,

        /// Earliest date (inclusive)
        #[arg(long)]
        from: Option<NaiveDate>,

        /// Latest date (inclusive)
        #[arg(long)]
        to: Option<NaiveDate>,

        /// Sort field: date, amount
        #[arg(long, default_value = "date")]
        sort: SortField,

        /// Sort order: asc, desc
        #[arg(long, default_value = "desc")]
        order: SortOrder,

        /// Number of expenses to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Add an expense
    Add {
        /// User ID
        #[arg(short, long)]
        user: i64,

        /// Category ID
        #[arg(short, long)]
        category: i64,

        /// Amount (positive)
        #[arg(short, long)]
        amount: f64,

        /// Date (YYYY-MM-DD, defaults to today)
        #[arg(long)]
        date: Option<NaiveDate>,

        /// Description
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Edit an expense (only the given fields change)
    Edit {
        /// Expense ID
        id: i64,

        #[arg(short, long)]
        user: Option<i64>,

        #[arg(short, long)]
        category: Option<i64>,

        #[arg(short, long)]
        amount: Option<f64>,

        #[arg(long)]
        date: Option<NaiveDate>,

        /// New description (pass "" to clear it)
        #[arg(short, long)]
        description: Option<String>,
    },

    /// Delete an expense
    Delete {
        /// Expense ID
        id: i64,
    },
}
