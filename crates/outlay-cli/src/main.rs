//! Outlay CLI - Expense tracker
//!
//! Usage:
//!   outlay init                   Initialize database
//!   outlay expenses add ...       Record an expense
//!   outlay stats --user 1         Show spending statistics
//!   outlay serve --port 3000      Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use outlay_core::models::{ExpenseUpdate, NewExpense};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Serve {
            port,
            host,
            static_dir,
        } => commands::cmd_serve(&cli.db, &host, port, static_dir.as_deref()).await,
        Commands::Users { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(UsersAction::List) => commands::cmd_users_list(&db),
                Some(UsersAction::Add { name }) => commands::cmd_users_add(&db, &name),
            }
        }
        Commands::Categories { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None | Some(CategoriesAction::List) => commands::cmd_categories_list(&db),
                Some(CategoriesAction::Add { name }) => commands::cmd_categories_add(&db, &name),
            }
        }
        Commands::Expenses { action } => {
            let db = commands::open_db(&cli.db)?;
            match action {
                None => commands::cmd_expenses_list(&db, &Default::default(), 20),
                Some(ExpensesAction::List {
                    user,
                    category,
                    from,
                    to,
                    sort,
                    order,
                    limit,
                }) => {
                    let filter = outlay_core::ExpenseFilter::new()
                        .user_id(user)
                        .category_id(category)
                        .date_range(from, to)
                        .sort(sort, order);
                    commands::cmd_expenses_list(&db, &filter, limit)
                }
                Some(ExpensesAction::Add {
                    user,
                    category,
                    amount,
                    date,
                    description,
                }) => commands::cmd_expenses_add(
                    &db,
                    NewExpense {
                        user_id: user,
                        category_id: category,
                        amount,
                        date: date.unwrap_or_else(commands::today),
                        description,
                    },
                ),
                Some(ExpensesAction::Edit {
                    id,
                    user,
                    category,
                    amount,
                    date,
                    description,
                }) => commands::cmd_expenses_edit(
                    &db,
                    id,
                    ExpenseUpdate {
                        user_id: user,
                        category_id: category,
                        amount,
                        date,
                        description,
                    },
                ),
                Some(ExpensesAction::Delete { id }) => commands::cmd_expenses_delete(&db, id),
            }
        }
        Commands::Stats {
            user,
            date,
            limit,
            snapshot,
            json,
        } => commands::cmd_stats(&cli.db, user, date, limit, snapshot.as_deref(), json),
    }
}
