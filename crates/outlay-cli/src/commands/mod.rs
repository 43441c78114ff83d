//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Core commands (init) and shared utilities (open_db)
//! - `serve` - Web server command
//! - `users` - User commands (list, add)
//! - `categories` - Category commands (list, add)
//! - `expenses` - Expense commands (list, add, edit, delete)
//! - `stats` - Spending statistics report

pub mod categories;
pub mod core;
pub mod expenses;
pub mod serve;
pub mod stats;
pub mod users;

// Re-export command functions for main.rs
pub use categories::*;
pub use core::*;
pub use expenses::*;
pub use serve::*;
pub use stats::*;
pub use users::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format an amount as currency with two decimals
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${:.2}", amount)
    }
}
