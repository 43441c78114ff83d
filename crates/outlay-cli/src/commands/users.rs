//! User command implementations

use anyhow::Result;
use outlay_core::db::Database;

pub fn cmd_users_list(db: &Database) -> Result<()> {
    let users = db.list_users()?;

    if users.is_empty() {
        println!("No users yet. Add one with:");
        println!("  outlay users add <name>");
        return Ok(());
    }

    println!();
    println!("👤 Users");
    println!("   ─────────────────────────────");
    for user in users {
        println!("   [{}] {}", user.id, user.name);
    }

    Ok(())
}

pub fn cmd_users_add(db: &Database, name: &str) -> Result<()> {
    let user = db.create_user(name)?;
    println!("✅ Added user [{}] {}", user.id, user.name);
    Ok(())
}
