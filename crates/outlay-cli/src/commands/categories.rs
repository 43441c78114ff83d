//! Category command implementations

use anyhow::Result;
use outlay_core::db::Database;

pub fn cmd_categories_list(db: &Database) -> Result<()> {
    let categories = db.list_categories()?;

    if categories.is_empty() {
        println!("No categories yet. Create the defaults with:");
        println!("  outlay init");
        return Ok(());
    }

    println!();
    println!("🏷️  Categories");
    println!("   ─────────────────────────────");
    for category in categories {
        println!("   [{}] {}", category.id, category.name);
    }

    Ok(())
}

pub fn cmd_categories_add(db: &Database, name: &str) -> Result<()> {
    let category = db.create_category(name)?;
    println!("✅ Added category [{}] {}", category.id, category.name);
    Ok(())
}
