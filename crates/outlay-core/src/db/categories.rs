//! Category operations

use rusqlite::{params, OptionalExtension};
use tracing::info;

use super::{constraint_error, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::Category;

/// Categories created by `seed_default_categories`
pub const DEFAULT_CATEGORIES: &[&str] = &[
    "Food",
    "Transport",
    "Shopping",
    "Bills",
    "Entertainment",
    "Health",
    "Other",
];

impl Database {
    /// Create a category; names are unique
    pub fn create_category(&self, name: &str) -> Result<Category> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData(
                "Category name cannot be empty".to_string(),
            ));
        }

        let conn = self.conn()?;
        conn.execute("INSERT INTO categories (name) VALUES (?)", params![name])
            .map_err(|e| constraint_error(e, &format!("Category '{}'", name)))?;
        let id = conn.last_insert_rowid();

        self.get_category(id)?
            .ok_or_else(|| Error::NotFound(format!("Category {}", id)))
    }

    /// Insert any missing default categories; returns how many were added
    pub fn seed_default_categories(&self) -> Result<usize> {
        let conn = self.conn()?;
        let mut added = 0;
        for name in DEFAULT_CATEGORIES {
            added += conn.execute(
                "INSERT OR IGNORE INTO categories (name) VALUES (?)",
                params![name],
            )?;
        }

        if added > 0 {
            info!(added, "Seeded default categories");
        }
        Ok(added)
    }

    /// List all categories by name
    pub fn list_categories(&self) -> Result<Vec<Category>> {
        let conn = self.conn()?;
        let mut stmt =
            conn.prepare("SELECT id, name, created_at FROM categories ORDER BY name")?;

        let categories = stmt
            .query_map([], |row| {
                let created_at: String = row.get(2)?;
                Ok(Category {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(categories)
    }

    /// Get a category by ID
    pub fn get_category(&self, id: i64) -> Result<Option<Category>> {
        let conn = self.conn()?;
        let category = conn
            .query_row(
                "SELECT id, name, created_at FROM categories WHERE id = ?",
                params![id],
                |row| {
                    let created_at: String = row.get(2)?;
                    Ok(Category {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: parse_datetime(&created_at),
                    })
                },
            )
            .optional()?;

        Ok(category)
    }
}
