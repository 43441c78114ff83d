//! User operations

use rusqlite::{params, OptionalExtension};

use super::{constraint_error, parse_datetime, Database};
use crate::error::{Error, Result};
use crate::models::User;

impl Database {
    /// Create a user; names are unique
    pub fn create_user(&self, name: &str) -> Result<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(Error::InvalidData("User name cannot be empty".to_string()));
        }

        let conn = self.conn()?;
        conn.execute("INSERT INTO users (name) VALUES (?)", params![name])
            .map_err(|e| constraint_error(e, &format!("User '{}'", name)))?;
        let id = conn.last_insert_rowid();

        self.get_user(id)?
            .ok_or_else(|| Error::NotFound(format!("User {}", id)))
    }

    /// List all users by name
    pub fn list_users(&self) -> Result<Vec<User>> {
        let conn = self.conn()?;
        let mut stmt = conn.prepare("SELECT id, name, created_at FROM users ORDER BY name")?;

        let users = stmt
            .query_map([], |row| {
                let created_at: String = row.get(2)?;
                Ok(User {
                    id: row.get(0)?,
                    name: row.get(1)?,
                    created_at: parse_datetime(&created_at),
                })
            })?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(users)
    }

    /// Get a user by ID
    pub fn get_user(&self, id: i64) -> Result<Option<User>> {
        let conn = self.conn()?;
        let user = conn
            .query_row(
                "SELECT id, name, created_at FROM users WHERE id = ?",
                params![id],
                |row| {
                    let created_at: String = row.get(2)?;
                    Ok(User {
                        id: row.get(0)?,
                        name: row.get(1)?,
                        created_at: parse_datetime(&created_at),
                    })
                },
            )
            .optional()?;

        Ok(user)
    }
}
