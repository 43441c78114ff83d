//! Error types for Outlay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("Database error: {0}")]
    Database(#[from] rusqlite::Error),

    #[error("Database pool error: {0}")]
    Pool(#[from] r2d2::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid data: {0}")]
    InvalidData(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("{0} already exists")]
    Conflict(String),

    /// A record that cannot be aggregated (unparseable date, non-finite amount)
    #[error("Malformed expense record {id}: {reason}")]
    MalformedRecord { id: i64, reason: String },

    /// A snapshot that mixes records from more than one user
    #[error("Records belong to more than one user (expected user {expected}, found user {found})")]
    InvalidUserScope { expected: i64, found: i64 },
}

impl Error {
    pub(crate) fn malformed(id: i64, reason: impl Into<String>) -> Self {
        Self::MalformedRecord {
            id,
            reason: reason.into(),
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
