//! Server command implementation

use std::path::Path;

use anyhow::{Context, Result};
use outlay_server::{ServerConfig, ALLOWED_ORIGINS_ENV};

use super::open_db;

pub async fn cmd_serve(
    db_path: &Path,
    host: &str,
    port: u16,
    static_dir: Option<&Path>,
) -> Result<()> {
    println!("🚀 Starting Outlay web server...");
    println!("   Database: {}", db_path.display());
    println!("   Listening: http://{}:{}", host, port);
    if let Some(dir) = static_dir {
        println!("   Static files: {}", dir.display());
    }

    let config = ServerConfig::from_env();
    if config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    } else {
        println!("   🌐 CORS origins: {}", config.allowed_origins.join(", "));
    }

    let db = open_db(db_path)?;
    db.seed_default_categories()
        .context("Failed to seed default categories")?;

    let static_dir = static_dir.map(|d| d.to_string_lossy().into_owned());
    outlay_server::serve_with_config(db, host, port, static_dir.as_deref(), config).await
}
