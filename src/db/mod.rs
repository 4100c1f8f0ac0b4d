// Database layer: SQLite storage for clustered user profiles.
//
// The profile builder writes clusters and profiles here; the matcher side
// reads them back into a `ProfileStore` snapshot. We use rusqlite with the
// "bundled" feature so there's no system SQLite dependency.

pub mod queries;
pub mod schema;

use anyhow::{Context, Result};
use rusqlite::Connection;
use std::path::Path;

/// Open (or create) the database and create its tables.
pub fn initialize(db_path: &Path) -> Result<Connection> {
    // Create parent directories if needed
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent).with_context(|| {
                format!(
                    "Failed to create directory for database: {}",
                    db_path.display()
                )
            })?;
        }
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    schema::create_tables(&conn)?;

    Ok(conn)
}

/// Open an existing database (fails if it doesn't exist yet).
pub fn open(db_path: &Path) -> Result<Connection> {
    if !db_path.exists() {
        anyhow::bail!(
            "Profile database not found at {}. Populate it with db::initialize first, \
             or set PERSONALIZER_PROFILES_PATH to a JSON profile file.",
            db_path.display()
        );
    }

    let conn = Connection::open(db_path)
        .with_context(|| format!("Failed to open database at {}", db_path.display()))?;

    conn.pragma_update(None, "journal_mode", "WAL")?;

    Ok(conn)
}
