// Database schema: table creation.
//
// A `schema_version` table records which schema revision a database file
// was created with, so later revisions can migrate forward.

use anyhow::{Context, Result};
use rusqlite::Connection;

/// Create all tables if they don't exist yet.
///
/// Idempotent, safe to call on every startup.
pub fn create_tables(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Clusters are stored separately so an empty cluster survives a round trip
        CREATE TABLE IF NOT EXISTS profile_clusters (
            cluster_id TEXT PRIMARY KEY,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        -- Row id order is the cluster's stored order (the matcher's tie-break)
        CREATE TABLE IF NOT EXISTS user_profiles (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            cluster_id TEXT NOT NULL REFERENCES profile_clusters(cluster_id),
            preferred_tone TEXT NOT NULL,
            embedding_json TEXT NOT NULL,      -- JSON array of f64
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        );

        CREATE INDEX IF NOT EXISTS idx_profiles_cluster
            ON user_profiles(cluster_id, id);
        ",
    )
    .context("Failed to create database tables")?;

    conn.execute(
        "INSERT OR IGNORE INTO schema_version (version) VALUES (?1)",
        [1],
    )?;

    Ok(())
}
