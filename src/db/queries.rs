// Database queries: reads and writes for profile clusters.
//
// Every database interaction goes through this module. This keeps SQL
// contained in one place and gives the rest of the crate clean Rust interfaces.

use anyhow::{Context, Result};
use rusqlite::{params, Connection};

use crate::profiles::models::UserProfile;
use crate::profiles::store::ProfileStore;

// --- Clusters ---

/// Register a cluster (no-op if it already exists).
pub fn ensure_cluster(conn: &Connection, cluster_id: &str) -> Result<()> {
    conn.execute(
        "INSERT OR IGNORE INTO profile_clusters (cluster_id) VALUES (?1)",
        params![cluster_id],
    )?;
    Ok(())
}

pub fn cluster_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM profile_clusters", [], |row| row.get(0))?;
    Ok(count)
}

// --- Profiles ---

/// Append a profile to its cluster, creating the cluster row if needed.
/// Returns the new profile's row id.
pub fn insert_profile(conn: &Connection, profile: &UserProfile) -> Result<i64> {
    let embedding_json = serde_json::to_string(&profile.embedding)?;
    ensure_cluster(conn, &profile.cluster_id)?;
    conn.execute(
        "INSERT INTO user_profiles (cluster_id, preferred_tone, embedding_json)
         VALUES (?1, ?2, ?3)",
        params![profile.cluster_id, profile.preferred_tone, embedding_json],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn profile_count(conn: &Connection) -> Result<i64> {
    let count = conn.query_row("SELECT COUNT(*) FROM user_profiles", [], |row| row.get(0))?;
    Ok(count)
}

/// Write every cluster and profile of a store in one transaction.
///
/// Each cluster in the store replaces whatever the database held for it, so
/// saving the same store twice leaves one copy. Clusters the store doesn't
/// know about are left alone. Profiles keep their per-cluster order.
pub fn save_store(conn: &Connection, store: &ProfileStore) -> Result<()> {
    let tx = conn.unchecked_transaction()?;
    for cluster_id in store.cluster_ids() {
        ensure_cluster(&tx, cluster_id)?;
        tx.execute(
            "DELETE FROM user_profiles WHERE cluster_id = ?1",
            params![cluster_id],
        )?;
        for profile in store.cluster(cluster_id).unwrap_or_default() {
            insert_profile(&tx, profile)?;
        }
    }
    tx.commit()?;
    Ok(())
}

/// Read the whole profile database into a store snapshot.
///
/// Profiles come back in row id order, so each cluster's stored order is the
/// order the profiles were inserted in. Clusters without profiles are kept.
pub fn load_store(conn: &Connection) -> Result<ProfileStore> {
    let mut store = ProfileStore::new();

    let mut stmt = conn.prepare("SELECT cluster_id FROM profile_clusters ORDER BY cluster_id")?;
    let clusters = stmt.query_map([], |row| row.get::<_, String>(0))?;
    for cluster_id in clusters {
        store.ensure_cluster(&cluster_id?);
    }

    let mut stmt = conn.prepare(
        "SELECT id, cluster_id, preferred_tone, embedding_json
         FROM user_profiles
         ORDER BY id",
    )?;
    let rows = stmt.query_map([], |row| {
        Ok((
            row.get::<_, i64>(0)?,
            row.get::<_, String>(1)?,
            row.get::<_, String>(2)?,
            row.get::<_, String>(3)?,
        ))
    })?;

    for row in rows {
        let (id, cluster_id, preferred_tone, embedding_json) = row?;
        let embedding: Vec<f64> = serde_json::from_str(&embedding_json)
            .with_context(|| format!("Corrupt embedding for profile {id}"))?;
        store.insert(UserProfile {
            cluster_id,
            preferred_tone,
            embedding,
        });
    }

    Ok(store)
}
