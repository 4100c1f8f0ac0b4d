// ProfileStore: the caller-owned snapshot of clustered user profiles.
//
// The store is populated once (from JSON or from the profile database) and
// then only read. Each cluster keeps its profiles in insertion order, which
// is the order the matcher uses to break ties.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use tracing::info;

use super::models::UserProfile;
use crate::config::Config;

#[derive(Debug, Clone, Default)]
pub struct ProfileStore {
    clusters: HashMap<String, Vec<UserProfile>>,
}

/// On-disk JSON shapes we accept.
///
/// Either a flat list of profiles, or the cluster map the profile builder
/// emits (`{"cluster": [profile, ...]}`). In the map form the key wins over
/// any `cluster_id` inside the entry.
#[derive(Deserialize)]
#[serde(untagged)]
enum ProfileFile {
    List(Vec<UserProfile>),
    Clusters(HashMap<String, Vec<ClusterEntry>>),
}

#[derive(Deserialize)]
struct ClusterEntry {
    preferred_tone: String,
    embedding: Vec<f64>,
}

impl ProfileStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_profiles(profiles: impl IntoIterator<Item = UserProfile>) -> Self {
        let mut store = Self::new();
        for profile in profiles {
            store.insert(profile);
        }
        store
    }

    /// Append a profile to its cluster, creating the cluster if needed.
    pub fn insert(&mut self, profile: UserProfile) {
        self.clusters
            .entry(profile.cluster_id.clone())
            .or_default()
            .push(profile);
    }

    /// Register a cluster with no profiles yet. No-op if it already exists.
    pub fn ensure_cluster(&mut self, cluster_id: &str) {
        if !self.clusters.contains_key(cluster_id) {
            self.clusters.insert(cluster_id.to_string(), Vec::new());
        }
    }

    /// Profiles of a cluster in stored order, or `None` if the cluster is unknown.
    pub fn cluster(&self, cluster_id: &str) -> Option<&[UserProfile]> {
        self.clusters.get(cluster_id).map(Vec::as_slice)
    }

    /// All cluster ids, sorted.
    pub fn cluster_ids(&self) -> Vec<&str> {
        let mut ids: Vec<&str> = self.clusters.keys().map(String::as_str).collect();
        ids.sort_unstable();
        ids
    }

    pub fn cluster_count(&self) -> usize {
        self.clusters.len()
    }

    /// Total number of profiles across all clusters.
    pub fn len(&self) -> usize {
        self.clusters.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Parse a store from JSON text (see `ProfileFile` for accepted shapes).
    pub fn from_json(json: &str) -> Result<Self> {
        let file: ProfileFile =
            serde_json::from_str(json).context("Failed to parse profile JSON")?;

        let store = match file {
            ProfileFile::List(profiles) => Self::from_profiles(profiles),
            ProfileFile::Clusters(map) => {
                let mut store = Self::new();
                for (cluster_id, entries) in map {
                    store.ensure_cluster(&cluster_id);
                    for entry in entries {
                        store.insert(UserProfile::new(
                            cluster_id.as_str(),
                            entry.preferred_tone,
                            entry.embedding,
                        ));
                    }
                }
                store
            }
        };

        Ok(store)
    }

    /// Load a store from a JSON profile file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read profile file {}", path.display()))?;
        let store = Self::from_json(&json)
            .with_context(|| format!("Invalid profile file {}", path.display()))?;

        info!(
            path = %path.display(),
            clusters = store.cluster_count(),
            profiles = store.len(),
            "Loaded profile store from JSON"
        );

        Ok(store)
    }

    /// Load the store the configuration points at.
    ///
    /// A configured JSON profile file takes precedence; otherwise the
    /// profile database is read (requires the `sqlite` feature).
    pub fn load(config: &Config) -> Result<Self> {
        if let Some(path) = &config.profiles_path {
            return Self::load_json(path);
        }

        Self::load_database(config)
    }

    #[cfg(feature = "sqlite")]
    fn load_database(config: &Config) -> Result<Self> {
        let conn = crate::db::open(&config.db_path)?;
        let store = crate::db::queries::load_store(&conn)?;
        info!(
            db = %config.db_path.display(),
            clusters = store.cluster_count(),
            profiles = store.len(),
            "Loaded profile store from database"
        );
        Ok(store)
    }

    #[cfg(not(feature = "sqlite"))]
    fn load_database(config: &Config) -> Result<Self> {
        config.require_profiles_file()?;
        anyhow::bail!("Profile database support requires the `sqlite` feature")
    }
}
