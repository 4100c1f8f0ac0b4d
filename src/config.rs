use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};

/// Number of ranked profiles returned when nothing else is configured.
pub const DEFAULT_TOP_K: usize = 3;

/// Central configuration loaded from environment variables.
///
/// Callers that keep settings in a `.env` file should call `load_dotenv()`
/// before `Config::load()`.
#[derive(Debug, Clone)]
pub struct Config {
    /// SQLite profile database (PERSONALIZER_DB_PATH)
    pub db_path: PathBuf,
    /// JSON profile file (PERSONALIZER_PROFILES_PATH). When set, it is used
    /// instead of the database.
    pub profiles_path: Option<PathBuf>,
    /// How many ranked profiles `PersonalizationEngine::candidates` returns (PERSONALIZER_TOP_K)
    pub top_k: usize,
}

impl Config {
    /// Load configuration from environment variables.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build a configuration from an arbitrary variable lookup.
    ///
    /// `load()` passes the process environment; tests pass a map.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let top_k = match lookup("PERSONALIZER_TOP_K") {
            Some(raw) => {
                let k: usize = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("PERSONALIZER_TOP_K is not a number: {raw:?}"))?;
                if k == 0 {
                    anyhow::bail!("PERSONALIZER_TOP_K must be at least 1");
                }
                k
            }
            None => DEFAULT_TOP_K,
        };

        Ok(Self {
            db_path: lookup("PERSONALIZER_DB_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(default_db_path),
            profiles_path: lookup("PERSONALIZER_PROFILES_PATH")
                .filter(|p| !p.is_empty())
                .map(PathBuf::from),
            top_k,
        })
    }

    /// Check that a JSON profile file is configured.
    pub fn require_profiles_file(&self) -> Result<()> {
        if self.profiles_path.is_none() {
            anyhow::bail!(
                "PERSONALIZER_PROFILES_PATH not set. Point it at a JSON profile file,\n\
                 or build with the `sqlite` feature and use PERSONALIZER_DB_PATH."
            );
        }
        Ok(())
    }
}

/// Load a `.env` file if present (silently ignore if missing).
pub fn load_dotenv() {
    let _ = dotenvy::dotenv();
}

/// Returns the default profile database location.
/// Uses the platform data directory: ~/.local/share/personalizer/ on Linux.
pub fn default_db_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("personalizer")
        .join("profiles.db")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn config_from(vars: &[(&str, &str)]) -> Result<Config> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Config::from_lookup(|key| map.get(key).cloned())
    }

    #[test]
    fn test_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.top_k, DEFAULT_TOP_K);
        assert!(config.profiles_path.is_none());
        assert_eq!(config.db_path, default_db_path());
        assert!(config.require_profiles_file().is_err());
    }

    #[test]
    fn test_overrides() {
        let config = config_from(&[
            ("PERSONALIZER_DB_PATH", "/tmp/p.db"),
            ("PERSONALIZER_PROFILES_PATH", "/tmp/profiles.json"),
            ("PERSONALIZER_TOP_K", " 5 "),
        ])
        .unwrap();
        assert_eq!(config.db_path, PathBuf::from("/tmp/p.db"));
        assert_eq!(config.profiles_path, Some(PathBuf::from("/tmp/profiles.json")));
        assert_eq!(config.top_k, 5);
        assert!(config.require_profiles_file().is_ok());
    }

    #[test]
    fn test_empty_profiles_path_is_unset() {
        let config = config_from(&[("PERSONALIZER_PROFILES_PATH", "")]).unwrap();
        assert!(config.profiles_path.is_none());
    }

    #[test]
    fn test_bad_top_k() {
        assert!(config_from(&[("PERSONALIZER_TOP_K", "many")]).is_err());
        assert!(config_from(&[("PERSONALIZER_TOP_K", "0")]).is_err());
    }
}
