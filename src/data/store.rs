//! JSON key-value store: one pretty-printed JSON file per key under a data
//! root. The durable analog of the localStorage slice the companion app owns.
//!
//! Two store instances pointed at the same root race like two browser tabs on
//! one localStorage: last save wins, no merge, no versioning. Known
//! limitation.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Serialize;

/// Mutator records, as an array.
pub const MUTATORS_KEY: &str = "lorMutators";
/// Tag name -> champion recommendation lists.
pub const TAGS_KEY: &str = "lorTags";
/// Sheet name -> generic row arrays (roster, monthly data, export projections).
pub const COMPANION_KEY: &str = "lorCompanionData";
/// Monthly-challenge commit records, as an array.
pub const COMMITS_KEY: &str = "monthlyCommits";

pub const DEFAULT_DATA_DIR: &str = "data/companion";

/// Store root from LOREKEEPER_DATA_DIR, falling back to the default.
pub fn data_dir_from_env() -> PathBuf {
    std::env::var("LOREKEEPER_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_DATA_DIR))
}

#[derive(Debug, Clone)]
pub struct JsonStore {
    root: PathBuf,
}

impl JsonStore {
    pub fn new(root: impl Into<PathBuf>) -> JsonStore {
        JsonStore { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn key_path(&self, key: &str) -> PathBuf {
        self.root.join(format!("{key}.json"))
    }

    /// Load and decode a key. Absent, unreadable, or malformed content all
    /// yield None; decode failures are logged but never surfaced to callers.
    pub fn load<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let path = self.key_path(key);
        if !path.exists() {
            return None;
        }
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) => {
                eprintln!("failed to read {key}: {err}");
                return None;
            }
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Some(value),
            Err(err) => {
                eprintln!("malformed JSON under {key}: {err}");
                None
            }
        }
    }

    /// Serialize and overwrite a key unconditionally. A failed write is
    /// logged and swallowed: the change simply did not persist.
    pub fn save<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(err) = self.try_save(key, value) {
            eprintln!("failed to persist {key}: {err}");
        }
    }

    fn try_save<T: Serialize>(&self, key: &str, value: &T) -> std::io::Result<()> {
        fs::create_dir_all(&self.root)?;
        let serialized = serde_json::to_string_pretty(value).map_err(std::io::Error::other)?;
        fs::write(self.key_path(key), serialized)
    }

    /// Delete the backing file if present.
    pub fn remove(&self, key: &str) {
        let path = self.key_path(key);
        if path.exists() {
            if let Err(err) = fs::remove_file(&path) {
                eprintln!("failed to remove {key}: {err}");
            }
        }
    }
}
