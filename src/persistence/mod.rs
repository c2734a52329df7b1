//! JSON file persistence for preferences and high scores
//!
//! Features:
//! - Data directory from `MATHRISK_DATA_DIR` (default `assets/data`)
//! - Pretty-printed JSON documents
//! - Atomic replace (write `.tmp`, then rename over the target)
//! - Missing or unreadable files degrade to defaults at the call site

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use thiserror::Error;

/// Environment variable overriding the data directory
pub const DATA_DIR_ENV: &str = "MATHRISK_DATA_DIR";
/// Data directory used when the variable is unset
pub const DEFAULT_DATA_DIR: &str = "assets/data";

const HIGH_SCORES_FILE: &str = "high_scores.json";
const USER_PREFS_FILE: &str = "user_prefs.json";

/// Errors reading or writing a JSON document
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("invalid JSON in {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Location of the game's data files
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DataDir {
    root: PathBuf,
}

impl DataDir {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Resolve from `MATHRISK_DATA_DIR`, falling back to `assets/data`
    pub fn from_env() -> Self {
        match std::env::var_os(DATA_DIR_ENV) {
            Some(dir) if !dir.is_empty() => Self::new(dir),
            _ => Self::new(DEFAULT_DATA_DIR),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn high_scores_path(&self) -> PathBuf {
        self.root.join(HIGH_SCORES_FILE)
    }

    pub fn user_prefs_path(&self) -> PathBuf {
        self.root.join(USER_PREFS_FILE)
    }
}

impl Default for DataDir {
    fn default() -> Self {
        Self::new(DEFAULT_DATA_DIR)
    }
}

/// Read a JSON document; a missing file is `Ok(None)`
pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<Option<T>, StoreError> {
    let text = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(StoreError::Io {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    serde_json::from_str(&text)
        .map(Some)
        .map_err(|source| StoreError::Json {
            path: path.to_path_buf(),
            source,
        })
}

/// Read a JSON document, using the default when missing or unreadable
pub fn load_or_default<T: DeserializeOwned + Default>(path: &Path) -> T {
    match load_json(path) {
        Ok(Some(value)) => {
            log::info!("Loaded {}", path.display());
            value
        }
        Ok(None) => {
            log::info!("{} not found, using defaults", path.display());
            T::default()
        }
        Err(e) => {
            log::warn!("{}; using defaults", e);
            T::default()
        }
    }
}

/// Write a JSON document atomically, creating parent directories
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), StoreError> {
    let io_err = |source: io::Error| StoreError::Io {
        path: path.to_path_buf(),
        source,
    };

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(io_err)?;
    }

    let json = serde_json::to_string_pretty(value).map_err(|source| StoreError::Json {
        path: path.to_path_buf(),
        source,
    })?;

    let tmp = path.with_extension("json.tmp");
    fs::write(&tmp, json).map_err(io_err)?;
    fs::rename(&tmp, path).map_err(io_err)?;
    log::info!("Saved {}", path.display());
    Ok(())
}


#[cfg(test)]
mod tests {
    use super::test_util::scratch_dir;
    use super::*;
    use std::collections::BTreeMap;

    #[test]
    fn test_missing_file_is_none() {
        let dir = scratch_dir("missing");
        let loaded: Option<Vec<u32>> = load_json(&dir.join("nope.json")).unwrap();
        assert!(loaded.is_none());
    }

    #[test]
    fn test_save_then_load() {
        let dir = scratch_dir("roundtrip");
        let path = dir.join("nested").join("doc.json");
        let mut doc = BTreeMap::new();
        doc.insert("answer".to_string(), 42);

        save_json(&path, &doc).unwrap();
        assert!(!path.with_extension("json.tmp").exists());
        let back: BTreeMap<String, i32> = load_json(&path).unwrap().unwrap();
        assert_eq!(back, doc);

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_corrupt_file_reports_and_defaults() {
        let dir = scratch_dir("corrupt");
        fs::create_dir_all(&dir).unwrap();
        let path = dir.join("bad.json");
        fs::write(&path, "{ not json").unwrap();

        assert!(matches!(
            load_json::<Vec<u32>>(&path),
            Err(StoreError::Json { .. })
        ));
        let fallback: Vec<u32> = load_or_default(&path);
        assert!(fallback.is_empty());

        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_data_dir_paths() {
        let dir = DataDir::new("/tmp/mr");
        assert_eq!(dir.high_scores_path(), PathBuf::from("/tmp/mr/high_scores.json"));
        assert_eq!(dir.user_prefs_path(), PathBuf::from("/tmp/mr/user_prefs.json"));
        assert_eq!(DataDir::default().root(), Path::new(DEFAULT_DATA_DIR));
    }
}
