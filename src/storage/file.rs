//! File-backed progress store.
//!
//! The record is a flat JSON object of string values. Every write replaces the
//! file atomically (temp file in the same directory, then rename), so a crash
//! leaves either the old or the new record on disk.

use super::ProgressStore;
use crate::core::{MoonStoneError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

const FORMAT_VERSION: u16 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StoreFile {
    format_version: u16,
    #[serde(default)]
    values: BTreeMap<String, String>,
}

impl Default for StoreFile {
    fn default() -> Self {
        Self {
            format_version: FORMAT_VERSION,
            values: BTreeMap::new(),
        }
    }
}

#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    contents: StoreFile,
}

impl FileStore {
    /// Opens the store at `path`, starting empty if the file does not exist yet.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let contents = if path.exists() {
            let bytes = fs::read(&path).map_err(|err| {
                MoonStoneError::Store(format!("Failed to read '{}': {}", path.display(), err))
            })?;
            let contents = serde_json::from_slice::<StoreFile>(&bytes).map_err(|err| {
                MoonStoneError::Store(format!("Failed to parse '{}': {}", path.display(), err))
            })?;
            if contents.format_version > FORMAT_VERSION {
                return Err(MoonStoneError::Store(format!(
                    "'{}' uses store format {} but only {} is supported",
                    path.display(),
                    contents.format_version,
                    FORMAT_VERSION
                )));
            }
            contents
        } else {
            StoreFile::default()
        };

        Ok(Self { path, contents })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// All stored keys, sorted.
    pub fn keys(&self) -> Vec<&str> {
        self.contents.values.keys().map(String::as_str).collect()
    }

    fn flush(&self) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir).map_err(|err| {
            MoonStoneError::Store(format!(
                "Failed to create parent directory '{}': {}",
                dir.display(),
                err
            ))
        })?;

        let json = serde_json::to_vec_pretty(&self.contents)
            .map_err(|err| MoonStoneError::Store(format!("serialize progress record: {}", err)))?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(&json)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|err| {
            MoonStoneError::Store(format!(
                "Failed to replace '{}': {}",
                self.path.display(),
                err.error
            ))
        })?;
        Ok(())
    }
}

impl ProgressStore for FileStore {
    fn get_string(&self, key: &str) -> Result<Option<String>> {
        Ok(self.contents.values.get(key).cloned())
    }

    fn set_string(&mut self, key: &str, value: &str) -> Result<()> {
        let previous = self
            .contents
            .values
            .insert(key.to_string(), value.to_string());
        if let Err(err) = self.flush() {
            // Keep memory in step with disk.
            match previous {
                Some(old) => self.contents.values.insert(key.to_string(), old),
                None => self.contents.values.remove(key),
            };
            return Err(err);
        }
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        let Some(previous) = self.contents.values.remove(key) else {
            return Ok(());
        };
        if let Err(err) = self.flush() {
            self.contents.values.insert(key.to_string(), previous);
            return Err(err);
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_starts_empty() {
        let dir = TempDir::new().unwrap();
        let store = FileStore::open(dir.path().join("progress.json")).unwrap();
        assert!(store.keys().is_empty());
        assert!(!store.path().exists());
    }

    #[test]
    fn test_set_creates_parent_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("nested").join("state").join("progress.json");
        let mut store = FileStore::open(&path).unwrap();
        store.set_string("MoonStone.version", "1.0.0").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_rejects_garbage() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, b"not json").unwrap();
        let err = FileStore::open(&path).unwrap_err();
        assert!(matches!(err, MoonStoneError::Store(_)));
    }

    #[test]
    fn test_rejects_newer_format() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("progress.json");
        fs::write(&path, br#"{"format_version": 99, "values": {}}"#).unwrap();
        assert!(FileStore::open(&path).is_err());
    }
}
