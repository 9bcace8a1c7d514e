//! Persisted key/value settings shared with the keyboard.
//!
//! Keys match what the keyboard reads: the chosen source, when it was last
//! imported, how many stickers landed, and two caches that index into the
//! destination and must be emptied whenever its contents change.

use std::collections::BTreeMap;
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use time::format_description::well_known::Rfc3339;
use tracing::debug;

use crate::error::{ImportError, Result};
use crate::import::ImportResult;

pub const KEY_SOURCE_PATH: &str = "stickerDirPath";
pub const KEY_LAST_UPDATE: &str = "lastUpdateDate";
pub const KEY_IMPORTED_COUNT: &str = "numStickersImported";
pub const KEY_RECENT_CACHE: &str = "recentCache";
pub const KEY_COMPAT_CACHE: &str = "compatCache";

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Int(i64),
    Str(String),
}

impl From<&str> for ConfigValue {
    fn from(s: &str) -> Self {
        ConfigValue::Str(s.to_string())
    }
}

impl From<String> for ConfigValue {
    fn from(s: String) -> Self {
        ConfigValue::Str(s)
    }
}

impl From<i64> for ConfigValue {
    fn from(n: i64) -> Self {
        ConfigValue::Int(n)
    }
}

pub trait ConfigStore {
    fn get(&self, key: &str) -> Option<ConfigValue>;

    fn set(&mut self, key: &str, value: ConfigValue) -> Result<()>;

    /// Forget `key`; later reads fall back to their default.
    fn reset(&mut self, key: &str) -> Result<()>;

    fn get_str(&self, key: &str) -> Option<String> {
        match self.get(key) {
            Some(ConfigValue::Str(s)) => Some(s),
            _ => None,
        }
    }

    fn get_int(&self, key: &str) -> Option<i64> {
        match self.get(key) {
            Some(ConfigValue::Int(n)) => Some(n),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct MemoryConfigStore {
    values: BTreeMap<String, ConfigValue>,
}

impl MemoryConfigStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl ConfigStore for MemoryConfigStore {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: ConfigValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        Ok(())
    }

    fn reset(&mut self, key: &str) -> Result<()> {
        self.values.remove(key);
        Ok(())
    }
}

/// JSON file store; every change rewrites the file atomically.
#[derive(Debug)]
pub struct JsonConfigStore {
    path: PathBuf,
    values: BTreeMap<String, ConfigValue>,
}

impl JsonConfigStore {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let values = match fs::read(&path) {
            Ok(bytes) => serde_json::from_slice(&bytes)
                .map_err(|e| ImportError::Config(format!("{}: {e}", path.display())))?,
            Err(e) if e.kind() == io::ErrorKind::NotFound => BTreeMap::new(),
            Err(e) => return Err(ImportError::Config(format!("{}: {e}", path.display()))),
        };
        Ok(Self { path, values })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn save(&self) -> Result<()> {
        let config_err = |e: &dyn std::fmt::Display| {
            ImportError::Config(format!("{}: {e}", self.path.display()))
        };
        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir).map_err(|e| config_err(&e))?;
        let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|e| config_err(&e))?;
        serde_json::to_writer_pretty(tmp.as_file_mut(), &self.values)
            .map_err(|e| config_err(&e))?;
        tmp.as_file_mut().flush().map_err(|e| config_err(&e))?;
        tmp.persist(&self.path).map_err(|e| config_err(&e.error))?;
        debug!(path = %self.path.display(), keys = self.values.len(), "config saved");
        Ok(())
    }
}

impl ConfigStore for JsonConfigStore {
    fn get(&self, key: &str) -> Option<ConfigValue> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: ConfigValue) -> Result<()> {
        self.values.insert(key.to_string(), value);
        self.save()
    }

    fn reset(&mut self, key: &str) -> Result<()> {
        if self.values.remove(key).is_some() {
            self.save()?;
        }
        Ok(())
    }
}

fn timestamp(at: OffsetDateTime) -> Result<String> {
    at.format(&Rfc3339)
        .map_err(|e| ImportError::Config(format!("timestamp: {e}")))
}

/// Both caches point into the destination; empty them whenever it changes.
pub fn reset_caches(store: &mut dyn ConfigStore) -> Result<()> {
    store.set(KEY_RECENT_CACHE, "".into())?;
    store.set(KEY_COMPAT_CACHE, "".into())
}

/// Remember a newly chosen source directory.
pub fn select_source(store: &mut dyn ConfigStore, source_path: &str, at: OffsetDateTime) -> Result<()> {
    store.set(KEY_SOURCE_PATH, source_path.into())?;
    store.set(KEY_LAST_UPDATE, timestamp(at)?.into())?;
    reset_caches(store)
}

/// The stored source, or [`ImportError::NoSource`] when none was ever chosen.
pub fn configured_source(store: &dyn ConfigStore) -> Result<String> {
    match store.get_str(KEY_SOURCE_PATH) {
        Some(path) if !path.is_empty() => Ok(path),
        _ => Err(ImportError::NoSource),
    }
}

/// Persist the outcome of a finished run.
pub fn record_result(store: &mut dyn ConfigStore, result: &ImportResult) -> Result<()> {
    store.set(KEY_IMPORTED_COUNT, (result.imported_count as i64).into())?;
    store.set(KEY_LAST_UPDATE, timestamp(result.timestamp)?.into())?;
    reset_caches(store)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SourceStatus {
    pub source_path: Option<String>,
    pub last_update: Option<String>,
    pub imported_count: i64,
}

pub fn status(store: &dyn ConfigStore) -> SourceStatus {
    SourceStatus {
        source_path: store.get_str(KEY_SOURCE_PATH),
        last_update: store.get_str(KEY_LAST_UPDATE),
        imported_count: store.get_int(KEY_IMPORTED_COUNT).unwrap_or(0),
    }
}
