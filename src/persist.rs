use serde_json::Value;
use std::fs;
use std::io;
use std::path::PathBuf;

use crate::error::Result;

/// Raw read/write of the persisted blob.
///
/// Implementations only move bytes; merging over defaults is done by
/// `Record::from_value` so every storage backend tolerates the same junk.
pub trait Storage {
    /// `Ok(None)` when nothing has been saved yet.
    fn load(&self) -> Result<Option<Value>>;
    fn save(&mut self, value: &Value) -> Result<()>;
}

/// Pretty-printed JSON on disk.
#[derive(Debug, Clone)]
pub struct JsonFileStorage {
    path: PathBuf,
}

impl JsonFileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        JsonFileStorage { path: path.into() }
    }
}

impl Storage for JsonFileStorage {
    fn load(&self) -> Result<Option<Value>> {
        let contents = match fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        if contents.trim().is_empty() {
            return Ok(None);
        }
        Ok(Some(serde_json::from_str(&contents)?))
    }

    fn save(&mut self, value: &Value) -> Result<()> {
        // Create the data directory on first save
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string_pretty(value)?;
        fs::write(&self.path, json)?;
        log::debug!("saved stats to {}", self.path.display());
        Ok(())
    }
}

/// Keeps the last saved blob in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    value: Option<Value>,
    saves: usize,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_value(value: Value) -> Self {
        MemoryStorage {
            value: Some(value),
            saves: 0,
        }
    }

    pub fn value(&self) -> Option<&Value> {
        self.value.as_ref()
    }

    /// How many times `save` has been called.
    pub fn saves(&self) -> usize {
        self.saves
    }
}

impl Storage for MemoryStorage {
    fn load(&self) -> Result<Option<Value>> {
        Ok(self.value.clone())
    }

    fn save(&mut self, value: &Value) -> Result<()> {
        self.value = Some(value.clone());
        self.saves += 1;
        Ok(())
    }
}
