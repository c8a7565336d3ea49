//! Key/value document storage and the save store built on it.
//!
//! A [`Storage`] holds raw JSON strings by key, like browser local storage.
//! [`SaveStore`] owns one and knows the two documents the game persists:
//! the player save and the active-dungeon marker.

use crate::core::constants::*;
use crate::core::save::PlayerSave;
use crate::dungeon::types::ActiveDungeonRun;
use crate::error::GameResult;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;

/// String documents addressed by key.
pub trait Storage {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
    fn remove(&mut self, key: &str) -> io::Result<()>;
}

/// In-process storage, used by tests and embedders.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        self.entries.remove(key);
        Ok(())
    }
}

/// One `<key>.json` file per document under a directory.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

/// Get the ~/.darkstone/ directory path, creating it if needed.
pub fn darkstone_dir() -> io::Result<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        io::Error::new(
            io::ErrorKind::NotFound,
            "Could not determine home directory",
        )
    })?;
    let dir = home_dir.join(SAVE_DIR_NAME);
    fs::create_dir_all(&dir)?;
    Ok(dir)
}

impl FileStorage {
    /// Storage under ~/.darkstone/.
    pub fn open_default() -> io::Result<Self> {
        Ok(Self {
            dir: darkstone_dir()?,
        })
    }

    pub fn in_dir(dir: impl Into<PathBuf>) -> io::Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    fn path(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> Option<String> {
        fs::read_to_string(self.path(key)).ok()
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::write(self.path(key), value)
    }

    fn remove(&mut self, key: &str) -> io::Result<()> {
        match fs::remove_file(self.path(key)) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            other => other,
        }
    }
}

/// Reads `key` as a JSON object. Missing or unparsable documents are empty.
fn read_object<S: Storage>(storage: &S, key: &str) -> Map<String, Value> {
    let Some(raw) = storage.get(key) else {
        return Map::new();
    };
    match serde_json::from_str::<Value>(&raw) {
        Ok(Value::Object(map)) => map,
        Ok(_) | Err(_) => {
            log::warn!("stored document {:?} is not a JSON object; using defaults", key);
            Map::new()
        }
    }
}

/// The player save and active-dungeon marker on top of a [`Storage`].
#[derive(Debug)]
pub struct SaveStore<S: Storage> {
    storage: S,
}

impl<S: Storage> SaveStore<S> {
    pub fn new(storage: S) -> Self {
        Self { storage }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn storage_mut(&mut self) -> &mut S {
        &mut self.storage
    }

    /// Loads and normalizes the save. Never fails.
    pub fn load(&self, now_ms: i64) -> PlayerSave {
        let doc = Value::Object(read_object(&self.storage, SAVE_KEY));
        PlayerSave::from_value(&doc, now_ms)
    }

    /// Replaces the stored save.
    pub fn save(&mut self, save: &PlayerSave) -> GameResult<()> {
        let json = serde_json::to_string_pretty(save)?;
        self.storage.set(SAVE_KEY, &json)?;
        Ok(())
    }

    /// Merges `patch`'s top-level keys into the stored save, then writes back
    /// the normalized result.
    pub fn patch(&mut self, patch: Map<String, Value>, now_ms: i64) -> GameResult<PlayerSave> {
        let current = serde_json::to_value(self.load(now_ms))?;
        let mut merged = match current {
            Value::Object(map) => map,
            _ => Map::new(),
        };
        merged.extend(patch);
        let save = PlayerSave::from_value(&Value::Object(merged), now_ms);
        self.save(&save)?;
        Ok(save)
    }

    pub fn load_active_run(&self) -> Option<ActiveDungeonRun> {
        let doc = read_object(&self.storage, ACTIVE_DUNGEON_KEY);
        if doc.is_empty() {
            return None;
        }
        serde_json::from_value(Value::Object(doc)).ok()
    }

    pub fn set_active_run(&mut self, run: &ActiveDungeonRun) -> GameResult<()> {
        let json = serde_json::to_string(run)?;
        self.storage.set(ACTIVE_DUNGEON_KEY, &json)?;
        Ok(())
    }

    pub fn clear_active_run(&mut self) -> GameResult<()> {
        self.storage.remove(ACTIVE_DUNGEON_KEY)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::items::catalog;
    use crate::items::types::Stack;
    use serde_json::json;

    fn store() -> SaveStore<MemoryStorage> {
        SaveStore::new(MemoryStorage::new())
    }

    #[test]
    fn test_load_missing_returns_fresh_save() {
        let save = store().load(42);
        assert_eq!(save, PlayerSave::new(42));
    }

    #[test]
    fn test_corrupt_document_treated_as_empty() {
        let mut store = store();
        store.storage_mut().set(SAVE_KEY, "{not json").unwrap();
        assert_eq!(store.load(0), PlayerSave::new(0));
        store.storage_mut().set(SAVE_KEY, "[1,2,3]").unwrap();
        assert_eq!(store.load(0), PlayerSave::new(0));
    }

    #[test]
    fn test_save_and_load_roundtrip() {
        let mut store = store();
        let mut save = PlayerSave::new(10);
        save.gold = 300;
        save.inventory.push(Stack::new(catalog::coal(), 9));
        store.save(&save).unwrap();
        assert_eq!(store.load(99), save);
    }

    #[test]
    fn test_patch_merges_top_level_keys() {
        let mut store = store();
        let mut save = PlayerSave::new(0);
        save.inventory.push(Stack::new(catalog::coal(), 2));
        store.save(&save).unwrap();

        let patch = json!({ "gold": 55 }).as_object().cloned().unwrap();
        let patched = store.patch(patch, 0).unwrap();
        assert_eq!(patched.gold, 55);
        assert_eq!(patched.inventory.len(), 1);
        assert_eq!(store.load(0).gold, 55);
    }

    #[test]
    fn test_active_run_lifecycle() {
        let mut store = store();
        assert!(store.load_active_run().is_none());
        let run = ActiveDungeonRun::crypt(1_000);
        store.set_active_run(&run).unwrap();
        assert_eq!(store.load_active_run(), Some(run));
        store.clear_active_run().unwrap();
        assert!(store.load_active_run().is_none());
    }

    #[test]
    fn test_file_storage_roundtrip() {
        let dir = std::env::temp_dir().join(format!("darkstone-test-{}", std::process::id()));
        let mut storage = FileStorage::in_dir(&dir).unwrap();
        storage.set("scratch", "{\"a\":1}").unwrap();
        assert_eq!(storage.get("scratch").as_deref(), Some("{\"a\":1}"));
        storage.remove("scratch").unwrap();
        assert!(storage.get("scratch").is_none());
        storage.remove("scratch").unwrap();
        fs::remove_dir_all(&dir).ok();
    }
}
