// JSON-file store — all slots live in one JSON object on disk.
//
// The file is read and rewritten whole on every operation; the data is a
// handful of small slots, so simplicity wins over incremental writes. A
// tokio Mutex serializes access so concurrent saves can't interleave a
// read-modify-write.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use tokio::sync::Mutex;

use super::Store;

pub struct JsonFileStore {
    path: PathBuf,
    lock: Mutex<()>,
}

impl JsonFileStore {
    /// Open a store backed by the given file, creating parent directories
    /// as needed. The file itself is created on first save.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).with_context(|| {
                    format!("Failed to create directory for store: {}", path.display())
                })?;
            }
        }
        Ok(Self {
            path,
            lock: Mutex::new(()),
        })
    }

    fn read_slots(path: &Path) -> Result<BTreeMap<String, String>> {
        if !path.exists() {
            return Ok(BTreeMap::new());
        }
        let contents = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read store file {}", path.display()))?;
        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&contents)
            .with_context(|| format!("Store file {} is not valid JSON", path.display()))
    }

    fn write_slots(path: &Path, slots: &BTreeMap<String, String>) -> Result<()> {
        let contents = serde_json::to_string_pretty(slots)?;
        std::fs::write(path, contents)
            .with_context(|| format!("Failed to write store file {}", path.display()))
    }
}

#[async_trait]
impl Store for JsonFileStore {
    async fn load(&self, key: &str) -> Result<Option<String>> {
        let _guard = self.lock.lock().await;
        Ok(Self::read_slots(&self.path)?.remove(key))
    }

    async fn save(&self, key: &str, value: &str) -> Result<()> {
        let _guard = self.lock.lock().await;
        let mut slots = Self::read_slots(&self.path)?;
        slots.insert(key.to_string(), value.to_string());
        Self::write_slots(&self.path, &slots)
    }
}
