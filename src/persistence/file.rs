//! JSON file store for native builds
//!
//! The whole map is rewritten on every `set`. Writes go to a sibling temp
//! file first and are renamed into place.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use super::{KeyValueStore, MemoryStore};

pub struct FileStore {
    path: PathBuf,
    cache: MemoryStore,
}

impl FileStore {
    /// Open (or start) a store at `path`. A missing file is an empty store;
    /// a corrupt one is logged and replaced on the next write.
    pub fn open(path: impl AsRef<Path>) -> io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        let cache = match fs::read_to_string(&path) {
            Ok(json) => match serde_json::from_str::<MemoryStore>(&json) {
                Ok(cache) => {
                    log::info!("Loaded {} saved values from {}", cache.len(), path.display());
                    cache
                }
                Err(e) => {
                    log::warn!("Save file {} is corrupt ({}), starting fresh", path.display(), e);
                    MemoryStore::new()
                }
            },
            Err(e) if e.kind() == io::ErrorKind::NotFound => MemoryStore::new(),
            Err(e) => return Err(e),
        };
        Ok(Self { path, cache })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn flush(&self) -> io::Result<()> {
        let json = serde_json::to_string_pretty(&self.cache)?;
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, json)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.cache.get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.cache.set(key, value);
        if let Err(e) = self.flush() {
            log::warn!("Failed to write {}: {}", self.path.display(), e);
        }
    }
}
