//! Local key-value persistence
//!
//! Scores and settings are stored as strings under fixed keys. Back-ends:
//! - `MemoryStore`: in-process map (tests, headless runs)
//! - `FileStore`: JSON file on disk (native)
//! - `platform::web::LocalStore`: browser LocalStorage (wasm32)

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

#[cfg(not(target_arch = "wasm32"))]
pub mod file;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileStore;

/// String-keyed, string-valued storage
pub trait KeyValueStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

/// Read an integer value, treating missing or malformed entries as zero
pub fn read_u64(store: &dyn KeyValueStore, key: &str) -> u64 {
    match store.get(key) {
        None => 0,
        Some(raw) => match raw.trim().parse::<u64>() {
            Ok(v) => v,
            Err(_) => {
                log::warn!("Ignoring malformed value for {}: {:?}", key, raw);
                0
            }
        },
    }
}

pub fn write_u64(store: &mut dyn KeyValueStore, key: &str, value: u64) {
    store.set(key, &value.to_string());
}

/// In-memory store
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MemoryStore {
    entries: BTreeMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &BTreeMap<String, String> {
        &self.entries
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}

/// Shared handle, so a test or host can inspect what the game wrote
impl<S: KeyValueStore + ?Sized> KeyValueStore for Rc<RefCell<S>> {
    fn get(&self, key: &str) -> Option<String> {
        self.borrow().get(key)
    }

    fn set(&mut self, key: &str, value: &str) {
        self.borrow_mut().set(key, value);
    }
}
