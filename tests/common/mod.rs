#![allow(dead_code)]

use std::sync::Mutex;

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use tempfile::TempDir;
use wise_ledger::{
    errors::LedgerError,
    storage::{JsonFileStore, KeyValueStore, MemoryStore},
    FixedClock, LedgerEngine,
};

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid date")
}

/// Mid-January 2024, the date most scenarios are pinned to.
pub fn today() -> NaiveDate {
    date(2024, 1, 15)
}

/// Engine over a fresh in-memory store; the returned handle shares its contents.
pub fn memory_engine() -> (LedgerEngine, MemoryStore) {
    let store = MemoryStore::new();
    let engine =
        LedgerEngine::open_or_default(Box::new(store.clone()), Box::new(FixedClock(today())));
    (engine, store)
}

/// Unique temporary directory kept alive for the rest of the run.
pub fn temp_dir() -> std::path::PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let path = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    path
}

/// File store rooted in a unique temporary directory.
pub fn temp_store() -> JsonFileStore {
    JsonFileStore::new(temp_dir().join("data")).expect("create json file store")
}

/// Store whose writes always fail while reads see an empty store.
#[derive(Debug, Default)]
pub struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>, LedgerError> {
        Ok(None)
    }

    fn set(&self, key: &str, _value: &str) -> Result<(), LedgerError> {
        Err(LedgerError::Persistence(format!(
            "disk full while writing {key}"
        )))
    }

    fn remove(&self, _key: &str) -> Result<(), LedgerError> {
        Ok(())
    }
}
