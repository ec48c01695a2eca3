#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Mutex;

use budget_sim::{
    core::{BudgetManager, ManagerOptions},
    storage::JsonStorage,
};
use once_cell::sync::Lazy;
use tempfile::TempDir;

/// Holds TempDir guards so temporary folders live for the duration of the test run.
static TEST_DIRS: Lazy<Mutex<Vec<TempDir>>> = Lazy::new(|| Mutex::new(Vec::new()));

/// Fresh directory that outlives the calling test.
pub fn temp_home() -> PathBuf {
    let temp = TempDir::new().expect("create temp dir");
    let base = temp.path().to_path_buf();
    TEST_DIRS.lock().expect("lock temp dir registry").push(temp);
    base
}

/// JSON storage rooted in its own temporary directory.
pub fn json_storage() -> (JsonStorage, PathBuf) {
    let base = temp_home();
    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    (storage, base)
}

/// Opens a manager over `base` as a new session would.
pub fn open_manager(base: &PathBuf, options: ManagerOptions) -> BudgetManager {
    let storage = JsonStorage::new(Some(base.clone())).expect("create json storage backend");
    BudgetManager::open(Box::new(storage), options)
}
