use serde::{de::DeserializeOwned, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::debug;

use crate::{
    core::utils::{ensure_dir, write_atomic, PathResolver},
    domain::{Expense, SimulationContext},
};

use super::{Result, StorageBackend};

/// Filesystem-backed JSON persistence: one document for the expense list and
/// one for the simulation context.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    root: PathBuf,
    expenses_file: PathBuf,
    simulation_file: PathBuf,
}

impl JsonStorage {
    /// Opens (creating if needed) the data directory under `root`, or under
    /// the application directory when `root` is `None`.
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        let data_dir = PathResolver::data_dir_in(&base);
        Self::in_dir(data_dir)
    }

    /// Uses `data_dir` directly as the storage directory.
    pub fn in_dir(data_dir: PathBuf) -> Result<Self> {
        ensure_dir(&data_dir)?;
        Ok(Self {
            expenses_file: PathResolver::expenses_file_in(&data_dir),
            simulation_file: PathResolver::simulation_file_in(&data_dir),
            root: data_dir,
        })
    }

    pub fn base_dir(&self) -> &Path {
        &self.root
    }

    pub fn expenses_path(&self) -> &Path {
        &self.expenses_file
    }

    pub fn simulation_path(&self) -> &Path {
        &self.simulation_file
    }
}

impl StorageBackend for JsonStorage {
    fn load_expenses(&self) -> Result<Vec<Expense>> {
        Ok(read_document(&self.expenses_file)?.unwrap_or_default())
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        write_document(&self.expenses_file, &expenses)
    }

    fn load_simulation(&self) -> Result<SimulationContext> {
        Ok(read_document(&self.simulation_file)?.unwrap_or_default())
    }

    fn save_simulation(&self, simulation: &SimulationContext) -> Result<()> {
        write_document(&self.simulation_file, simulation)
    }
}

/// `Ok(None)` when the file does not exist or is blank.
fn read_document<T: DeserializeOwned>(path: &Path) -> Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(path)?;
    if data.trim().is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(&data)?))
}

fn write_document<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    write_atomic(path, &json)?;
    debug!(path = %path.display(), bytes = json.len(), "wrote document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::utils::tmp_path;
    use crate::errors::BudgetError;
    use rust_decimal::Decimal;
    use tempfile::TempDir;

    fn storage_with_temp_dir() -> (JsonStorage, TempDir) {
        let temp = TempDir::new().expect("temp dir");
        let storage = JsonStorage::new(Some(temp.path().to_path_buf())).expect("json storage");
        (storage, temp)
    }

    #[test]
    fn missing_files_load_as_defaults() {
        let (storage, _guard) = storage_with_temp_dir();
        assert!(storage.load_expenses().unwrap().is_empty());
        assert_eq!(
            storage.load_simulation().unwrap().initial_balance,
            Decimal::ZERO
        );
    }

    #[test]
    fn save_and_load_roundtrip() {
        let (storage, _guard) = storage_with_temp_dir();
        let expenses = vec![Expense::with_id("1", "Aluguel", Decimal::from(380), false)];
        storage.save_expenses(&expenses).expect("save expenses");
        storage
            .save_simulation(&SimulationContext::new(Decimal::new(12345, 2)))
            .expect("save simulation");

        assert_eq!(storage.load_expenses().unwrap(), expenses);
        assert_eq!(
            storage.load_simulation().unwrap().initial_balance,
            Decimal::new(12345, 2)
        );
        assert!(!tmp_path(storage.expenses_path()).exists());
    }

    #[test]
    fn corrupt_document_is_reported() {
        let (storage, _guard) = storage_with_temp_dir();
        fs::write(storage.expenses_path(), "{not json").unwrap();
        let err = storage.load_expenses().expect_err("corrupt data must fail");
        assert!(matches!(err, BudgetError::StorageError(_)));
    }

    #[test]
    fn failed_write_preserves_previous_document() {
        let (storage, _guard) = storage_with_temp_dir();
        let first = vec![Expense::with_id("1", "Rent", Decimal::from(380), false)];
        storage.save_expenses(&first).unwrap();
        let original = fs::read_to_string(storage.expenses_path()).unwrap();

        fs::create_dir_all(tmp_path(storage.expenses_path())).unwrap();
        let second = vec![Expense::with_id("2", "Power", Decimal::from(200), false)];
        assert!(storage.save_expenses(&second).is_err());
        assert_eq!(fs::read_to_string(storage.expenses_path()).unwrap(), original);
    }
}
