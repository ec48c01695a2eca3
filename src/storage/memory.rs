use std::sync::{
    atomic::{AtomicBool, AtomicUsize, Ordering},
    RwLock,
};

use crate::{
    domain::{Expense, SimulationContext},
    errors::BudgetError,
};

use super::{Result, StorageBackend};

/// In-process backend for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStorage {
    expenses: RwLock<Vec<Expense>>,
    simulation: RwLock<SimulationContext>,
    writes: AtomicUsize,
    fail_writes: AtomicBool,
    fail_expense_writes: AtomicBool,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_data(expenses: Vec<Expense>, simulation: SimulationContext) -> Self {
        Self {
            expenses: RwLock::new(expenses),
            simulation: RwLock::new(simulation),
            ..Self::default()
        }
    }

    /// Number of successful save calls.
    pub fn writes(&self) -> usize {
        self.writes.load(Ordering::SeqCst)
    }

    /// Makes every subsequent save fail, emulating an unavailable store.
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Makes only the expense document fail to save.
    pub fn set_fail_expense_writes(&self, fail: bool) {
        self.fail_expense_writes.store(fail, Ordering::SeqCst);
    }

    fn check_writable(&self) -> Result<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            Err(BudgetError::StorageError("storage unavailable".into()))
        } else {
            Ok(())
        }
    }
}

fn poisoned() -> BudgetError {
    BudgetError::StorageError("memory storage lock poisoned".into())
}

impl StorageBackend for MemoryStorage {
    fn load_expenses(&self) -> Result<Vec<Expense>> {
        self.expenses
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| poisoned())
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        self.check_writable()?;
        if self.fail_expense_writes.load(Ordering::SeqCst) {
            return Err(BudgetError::StorageError("expense document unavailable".into()));
        }
        let mut guard = self.expenses.write().map_err(|_| poisoned())?;
        *guard = expenses.to_vec();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn load_simulation(&self) -> Result<SimulationContext> {
        self.simulation
            .read()
            .map(|guard| guard.clone())
            .map_err(|_| poisoned())
    }

    fn save_simulation(&self, simulation: &SimulationContext) -> Result<()> {
        self.check_writable()?;
        let mut guard = self.simulation.write().map_err(|_| poisoned())?;
        *guard = simulation.clone();
        self.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
