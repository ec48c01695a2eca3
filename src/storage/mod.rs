pub mod json_backend;
pub mod memory;

use crate::domain::{Expense, SimulationContext};
use crate::errors::BudgetError;

pub type Result<T> = std::result::Result<T, BudgetError>;

/// Persistence collaborator for the expense list and the simulation context.
///
/// Loads report absent data as an empty list / zero balance. Unreadable data
/// is an error; callers decide whether to degrade.
pub trait StorageBackend: Send + Sync {
    fn load_expenses(&self) -> Result<Vec<Expense>>;
    fn save_expenses(&self, expenses: &[Expense]) -> Result<()>;
    fn load_simulation(&self) -> Result<SimulationContext>;
    fn save_simulation(&self, simulation: &SimulationContext) -> Result<()>;
}

pub use json_backend::JsonStorage;
pub use memory::MemoryStorage;

impl<T: StorageBackend + ?Sized> StorageBackend for std::sync::Arc<T> {
    fn load_expenses(&self) -> Result<Vec<Expense>> {
        (**self).load_expenses()
    }

    fn save_expenses(&self, expenses: &[Expense]) -> Result<()> {
        (**self).save_expenses(expenses)
    }

    fn load_simulation(&self) -> Result<SimulationContext> {
        (**self).load_simulation()
    }

    fn save_simulation(&self, simulation: &SimulationContext) -> Result<()> {
        (**self).save_simulation(simulation)
    }
}
