pub mod common;
pub mod expense;
pub mod simulation;

pub use common::{Displayable, ExpenseId};
pub use expense::{is_valid_amount, Expense, ExpenseStatus, MAX_AMOUNT};
pub use simulation::SimulationContext;
