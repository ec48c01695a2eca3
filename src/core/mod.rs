pub mod budget_manager;
pub mod seed;
pub mod services;
pub mod store;
pub mod utils;

pub use budget_manager::{
    BudgetCommand, BudgetManager, BudgetState, BudgetView, CommandOutcome, ManagerOptions,
    Presenter,
};
pub use store::ExpenseStore;
