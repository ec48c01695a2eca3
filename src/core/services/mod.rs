pub mod expense_service;
pub mod rollover_service;
pub mod summary_service;

pub use expense_service::ExpenseService;
pub use rollover_service::{RolloverDecisions, RolloverPlan, RolloverReport, RolloverService};
pub use summary_service::{Summary, SummaryService};

use crate::domain::ExpenseId;
use crate::errors::BudgetError;

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error("{0}")]
    Invalid(String),
    #[error("Expense not found: {0}")]
    NotFound(ExpenseId),
    #[error("Operation aborted")]
    Aborted,
}
