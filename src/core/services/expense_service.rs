//! Status transitions and edits applied to individual expenses.

use rust_decimal::Decimal;
use tracing::debug;

use crate::core::services::{ServiceError, ServiceResult};
use crate::core::store::ExpenseStore;
use crate::domain::{
    Displayable, Expense, ExpenseId, ExpenseStatus, SimulationContext, MAX_AMOUNT,
};

/// Validated mutations over the expense store and the simulation context.
pub struct ExpenseService;

impl ExpenseService {
    /// Creates a pending expense and returns its identifier.
    pub fn add(
        store: &mut ExpenseStore,
        name: &str,
        value: Decimal,
        is_temporary: bool,
    ) -> ServiceResult<ExpenseId> {
        let name = Self::validate_name(name)?;
        Self::ensure_positive(value)?;
        let expense = Expense::new(name, value, is_temporary);
        let id = store.add(expense)?.id.clone();
        Ok(id)
    }

    /// Marks the expense as paid; repeated calls leave it unchanged.
    pub fn pay(store: &mut ExpenseStore, id: &ExpenseId) -> ServiceResult<()> {
        let expense = Self::lookup(store, id)?;
        expense.status = ExpenseStatus::Paid;
        debug!(expense = %expense.display_label(), "expense paid");
        Ok(())
    }

    /// Flips between ignored and pending and returns the resulting status.
    /// Ignoring discards any manual override of the current value.
    pub fn toggle_ignore(store: &mut ExpenseStore, id: &ExpenseId) -> ServiceResult<ExpenseStatus> {
        let expense = Self::lookup(store, id)?;
        if expense.is_ignored() {
            expense.status = ExpenseStatus::Pending;
        } else {
            expense.status = ExpenseStatus::Ignored;
            expense.current_value = expense.default_value;
        }
        debug!(expense = %expense.display_label(), "ignore toggled");
        Ok(expense.status)
    }

    /// Overrides the current value for this period. The expense goes back to
    /// pending whatever its previous status.
    pub fn edit_value(store: &mut ExpenseStore, id: &ExpenseId, value: Decimal) -> ServiceResult<()> {
        Self::ensure_non_negative(value, "value")?;
        let expense = Self::lookup(store, id)?;
        expense.current_value = value;
        expense.status = ExpenseStatus::Pending;
        Ok(())
    }

    /// Removes the expense, returning it.
    pub fn delete(store: &mut ExpenseStore, id: &ExpenseId) -> ServiceResult<Expense> {
        store
            .remove(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    /// Changes the name and baseline. The current value follows the new
    /// baseline unless it holds a manual edit on a still-pending expense.
    pub fn edit_permanent(
        store: &mut ExpenseStore,
        id: &ExpenseId,
        name: &str,
        value: Decimal,
    ) -> ServiceResult<()> {
        let name = Self::validate_name(name)?;
        Self::ensure_positive(value)?;
        let expense = Self::lookup(store, id)?;
        let follows_default =
            expense.current_value == expense.default_value || !expense.is_pending();
        expense.name = name;
        expense.default_value = value;
        if follows_default {
            expense.current_value = value;
        }
        Ok(())
    }

    /// Applies a new management order and reports how many positions moved.
    pub fn reorder(store: &mut ExpenseStore, ids: &[ExpenseId]) -> ServiceResult<usize> {
        if ids.is_empty() {
            return Err(ServiceError::Invalid("No expenses to reorder".into()));
        }
        Ok(store.reorder(ids))
    }

    pub fn set_initial_balance(
        simulation: &mut SimulationContext,
        value: Decimal,
    ) -> ServiceResult<()> {
        Self::ensure_non_negative(value, "balance")?;
        simulation.initial_balance = value;
        Ok(())
    }

    fn lookup<'a>(store: &'a mut ExpenseStore, id: &ExpenseId) -> ServiceResult<&'a mut Expense> {
        store
            .find_mut(id)
            .ok_or_else(|| ServiceError::NotFound(id.clone()))
    }

    fn validate_name(candidate: &str) -> ServiceResult<String> {
        let trimmed = candidate.trim();
        if trimmed.is_empty() {
            Err(ServiceError::Invalid("Expense name must not be empty".into()))
        } else {
            Ok(trimmed.to_string())
        }
    }

    fn ensure_positive(value: Decimal) -> ServiceResult<()> {
        if value > Decimal::ZERO {
            Self::ensure_within_limit(value, "value")
        } else {
            Err(ServiceError::Invalid(format!(
                "Value must be greater than zero (got {value})"
            )))
        }
    }

    fn ensure_non_negative(value: Decimal, field: &str) -> ServiceResult<()> {
        if value < Decimal::ZERO {
            Err(ServiceError::Invalid(format!(
                "The {field} must not be negative (got {value})"
            )))
        } else {
            Self::ensure_within_limit(value, field)
        }
    }

    fn ensure_within_limit(value: Decimal, field: &str) -> ServiceResult<()> {
        if value > MAX_AMOUNT {
            Err(ServiceError::Invalid(format!(
                "The {field} must not exceed {MAX_AMOUNT} (got {value})"
            )))
        } else {
            Ok(())
        }
    }
}
