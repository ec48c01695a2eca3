//! End-of-period rollover ("new month").
//!
//! Rollover runs in two phases. [`RolloverService::plan`] walks the
//! temporary expenses in store order and collects one decision for each,
//! then asks for the new balance; nothing is mutated while decisions are
//! being gathered, so an aborted prompt leaves the period intact.
//! [`RolloverService::apply`] commits a finished plan.

use std::collections::HashSet;

use rust_decimal::Decimal;
use tracing::info;

use crate::core::services::ServiceResult;
use crate::core::store::ExpenseStore;
use crate::domain::{is_valid_amount, Expense, ExpenseId, SimulationContext};

/// Source of the user decisions a rollover needs.
pub trait RolloverDecisions {
    /// Whether the temporary `expense` becomes a permanent one.
    fn promote(&mut self, expense: &Expense) -> ServiceResult<bool>;

    /// Balance for the new period; `None` keeps the current one.
    fn new_balance(&mut self, current: Decimal) -> ServiceResult<Option<Decimal>>;
}

/// Fully decided rollover, ready to be applied.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RolloverPlan {
    pub promote: HashSet<ExpenseId>,
    pub new_balance: Option<Decimal>,
}

impl RolloverPlan {
    pub fn new<I>(promote: I, new_balance: Option<Decimal>) -> Self
    where
        I: IntoIterator<Item = ExpenseId>,
    {
        Self {
            promote: promote.into_iter().collect(),
            new_balance,
        }
    }
}

/// A plan also answers the prompts it was built from, which lets callers
/// replay a recorded plan through [`RolloverService::plan`].
impl RolloverDecisions for RolloverPlan {
    fn promote(&mut self, expense: &Expense) -> ServiceResult<bool> {
        Ok(self.promote.contains(&expense.id))
    }

    fn new_balance(&mut self, _current: Decimal) -> ServiceResult<Option<Decimal>> {
        Ok(self.new_balance)
    }
}

/// What a committed rollover changed.
#[derive(Debug, Clone, PartialEq)]
pub struct RolloverReport {
    pub kept: usize,
    pub promoted: Vec<String>,
    pub dropped: Vec<String>,
    pub initial_balance: Decimal,
    /// A negative or out-of-range balance was supplied and the previous one
    /// was kept.
    pub balance_rejected: bool,
}

pub struct RolloverService;

impl RolloverService {
    /// Collects decisions, one temporary expense at a time, in store order.
    pub fn plan(
        store: &ExpenseStore,
        simulation: &SimulationContext,
        decisions: &mut dyn RolloverDecisions,
    ) -> ServiceResult<RolloverPlan> {
        let mut promote = HashSet::new();
        for expense in store.temporary() {
            if decisions.promote(expense)? {
                promote.insert(expense.id.clone());
            }
        }
        let new_balance = decisions.new_balance(simulation.initial_balance)?;
        Ok(RolloverPlan {
            promote,
            new_balance,
        })
    }

    /// Replaces the store with the next period's expenses and updates the
    /// balance. Permanent expenses keep their order; promoted ones follow.
    pub fn apply(
        store: &mut ExpenseStore,
        simulation: &mut SimulationContext,
        plan: &RolloverPlan,
    ) -> RolloverReport {
        let mut kept: Vec<Expense> = store.managed().into_iter().cloned().collect();
        let mut promoted = Vec::new();
        let mut dropped = Vec::new();

        for expense in store.temporary() {
            if plan.promote.contains(&expense.id) {
                let mut expense = expense.clone();
                expense.is_temporary = false;
                promoted.push(expense.name.clone());
                kept.push(expense);
            } else {
                dropped.push(expense.name.clone());
            }
        }

        for (index, expense) in kept.iter_mut().enumerate() {
            expense.reset_for_period();
            expense.sort_order = u32::try_from(index + 1).unwrap_or(u32::MAX);
        }

        let kept_count = kept.len();
        store.replace_all(kept);

        let mut balance_rejected = false;
        match plan.new_balance {
            Some(value) if !is_valid_amount(value) => balance_rejected = true,
            Some(value) => simulation.initial_balance = value,
            None => {}
        }
        simulation.start_period();

        info!(
            kept = kept_count,
            promoted = promoted.len(),
            dropped = dropped.len(),
            balance_rejected,
            "rolled over to a new period"
        );

        RolloverReport {
            kept: kept_count,
            promoted,
            dropped,
            initial_balance: simulation.initial_balance,
            balance_rejected,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::services::{ExpenseService, ServiceError};
    use crate::domain::ExpenseStatus;

    fn sample_store() -> ExpenseStore {
        let mut store = ExpenseStore::new();
        for (id, value, temporary) in [
            ("rent", 380, false),
            ("gift", 50, true),
            ("market", 200, false),
            ("repair", 90, true),
        ] {
            store
                .add(Expense::with_id(id, id, Decimal::from(value), temporary))
                .expect("add expense");
        }
        store
    }

    struct Scripted {
        answers: Vec<bool>,
        asked: Vec<String>,
        balance: Option<Decimal>,
    }

    impl RolloverDecisions for Scripted {
        fn promote(&mut self, expense: &Expense) -> ServiceResult<bool> {
            self.asked.push(expense.id.to_string());
            if self.answers.is_empty() {
                return Err(ServiceError::Aborted);
            }
            Ok(self.answers.remove(0))
        }

        fn new_balance(&mut self, _current: Decimal) -> ServiceResult<Option<Decimal>> {
            Ok(self.balance)
        }
    }

    #[test]
    fn plan_asks_in_store_order() {
        let store = sample_store();
        let simulation = SimulationContext::new(Decimal::from(1000));
        let mut scripted = Scripted {
            answers: vec![false, true],
            asked: Vec::new(),
            balance: Some(Decimal::from(2000)),
        };
        let plan = RolloverService::plan(&store, &simulation, &mut scripted).unwrap();
        assert_eq!(scripted.asked, vec!["gift", "repair"]);
        assert!(plan.promote.contains(&ExpenseId::from("repair")));
        assert!(!plan.promote.contains(&ExpenseId::from("gift")));
        assert_eq!(plan.new_balance, Some(Decimal::from(2000)));
    }

    #[test]
    fn aborted_plan_surfaces_error() {
        let store = sample_store();
        let simulation = SimulationContext::default();
        let mut scripted = Scripted {
            answers: vec![true],
            asked: Vec::new(),
            balance: None,
        };
        let err = RolloverService::plan(&store, &simulation, &mut scripted)
            .expect_err("second prompt aborts");
        assert!(matches!(err, ServiceError::Aborted));
    }

    #[test]
    fn apply_resets_and_appends_promoted() {
        let mut store = sample_store();
        ExpenseService::pay(&mut store, &"rent".into()).expect("pay");
        store.find_mut(&"market".into()).unwrap().current_value = Decimal::from(20);
        let mut simulation = SimulationContext::new(Decimal::from(1000));

        let plan = RolloverPlan::new(vec![ExpenseId::from("repair")], Some(Decimal::from(2000)));
        let report = RolloverService::apply(&mut store, &mut simulation, &plan);

        assert_eq!(report.kept, 3);
        assert_eq!(report.promoted, vec!["repair"]);
        assert_eq!(report.dropped, vec!["gift"]);
        assert!(!report.balance_rejected);
        assert_eq!(simulation.initial_balance, Decimal::from(2000));
        assert!(simulation.period_started_at.is_some());

        let order: Vec<&str> = store.managed().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(order, vec!["rent", "market", "repair"]);
        for (index, expense) in store.managed().iter().enumerate() {
            assert_eq!(expense.sort_order as usize, index + 1);
            assert_eq!(expense.status, ExpenseStatus::Pending);
            assert_eq!(expense.current_value, expense.default_value);
            assert!(!expense.is_temporary);
        }
    }

    #[test]
    fn negative_balance_keeps_previous_value() {
        let mut store = sample_store();
        let mut simulation = SimulationContext::new(Decimal::from(800));
        let plan = RolloverPlan::new(Vec::new(), Some(Decimal::from(-1)));
        let report = RolloverService::apply(&mut store, &mut simulation, &plan);
        assert!(report.balance_rejected);
        assert_eq!(report.initial_balance, Decimal::from(800));
        assert_eq!(store.len(), 2);
        assert!(store.is_dense());
    }

    #[test]
    fn oversized_balance_keeps_previous_value() {
        let mut store = sample_store();
        let mut simulation = SimulationContext::new(Decimal::from(800));
        let plan = RolloverPlan::new(Vec::new(), Some(Decimal::MAX));
        let report = RolloverService::apply(&mut store, &mut simulation, &plan);
        assert!(report.balance_rejected);
        assert_eq!(simulation.initial_balance, Decimal::from(800));
    }
}
