//! Controller that owns the budget state.
//!
//! Every mutation goes through [`BudgetManager::execute`], which validates and
//! applies a [`BudgetCommand`], recomputes the summary, writes both documents
//! to storage and hands a fresh [`BudgetView`] to the presenter. Storage
//! failures are logged and remembered but never undo the in-memory change.

use rust_decimal::Decimal;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::core::seed;
use crate::core::services::{
    ExpenseService, RolloverDecisions, RolloverPlan, RolloverReport, RolloverService,
    ServiceResult, Summary, SummaryService,
};
use crate::core::store::ExpenseStore;
use crate::domain::{is_valid_amount, Expense, ExpenseId, ExpenseStatus, SimulationContext};
use crate::storage::StorageBackend;

/// Explicit state container for one budget.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BudgetState {
    pub store: ExpenseStore,
    pub simulation: SimulationContext,
}

/// Typed mutation requests accepted by the manager.
#[derive(Debug, Clone, PartialEq)]
pub enum BudgetCommand {
    AddExpense {
        name: String,
        value: Decimal,
        temporary: bool,
    },
    Pay(ExpenseId),
    ToggleIgnore(ExpenseId),
    EditValue {
        id: ExpenseId,
        value: Decimal,
    },
    Delete(ExpenseId),
    EditPermanent {
        id: ExpenseId,
        name: String,
        value: Decimal,
    },
    Reorder(Vec<ExpenseId>),
    SetInitialBalance(Decimal),
    Rollover(RolloverPlan),
}

impl BudgetCommand {
    fn label(&self) -> &'static str {
        match self {
            BudgetCommand::AddExpense { .. } => "add_expense",
            BudgetCommand::Pay(_) => "pay",
            BudgetCommand::ToggleIgnore(_) => "toggle_ignore",
            BudgetCommand::EditValue { .. } => "edit_value",
            BudgetCommand::Delete(_) => "delete",
            BudgetCommand::EditPermanent { .. } => "edit_permanent",
            BudgetCommand::Reorder(_) => "reorder",
            BudgetCommand::SetInitialBalance(_) => "set_initial_balance",
            BudgetCommand::Rollover(_) => "rollover",
        }
    }
}

/// Result of a successfully applied command.
#[derive(Debug, Clone, PartialEq)]
pub enum CommandOutcome {
    Added(ExpenseId),
    Paid(ExpenseId),
    StatusChanged { id: ExpenseId, status: ExpenseStatus },
    ValueEdited(ExpenseId),
    Deleted(Expense),
    Updated(ExpenseId),
    Reordered { moved: usize },
    BalanceSet(Decimal),
    RolledOver(RolloverReport),
}

/// Snapshot handed to the presenter after each mutation.
#[derive(Debug, Clone, PartialEq)]
pub struct BudgetView {
    pub summary: Summary,
    /// Simulation list order: open expenses first, paid ones last.
    pub expenses: Vec<Expense>,
    /// Non-temporary expenses in management order.
    pub managed: Vec<Expense>,
}

/// Rendering collaborator. Its outcome is not observed by the manager.
pub trait Presenter {
    fn present(&mut self, view: &BudgetView);
}

#[derive(Debug, Clone, PartialEq)]
pub struct ManagerOptions {
    /// Install the sample expenses when storage holds none.
    pub seed_defaults: bool,
    /// Balance used when the stored one is zero.
    pub default_initial_balance: Decimal,
}

impl Default for ManagerOptions {
    fn default() -> Self {
        Self {
            seed_defaults: true,
            default_initial_balance: seed::default_initial_balance(),
        }
    }
}

impl ManagerOptions {
    /// Starts from an empty budget with a zero balance.
    pub fn blank() -> Self {
        Self {
            seed_defaults: false,
            default_initial_balance: Decimal::ZERO,
        }
    }

    pub fn from_config(config: &Config) -> Self {
        Self {
            seed_defaults: config.seed_defaults,
            default_initial_balance: config.default_initial_balance,
        }
    }
}

pub struct BudgetManager {
    state: BudgetState,
    summary: Summary,
    storage: Box<dyn StorageBackend>,
    presenter: Option<Box<dyn Presenter>>,
    last_persist_error: Option<String>,
}

impl BudgetManager {
    /// Loads the budget from `storage`. Unreadable documents degrade to an
    /// empty list or a zero balance and invalid records are dropped or
    /// repaired; defaults are then applied and written back when anything
    /// was seeded.
    pub fn open(storage: Box<dyn StorageBackend>, options: ManagerOptions) -> Self {
        let expenses = storage.load_expenses().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load expenses; starting with an empty list");
            Vec::new()
        });
        let mut simulation = storage.load_simulation().unwrap_or_else(|err| {
            warn!(error = %err, "failed to load simulation data; using defaults");
            SimulationContext::default()
        });
        if !is_valid_amount(simulation.initial_balance) {
            warn!(
                balance = %simulation.initial_balance,
                "stored initial balance is out of range; resetting to zero"
            );
            simulation.initial_balance = Decimal::ZERO;
        }

        let mut state = BudgetState {
            store: ExpenseStore::from_expenses(expenses),
            simulation,
        };

        let mut seeded = false;
        if options.seed_defaults && state.store.is_empty() {
            state.store.replace_all(seed::default_expenses());
            seeded = true;
            info!(count = state.store.len(), "seeded sample expenses");
        }
        if state.simulation.initial_balance.is_zero()
            && !options.default_initial_balance.is_zero()
        {
            state.simulation.initial_balance = options.default_initial_balance;
            state.simulation.start_period();
            seeded = true;
            info!(balance = %options.default_initial_balance, "applied default initial balance");
        }

        let summary =
            SummaryService::compute(state.store.iter(), state.simulation.initial_balance);
        let mut manager = Self {
            state,
            summary,
            storage,
            presenter: None,
            last_persist_error: None,
        };
        if seeded {
            manager.persist();
        }
        debug!(expenses = manager.state.store.len(), "budget opened");
        manager
    }

    /// Attaches a presenter and renders the current state immediately.
    pub fn set_presenter(&mut self, presenter: Box<dyn Presenter>) {
        self.presenter = Some(presenter);
        self.notify();
    }

    pub fn state(&self) -> &BudgetState {
        &self.state
    }

    pub fn store(&self) -> &ExpenseStore {
        &self.state.store
    }

    pub fn simulation(&self) -> &SimulationContext {
        &self.state.simulation
    }

    pub fn summary(&self) -> Summary {
        self.summary
    }

    pub fn view(&self) -> BudgetView {
        BudgetView {
            summary: self.summary,
            expenses: self.state.store.display_order().into_iter().cloned().collect(),
            managed: self.state.store.managed().into_iter().cloned().collect(),
        }
    }

    /// Message of the most recent failed write, cleared by the next
    /// successful one.
    pub fn persistence_error(&self) -> Option<&str> {
        self.last_persist_error.as_deref()
    }

    /// Resolves an exact id or a unique id prefix.
    pub fn resolve_id(&self, token: &str) -> ServiceResult<ExpenseId> {
        self.state.store.resolve(token)
    }

    /// Applies `command`. On error nothing was changed, written or rendered.
    pub fn execute(&mut self, command: BudgetCommand) -> ServiceResult<CommandOutcome> {
        let label = command.label();
        debug!(command = label, "executing command");
        let outcome = self.apply(command)?;
        self.commit();
        debug!(command = label, "command applied");
        Ok(outcome)
    }

    /// Gathers a rollover plan from `decisions` and applies it. An aborted
    /// prompt returns the error and leaves the budget untouched.
    pub fn rollover(
        &mut self,
        decisions: &mut dyn RolloverDecisions,
    ) -> ServiceResult<RolloverReport> {
        let plan = RolloverService::plan(&self.state.store, &self.state.simulation, decisions)?;
        debug!(promote = plan.promote.len(), "rollover plan gathered");
        let report =
            RolloverService::apply(&mut self.state.store, &mut self.state.simulation, &plan);
        self.commit();
        Ok(report)
    }

    /// Writes both documents, attempting each even when the other fails.
    /// Failures are logged and recorded; the in-memory state is kept either
    /// way.
    pub fn persist(&mut self) -> bool {
        let mut failures = Vec::new();
        if let Err(err) = self.storage.save_expenses(self.state.store.as_slice()) {
            warn!(error = %err, "failed to persist expenses");
            failures.push(err.to_string());
        }
        if let Err(err) = self.storage.save_simulation(&self.state.simulation) {
            warn!(error = %err, "failed to persist simulation data");
            failures.push(err.to_string());
        }
        if failures.is_empty() {
            self.last_persist_error = None;
            true
        } else {
            self.last_persist_error = Some(failures.join("; "));
            false
        }
    }

    fn apply(&mut self, command: BudgetCommand) -> ServiceResult<CommandOutcome> {
        let BudgetState { store, simulation } = &mut self.state;
        let outcome = match command {
            BudgetCommand::AddExpense {
                name,
                value,
                temporary,
            } => CommandOutcome::Added(ExpenseService::add(store, &name, value, temporary)?),
            BudgetCommand::Pay(id) => {
                ExpenseService::pay(store, &id)?;
                CommandOutcome::Paid(id)
            }
            BudgetCommand::ToggleIgnore(id) => {
                let status = ExpenseService::toggle_ignore(store, &id)?;
                CommandOutcome::StatusChanged { id, status }
            }
            BudgetCommand::EditValue { id, value } => {
                ExpenseService::edit_value(store, &id, value)?;
                CommandOutcome::ValueEdited(id)
            }
            BudgetCommand::Delete(id) => CommandOutcome::Deleted(ExpenseService::delete(store, &id)?),
            BudgetCommand::EditPermanent { id, name, value } => {
                ExpenseService::edit_permanent(store, &id, &name, value)?;
                CommandOutcome::Updated(id)
            }
            BudgetCommand::Reorder(ids) => CommandOutcome::Reordered {
                moved: ExpenseService::reorder(store, &ids)?,
            },
            BudgetCommand::SetInitialBalance(value) => {
                ExpenseService::set_initial_balance(simulation, value)?;
                CommandOutcome::BalanceSet(value)
            }
            BudgetCommand::Rollover(plan) => {
                CommandOutcome::RolledOver(RolloverService::apply(store, simulation, &plan))
            }
        };
        Ok(outcome)
    }

    fn commit(&mut self) {
        self.summary =
            SummaryService::compute(self.state.store.iter(), self.state.simulation.initial_balance);
        self.persist();
        self.notify();
    }

    fn notify(&mut self) {
        if self.presenter.is_none() {
            return;
        }
        let view = self.view();
        if let Some(presenter) = self.presenter.as_mut() {
            presenter.present(&view);
        }
    }
}
