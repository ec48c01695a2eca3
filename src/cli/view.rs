//! Console rendering of budget views.

use crate::cli::output;
use crate::config::Config;
use crate::core::services::Summary;
use crate::core::{BudgetView, Presenter};
use crate::currency::format_amount;
use crate::domain::{Expense, ExpenseStatus};

/// Prints a one-line summary after every change to the budget.
pub struct SummaryLinePresenter {
    config: Config,
}

impl SummaryLinePresenter {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

impl Presenter for SummaryLinePresenter {
    fn present(&mut self, view: &BudgetView) {
        output::hint(summary_line(&view.summary, &self.config));
    }
}

pub fn summary_line(summary: &Summary, config: &Config) -> String {
    format!(
        "Balance {} | Pending {} | Projection {}",
        format_amount(summary.balance, config),
        format_amount(summary.pending, config),
        format_amount(summary.projection, config)
    )
}

pub fn print_summary(summary: &Summary, config: &Config) {
    output::section("Summary");
    let rows = [
        ("Initial balance", summary.initial_balance),
        ("Paid", summary.paid),
        ("Balance", summary.balance),
        ("Pending", summary.pending),
        ("Projection", summary.projection),
        ("Ignored", summary.ignored),
    ];
    for (label, value) in rows {
        output::line(format!("  {:<16} {:>16}", label, format_amount(value, config)));
    }
}

/// Simulation list: open expenses first, paid ones last.
pub fn print_expenses(view: &BudgetView, config: &Config) {
    output::section("Expenses");
    if view.expenses.is_empty() {
        output::info("No expenses yet. Use `add` to create one.");
        return;
    }
    output::line(format!(
        "  {:<8} {:<20} {:>14} {:<8} {}",
        "ID", "NAME", "VALUE", "STATUS", "NOTES"
    ));
    for expense in &view.expenses {
        output::line(expense_row(expense, config));
    }
}

/// Management list: permanent expenses with their positions.
pub fn print_managed(view: &BudgetView, config: &Config) {
    output::section("Permanent expenses");
    if view.managed.is_empty() {
        output::info("No permanent expenses.");
        return;
    }
    output::line(format!(
        "  {:>3}  {:<8} {:<20} {:>14}",
        "#", "ID", "NAME", "DEFAULT"
    ));
    for expense in &view.managed {
        output::line(format!(
            "  {:>3}  {:<8} {:<20} {:>14}",
            expense.sort_order,
            expense.id.short(),
            expense.name,
            format_amount(expense.default_value, config)
        ));
    }
}

fn expense_row(expense: &Expense, config: &Config) -> String {
    let mut notes = Vec::new();
    if expense.is_temporary {
        notes.push("temporary".to_string());
    }
    if expense.is_overridden() && expense.status != ExpenseStatus::Ignored {
        notes.push(format!(
            "default {}",
            format_amount(expense.default_value, config)
        ));
    }
    format!(
        "  {:<8} {:<20} {:>14} {:<8} {}",
        expense.id.short(),
        expense.name,
        format_amount(expense.current_value, config),
        expense.status.label(),
        notes.join(", ")
    )
    .trim_end()
    .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn row_mentions_default_when_overridden() {
        let mut expense = Expense::with_id("abc", "Compras", Decimal::from(200), true);
        expense.current_value = Decimal::from(100);
        let row = expense_row(&expense, &Config::default());
        assert!(row.contains("R$ 100,00"));
        assert!(row.contains("temporary, default R$ 200,00"));
    }

    #[test]
    fn summary_line_formats_all_three_figures() {
        let summary = Summary {
            balance: Decimal::from(900),
            pending: Decimal::from(380),
            projection: Decimal::from(520),
            ignored: Decimal::from(100),
            paid: Decimal::from(100),
            initial_balance: Decimal::from(1000),
        };
        assert_eq!(
            summary_line(&summary, &Config::default()),
            "Balance R$ 900,00 | Pending R$ 380,00 | Projection R$ 520,00"
        );
    }
}
