use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::{Expense, ExpenseStatus};

/// Financial metrics derived from the expense set and the initial balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Initial balance minus everything already paid.
    pub balance: Decimal,
    pub pending: Decimal,
    /// Balance left once every pending expense is paid.
    pub projection: Decimal,
    /// Face value of ignored expenses plus discounts on the rest.
    pub ignored: Decimal,
    pub paid: Decimal,
    pub initial_balance: Decimal,
}

pub struct SummaryService;

impl SummaryService {
    /// Single pass over `expenses`. Discounts on pending or paid expenses are
    /// counted as savings alongside the face value of ignored ones. Sums
    /// saturate at the `Decimal` bounds.
    pub fn compute<'a, I>(expenses: I, initial_balance: Decimal) -> Summary
    where
        I: IntoIterator<Item = &'a Expense>,
    {
        let mut pending = Decimal::ZERO;
        let mut paid = Decimal::ZERO;
        let mut ignored = Decimal::ZERO;

        for expense in expenses {
            match expense.status {
                ExpenseStatus::Pending => pending = pending.saturating_add(expense.current_value),
                ExpenseStatus::Paid => paid = paid.saturating_add(expense.current_value),
                ExpenseStatus::Ignored => ignored = ignored.saturating_add(expense.default_value),
            }
            if !expense.is_ignored() {
                ignored = ignored.saturating_add(expense.discount());
            }
        }

        let balance = initial_balance.saturating_sub(paid);
        Summary {
            balance,
            pending,
            projection: balance.saturating_sub(pending),
            ignored,
            paid,
            initial_balance,
        }
    }
}
