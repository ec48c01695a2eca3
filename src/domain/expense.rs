use std::fmt;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::domain::common::{Displayable, ExpenseId};

/// Largest amount accepted for an expense value or a balance (one trillion).
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xD4A5_1000, 0xE8, 0, false, 0);

/// True when `value` lies in `0..=MAX_AMOUNT`.
pub fn is_valid_amount(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= MAX_AMOUNT
}

/// Settlement state of an expense within the current period.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum ExpenseStatus {
    #[default]
    Pending,
    Paid,
    Ignored,
}

impl ExpenseStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ExpenseStatus::Pending => "pending",
            ExpenseStatus::Paid => "paid",
            ExpenseStatus::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ExpenseStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A tracked obligation with a baseline amount, an effective amount for the
/// current period and a settlement status.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    pub id: ExpenseId,
    pub name: String,
    #[serde(with = "rust_decimal::serde::float")]
    pub default_value: Decimal,
    #[serde(with = "rust_decimal::serde::float")]
    pub current_value: Decimal,
    #[serde(default)]
    pub status: ExpenseStatus,
    #[serde(default)]
    pub is_temporary: bool,
    /// Position among non-temporary expenses; meaningless for temporary ones.
    #[serde(default)]
    pub sort_order: u32,
}

impl Expense {
    /// Creates a pending expense whose current value equals its default.
    pub fn new(name: impl Into<String>, value: Decimal, is_temporary: bool) -> Self {
        Self::with_id(ExpenseId::generate(), name, value, is_temporary)
    }

    pub fn with_id(
        id: impl Into<ExpenseId>,
        name: impl Into<String>,
        value: Decimal,
        is_temporary: bool,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            default_value: value,
            current_value: value,
            status: ExpenseStatus::Pending,
            is_temporary,
            sort_order: 0,
        }
    }

    pub fn is_pending(&self) -> bool {
        self.status == ExpenseStatus::Pending
    }

    pub fn is_paid(&self) -> bool {
        self.status == ExpenseStatus::Paid
    }

    pub fn is_ignored(&self) -> bool {
        self.status == ExpenseStatus::Ignored
    }

    /// Both values are within the accepted range.
    pub fn has_valid_amounts(&self) -> bool {
        is_valid_amount(self.default_value) && is_valid_amount(self.current_value)
    }

    /// True when the current value differs from the baseline.
    pub fn is_overridden(&self) -> bool {
        self.current_value != self.default_value
    }

    /// Amount shaved off the baseline by a manual edit (zero when the
    /// current value is at or above the default).
    pub fn discount(&self) -> Decimal {
        if self.current_value < self.default_value {
            self.default_value - self.current_value
        } else {
            Decimal::ZERO
        }
    }

    /// Returns the expense to the start-of-period state.
    pub fn reset_for_period(&mut self) {
        self.status = ExpenseStatus::Pending;
        self.current_value = self.default_value;
    }
}

impl Displayable for Expense {
    fn display_label(&self) -> String {
        let kind = if self.is_temporary { "temporary" } else { "fixed" };
        format!("{} [{}, {}]", self.name, kind, self.status)
    }
}
