//! Ordered, in-memory collection of expenses.
//!
//! Insertion order is preserved and doubles as the tie-break for every
//! ordering operation. Non-temporary expenses additionally carry a dense
//! `sort_order` (`1..=N`) that the store keeps consistent across removals,
//! reorders and bulk replacements.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::core::services::{ServiceError, ServiceResult};
use crate::domain::{Expense, ExpenseId};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ExpenseStore {
    expenses: Vec<Expense>,
}

impl ExpenseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a store from loaded records. Records with out-of-range amounts
    /// and later duplicates of an id are dropped, ignored expenses are reset
    /// to their default value and ordering gaps are closed.
    pub fn from_expenses(expenses: Vec<Expense>) -> Self {
        let mut seen = HashSet::new();
        let mut kept = Vec::with_capacity(expenses.len());
        for mut expense in expenses {
            if !expense.has_valid_amounts() {
                warn!(id = %expense.id, "dropping stored expense with an out-of-range amount");
                continue;
            }
            if !seen.insert(expense.id.clone()) {
                warn!(id = %expense.id, "dropping stored expense with a duplicate id");
                continue;
            }
            if expense.is_ignored() && expense.is_overridden() {
                warn!(id = %expense.id, "resetting ignored expense to its default value");
                expense.current_value = expense.default_value;
            }
            kept.push(expense);
        }
        let mut store = Self { expenses: kept };
        store.resequence();
        store
    }

    pub fn len(&self) -> usize {
        self.expenses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.expenses.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Expense> {
        self.expenses.iter()
    }

    pub fn as_slice(&self) -> &[Expense] {
        &self.expenses
    }

    pub fn permanent_count(&self) -> usize {
        self.expenses.iter().filter(|e| !e.is_temporary).count()
    }

    /// Appends an expense. Non-temporary expenses are placed after the
    /// current permanent set.
    pub fn add(&mut self, mut expense: Expense) -> ServiceResult<&Expense> {
        if self.contains(&expense.id) {
            return Err(ServiceError::Invalid(format!(
                "Expense `{}` already exists",
                expense.id
            )));
        }
        expense.sort_order = if expense.is_temporary {
            0
        } else {
            next_position(self.permanent_count())
        };
        self.expenses.push(expense);
        let index = self.expenses.len() - 1;
        Ok(&self.expenses[index])
    }

    /// Deletes the expense and closes the gap it leaves in the ordering.
    pub fn remove(&mut self, id: &ExpenseId) -> Option<Expense> {
        let index = self.expenses.iter().position(|e| &e.id == id)?;
        let removed = self.expenses.remove(index);
        self.resequence();
        Some(removed)
    }

    pub fn find(&self, id: &ExpenseId) -> Option<&Expense> {
        self.expenses.iter().find(|e| &e.id == id)
    }

    pub fn find_mut(&mut self, id: &ExpenseId) -> Option<&mut Expense> {
        self.expenses.iter_mut().find(|e| &e.id == id)
    }

    pub fn contains(&self, id: &ExpenseId) -> bool {
        self.find(id).is_some()
    }

    /// Resolves a user-typed token to an id: an exact match wins, otherwise
    /// the token must be a prefix of exactly one id.
    pub fn resolve(&self, token: &str) -> ServiceResult<ExpenseId> {
        let token = token.trim();
        if token.is_empty() {
            return Err(ServiceError::Invalid("Expense id is required".into()));
        }
        if let Some(expense) = self.expenses.iter().find(|e| e.id.as_str() == token) {
            return Ok(expense.id.clone());
        }
        let mut matches = self
            .expenses
            .iter()
            .filter(|e| e.id.as_str().starts_with(token));
        match (matches.next(), matches.next()) {
            (Some(expense), None) => Ok(expense.id.clone()),
            (Some(_), Some(_)) => Err(ServiceError::Invalid(format!(
                "Id prefix `{}` matches more than one expense",
                token
            ))),
            (None, _) => Err(ServiceError::NotFound(ExpenseId::from(token))),
        }
    }

    /// Applies a new management order. Listed permanent ids take positions
    /// `1..=k` in the order given; unknown and temporary ids are skipped and
    /// permanent ids missing from the list follow in their previous order.
    /// Returns the number of expenses whose position changed.
    pub fn reorder(&mut self, ids: &[ExpenseId]) -> usize {
        let mut seen = HashSet::new();
        let mut ranked: Vec<ExpenseId> = ids
            .iter()
            .filter(|id| {
                self.find(id)
                    .map(|expense| !expense.is_temporary)
                    .unwrap_or(false)
            })
            .filter(|id| seen.insert((*id).clone()))
            .cloned()
            .collect();
        ranked.extend(
            self.managed()
                .into_iter()
                .filter(|expense| !seen.contains(&expense.id))
                .map(|expense| expense.id.clone())
                .collect::<Vec<_>>(),
        );

        let mut changed = 0;
        for (index, id) in ranked.iter().enumerate() {
            if let Some(expense) = self.find_mut(id) {
                let position = next_position(index);
                if expense.sort_order != position {
                    expense.sort_order = position;
                    changed += 1;
                }
            }
        }
        changed
    }

    /// Bulk overwrite used by rollover and loading.
    pub fn replace_all(&mut self, expenses: Vec<Expense>) {
        self.expenses = expenses;
        self.resequence();
    }

    /// Non-temporary expenses in management order.
    pub fn managed(&self) -> Vec<&Expense> {
        let mut permanent: Vec<(usize, &Expense)> = self
            .expenses
            .iter()
            .enumerate()
            .filter(|(_, e)| !e.is_temporary)
            .collect();
        permanent.sort_by_key(|(index, e)| (e.sort_order, *index));
        permanent.into_iter().map(|(_, e)| e).collect()
    }

    pub fn temporary(&self) -> Vec<&Expense> {
        self.expenses.iter().filter(|e| e.is_temporary).collect()
    }

    /// Order used by the simulation list: permanent expenses by position,
    /// then temporaries as inserted, with paid expenses sunk to the bottom.
    pub fn display_order(&self) -> Vec<&Expense> {
        let mut ordered = self.managed();
        ordered.extend(self.temporary());
        let (paid, open): (Vec<&Expense>, Vec<&Expense>) =
            ordered.into_iter().partition(|e| e.is_paid());
        open.into_iter().chain(paid).collect()
    }

    /// Renumbers non-temporary expenses to `1..=N`, keeping their relative
    /// order; temporary expenses are reset to zero.
    pub fn resequence(&mut self) {
        let order: Vec<ExpenseId> = self.managed().iter().map(|e| e.id.clone()).collect();
        for (index, id) in order.iter().enumerate() {
            if let Some(expense) = self.find_mut(id) {
                expense.sort_order = next_position(index);
            }
        }
        for expense in self.expenses.iter_mut().filter(|e| e.is_temporary) {
            expense.sort_order = 0;
        }
    }

    /// True when non-temporary positions form exactly `1..=N`.
    pub fn is_dense(&self) -> bool {
        self.managed()
            .iter()
            .enumerate()
            .all(|(index, e)| e.sort_order == next_position(index))
    }
}

fn next_position(index: usize) -> u32 {
    u32::try_from(index).map_or(u32::MAX, |value| value.saturating_add(1))
}
