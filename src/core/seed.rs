use rust_decimal::Decimal;

use crate::domain::Expense;

/// Balance used when no balance has ever been stored.
pub const DEFAULT_INITIAL_BALANCE: i64 = 5000;

/// Sample expenses installed on first run.
pub fn default_expenses() -> Vec<Expense> {
    let rows = [
        ("1", "Aluguel", Decimal::from(380)),
        ("2", "Compras", Decimal::from(200)),
        ("3", "Internet", Decimal::from(120)),
        ("4", "Energia", Decimal::from(200)),
        ("5", "PicPay", Decimal::from(4260)),
        ("6", "Nubank", Decimal::new(166034, 2)),
    ];
    rows.into_iter()
        .zip(1u32..)
        .map(|((id, name, value), position)| {
            let mut expense = Expense::with_id(id, name, value, false);
            expense.sort_order = position;
            expense
        })
        .collect()
}

pub fn default_initial_balance() -> Decimal {
    Decimal::from(DEFAULT_INITIAL_BALANCE)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::store::ExpenseStore;

    #[test]
    fn seed_has_six_dense_permanent_expenses() {
        let store = ExpenseStore::from_expenses(default_expenses());
        assert_eq!(store.len(), 6);
        assert_eq!(store.permanent_count(), 6);
        assert!(store.is_dense());
        assert!(store.iter().all(|e| e.is_pending() && !e.is_overridden()));
    }
}
