mod common;

use std::fs;

use budget_sim::{
    core::{BudgetCommand, ManagerOptions},
    domain::ExpenseStatus,
    storage::StorageBackend,
};
use rust_decimal::Decimal;

#[test]
fn first_session_writes_seed_data() {
    let (storage, base) = common::json_storage();
    let manager = common::open_manager(&base, ManagerOptions::default());
    assert_eq!(manager.store().len(), 6);

    let stored = storage.load_expenses().expect("load seeded expenses");
    assert_eq!(stored.len(), 6);
    assert_eq!(stored[5].name, "Nubank");
    assert_eq!(stored[5].default_value, Decimal::new(166034, 2));
    assert_eq!(
        storage.load_simulation().unwrap().initial_balance,
        Decimal::from(5000)
    );
}

#[test]
fn changes_survive_a_restart() {
    let base = common::temp_home();
    {
        let mut manager = common::open_manager(&base, ManagerOptions::default());
        manager.execute(BudgetCommand::Pay("1".into())).unwrap();
        manager
            .execute(BudgetCommand::EditValue {
                id: "2".into(),
                value: Decimal::new(15075, 2),
            })
            .unwrap();
        manager
            .execute(BudgetCommand::SetInitialBalance(Decimal::from(6100)))
            .unwrap();
        manager
            .execute(BudgetCommand::Reorder(vec!["4".into()]))
            .unwrap();
    }

    let manager = common::open_manager(&base, ManagerOptions::default());
    let store = manager.store();
    assert_eq!(store.find(&"1".into()).unwrap().status, ExpenseStatus::Paid);
    assert_eq!(
        store.find(&"2".into()).unwrap().current_value,
        Decimal::new(15075, 2)
    );
    assert_eq!(store.managed()[0].id.as_str(), "4");
    assert_eq!(manager.simulation().initial_balance, Decimal::from(6100));
    assert_eq!(manager.summary().paid, Decimal::from(380));
}

#[test]
fn documents_use_camel_case_fields() {
    let (storage, base) = common::json_storage();
    let _manager = common::open_manager(&base, ManagerOptions::default());
    let raw = fs::read_to_string(storage.expenses_path()).unwrap();
    assert!(raw.contains("\"defaultValue\""));
    assert!(raw.contains("\"currentValue\""));
    assert!(raw.contains("\"isTemporary\""));
    assert!(raw.contains("\"sortOrder\""));
    let raw = fs::read_to_string(storage.simulation_path()).unwrap();
    assert!(raw.contains("\"initialBalance\""));
}

#[test]
fn corrupt_expenses_degrade_to_seed() {
    let (storage, base) = common::json_storage();
    fs::write(storage.expenses_path(), "[{\"broken\": true").unwrap();

    let manager = common::open_manager(&base, ManagerOptions::default());
    assert_eq!(manager.store().len(), 6);
    assert!(storage.load_expenses().is_ok());
}

#[test]
fn corrupt_expenses_degrade_to_empty_without_seeding() {
    let (storage, base) = common::json_storage();
    fs::write(storage.expenses_path(), "not json").unwrap();

    let manager = common::open_manager(&base, ManagerOptions::blank());
    assert!(manager.store().is_empty());
    assert_eq!(manager.summary().projection, Decimal::ZERO);
}

#[test]
fn legacy_documents_without_optional_fields_load() {
    let (storage, base) = common::json_storage();
    fs::write(
        storage.expenses_path(),
        r#"[{"id":"9","name":"Academia","defaultValue":90,"currentValue":90}]"#,
    )
    .unwrap();
    fs::write(storage.simulation_path(), r#"{"initialBalance":1200}"#).unwrap();

    let manager = common::open_manager(&base, ManagerOptions::default());
    let gym = manager.store().find(&"9".into()).unwrap();
    assert!(gym.is_pending());
    assert!(!gym.is_temporary);
    assert_eq!(gym.sort_order, 1);
    assert_eq!(manager.summary().projection, Decimal::from(1110));
}

#[test]
fn invalid_stored_records_are_dropped_or_repaired() {
    let (storage, base) = common::json_storage();
    fs::write(
        storage.expenses_path(),
        r#"[
            {"id":"x","name":"A","defaultValue":10,"currentValue":10},
            {"id":"x","name":"B","defaultValue":20,"currentValue":20},
            {"id":"n","name":"Refund","defaultValue":50,"currentValue":-50},
            {"id":"i","name":"Gym","defaultValue":90,"currentValue":40,"status":"ignored"}
        ]"#,
    )
    .unwrap();
    fs::write(storage.simulation_path(), r#"{"initialBalance":-300}"#).unwrap();

    let mut manager = common::open_manager(&base, ManagerOptions::blank());
    let names: Vec<_> = manager.store().iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["A", "Gym"]);
    assert_eq!(manager.summary().pending, Decimal::from(10));
    assert_eq!(manager.summary().ignored, Decimal::from(90));
    assert_eq!(manager.simulation().initial_balance, Decimal::ZERO);

    manager.execute(BudgetCommand::Delete("x".into())).unwrap();
    assert!(manager.store().find(&"x".into()).is_none());
    let stored = storage.load_expenses().unwrap();
    assert_eq!(stored.len(), 1);
    assert_eq!(stored[0].current_value, Decimal::from(90));
}
