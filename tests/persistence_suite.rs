mod common;

use common::{date, temp_store, today, FailingStore};
use serde_json::Value;
use wise_ledger::{
    config::{ConfigManager, Settings},
    errors::LedgerError,
    ledger::{BudgetGroup, EntryKind, NewBudgetCategory, NewEntry},
    storage::{
        load_ledger, KeyValueStore, MemoryStore, BUDGET_KEY, CURRENT_SCHEMA_VERSION, ENTRIES_KEY,
        UNREADABLE_SUFFIX,
    },
    FixedClock, LedgerEngine,
};

fn open(store: impl KeyValueStore + 'static) -> LedgerEngine {
    LedgerEngine::open_or_default(Box::new(store), Box::new(FixedClock(today())))
}

#[test]
fn file_store_roundtrips_entries_and_budget() {
    let store = temp_store();
    let mut engine = open(store.clone());
    engine.set_total_budget(400_000).unwrap();
    engine
        .add_category(NewBudgetCategory::new("Groceries", 60_000))
        .unwrap();
    engine
        .add(NewEntry::expense("Market", 12_550, "Groceries").on(date(2024, 1, 3)))
        .unwrap();
    engine.add(NewEntry::income("Pay", 260_000, "Salary")).unwrap();

    assert!(store.document_path(ENTRIES_KEY).exists());
    assert!(store.document_path(BUDGET_KEY).exists());

    let reopened = open(store);
    assert_eq!(reopened.ledger(), engine.ledger());
}

#[test]
fn documents_on_disk_are_versioned_json() {
    let store = temp_store();
    let mut engine = open(store.clone());
    engine.add(NewEntry::income("Pay", 100, "Salary")).unwrap();

    let raw = std::fs::read_to_string(store.document_path(ENTRIES_KEY)).unwrap();
    let value: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(value["schema_version"], CURRENT_SCHEMA_VERSION);
    assert_eq!(value["entries"][0]["kind"], "income");
    assert_eq!(value["entries"][0]["amount"], 100);
}

#[test]
fn legacy_transaction_array_is_migrated() {
    let raw = r#"[
        {"id": "5b0d3f4e-8c1a-4d8e-9f6b-2a7c1e3d4b5a", "description": "Salary", "amount": 2600, "type": "income", "category": "Salary", "date": "2024-01-01T09:00:00.000Z"},
        {"id": "0c6a1b2d-3e4f-4a5b-8c7d-9e0f1a2b3c4d", "description": "Grocery Store", "amount": 85.5, "type": "expense", "category": "Food & Dining", "date": "2024-01-02T10:15:00.000Z"}
    ]"#;
    let store = MemoryStore::with_value(ENTRIES_KEY, raw);
    let (engine, report) =
        LedgerEngine::open(Box::new(store.clone()), Box::new(FixedClock(today()))).unwrap();

    assert_eq!(report.migrations.len(), 1);
    assert!(report.warnings.is_empty());
    let totals = engine.totals();
    assert_eq!(totals.total_balance, 251_450);
    assert_eq!(engine.entries()[1].group, Some(BudgetGroup::Wants));
    assert_eq!(
        engine.entries()[0].id.to_string(),
        "5b0d3f4e-8c1a-4d8e-9f6b-2a7c1e3d4b5a"
    );
}

#[test]
fn legacy_expense_and_income_shapes_are_migrated() {
    let raw = r#"[
        {"id": 1, "description": "Whole Foods Market", "amount": 12550, "category": "Groceries", "group": "Needs", "date": "2024-01-15"},
        {"id": 2, "description": "Concert", "amount": 4500, "category": "Entertainment", "date": "2024-01-12"},
        {"id": 3, "description": "Freelance project", "amount": 150000, "source": "Freelance", "taxable": true, "date": "2024-01-10"}
    ]"#;
    let report = load_ledger(&MemoryStore::with_value(ENTRIES_KEY, raw)).unwrap();
    let entries = &report.ledger.entries;
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[0].group, Some(BudgetGroup::Needs));
    assert_eq!(entries[1].group, Some(BudgetGroup::Wants));
    assert_eq!(entries[2].kind, EntryKind::Income);
    assert_eq!(entries[2].category, "Freelance");
    assert_eq!(entries[2].group, None);
}

#[test]
fn migrated_documents_are_rewritten_on_next_mutation() {
    let raw = r#"[{"id": 1, "description": "Bus", "amount": 300, "category": "Transportation", "date": "2024-01-04"}]"#;
    let store = MemoryStore::with_value(ENTRIES_KEY, raw);
    let mut engine = open(store.clone());
    engine.add(NewEntry::expense("Train", 450, "Transportation")).unwrap();

    let value: Value = serde_json::from_str(&store.get(ENTRIES_KEY).unwrap().unwrap()).unwrap();
    assert_eq!(value["schema_version"], CURRENT_SCHEMA_VERSION);
    assert_eq!(value["entries"].as_array().unwrap().len(), 2);
}

#[test]
fn newer_schema_fails_open_but_default_open_starts_empty() {
    let raw = format!(
        r#"{{"schema_version": {}, "entries": []}}"#,
        CURRENT_SCHEMA_VERSION + 1
    );
    let store = MemoryStore::with_value(ENTRIES_KEY, raw);
    let result = LedgerEngine::open(Box::new(store.clone()), Box::new(FixedClock(today())));
    assert!(matches!(result, Err(LedgerError::Persistence(_))));

    let engine = open(store);
    assert!(engine.entries().is_empty());
}

#[test]
fn newer_schema_document_survives_later_writes() {
    let raw = r#"{"schema_version": 3, "entries": [{"precious": true}]}"#;
    let store = temp_store();
    store.set(ENTRIES_KEY, raw).unwrap();

    let mut engine = open(store.clone());
    engine.add(NewEntry::income("Pay", 100, "Salary")).unwrap();

    let backup = format!("{ENTRIES_KEY}{UNREADABLE_SUFFIX}");
    assert_eq!(store.get(&backup).unwrap().as_deref(), Some(raw));
    assert!(store.document_path(&backup).exists());
    let reopened = open(store);
    assert_eq!(reopened.entries().len(), 1);
}

#[test]
fn write_failures_are_swallowed() {
    let mut engine = open(FailingStore);
    let id = engine.add(NewEntry::income("Pay", 1_000, "Salary")).unwrap();
    engine.set_total_budget(500).unwrap();
    engine.add_category(NewBudgetCategory::new("Housing", 500)).unwrap();
    assert!(engine.delete(id));
    assert_eq!(engine.categories().len(), 1);
}

#[test]
fn over_allocated_documents_load_with_a_warning() {
    let raw = r#"{"schema_version": 2, "total_budget": 100, "categories": [
        {"id": "8f14e45f-ceea-467f-a0e6-1d2a3b4c5d6e", "name": "Housing", "group": "Needs", "allocated_amount": 500}
    ]}"#;
    let report = load_ledger(&MemoryStore::with_value(BUDGET_KEY, raw)).unwrap();
    assert_eq!(report.ledger.categories.len(), 1);
    assert_eq!(report.warnings.len(), 1);
}

#[test]
fn settings_share_the_store() {
    let store = temp_store();
    let manager = ConfigManager::new(&store);
    let settings = Settings {
        budget_reset_day: 28,
        ..Settings::default()
    };
    manager.save_settings(&settings).unwrap();
    assert_eq!(ConfigManager::new(&store).load_settings().unwrap(), settings);
}
