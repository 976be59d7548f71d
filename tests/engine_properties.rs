mod common;

use common::{date, memory_engine};
use uuid::Uuid;
use wise_ledger::{
    currency::MAX_AMOUNT,
    errors::ValidationError,
    ledger::{BudgetCategoryPatch, BudgetGroup, EntryKind, EntryPatch, NewBudgetCategory, NewEntry},
    LedgerEngine,
};

fn signed_sum(engine: &LedgerEngine) -> i64 {
    engine.entries().iter().map(|entry| entry.signed_amount()).sum()
}

#[test]
fn dashboard_scenario_totals() {
    let (mut engine, _store) = memory_engine();
    engine
        .add(NewEntry::income("Monthly salary", 260_000, "Salary").on(date(2024, 1, 1)))
        .unwrap();
    engine
        .add(NewEntry::expense("Foods Market", 8_550, "Groceries").on(date(2024, 1, 2)))
        .unwrap();

    let totals = engine.totals();
    assert_eq!(totals.total_balance, 251_450);
    assert_eq!(totals.monthly_income, 260_000);
    assert_eq!(totals.monthly_expenses, 8_550);
    assert!((totals.budget_progress_percent - 3.29).abs() < 0.01);
    assert_eq!(totals.month.to_string(), "2024-01");
}

#[test]
fn balance_tracks_signed_sum_through_mutations() {
    let (mut engine, _store) = memory_engine();
    let mut ids = Vec::new();
    for (index, amount) in [1_000, 250, 7_300, 45, 9_999, 120].into_iter().enumerate() {
        let entry = if index % 2 == 0 {
            NewEntry::income(format!("in {index}"), amount, "Salary")
        } else {
            NewEntry::expense(format!("out {index}"), amount, "Groceries")
        };
        ids.push(engine.add(entry).unwrap());
        assert_eq!(engine.totals().total_balance, signed_sum(&engine));
    }

    let flip = EntryPatch {
        kind: Some(EntryKind::Expense),
        amount: Some(5_000),
        ..EntryPatch::default()
    };
    assert!(engine.update(ids[0], flip).unwrap());
    assert_eq!(engine.totals().total_balance, signed_sum(&engine));

    assert!(engine.delete(ids[3]));
    assert!(engine.delete(ids[4]));
    assert_eq!(engine.totals().total_balance, signed_sum(&engine));
    assert_eq!(engine.entries().len(), 4);
}

#[test]
fn add_then_delete_restores_the_collection() {
    let (mut engine, _store) = memory_engine();
    engine.add(NewEntry::income("Pay", 10_000, "Salary")).unwrap();
    engine.add(NewEntry::expense("Bus", 300, "Transportation")).unwrap();
    let before = engine.entries().to_vec();

    let id = engine.add(NewEntry::expense("Cinema", 1_200, "Entertainment")).unwrap();
    assert_eq!(engine.entries()[0].id, id);
    assert!(engine.delete(id));
    assert_eq!(engine.entries(), before.as_slice());
}

#[test]
fn empty_patch_and_missing_ids_are_noops() {
    let (mut engine, _store) = memory_engine();
    let id = engine.add(NewEntry::income("Pay", 10_000, "Salary")).unwrap();
    let before = engine.entries().to_vec();

    assert!(!engine.update(id, EntryPatch::default()).unwrap());
    let patch = EntryPatch {
        description: Some("Bonus".into()),
        ..EntryPatch::default()
    };
    assert!(!engine.update(Uuid::new_v4(), patch).unwrap());
    assert!(!engine.delete(Uuid::new_v4()));
    assert_eq!(engine.entries(), before.as_slice());
}

#[test]
fn progress_percent_stays_within_bounds() {
    let (mut engine, _store) = memory_engine();
    assert_eq!(engine.totals().budget_progress_percent, 0.0);

    engine.add(NewEntry::expense("Rent", 150_000, "Housing")).unwrap();
    assert_eq!(engine.totals().budget_progress_percent, 0.0);

    engine.add(NewEntry::income("Pay", 100_000, "Salary")).unwrap();
    assert_eq!(engine.totals().budget_progress_percent, 100.0);

    engine.add(NewEntry::income("Bonus", 200_000, "Salary")).unwrap();
    let percent = engine.totals().budget_progress_percent;
    assert!((0.0..=100.0).contains(&percent));
    assert!((percent - 50.0).abs() < 1e-9);
}

#[test]
fn entries_outside_the_current_month_only_move_the_balance() {
    let (mut engine, _store) = memory_engine();
    engine
        .add(NewEntry::income("December pay", 50_000, "Salary").on(date(2023, 12, 31)))
        .unwrap();
    let totals = engine.totals();
    assert_eq!(totals.total_balance, 50_000);
    assert_eq!(totals.monthly_income, 0);
}

#[test]
fn query_income_returns_income_in_collection_order() {
    let (mut engine, _store) = memory_engine();
    engine.add(NewEntry::income("Salary Jan", 100, "Salary")).unwrap();
    engine.add(NewEntry::expense("Groceries", 50, "Groceries")).unwrap();
    engine.add(NewEntry::income("Freelance", 70, "Consulting")).unwrap();

    let income: Vec<&str> = engine
        .query("  INCOME ")
        .map(|entry| entry.description.as_str())
        .collect();
    assert_eq!(income, vec!["Freelance", "Salary Jan"]);

    let all: Vec<_> = engine.query("").collect();
    assert_eq!(all.len(), 3);

    let text: Vec<_> = engine.query("groc").collect();
    assert_eq!(text.len(), 1);
}

#[test]
fn query_is_restartable() {
    let (mut engine, _store) = memory_engine();
    engine.add(NewEntry::expense("Coffee", 350, "Dining Out")).unwrap();
    let query = engine.query("coffee");
    assert_eq!(query.clone().count(), 1);
    assert_eq!(query.count(), 1);
}

#[test]
fn validation_rejects_without_mutation() {
    let (mut engine, store) = memory_engine();
    let err = engine.add(NewEntry::expense("  ", 100, "Misc")).unwrap_err();
    assert_eq!(err.as_validation(), Some(&ValidationError::EmptyField("Description")));
    let err = engine.add(NewEntry::expense("Thing", -1, "Misc")).unwrap_err();
    assert_eq!(err.to_string(), "Amount must be a positive number.");
    assert!(engine.entries().is_empty());
    assert!(store.is_empty());
}

#[test]
fn category_and_group_totals_derive_from_expenses() {
    let (mut engine, _store) = memory_engine();
    engine.add(NewEntry::expense("Rent", 120_000, "Housing")).unwrap();
    engine.add(NewEntry::expense("Market", 8_550, "Groceries")).unwrap();
    engine.add(NewEntry::expense("More market", 1_450, "Groceries")).unwrap();
    engine.add(NewEntry::expense("Concert", 6_000, "Entertainment")).unwrap();
    engine.add(NewEntry::expense("Index fund", 20_000, "Investments")).unwrap();
    engine.add(NewEntry::income("Pay", 300_000, "Salary")).unwrap();

    let categories = engine.category_totals();
    assert_eq!(categories["Groceries"], 10_000);
    assert!(!categories.contains_key("Salary"));

    let groups = engine.group_totals();
    assert_eq!(groups.needs, 130_000);
    assert_eq!(groups.wants, 6_000);
    assert_eq!(groups.savings, 20_000);
}

#[test]
fn over_allocation_is_rejected_and_list_unchanged() {
    let (mut engine, _store) = memory_engine();
    engine.set_total_budget(500_000).unwrap();
    engine.add_category(NewBudgetCategory::new("Housing", 300_000)).unwrap();
    engine
        .add_category(NewBudgetCategory::new("Dining Out", 150_000))
        .unwrap();
    let before = engine.categories().to_vec();

    let err = engine
        .add_category(NewBudgetCategory::new("Investments", 50_001))
        .unwrap_err();
    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::OverAllocation { .. })
    ));
    assert_eq!(engine.categories(), before.as_slice());
}

#[test]
fn allocation_sum_never_exceeds_the_ceiling() {
    let (mut engine, _store) = memory_engine();
    engine.set_total_budget(100_000).unwrap();
    let attempts = [40_000, 70_000, 30_000, 1, 30_000, 5_000];
    let mut ids = Vec::new();
    for (index, amount) in attempts.into_iter().enumerate() {
        if let Ok(id) = engine.add_category(NewBudgetCategory::new(format!("c{index}"), amount)) {
            ids.push(id);
        }
        let allocated: i64 = engine.categories().iter().map(|c| c.allocated_amount).sum();
        assert!(allocated <= engine.total_budget());
    }

    let raise = BudgetCategoryPatch {
        allocated_amount: Some(99_000),
        ..BudgetCategoryPatch::default()
    };
    assert!(engine.edit_category(ids[0], raise).is_err());
    assert!(engine.set_total_budget(10).is_err());
    assert!(engine.remove_category(ids[0]));
    engine.set_total_budget(60_000).unwrap();
    let allocated: i64 = engine.categories().iter().map(|c| c.allocated_amount).sum();
    assert!(allocated <= engine.total_budget());
}

#[test]
fn category_status_and_rule_breakdown() {
    let (mut engine, _store) = memory_engine();
    engine.set_total_budget(520_000).unwrap();
    let dining = engine
        .add_category(NewBudgetCategory::new("Dining Out", 25_000))
        .unwrap();
    engine
        .add_category(NewBudgetCategory::new("Rainy day", 10_000).in_group(BudgetGroup::Savings))
        .unwrap();
    engine.add(NewEntry::expense("Dinner", 32_000, "dining out")).unwrap();

    let statuses = engine.category_statuses();
    let status = statuses.iter().find(|s| s.category.id == dining).unwrap();
    assert_eq!(status.spent, 32_000);
    assert!(status.over_budget);
    assert_eq!(status.overage, 7_000);

    let overview = engine.budget_overview();
    assert_eq!(overview.total_allocated, 35_000);
    assert_eq!(overview.total_spent, 32_000);

    let rule = engine.rule_breakdown();
    let wants = rule.group(BudgetGroup::Wants).unwrap();
    assert_eq!(wants.target, 156_000);
    assert_eq!(wants.spent, 32_000);
}

#[test]
fn amounts_beyond_the_supported_range_are_rejected() {
    let (mut engine, store) = memory_engine();
    let err = engine
        .add(NewEntry::income("Windfall", MAX_AMOUNT + 1, "Salary"))
        .unwrap_err();
    assert!(matches!(
        err.as_validation(),
        Some(ValidationError::AmountTooLarge { .. })
    ));
    let err = engine.set_total_budget(-5).unwrap_err();
    assert_eq!(err.to_string(), "Amount must not be negative.");
    assert!(store.is_empty());

    engine.set_total_budget(MAX_AMOUNT).unwrap();
    engine
        .add_category(NewBudgetCategory::new("Housing", MAX_AMOUNT))
        .unwrap();
    assert!(engine
        .add_category(NewBudgetCategory::new("Shopping", MAX_AMOUNT))
        .is_err());
    engine.add(NewEntry::expense("Rent", MAX_AMOUNT, "Housing")).unwrap();
    engine.add(NewEntry::expense("Rent again", MAX_AMOUNT, "Housing")).unwrap();
    let status = &engine.category_statuses()[0];
    assert_eq!(status.overage, MAX_AMOUNT);
    assert_eq!(engine.rule_breakdown().group(BudgetGroup::Needs).unwrap().spent, 2 * MAX_AMOUNT);
}
