use chrono::{Duration, NaiveDate};
use criterion::{black_box, criterion_group, criterion_main, Criterion};
use wise_ledger::{
    core::services::{BudgetService, SummaryService},
    ledger::{known_expense_categories, Entry, EntryKind, Ledger},
};

fn sample_ledger(size: usize) -> Ledger {
    let start = NaiveDate::from_ymd_opt(2023, 1, 1).unwrap();
    let categories = known_expense_categories();
    let mut ledger = Ledger::new();
    ledger.total_budget = 1_000_000;
    for index in 0..size {
        let date = start + Duration::days((index % 540) as i64);
        let entry = if index % 5 == 0 {
            Entry::new("pay", 250_000, EntryKind::Income, "Salary", date)
        } else {
            let category = categories[index % categories.len()];
            Entry::new("spend", (index as i64 % 9_000) + 100, EntryKind::Expense, category, date)
        };
        ledger.add_entry(entry);
    }
    ledger
}

fn bench_derived_totals(c: &mut Criterion) {
    let ledger = sample_ledger(5_000);
    let today = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();

    c.bench_function("totals_5k", |b| {
        b.iter(|| SummaryService::totals(black_box(&ledger), today))
    });
    c.bench_function("category_totals_5k", |b| {
        b.iter(|| SummaryService::category_totals(black_box(&ledger)))
    });
    c.bench_function("rule_breakdown_5k", |b| {
        b.iter(|| BudgetService::rule_breakdown(black_box(&ledger)))
    });
    c.bench_function("monthly_series_12_5k", |b| {
        b.iter(|| SummaryService::monthly_series(black_box(&ledger), today, 12))
    });
}

criterion_group!(benches, bench_derived_totals);
criterion_main!(benches);
