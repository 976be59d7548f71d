use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::Serialize;

use crate::ledger::{BudgetGroup, Ledger, MonthKey};

use super::percent_of;

/// Income categories that are never taxed. Matched as lowercase substrings.
const NON_TAXABLE_MARKERS: [&str; 10] = [
    "gift",
    "tax refund",
    "government subsidy",
    "reimbursement",
    "tax-free bonds interest",
    "scholarship",
    "ppf interest",
    "ltcg up to limit",
    "gratuity exempt",
    "lta exempt",
];

/// Headline metrics for the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DerivedTotals {
    /// Income minus expenses across every entry.
    pub total_balance: i64,
    pub monthly_income: i64,
    pub monthly_expenses: i64,
    /// Share of this month's income already spent, clamped to `0..=100`.
    pub budget_progress_percent: f64,
    pub month: MonthKey,
}

/// Expense totals per budget group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct GroupTotals {
    pub needs: i64,
    pub wants: i64,
    pub savings: i64,
}

impl GroupTotals {
    pub fn get(&self, group: BudgetGroup) -> i64 {
        match group {
            BudgetGroup::Needs => self.needs,
            BudgetGroup::Wants => self.wants,
            BudgetGroup::Savings => self.savings,
        }
    }

    fn add(&mut self, group: BudgetGroup, amount: i64) {
        match group {
            BudgetGroup::Needs => self.needs = self.needs.saturating_add(amount),
            BudgetGroup::Wants => self.wants = self.wants.saturating_add(amount),
            BudgetGroup::Savings => self.savings = self.savings.saturating_add(amount),
        }
    }

    pub fn total(&self) -> i64 {
        self.needs
            .saturating_add(self.wants)
            .saturating_add(self.savings)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct MonthlyTotals {
    pub month: MonthKey,
    pub income: i64,
    pub expenses: i64,
}

impl MonthlyTotals {
    pub fn net(&self) -> i64 {
        self.income.saturating_sub(self.expenses)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IncomeBreakdown {
    pub total: i64,
    pub taxable: i64,
    pub non_taxable: i64,
    /// Income per category, alphabetical.
    pub by_category: BTreeMap<String, i64>,
}

impl IncomeBreakdown {
    pub fn taxable_percent(&self) -> f64 {
        percent_of(self.taxable, self.total)
    }
}

/// Read-only reductions over a ledger snapshot.
pub struct SummaryService;

impl SummaryService {
    pub fn totals(ledger: &Ledger, today: NaiveDate) -> DerivedTotals {
        let month = MonthKey::of(today);
        let mut totals = DerivedTotals {
            total_balance: 0,
            monthly_income: 0,
            monthly_expenses: 0,
            budget_progress_percent: 0.0,
            month,
        };
        for entry in &ledger.entries {
            totals.total_balance = totals.total_balance.saturating_add(entry.signed_amount());
            if !month.contains(entry.date) {
                continue;
            }
            if entry.is_income() {
                totals.monthly_income = totals.monthly_income.saturating_add(entry.amount);
            } else {
                totals.monthly_expenses = totals.monthly_expenses.saturating_add(entry.amount);
            }
        }
        totals.budget_progress_percent =
            percent_of(totals.monthly_expenses, totals.monthly_income).min(100.0);
        totals
    }

    /// Expense sums per category over the whole ledger.
    pub fn category_totals(ledger: &Ledger) -> BTreeMap<String, i64> {
        Self::expense_totals_where(ledger, |_| true)
    }

    pub fn category_totals_for_month(ledger: &Ledger, month: MonthKey) -> BTreeMap<String, i64> {
        Self::expense_totals_where(ledger, |date| month.contains(date))
    }

    pub fn group_totals(ledger: &Ledger) -> GroupTotals {
        let mut totals = GroupTotals::default();
        for entry in ledger.entries.iter().filter(|entry| entry.is_expense()) {
            if let Some(group) = entry.budget_group() {
                totals.add(group, entry.amount);
            }
        }
        totals
    }

    /// Income and expenses for the last `months` calendar months, oldest first.
    pub fn monthly_series(ledger: &Ledger, today: NaiveDate, months: u32) -> Vec<MonthlyTotals> {
        let current = MonthKey::of(today);
        let mut series: Vec<MonthlyTotals> = (0..months)
            .rev()
            .map(|back| MonthlyTotals {
                month: current.months_back(back),
                income: 0,
                expenses: 0,
            })
            .collect();
        for entry in &ledger.entries {
            let key = MonthKey::of(entry.date);
            if let Some(bucket) = series.iter_mut().find(|bucket| bucket.month == key) {
                if entry.is_income() {
                    bucket.income = bucket.income.saturating_add(entry.amount);
                } else {
                    bucket.expenses = bucket.expenses.saturating_add(entry.amount);
                }
            }
        }
        series
    }

    pub fn income_breakdown(ledger: &Ledger) -> IncomeBreakdown {
        let mut breakdown = IncomeBreakdown::default();
        for entry in ledger.entries.iter().filter(|entry| entry.is_income()) {
            breakdown.total = breakdown.total.saturating_add(entry.amount);
            if is_taxable_income(&entry.category) {
                breakdown.taxable = breakdown.taxable.saturating_add(entry.amount);
            } else {
                breakdown.non_taxable = breakdown.non_taxable.saturating_add(entry.amount);
            }
            let sum = breakdown
                .by_category
                .entry(entry.category.clone())
                .or_insert(0);
            *sum = sum.saturating_add(entry.amount);
        }
        breakdown
    }

    fn expense_totals_where(
        ledger: &Ledger,
        include: impl Fn(NaiveDate) -> bool,
    ) -> BTreeMap<String, i64> {
        let mut totals: BTreeMap<String, i64> = BTreeMap::new();
        for entry in &ledger.entries {
            if entry.is_expense() && include(entry.date) {
                let sum = totals.entry(entry.category.clone()).or_insert(0);
                *sum = sum.saturating_add(entry.amount);
            }
        }
        totals
    }
}

/// Whether income recorded under `category` counts toward taxable income.
pub fn is_taxable_income(category: &str) -> bool {
    let lowered = category.trim().to_lowercase();
    !NON_TAXABLE_MARKERS
        .iter()
        .any(|marker| lowered.contains(marker))
}
