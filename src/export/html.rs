use std::fmt::Write;

use chrono::NaiveDate;

use crate::core::services::{BudgetService, SummaryService};
use crate::currency::{format_currency, format_percent, CurrencyCode};
use crate::ledger::{Ledger, MonthKey};

const STYLE: &str = "body{font-family:sans-serif;margin:2rem;color:#222}\
table{border-collapse:collapse;margin-bottom:1.5rem;min-width:24rem}\
th,td{border:1px solid #ccc;padding:.35rem .6rem;text-align:left}\
td.num{text-align:right}.over{color:#b00020}";

/// Self-contained HTML report for printing or saving as PDF.
pub fn report_html(
    ledger: &Ledger,
    today: NaiveDate,
    months: u32,
    currency: &CurrencyCode,
) -> String {
    let money = |amount: i64| escape(&format_currency(amount, currency));
    let totals = SummaryService::totals(ledger, today);
    let mut html = String::new();

    // Writing into a String cannot fail.
    let _ = write!(
        html,
        "<!DOCTYPE html>\n<html><head><meta charset=\"utf-8\"><title>Financial report {month}</title>\
         <style>{STYLE}</style></head><body>\n<h1>Financial report</h1>\n<p>Generated {today}</p>\n",
        month = totals.month,
    );

    html.push_str("<h2>Summary</h2>\n<table>\n");
    let summary_rows = [
        ("Total balance", money(totals.total_balance)),
        ("Income this month", money(totals.monthly_income)),
        ("Expenses this month", money(totals.monthly_expenses)),
        (
            "Income spent",
            format_percent(totals.budget_progress_percent),
        ),
    ];
    for (label, value) in summary_rows {
        let _ = writeln!(html, "<tr><th>{label}</th><td class=\"num\">{value}</td></tr>");
    }
    html.push_str("</table>\n");

    html.push_str(
        "<h2>Monthly trend</h2>\n<table>\n<tr><th>Month</th><th>Income</th><th>Expenses</th><th>Net</th></tr>\n",
    );
    for bucket in SummaryService::monthly_series(ledger, today, months) {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
            bucket.month,
            money(bucket.income),
            money(bucket.expenses),
            money(bucket.net()),
        );
    }
    html.push_str("</table>\n");

    html.push_str("<h2>Spending by category</h2>\n<table>\n<tr><th>Category</th><th>Spent</th></tr>\n");
    for (category, amount) in SummaryService::category_totals_for_month(ledger, MonthKey::of(today)) {
        let _ = writeln!(
            html,
            "<tr><td>{}</td><td class=\"num\">{}</td></tr>",
            escape(&category),
            money(amount)
        );
    }
    html.push_str("</table>\n");

    let statuses = BudgetService::category_statuses(ledger);
    if !statuses.is_empty() {
        html.push_str(
            "<h2>Budget</h2>\n<table>\n<tr><th>Category</th><th>Allocated</th><th>Spent</th><th>Used</th></tr>\n",
        );
        for status in statuses {
            let class = if status.over_budget { " class=\"over\"" } else { "" };
            let _ = writeln!(
                html,
                "<tr{class}><td>{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td><td class=\"num\">{}</td></tr>",
                escape(&status.category.name),
                money(status.category.allocated_amount),
                money(status.spent),
                format_percent(status.percent),
            );
        }
        html.push_str("</table>\n");
    }

    html.push_str("</body></html>\n");
    html
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ledger::{BudgetCategory, BudgetGroup, Entry, EntryKind};

    #[test]
    fn report_escapes_user_text() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut ledger = Ledger::new();
        ledger.add_entry(Entry::new("x", 1_000, EntryKind::Expense, "<Toys & Games>", day));
        let html = report_html(&ledger, day, 3, &CurrencyCode::new("USD"));
        assert!(html.starts_with("<!DOCTYPE html>"));
        assert!(html.contains("&lt;Toys &amp; Games&gt;"));
        assert!(!html.contains("<Toys"));
        assert!(html.contains("$10.00"));
    }

    #[test]
    fn overspent_categories_are_highlighted() {
        let day = NaiveDate::from_ymd_opt(2024, 3, 9).unwrap();
        let mut ledger = Ledger::new();
        ledger.total_budget = 10_000;
        ledger.add_category(BudgetCategory::new("Shopping", BudgetGroup::Wants, 1_000));
        ledger.add_entry(Entry::new("Shoes", 5_000, EntryKind::Expense, "Shopping", day));
        let html = report_html(&ledger, day, 1, &CurrencyCode::default());
        assert!(html.contains("<tr class=\"over\"><td>Shopping</td>"));
        assert!(html.contains("500.0%"));
    }
}
