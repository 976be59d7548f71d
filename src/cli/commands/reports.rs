use std::fs;
use std::path::Path;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, progress_bar};
use crate::core::services::{FilingStatus, SummaryService, TaxInput, TaxService};
use crate::currency::{format_percent, parse_major_units};
use crate::export;
use crate::ledger::MonthKey;

use super::{parse_amount, parse_months, usage_error, CommandDefinition};

const EXPORT_USAGE: &str = "export <csv|report|html> <path> [months]";
const TAX_USAGE: &str = "tax <gross> [single|married-joint|married-separate|head-of-household] [itemized] [state-rate-%]";
const DEFAULT_REPORT_MONTHS: u32 = 6;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("totals", "Show balance and this month's totals", "totals", cmd_totals),
        CommandDefinition::new(
            "categories",
            "Show expense totals per category and group",
            "categories",
            cmd_categories,
        ),
        CommandDefinition::new(
            "income",
            "Show taxable and non-taxable income",
            "income",
            cmd_income,
        ),
        CommandDefinition::new(
            "report",
            "Show the monthly trend and this month's spending",
            "report [months]",
            cmd_report,
        ),
        CommandDefinition::new("export", "Write entries or a report to a file", EXPORT_USAGE, cmd_export),
        CommandDefinition::new("tax", "Estimate annual income tax", TAX_USAGE, cmd_tax),
    ]
}

fn cmd_totals(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.engine.totals();
    output::section(format!("Totals for {}", totals.month));
    output::info(format!("Total balance     : {}", context.money(totals.total_balance)));
    output::info(format!("Monthly income    : {}", context.money(totals.monthly_income)));
    output::info(format!("Monthly expenses  : {}", context.money(totals.monthly_expenses)));
    output::info(format!(
        "Budget progress   : {} {}",
        format_percent(totals.budget_progress_percent),
        progress_bar(totals.budget_progress_percent, 20)
    ));
    Ok(())
}

fn cmd_categories(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let totals = context.engine.category_totals();
    output::section("Spending by category");
    if totals.is_empty() {
        output::info("No expenses recorded.");
    }
    for (category, amount) in &totals {
        output::info(format!("{category:<20} {:>14}", context.money(*amount)));
    }
    let groups = context.engine.group_totals();
    output::section("Spending by group");
    output::info(format!("Needs   {:>14}", context.money(groups.needs)));
    output::info(format!("Wants   {:>14}", context.money(groups.wants)));
    output::info(format!("Savings {:>14}", context.money(groups.savings)));
    Ok(())
}

fn cmd_income(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let breakdown = SummaryService::income_breakdown(context.engine.ledger());
    output::section("Income");
    output::info(format!("Total        : {}", context.money(breakdown.total)));
    output::info(format!(
        "Taxable      : {} ({})",
        context.money(breakdown.taxable),
        format_percent(breakdown.taxable_percent())
    ));
    output::info(format!("Non-taxable  : {}", context.money(breakdown.non_taxable)));
    for (category, amount) in &breakdown.by_category {
        output::info(format!("  {category:<20} {:>14}", context.money(*amount)));
    }
    Ok(())
}

fn cmd_report(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let months = parse_months(args.first(), DEFAULT_REPORT_MONTHS)?;
    let today = context.engine.today();
    let ledger = context.engine.ledger();

    output::section(format!("Last {months} month(s)"));
    for bucket in SummaryService::monthly_series(ledger, today, months) {
        output::info(format!(
            "{} {}  income {:>14}  expenses {:>14}  net {:>14}",
            bucket.month,
            bucket.month.short_label(),
            context.money(bucket.income),
            context.money(bucket.expenses),
            context.money(bucket.net()),
        ));
    }

    let month = MonthKey::of(today);
    output::section(format!("Spending in {month}"));
    let categories = SummaryService::category_totals_for_month(ledger, month);
    if categories.is_empty() {
        output::info("No expenses this month.");
    }
    for (category, amount) in &categories {
        output::info(format!("{category:<20} {:>14}", context.money(*amount)));
    }
    Ok(())
}

fn cmd_export(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (format, path, rest) = match args {
        [format, path, rest @ ..] => (format.to_ascii_lowercase(), Path::new(path), rest),
        _ => return Err(usage_error(EXPORT_USAGE)),
    };
    let months = parse_months(rest.first(), DEFAULT_REPORT_MONTHS)?;
    let today = context.engine.today();
    let ledger = context.engine.ledger();
    let contents = match format.as_str() {
        "csv" => export::entries_csv(&ledger.entries)?,
        "report" | "report-csv" => export::report_csv(ledger, today, months)?,
        "html" | "pdf" => export::report_html(ledger, today, months, &context.currency),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown export format `{other}`; {EXPORT_USAGE}"
            )))
        }
    };
    fs::write(path, contents)?;
    tracing::info!(path = %path.display(), format = %format, "export written");
    output::success(format!("Exported to {}.", path.display()));
    Ok(())
}

fn cmd_tax(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let Some((gross, rest)) = args.split_first() else {
        return Err(usage_error(TAX_USAGE));
    };
    let mut input = TaxInput::new(parse_amount(gross)?, FilingStatus::Single);
    if let Some(status) = rest.first() {
        input.filing_status = status.parse().map_err(CommandError::InvalidArguments)?;
    }
    if let Some(itemized) = rest.get(1) {
        input.itemized_deductions = parse_amount(itemized)?;
    }
    if let Some(rate) = rest.get(2) {
        input.state_rate_bp = Some(parse_state_rate(rate)?);
    }
    if rest.len() > 3 {
        return Err(usage_error(TAX_USAGE));
    }

    let estimate = TaxService::estimate(&input);
    output::section(format!("Tax estimate ({})", input.filing_status));
    output::info(format!("Gross income      : {}", context.money(estimate.gross_income)));
    output::info(format!("Deduction         : {}", context.money(estimate.deduction)));
    output::info(format!("Taxable income    : {}", context.money(estimate.taxable_income)));
    for bracket in estimate.brackets.iter().filter(|bracket| bracket.taxed_amount > 0) {
        let range = match bracket.upper {
            Some(upper) => format!("{} - {}", context.money(bracket.lower), context.money(upper)),
            None => format!("over {}", context.money(bracket.lower)),
        };
        output::info(format!(
            "  {:>5}  {range:<32} {:>14}",
            format_percent(f64::from(bracket.rate_bp) / 100.0),
            context.money(bracket.tax)
        ));
    }
    output::info(format!("Federal tax       : {}", context.money(estimate.federal_tax)));
    output::info(format!("FICA tax          : {}", context.money(estimate.fica_tax())));
    output::info(format!("State tax         : {}", context.money(estimate.state_tax)));
    output::info(format!("Total tax         : {}", context.money(estimate.total_tax)));
    output::info(format!(
        "Effective rate    : {}",
        format_percent(estimate.effective_rate_percent)
    ));
    output::info(format!("After-tax income  : {}", context.money(estimate.after_tax_income)));
    Ok(())
}

/// Parses a percentage such as `4.95` into basis points.
fn parse_state_rate(input: &str) -> Result<u32, CommandError> {
    let invalid = || CommandError::InvalidArguments(format!("invalid state rate `{input}`"));
    let basis_points = parse_major_units(input.trim_end_matches('%')).map_err(|_| invalid())?;
    match u32::try_from(basis_points) {
        Ok(bp) if bp <= 10_000 => Ok(bp),
        _ => Err(invalid()),
    }
}
