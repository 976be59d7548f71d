use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::output::{self, progress_bar};
use crate::currency::format_percent;
use crate::ledger::{BudgetCategoryPatch, BudgetGroup, NewBudgetCategory};

use super::{parse_amount, usage_error, CommandDefinition};

const BUDGET_USAGE: &str = "budget [show | set <amount> | add <name> <amount> [group] | edit <category> <name|amount|group> <value> | remove <category>]";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "budget",
            "Show or change budget categories and the total budget",
            BUDGET_USAGE,
            cmd_budget,
        ),
        CommandDefinition::new(
            "rule",
            "Compare spending per group with the 50/30/20 rule",
            "rule",
            cmd_rule,
        ),
    ]
}

fn cmd_budget(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    match args {
        [] | ["show"] => show_budget(context),
        ["set", amount] => {
            let amount = parse_amount(amount)?;
            context.engine.set_total_budget(amount)?;
            output::success(format!("Total budget set to {}.", context.money(amount)));
            Ok(())
        }
        ["add", name, amount, rest @ ..] => {
            let mut category = NewBudgetCategory::new(*name, parse_amount(amount)?);
            match rest {
                [] => {}
                [group] => category = category.in_group(parse_group(group)?),
                _ => return Err(usage_error(BUDGET_USAGE)),
            }
            context.engine.add_category(category)?;
            output::success(format!("Added budget category `{}`.", name.trim()));
            Ok(())
        }
        ["edit", target, field, value] => {
            let id = context.resolve_category(target)?;
            let mut patch = BudgetCategoryPatch::default();
            match field.to_ascii_lowercase().as_str() {
                "name" => patch.name = Some(value.to_string()),
                "amount" | "allocated" => patch.allocated_amount = Some(parse_amount(value)?),
                "group" => patch.group = Some(parse_group(value)?),
                other => {
                    return Err(CommandError::InvalidArguments(format!(
                        "unknown field `{other}`; {BUDGET_USAGE}"
                    )))
                }
            }
            if context.engine.edit_category(id, patch)? {
                output::success("Budget category updated.");
            } else {
                output::info("Nothing changed.");
            }
            Ok(())
        }
        ["remove", target] => {
            let id = context.resolve_category(target)?;
            if context.engine.remove_category(id) {
                output::success("Budget category removed.");
            }
            Ok(())
        }
        _ => Err(usage_error(BUDGET_USAGE)),
    }
}

fn show_budget(context: &ShellContext) -> CommandResult {
    let overview = context.engine.budget_overview();
    output::section("Budget");
    output::info(format!("Total budget : {}", context.money(overview.total_budget)));
    output::info(format!("Allocated    : {}", context.money(overview.total_allocated)));
    output::info(format!("Spent        : {}", context.money(overview.total_spent)));
    output::info(format!(
        "Remaining    : {} {}",
        context.money(overview.remaining),
        progress_bar(overview.progress_percent, 20)
    ));

    let statuses = context.engine.category_statuses();
    if statuses.is_empty() {
        output::info("No budget categories yet. Use `budget add <name> <amount>`.");
        return Ok(());
    }
    for status in statuses {
        let line = format!(
            "{:<18} {:<8} {:>14} of {:>14} {} {}",
            status.category.name,
            status.category.group,
            context.money(status.spent),
            context.money(status.category.allocated_amount),
            progress_bar(status.percent, 20),
            format_percent(status.percent),
        );
        if status.over_budget {
            output::warning(format!("{line} (over by {})", context.money(status.overage)));
        } else {
            output::info(line);
        }
    }
    Ok(())
}

fn cmd_rule(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let rule = context.engine.rule_breakdown();
    output::section("50/30/20 rule");
    if rule.total_budget == 0 {
        output::info("Set a total budget with `budget set <amount>` to see targets.");
    }
    for progress in &rule.groups {
        output::info(format!(
            "{:<8} {:>3}%  {:>14} of {:>14} {} {}",
            progress.group,
            progress.group.target_percent(),
            context.money(progress.spent),
            context.money(progress.target),
            progress_bar(progress.display_percent, 20),
            format_percent(progress.ratio_percent),
        ));
    }
    Ok(())
}

fn parse_group(input: &str) -> Result<BudgetGroup, CommandError> {
    input.parse().map_err(CommandError::InvalidArguments)
}
