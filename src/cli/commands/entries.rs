use crate::cli::context::{short_id, CommandError, CommandResult, ShellContext};
use crate::cli::output;
use crate::ledger::{Entry, EntryKind, EntryPatch, NewEntry};

use super::{parse_amount, parse_date, usage_error, CommandDefinition};

const ADD_USAGE: &str = "add <income|expense> <amount> <category> <description> [YYYY-MM-DD]";
const EDIT_USAGE: &str = "edit <id> <description|amount|kind|category|date> <value>";

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new("add", "Record an income or expense entry", ADD_USAGE, cmd_add),
        CommandDefinition::new("edit", "Change one field of an entry", EDIT_USAGE, cmd_edit),
        CommandDefinition::new("delete", "Delete an entry", "delete <id>", cmd_delete),
        CommandDefinition::new(
            "list",
            "List entries, optionally filtered by text or kind",
            "list [filter]",
            cmd_list,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [kind, amount, category, description, rest @ ..] = args else {
        return Err(usage_error(ADD_USAGE));
    };
    let kind: EntryKind = kind.parse().map_err(CommandError::InvalidArguments)?;
    let amount = parse_amount(amount)?;
    let mut entry = match kind {
        EntryKind::Income => NewEntry::income(*description, amount, *category),
        EntryKind::Expense => NewEntry::expense(*description, amount, *category),
    };
    match rest {
        [] => {}
        [date] => entry = entry.on(parse_date(date)?),
        _ => return Err(usage_error(ADD_USAGE)),
    }

    let id = context.engine.add(entry)?;
    output::success(format!("Added {kind} {} ({}).", context.money(amount), short_id(id)));
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id, field, value] = args else {
        return Err(usage_error(EDIT_USAGE));
    };
    let id = context.resolve_entry(id)?;
    let mut patch = EntryPatch::default();
    match field.to_ascii_lowercase().as_str() {
        "description" => patch.description = Some(value.to_string()),
        "amount" => patch.amount = Some(parse_amount(value)?),
        "kind" | "type" => {
            patch.kind = Some(value.parse().map_err(CommandError::InvalidArguments)?)
        }
        "category" => patch.category = Some(value.to_string()),
        "date" => patch.date = Some(parse_date(value)?),
        other => {
            return Err(CommandError::InvalidArguments(format!(
                "unknown field `{other}`; {EDIT_USAGE}"
            )))
        }
    }
    if context.engine.update(id, patch)? {
        output::success(format!("Updated entry {}.", short_id(id)));
    } else {
        output::info("Nothing changed.");
    }
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let [id] = args else {
        return Err(usage_error("delete <id>"));
    };
    let id = context.resolve_entry(id)?;
    if !context.confirm("Delete this entry?", false)? {
        output::info("Kept entry.");
        return Ok(());
    }
    if context.engine.delete(id) {
        output::success(format!("Deleted entry {}.", short_id(id)));
    }
    Ok(())
}

fn cmd_list(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let filter = args.join(" ");
    let rows: Vec<String> = context
        .engine
        .query(&filter)
        .map(|entry| format_row(context, entry))
        .collect();
    if rows.is_empty() {
        output::info("No entries found.");
        return Ok(());
    }
    output::section(format!("Entries ({})", rows.len()));
    for row in rows {
        output::info(row);
    }
    Ok(())
}

fn format_row(context: &ShellContext, entry: &Entry) -> String {
    let sign = if entry.is_income() { '+' } else { '-' };
    let group = entry
        .group
        .map(|group| format!(" [{group}]"))
        .unwrap_or_default();
    format!(
        "{}  {}  {sign}{:>14}  {:<18} {}{group}",
        short_id(entry.id),
        entry.date,
        context.money(entry.amount),
        entry.category,
        entry.description,
    )
}
