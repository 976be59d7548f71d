use chrono::Duration;

use crate::cli::context::{CommandError, CommandResult, ShellContext};
use crate::cli::help;
use crate::cli::output;
use crate::ledger::NewEntry;
use crate::storage::CURRENT_SCHEMA_VERSION;
use crate::utils::build_info;

use super::CommandDefinition;

pub(crate) fn definitions() -> Vec<CommandDefinition> {
    vec![
        CommandDefinition::new(
            "demo",
            "Add a month of sample entries",
            "demo",
            cmd_demo,
        ),
        CommandDefinition::new("version", "Show build metadata", "version", cmd_version),
        CommandDefinition::new("help", "Show available commands", "help [command]", cmd_help),
        CommandDefinition::new("exit", "Exit the shell", "exit", cmd_exit),
    ]
}

fn cmd_demo(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    if !context.engine.entries().is_empty()
        && !context.confirm("The ledger already has entries. Add samples anyway?", false)?
    {
        return Ok(());
    }
    let today = context.engine.today();
    let days_ago = |days: i64| today - Duration::days(days);
    let samples = [
        NewEntry::income("Monthly salary", 260_000, "Salary").on(days_ago(14)),
        NewEntry::income("Birthday present", 5_000, "Gift").on(days_ago(9)),
        NewEntry::expense("Apartment rent", 120_000, "Housing").on(days_ago(13)),
        NewEntry::expense("Foods Market", 8_550, "Groceries").on(days_ago(12)),
        NewEntry::expense("Electric bill", 15_680, "Utilities").on(days_ago(8)),
        NewEntry::expense("Dinner with friends", 4_200, "Dining Out").on(days_ago(5)),
        NewEntry::expense("Index fund", 30_000, "Investments").on(days_ago(2)),
    ];
    let count = samples.len();
    for sample in samples {
        context.engine.add(sample)?;
    }
    output::success(format!("Added {count} sample entries."));
    Ok(())
}

fn cmd_version(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    let meta = build_info::current();
    output::section(format!("Wise Ledger {}", meta.version));
    output::info(format!("  Schema ver   : v{CURRENT_SCHEMA_VERSION}"));
    output::info(format!("  Build hash   : {}", meta.git_hash));
    output::info(format!("  Built at     : {}", meta.timestamp));
    output::info(format!("  Profile      : {}", meta.profile));
    output::info(format!("  Rustc        : {}", meta.rustc));
    Ok(())
}

fn cmd_help(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if let Some(name) = args.first() {
        match context.command(&name.to_lowercase()) {
            Some(command) => help::print_command(command),
            None => context.suggest_command(name),
        }
        return Ok(());
    }
    help::print_overview(&context.registry);
    Ok(())
}

fn cmd_exit(_context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    Err(CommandError::ExitRequested)
}
