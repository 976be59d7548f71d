pub mod commands;
mod context;
mod help;
pub mod output;
mod shell;

pub use context::{CliError, CliMode, CommandError, CommandResult, ShellContext};
pub use shell::{run_cli, SCRIPT_ENV_VAR};
