use std::io;

use dialoguer::{theme::ColorfulTheme, Confirm};
use strsim::levenshtein;
use uuid::Uuid;

use crate::{
    config::ConfigManager,
    core::{clock::SystemClock, LedgerEngine},
    currency::{format_currency, CurrencyCode},
    errors::{LedgerError, ValidationError},
    storage::JsonFileStore,
};

use super::commands::{self, CommandDefinition, CommandRegistry};
use super::output;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CliMode {
    Interactive,
    Script,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

#[derive(Debug, thiserror::Error)]
pub enum CliError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error("Line editor error: {0}")]
    Readline(#[from] rustyline::error::ReadlineError),
    #[error("Command failed: {0}")]
    Command(String),
}

impl From<io::Error> for CliError {
    fn from(err: io::Error) -> Self {
        CliError::Command(err.to_string())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

/// State shared by every command handler for one shell session.
pub struct ShellContext {
    pub mode: CliMode,
    pub(crate) registry: CommandRegistry,
    pub(crate) engine: LedgerEngine,
    pub(crate) currency: CurrencyCode,
    theme: ColorfulTheme,
    pub(crate) running: bool,
    pub(crate) last_command: Option<String>,
}

impl ShellContext {
    /// Opens the ledger stored in the application data directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let store = JsonFileStore::new_default()?;
        tracing::debug!(root = %store.root().display(), "opening data directory");
        let engine = match LedgerEngine::open(Box::new(store.clone()), Box::new(SystemClock)) {
            Ok((engine, report)) => {
                for note in &report.migrations {
                    output::info(format!("Migration: {note}"));
                }
                for warning in &report.warnings {
                    output::warning(warning);
                }
                engine
            }
            Err(err) => {
                output::warning(format!("Could not load saved ledger ({err}); starting empty."));
                let engine = LedgerEngine::open_or_default(Box::new(store), Box::new(SystemClock));
                if engine.is_read_only() {
                    output::warning("Saved data could not be backed up; changes will not be saved.");
                } else {
                    output::info("Unreadable data was set aside in the data directory.");
                }
                engine
            }
        };
        Ok(Self::with_engine(mode, engine))
    }

    pub fn with_engine(mode: CliMode, engine: LedgerEngine) -> Self {
        output::set_plain(mode == CliMode::Script);
        let currency = ConfigManager::new(engine.store())
            .load_profile()
            .map(|profile| profile.currency)
            .unwrap_or_else(|err| {
                tracing::warn!(error = %err, "failed to load profile");
                CurrencyCode::default()
            });
        Self {
            mode,
            registry: CommandRegistry::new(commands::all_definitions()),
            engine,
            currency,
            theme: ColorfulTheme::default(),
            running: true,
            last_command: None,
        }
    }

    pub fn engine(&self) -> &LedgerEngine {
        &self.engine
    }

    pub(crate) fn config(&self) -> ConfigManager<'_> {
        ConfigManager::new(self.engine.store())
    }

    pub(crate) fn money(&self, amount: i64) -> String {
        format_currency(amount, &self.currency)
    }

    pub fn prompt(&self) -> String {
        "wise-ledger> ".to_string()
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandDefinition> {
        self.registry.get(name)
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(definition) = self.registry.get(command) {
            let handler = definition.handler;
            match handler(self, args) {
                Ok(()) => Ok(LoopControl::Continue),
                Err(CommandError::ExitRequested) => Ok(LoopControl::Exit),
                Err(err) => Err(err),
            }
        } else {
            self.suggest_command(raw);
            Ok(LoopControl::Continue)
        }
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        output::warning(format!(
            "Unknown command `{input}`. Type `help` to see available commands."
        ));
        let best = self
            .registry
            .names()
            .map(|name| (levenshtein(name, &input.to_lowercase()), name))
            .min_by_key(|(distance, _)| *distance);
        if let Some((distance, name)) = best {
            if distance <= 3 {
                output::info(format!("Suggestion: `{name}`?"));
            }
        }
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        self.confirm("Exit shell?", true).map_err(CliError::from)
    }

    /// Yes/no prompt; script mode always answers yes.
    pub(crate) fn confirm(&self, prompt: &str, default: bool) -> Result<bool, CommandError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        Confirm::with_theme(&self.theme)
            .with_prompt(prompt)
            .default(default)
            .interact()
            .map_err(CommandError::from)
    }

    pub(crate) fn report_error(&self, err: CommandError) {
        match err {
            CommandError::ExitRequested => {}
            CommandError::InvalidArguments(message) => {
                output::error(message);
                output::info("Use `help <command>` for usage details.");
            }
            other => output::error(other),
        }
    }

    /// Resolves a full entry id or an unambiguous prefix of one.
    pub(crate) fn resolve_entry(&self, token: &str) -> Result<Uuid, CommandError> {
        resolve_id(
            token,
            self.engine.entries().iter().map(|entry| entry.id),
            "entry",
        )
    }

    /// Resolves a category by id prefix or by name.
    pub(crate) fn resolve_category(&self, token: &str) -> Result<Uuid, CommandError> {
        if let Some(category) = self.engine.ledger().category_by_name(token) {
            return Ok(category.id);
        }
        resolve_id(
            token,
            self.engine.categories().iter().map(|category| category.id),
            "category",
        )
    }

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        super::shell::handle_line(self, line)
    }
}

fn resolve_id(
    token: &str,
    ids: impl Iterator<Item = Uuid>,
    what: &str,
) -> Result<Uuid, CommandError> {
    let needle = token.trim().to_ascii_lowercase();
    if needle.is_empty() {
        return Err(CommandError::InvalidArguments(format!("{what} id is required")));
    }
    let matches: Vec<Uuid> = ids
        .filter(|id| id.to_string().starts_with(&needle) || id.simple().to_string().starts_with(&needle))
        .collect();
    match matches.as_slice() {
        [id] => Ok(*id),
        [] => Err(CommandError::InvalidArguments(format!("no {what} matches `{token}`"))),
        _ => Err(CommandError::InvalidArguments(format!(
            "`{token}` matches {} {what} records; use more characters",
            matches.len()
        ))),
    }
}

/// First eight hex digits of an id, as shown in listings.
pub(crate) fn short_id(id: Uuid) -> String {
    let mut short = id.simple().to_string();
    short.truncate(8);
    short
}
