//! Core CLI loop, dispatch, and shell context helpers.

use std::{io, path::PathBuf};

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;
use strsim::levenshtein;
use tracing::debug;

use crate::{
    config::ConfigManager,
    core::{
        services::ServiceError, BudgetCommand, BudgetManager, CommandOutcome, ManagerOptions,
    },
    currency::{format_amount, parse_amount},
    domain::ExpenseId,
    errors::BudgetError,
    storage::JsonStorage,
};

pub use crate::errors::CliError;

use super::commands;
use super::io as cli_io;
use super::registry::{CommandEntry, CommandRegistry};
pub use super::shell_context::{CliMode, ShellContext};
use super::view::SummaryLinePresenter;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum LoopControl {
    Continue,
    Exit,
}

pub type CommandResult = Result<(), CommandError>;

impl ShellContext {
    /// Opens the budget stored under the application directory.
    pub fn new(mode: CliMode) -> Result<Self, CliError> {
        let config_manager = ConfigManager::new()?;
        Self::with_config_manager(mode, config_manager)
    }

    /// Opens the budget stored under `base` instead of the application
    /// directory.
    pub fn with_base_dir(mode: CliMode, base: PathBuf) -> Result<Self, CliError> {
        let config_manager = ConfigManager::with_base_dir(base)?;
        Self::with_config_manager(mode, config_manager)
    }

    fn with_config_manager(mode: CliMode, config_manager: ConfigManager) -> Result<Self, CliError> {
        let mut registry = CommandRegistry::new();
        commands::register_all(&mut registry);

        let config = config_manager.load()?;
        let data_dir = config_manager.data_dir(&config);
        let storage = JsonStorage::in_dir(data_dir)?;
        debug!(path = %storage.base_dir().display(), "using data directory");

        let mut manager =
            BudgetManager::open(Box::new(storage), ManagerOptions::from_config(&config));
        manager.set_presenter(Box::new(SummaryLinePresenter::new(config.clone())));

        Ok(ShellContext {
            mode,
            registry,
            manager,
            theme: ColorfulTheme::default(),
            config_manager,
            config,
            running: true,
        })
    }

    pub(crate) fn prompt(&self) -> String {
        format!("budget [{}]> ", self.format_amount(self.manager.summary().projection))
    }

    pub(crate) fn command_names(&self) -> Vec<&'static str> {
        self.registry.names().collect()
    }

    pub(crate) fn expense_ids(&self) -> Vec<String> {
        self.manager
            .store()
            .iter()
            .map(|expense| expense.id.to_string())
            .collect()
    }

    pub(crate) fn command(&self, name: &str) -> Option<&CommandEntry> {
        self.registry.get(name)
    }

    pub(crate) fn format_amount(&self, value: Decimal) -> String {
        format_amount(value, &self.config)
    }

    /// Resolves a typed id or unique id prefix against the current store.
    pub(crate) fn resolve_id(&self, token: &str) -> Result<ExpenseId, CommandError> {
        self.manager.resolve_id(token).map_err(CommandError::from)
    }

    pub(crate) fn parse_amount(&self, raw: &str) -> Result<Decimal, CommandError> {
        parse_amount(raw).map_err(CommandError::from)
    }

    /// Runs `command` through the manager and surfaces storage trouble as a
    /// warning; the in-memory change stands either way.
    pub(crate) fn execute(&mut self, command: BudgetCommand) -> Result<CommandOutcome, CommandError> {
        let outcome = self.manager.execute(command)?;
        self.warn_on_persistence_error();
        Ok(outcome)
    }

    pub(crate) fn warn_on_persistence_error(&self) {
        if let Some(message) = self.manager.persistence_error() {
            cli_io::print_warning(format!("Changes were not saved: {}", message));
        }
    }

    pub(crate) fn dispatch(
        &mut self,
        command: &str,
        raw: &str,
        args: &[&str],
    ) -> Result<LoopControl, CommandError> {
        if let Some(handler) = self.registry.handler(command) {
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

    #[cfg(test)]
    pub(crate) fn process_line(&mut self, line: &str) -> Result<LoopControl, CommandError> {
        let tokens = match crate::cli::shell::parse_command_line(line) {
            Ok(tokens) => tokens,
            Err(err) => {
                self.print_warning(&err.to_string());
                return Ok(LoopControl::Continue);
            }
        };

        if tokens.is_empty() {
            return Ok(LoopControl::Continue);
        }

        let command = tokens[0].to_lowercase();
        let args: Vec<&str> = tokens.iter().skip(1).map(String::as_str).collect();
        self.dispatch(&command, &tokens[0], &args)
    }

    pub(crate) fn suggest_command(&self, input: &str) {
        cli_io::print_warning(format!(
            "Unknown command `{}`. Type `help` to see available commands.",
            input
        ));

        if let Some(best) = self.closest_command(input) {
            cli_io::print_info(format!("Suggestion: `{}`?", best));
        }
    }

    pub(crate) fn closest_command(&self, input: &str) -> Option<&'static str> {
        let needle = input.to_lowercase();
        self.registry
            .names()
            .map(|key| (levenshtein(key, &needle), key))
            .filter(|(distance, _)| *distance <= 3)
            .min_by_key(|(distance, _)| *distance)
            .map(|(_, key)| key)
    }

    pub(crate) fn confirm_exit(&self) -> Result<bool, CliError> {
        if self.mode == CliMode::Script {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, "Exit shell?", true).map_err(CliError::from)
    }

    /// Asks for confirmation in interactive mode; scripts always proceed.
    pub(crate) fn confirm(&self, prompt: &str) -> Result<bool, CommandError> {
        if !self.is_interactive() {
            return Ok(true);
        }
        cli_io::confirm_action(&self.theme, prompt, false)
    }

    pub(crate) fn report_error(&self, err: CommandError) -> Result<(), CliError> {
        match err {
            CommandError::ExitRequested => Ok(()),
            CommandError::InvalidArguments(message) => {
                self.print_error(&message);
                self.print_hint("Use `help <command>` for usage details.");
                Ok(())
            }
            CommandError::NotFound(token) => {
                self.print_error(&format!("No expense matches `{}`.", token));
                self.print_hint("Use `list` to see expense ids.");
                Ok(())
            }
            CommandError::Aborted => {
                self.print_warning("Operation cancelled; nothing was changed.");
                Ok(())
            }
            other => {
                self.print_error(&other.to_string());
                Ok(())
            }
        }
    }

    pub(crate) fn print_error(&self, message: &str) {
        cli_io::print_error(message);
    }

    pub(crate) fn print_warning(&self, message: &str) {
        cli_io::print_warning(message);
    }

    pub(crate) fn print_hint(&self, message: &str) {
        cli_io::print_hint(message);
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArguments(String),
    #[error("Expense not found: {0}")]
    NotFound(String),
    #[error("Operation cancelled")]
    Aborted,
    #[error(transparent)]
    Io(#[from] io::Error),
    #[error(transparent)]
    Core(#[from] BudgetError),
    #[error(transparent)]
    Dialoguer(#[from] dialoguer::Error),
    #[error("exit requested")]
    ExitRequested,
}

impl From<ServiceError> for CommandError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Core(BudgetError::InvalidInput(message)) => {
                CommandError::InvalidArguments(message)
            }
            ServiceError::Core(err) => CommandError::Core(err),
            ServiceError::Invalid(message) => CommandError::InvalidArguments(message),
            ServiceError::NotFound(id) => CommandError::NotFound(id.to_string()),
            ServiceError::Aborted => CommandError::Aborted,
        }
    }
}

impl CommandError {
    pub(crate) fn usage(entry_usage: &str) -> Self {
        CommandError::InvalidArguments(format!("Usage: {}", entry_usage))
    }
}

impl From<CliError> for CommandError {
    fn from(err: CliError) -> Self {
        match err {
            CliError::Core(inner) => CommandError::Core(inner),
            CliError::Input(message) | CliError::Command(message) => {
                CommandError::InvalidArguments(message)
            }
        }
    }
}

impl From<CommandError> for CliError {
    fn from(err: CommandError) -> Self {
        CliError::Command(err.to_string())
    }
}

#[cfg(test)]
pub(crate) fn process_script(lines: &[&str]) -> Result<(ShellContext, tempfile::TempDir), CliError> {
    let temp = tempfile::TempDir::new()?;
    let mut app = ShellContext::with_base_dir(CliMode::Script, temp.path().to_path_buf())?;
    for line in lines {
        match app.process_line(line) {
            Ok(LoopControl::Continue) => {}
            Ok(LoopControl::Exit) => break,
            Err(err) => app.report_error(err)?,
        }
    }
    Ok((app, temp))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ExpenseStatus;

    #[test]
    fn fresh_home_is_seeded() {
        let (app, _guard) = process_script(&[]).unwrap();
        assert_eq!(app.manager.store().len(), 6);
        assert_eq!(app.manager.summary().initial_balance, Decimal::from(5000));
    }

    #[test]
    fn pay_and_ignore_by_id() {
        let (app, _guard) = process_script(&["pay 1", "ignore 2", "edit 3 60"]).unwrap();
        let store = app.manager.store();
        assert_eq!(store.find(&"1".into()).unwrap().status, ExpenseStatus::Paid);
        assert_eq!(store.find(&"2".into()).unwrap().status, ExpenseStatus::Ignored);
        assert_eq!(store.find(&"3".into()).unwrap().current_value, Decimal::from(60));
    }

    #[test]
    fn invalid_input_leaves_budget_unchanged() {
        let (app, _guard) = process_script(&["edit 1 -5", "pay 99", "add \"\" 10"]).unwrap();
        let store = app.manager.store();
        assert_eq!(store.len(), 6);
        assert_eq!(store.find(&"1".into()).unwrap().current_value, Decimal::from(380));
    }

    #[test]
    fn exit_stops_processing() {
        let (app, _guard) = process_script(&["exit", "pay 1"]).unwrap();
        assert!(app.manager.store().find(&"1".into()).unwrap().is_pending());
    }

    #[test]
    fn typo_suggests_closest_command() {
        let (app, _guard) = process_script(&[]).unwrap();
        assert_eq!(app.closest_command("lst"), Some("list"));
        assert_eq!(app.closest_command("xyzzyplugh"), None);
    }

    #[test]
    fn service_errors_map_to_command_errors() {
        assert!(matches!(
            CommandError::from(ServiceError::NotFound("7".into())),
            CommandError::NotFound(id) if id == "7"
        ));
        assert!(matches!(
            CommandError::from(ServiceError::Invalid("bad".into())),
            CommandError::InvalidArguments(_)
        ));
        assert!(matches!(
            CommandError::from(ServiceError::Aborted),
            CommandError::Aborted
        ));
    }
}
