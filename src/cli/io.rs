use std::fmt;

use dialoguer::{theme::ColorfulTheme, Confirm, Input};
use rust_decimal::Decimal;

use crate::cli::core::CommandError;
use crate::cli::output;
use crate::currency::parse_amount;

/// Print an informational message via the standard CLI output helpers.
pub fn print_info(message: impl fmt::Display) {
    output::info(message);
}

/// Print a warning message via the standard CLI output helpers.
pub fn print_warning(message: impl fmt::Display) {
    output::warning(message);
}

/// Print an error message via the standard CLI output helpers.
pub fn print_error(message: impl fmt::Display) {
    output::error(message);
}

/// Print a success message via the standard CLI output helpers.
pub fn print_success(message: impl fmt::Display) {
    output::success(message);
}

pub fn print_hint(message: impl fmt::Display) {
    output::hint(message);
}

/// Prompt the user for confirmation with a yes/no question.
pub fn confirm_action(
    theme: &ColorfulTheme,
    prompt: &str,
    default: bool,
) -> Result<bool, CommandError> {
    Confirm::with_theme(theme)
        .with_prompt(prompt)
        .default(default)
        .interact()
        .map_err(CommandError::from)
}

/// Prompt the user for free-form text input.
pub fn prompt_text(theme: &ColorfulTheme, prompt: &str) -> Result<String, CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .interact_text()
        .map_err(CommandError::from)
}

/// Prompt for text that may be left blank.
pub fn prompt_optional_text(
    theme: &ColorfulTheme,
    prompt: &str,
) -> Result<Option<String>, CommandError> {
    let value = Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .allow_empty(true)
        .interact_text()
        .map_err(CommandError::from)?;
    let trimmed = value.trim();
    Ok((!trimmed.is_empty()).then(|| trimmed.to_string()))
}

/// Prompt for an amount, re-asking until the input parses.
pub fn prompt_amount(theme: &ColorfulTheme, prompt: &str) -> Result<Decimal, CommandError> {
    Input::<String>::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| -> Result<(), String> {
            parse_amount(input).map(|_| ()).map_err(|err| err.to_string())
        })
        .interact_text()
        .map_err(CommandError::from)
        .and_then(|raw| parse_amount(&raw).map_err(CommandError::from))
}
