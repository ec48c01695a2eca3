pub mod expense;
pub mod manage;
pub mod simulation;
pub mod system;

use crate::cli::core::{CommandError, ShellContext};
use crate::cli::registry::{CommandEntry, CommandRegistry};
use crate::domain::ExpenseId;

const ROOT_COMMAND_ORDER: &[&str] = &[
    "summary",
    "list",
    "add",
    "pay",
    "ignore",
    "edit",
    "delete",
    "manage",
    "edit-default",
    "reorder",
    "balance",
    "new-month",
    "help",
    "version",
    "exit",
];

pub(crate) fn all_entries() -> Vec<CommandEntry> {
    let mut commands = Vec::new();
    commands.extend(simulation::definitions());
    commands.extend(expense::definitions());
    commands.extend(manage::definitions());
    commands.extend(system::definitions());
    commands
}

pub(crate) fn register_all(registry: &mut CommandRegistry) {
    let mut entries = all_entries();
    entries.sort_by_key(|entry| {
        ROOT_COMMAND_ORDER
            .iter()
            .position(|name| entry.name.eq_ignore_ascii_case(name))
            .unwrap_or(ROOT_COMMAND_ORDER.len())
    });
    for entry in entries {
        registry.register(entry);
    }
}

/// Fails with the usage line unless exactly `count` arguments were given.
pub(crate) fn expect_args(args: &[&str], count: usize, usage: &str) -> Result<(), CommandError> {
    if args.len() == count {
        Ok(())
    } else {
        Err(CommandError::usage(usage))
    }
}

/// `Name` (short id) label used in confirmations and success messages.
pub(crate) fn expense_label(context: &ShellContext, id: &ExpenseId) -> String {
    context
        .manager
        .store()
        .find(id)
        .map(|expense| format!("`{}` ({})", expense.name, expense.id.short()))
        .unwrap_or_else(|| format!("`{}`", id))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_command_has_a_fixed_position() {
        let mut registry = CommandRegistry::new();
        register_all(&mut registry);
        let names: Vec<_> = registry.names().collect();
        assert_eq!(names, ROOT_COMMAND_ORDER.to_vec());
    }
}
