use crate::cli::commands::{expect_args, expense_label};
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::core::{BudgetCommand, CommandOutcome};
use crate::domain::ExpenseStatus;

const ADD_USAGE: &str = "add <name> <value> [--temp]";
const EDIT_DEFAULT_USAGE: &str = "edit-default <id> <name> <value>";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "add",
            "Add an expense (--temp for this month only)",
            ADD_USAGE,
            cmd_add,
        ),
        CommandEntry::new("pay", "Mark an expense as paid", "pay <id>", cmd_pay),
        CommandEntry::new(
            "ignore",
            "Ignore an expense, or restore an ignored one",
            "ignore <id>",
            cmd_ignore,
        ),
        CommandEntry::new(
            "edit",
            "Change this month's value of an expense",
            "edit <id> <value>",
            cmd_edit,
        ),
        CommandEntry::new("delete", "Remove an expense", "delete <id>", cmd_delete),
        CommandEntry::new(
            "edit-default",
            "Rename an expense and change its default value",
            EDIT_DEFAULT_USAGE,
            cmd_edit_default,
        ),
    ]
}

fn cmd_add(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let mut temporary = false;
    let mut positional = Vec::new();
    for arg in args {
        match *arg {
            "--temp" | "-t" => temporary = true,
            other => positional.push(other),
        }
    }

    let (name, value) = match positional.as_slice() {
        [name, value] => (name.to_string(), context.parse_amount(value)?),
        [] if context.is_interactive() => {
            let name = io::prompt_text(&context.theme, "Name")?;
            let value = io::prompt_amount(&context.theme, "Value")?;
            if !temporary {
                temporary = io::confirm_action(&context.theme, "Only for this month?", false)?;
            }
            (name, value)
        }
        _ => return Err(CommandError::usage(ADD_USAGE)),
    };

    let outcome = context.execute(BudgetCommand::AddExpense {
        name,
        value,
        temporary,
    })?;
    if let CommandOutcome::Added(id) = outcome {
        let kind = if temporary { "temporary" } else { "permanent" };
        io::print_success(format!(
            "Added {} expense {}.",
            kind,
            expense_label(context, &id)
        ));
    }
    Ok(())
}

fn cmd_pay(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, "pay <id>")?;
    let id = context.resolve_id(args[0])?;
    context.execute(BudgetCommand::Pay(id.clone()))?;
    io::print_success(format!("Paid {}.", expense_label(context, &id)));
    Ok(())
}

fn cmd_ignore(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, "ignore <id>")?;
    let id = context.resolve_id(args[0])?;
    if let CommandOutcome::StatusChanged { id, status } =
        context.execute(BudgetCommand::ToggleIgnore(id))?
    {
        let label = expense_label(context, &id);
        match status {
            ExpenseStatus::Ignored => io::print_success(format!("Ignored {}.", label)),
            _ => io::print_success(format!("Restored {} to pending.", label)),
        }
    }
    Ok(())
}

fn cmd_edit(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 2, "edit <id> <value>")?;
    let id = context.resolve_id(args[0])?;
    let value = context.parse_amount(args[1])?;
    context.execute(BudgetCommand::EditValue {
        id: id.clone(),
        value,
    })?;
    io::print_success(format!(
        "Set {} to {} for this month.",
        expense_label(context, &id),
        context.format_amount(value)
    ));
    Ok(())
}

fn cmd_delete(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    expect_args(args, 1, "delete <id>")?;
    let id = context.resolve_id(args[0])?;
    let label = expense_label(context, &id);
    if !context.confirm(&format!("Delete {}?", label))? {
        io::print_info("Nothing deleted.");
        return Ok(());
    }
    if let CommandOutcome::Deleted(expense) = context.execute(BudgetCommand::Delete(id))? {
        io::print_success(format!("Deleted `{}`.", expense.name));
    }
    Ok(())
}

fn cmd_edit_default(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let (token, name, value) = match args {
        [token, name, value] => (*token, name.to_string(), context.parse_amount(value)?),
        [token] if context.is_interactive() => {
            let name = io::prompt_text(&context.theme, "Name")?;
            let value = io::prompt_amount(&context.theme, "Default value")?;
            (*token, name, value)
        }
        _ => return Err(CommandError::usage(EDIT_DEFAULT_USAGE)),
    };
    let id = context.resolve_id(token)?;
    context.execute(BudgetCommand::EditPermanent {
        id: id.clone(),
        name,
        value,
    })?;
    io::print_success(format!(
        "Updated {}; default is now {}.",
        expense_label(context, &id),
        context.format_amount(value)
    ));
    Ok(())
}
