use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::view;
use crate::core::{BudgetCommand, CommandOutcome};

const REORDER_USAGE: &str = "reorder <id> [<id> ...]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new(
            "manage",
            "List permanent expenses in management order",
            "manage",
            cmd_manage,
        ),
        CommandEntry::new(
            "reorder",
            "Move the listed permanent expenses to the top, in the given order",
            REORDER_USAGE,
            cmd_reorder,
        ),
    ]
}

fn cmd_manage(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    view::print_managed(&context.manager.view(), &context.config);
    Ok(())
}

fn cmd_reorder(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        return Err(CommandError::usage(REORDER_USAGE));
    }
    let ids = args
        .iter()
        .map(|token| context.resolve_id(token))
        .collect::<Result<Vec<_>, _>>()?;
    if let CommandOutcome::Reordered { moved } = context.execute(BudgetCommand::Reorder(ids))? {
        io::print_success(format!("Order saved; {} expense(s) moved.", moved));
    }
    view::print_managed(&context.manager.view(), &context.config);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::cli::core::process_script;

    fn managed_ids(app: &crate::cli::core::ShellContext) -> Vec<String> {
        app.manager
            .store()
            .managed()
            .iter()
            .map(|e| e.id.to_string())
            .collect()
    }

    #[test]
    fn reorder_moves_listed_ids_first() {
        let (app, _guard) = process_script(&["reorder 6 5"]).unwrap();
        assert_eq!(managed_ids(&app), vec!["6", "5", "1", "2", "3", "4"]);
        assert!(app.manager.store().is_dense());
    }

    #[test]
    fn reorder_with_unknown_id_changes_nothing() {
        let (app, _guard) = process_script(&["reorder 6 nope"]).unwrap();
        assert_eq!(managed_ids(&app), vec!["1", "2", "3", "4", "5", "6"]);
    }
}
