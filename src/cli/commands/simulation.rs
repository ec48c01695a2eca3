//! Summary, simulation list, balance and the new-month flow.

use dialoguer::theme::ColorfulTheme;
use rust_decimal::Decimal;

use crate::cli::commands::expect_args;
use crate::cli::core::{CommandError, CommandResult, ShellContext};
use crate::cli::io;
use crate::cli::registry::CommandEntry;
use crate::cli::view;
use crate::config::Config;
use crate::core::services::{
    RolloverDecisions, RolloverPlan, RolloverReport, ServiceError, ServiceResult,
};
use crate::core::{BudgetCommand, CommandOutcome};
use crate::currency::{format_amount, parse_amount};
use crate::domain::Expense;

const NEW_MONTH_USAGE: &str = "new-month [<balance>|keep [<temporary id> ...]]";

pub(crate) fn definitions() -> Vec<CommandEntry> {
    vec![
        CommandEntry::new("summary", "Show balance, pending and projection", "summary", cmd_summary),
        CommandEntry::new(
            "list",
            "List this month's expenses (paid ones last)",
            "list",
            cmd_list,
        ),
        CommandEntry::new(
            "balance",
            "Show or set the initial balance",
            "balance [<value>]",
            cmd_balance,
        ),
        CommandEntry::new(
            "new-month",
            "Start a new month, keeping permanent expenses",
            NEW_MONTH_USAGE,
            cmd_new_month,
        ),
    ]
}

fn cmd_summary(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    view::print_summary(&context.manager.summary(), &context.config);
    Ok(())
}

fn cmd_list(context: &mut ShellContext, _args: &[&str]) -> CommandResult {
    view::print_expenses(&context.manager.view(), &context.config);
    Ok(())
}

fn cmd_balance(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    if args.is_empty() {
        let current = context.manager.simulation().initial_balance;
        io::print_info(format!("Initial balance: {}", context.format_amount(current)));
        return Ok(());
    }
    expect_args(args, 1, "balance [<value>]")?;
    let value = context.parse_amount(args[0])?;
    if let CommandOutcome::BalanceSet(value) =
        context.execute(BudgetCommand::SetInitialBalance(value))?
    {
        io::print_success(format!(
            "Initial balance set to {}.",
            context.format_amount(value)
        ));
    }
    Ok(())
}

fn cmd_new_month(context: &mut ShellContext, args: &[&str]) -> CommandResult {
    let report = match args.split_first() {
        Some((balance, promote)) => {
            let plan = scripted_plan(context, balance, promote)?;
            match context.execute(BudgetCommand::Rollover(plan))? {
                CommandOutcome::RolledOver(report) => report,
                _ => return Ok(()),
            }
        }
        None if context.is_interactive() => {
            if !context.confirm("Start a new month? Paid and edited values will be reset.")? {
                return Err(CommandError::Aborted);
            }
            let mut prompts = PromptDecisions {
                theme: &context.theme,
                config: &context.config,
            };
            let report = context.manager.rollover(&mut prompts)?;
            context.warn_on_persistence_error();
            report
        }
        None => return Err(CommandError::usage(NEW_MONTH_USAGE)),
    };
    print_report(context, &report);
    Ok(())
}

/// Plan from arguments: a balance (or `keep`) and the temporary expenses to
/// carry over.
fn scripted_plan(
    context: &ShellContext,
    balance: &str,
    promote: &[&str],
) -> Result<RolloverPlan, CommandError> {
    let new_balance = if balance.eq_ignore_ascii_case("keep") {
        None
    } else {
        Some(context.parse_amount(balance)?)
    };
    let mut ids = Vec::with_capacity(promote.len());
    for token in promote {
        let id = context.resolve_id(token)?;
        let temporary = context
            .manager
            .store()
            .find(&id)
            .map(|expense| expense.is_temporary)
            .unwrap_or(false);
        if !temporary {
            return Err(CommandError::InvalidArguments(format!(
                "`{}` is not a temporary expense",
                token
            )));
        }
        ids.push(id);
    }
    Ok(RolloverPlan::new(ids, new_balance))
}

fn print_report(context: &ShellContext, report: &RolloverReport) {
    io::print_success(format!(
        "New month started with {} expense(s).",
        report.kept
    ));
    if !report.promoted.is_empty() {
        io::print_info(format!("Now permanent: {}", report.promoted.join(", ")));
    }
    if !report.dropped.is_empty() {
        io::print_info(format!("Dropped: {}", report.dropped.join(", ")));
    }
    if report.balance_rejected {
        io::print_warning(format!(
            "Balance out of range ignored; keeping {}.",
            context.format_amount(report.initial_balance)
        ));
    } else {
        io::print_info(format!(
            "Initial balance: {}",
            context.format_amount(report.initial_balance)
        ));
    }
}

/// Asks one question per temporary expense, then the new balance.
struct PromptDecisions<'a> {
    theme: &'a ColorfulTheme,
    config: &'a Config,
}

impl RolloverDecisions for PromptDecisions<'_> {
    fn promote(&mut self, expense: &Expense) -> ServiceResult<bool> {
        let prompt = format!(
            "Keep `{}` ({}) as a permanent expense?",
            expense.name,
            format_amount(expense.default_value, self.config)
        );
        io::confirm_action(self.theme, &prompt, false).map_err(|_| ServiceError::Aborted)
    }

    fn new_balance(&mut self, current: Decimal) -> ServiceResult<Option<Decimal>> {
        let prompt = format!(
            "New initial balance (blank keeps {})",
            format_amount(current, self.config)
        );
        loop {
            let answer = io::prompt_optional_text(self.theme, &prompt)
                .map_err(|_| ServiceError::Aborted)?;
            let Some(raw) = answer else {
                return Ok(None);
            };
            match parse_amount(&raw) {
                Ok(value) => return Ok(Some(value)),
                Err(err) => io::print_warning(err),
            }
        }
    }
}
