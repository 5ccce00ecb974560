//! Expense CLI commands
//!
//! Fixed expense templates, dated expenses, and `generate`, the command a
//! scheduler runs once a day to materialize due recurring expenses.

use clap::Subcommand;

use super::property::resolve_property;
use super::{parse_date, parse_money, parse_optional_date, today};
use crate::auth::{authorize, Action, Role};
use crate::config::settings::Settings;
use crate::display::{format_fixed_expense_list, format_generation_report, format_variable_expense_list};
use crate::error::{StayError, StayResult};
use crate::models::{PropertyId, Recurrence, ReportPeriod, UnitId};
use crate::services::{
    ExpenseService, FixedExpenseUpdate, NewFixedExpense, NewVariableExpense, PropertyService,
};
use crate::storage::Storage;

/// Expense subcommands
#[derive(Subcommand)]
pub enum ExpenseCommands {
    /// Add a recurring (fixed) expense template
    AddFixed {
        /// Property name or ID
        property: String,
        description: String,
        amount: String,
        /// How often it recurs (monthly, annual)
        #[arg(short, long, default_value = "monthly")]
        recurrence: String,
        /// First occurrence (YYYY-MM-DD, default today)
        #[arg(short, long)]
        start: Option<String>,
        /// Last day the template is active (YYYY-MM-DD)
        #[arg(short, long)]
        end: Option<String>,
        /// Charge the expense to one unit
        #[arg(short, long)]
        unit: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
    },
    /// List fixed expense templates
    ListFixed {
        #[arg(short = 'P', long)]
        property: Option<String>,
    },
    /// Edit a fixed expense template
    EditFixed {
        /// Fixed expense ID
        expense: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        amount: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// Make the template open-ended again
        #[arg(long)]
        clear_end: bool,
    },
    /// Stop a fixed expense from recurring
    EndFixed {
        /// Fixed expense ID
        expense: String,
        /// Last active day (YYYY-MM-DD, default today)
        #[arg(long)]
        on: Option<String>,
    },
    /// Delete a fixed expense template (generated records are kept)
    DeleteFixed {
        /// Fixed expense ID
        expense: String,
    },
    /// Record a one-off expense
    Add {
        /// Property name or ID
        property: String,
        description: String,
        amount: String,
        /// Expense date (YYYY-MM-DD, default today)
        #[arg(short, long)]
        date: Option<String>,
        #[arg(short, long)]
        unit: Option<String>,
        #[arg(short, long, default_value = "")]
        category: String,
    },
    /// List dated expenses, newest first
    List {
        #[arg(short = 'P', long)]
        property: Option<String>,
        /// Month (YYYY-MM) or year (YYYY)
        #[arg(short, long)]
        period: Option<String>,
    },
    /// Delete a dated expense
    Delete {
        /// Expense ID
        expense: String,
    },
    /// Create the recurring expenses due today
    Generate {
        /// Evaluate as of this date instead of today (YYYY-MM-DD)
        #[arg(long)]
        as_of: Option<String>,
        /// Show what would be created without writing anything
        #[arg(long)]
        dry_run: bool,
    },
}

fn parse_recurrence(value: &str) -> StayResult<Recurrence> {
    Recurrence::parse(value).ok_or_else(|| {
        StayError::Validation(format!(
            "Invalid recurrence: '{}'. Valid values: monthly, annual",
            value
        ))
    })
}

fn resolve_unit(
    properties: &PropertyService,
    unit: Option<&str>,
    property_id: PropertyId,
) -> StayResult<Option<UnitId>> {
    unit.map(|u| properties.require_unit(u, Some(property_id)).map(|found| found.id))
        .transpose()
}

/// Handle an expense command
pub fn handle_expense_command(
    storage: &Storage,
    settings: &Settings,
    role: Role,
    cmd: ExpenseCommands,
) -> StayResult<()> {
    let service = ExpenseService::new(storage);
    let properties = PropertyService::new(storage);
    let currency = settings.currency_symbol.as_str();

    match cmd {
        ExpenseCommands::AddFixed {
            property,
            description,
            amount,
            recurrence,
            start,
            end,
            unit,
            category,
        } => {
            authorize(role, Action::ManageExpenses)?;
            let property = properties.require(&property)?;
            let expense = service.create_fixed(NewFixedExpense {
                property_id: property.id,
                unit_id: resolve_unit(&properties, unit.as_deref(), property.id)?,
                description,
                amount: parse_money(&amount)?,
                recurrence: parse_recurrence(&recurrence)?,
                start_date: parse_optional_date(start.as_deref())?.unwrap_or_else(today),
                end_date: parse_optional_date(end.as_deref())?,
                category,
            })?;
            println!(
                "Added {} expense '{}' ({}) starting {}",
                expense.recurrence.to_string().to_lowercase(),
                expense.description,
                expense.amount.format_with_symbol(currency),
                expense.start_date
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::ListFixed { property } => {
            authorize(role, Action::View)?;
            let property_id = resolve_property(&properties, property.as_deref())?;
            print!("{}", format_fixed_expense_list(&service.list_fixed(property_id)?, currency));
        }

        ExpenseCommands::EditFixed {
            expense,
            description,
            amount,
            category,
            clear_end,
        } => {
            authorize(role, Action::ManageExpenses)?;
            let found = service.require_fixed(&expense)?;
            let changes = FixedExpenseUpdate {
                description,
                amount: amount.as_deref().map(parse_money).transpose()?,
                end_date: clear_end.then_some(None),
                category: category.map(Some),
            };
            let updated = service.update_fixed(found.id, changes)?;
            println!("Updated fixed expense: {}", updated);
        }

        ExpenseCommands::EndFixed { expense, on } => {
            authorize(role, Action::ManageExpenses)?;
            let found = service.require_fixed(&expense)?;
            let end_date = parse_optional_date(on.as_deref())?.unwrap_or_else(today);
            let updated = service.end_fixed(found.id, end_date)?;
            println!("'{}' ends on {}", updated.description, end_date);
        }

        ExpenseCommands::DeleteFixed { expense } => {
            authorize(role, Action::ManageExpenses)?;
            let found = service.require_fixed(&expense)?;
            let deleted = service.delete_fixed(found.id)?;
            println!("Deleted fixed expense: {}", deleted.description);
        }

        ExpenseCommands::Add {
            property,
            description,
            amount,
            date,
            unit,
            category,
        } => {
            authorize(role, Action::ManageExpenses)?;
            let property = properties.require(&property)?;
            let expense = service.create_variable(NewVariableExpense {
                property_id: property.id,
                unit_id: resolve_unit(&properties, unit.as_deref(), property.id)?,
                date: parse_optional_date(date.as_deref())?.unwrap_or_else(today),
                description,
                amount: parse_money(&amount)?,
                category,
            })?;
            println!(
                "Recorded expense '{}' of {} on {}",
                expense.description,
                expense.amount.format_with_symbol(currency),
                expense.date
            );
            println!("  ID: {}", expense.id);
        }

        ExpenseCommands::List { property, period } => {
            authorize(role, Action::View)?;
            let property_id = resolve_property(&properties, property.as_deref())?;
            let period = period
                .as_deref()
                .map(ReportPeriod::parse)
                .transpose()
                .map_err(|e| StayError::Validation(e.to_string()))?;
            let expenses = service.list_variable(property_id, period)?;
            print!(
                "{}",
                format_variable_expense_list(&expenses, currency, &settings.generated_prefix)
            );
        }

        ExpenseCommands::Delete { expense } => {
            authorize(role, Action::ManageExpenses)?;
            let found = service
                .find_variable(&expense)?
                .ok_or_else(|| StayError::variable_expense_not_found(&expense))?;
            let deleted = service.delete_variable(found.id)?;
            println!("Deleted expense: {}", deleted.description);
        }

        ExpenseCommands::Generate { as_of, dry_run } => {
            authorize(role, Action::GenerateExpenses)?;
            let as_of = match as_of.as_deref() {
                Some(value) => parse_date(value)?,
                None => today(),
            };
            let report = service.generate(as_of, settings, dry_run)?;
            print!("{}", format_generation_report(&report, currency, dry_run));
        }
    }

    Ok(())
}
